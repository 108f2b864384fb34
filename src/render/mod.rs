pub mod layout;
pub mod renderer;

pub use layout::{CELL_COLUMNS, WindowLayout};
pub use renderer::Renderer;
