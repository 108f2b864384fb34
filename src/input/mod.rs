pub mod chrome;
pub mod handler;

pub use chrome::ChromeControl;
pub use handler::{InputHandler, KeyAction};
