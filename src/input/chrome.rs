/// Window chrome controls: the three title-bar dots and the minimized bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeControl {
    /// Red dot
    Close,
    /// Yellow dot
    Minimize,
    /// Green dot
    ToggleFullscreen,
    /// Click on the minimized bar
    Restore,
}
