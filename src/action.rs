/// What a key press asks the refresh loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Draw the last snapshot again without sampling.
    Redraw,
    None,
}
