use crossterm::event::Event as CrosstermEvent;

/// Events processed by TUI applications.
#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(super) enum TuiEvent {
    /// Board update timing (based on the tick interval).
    Tick,
    /// Something changed since the last draw.
    Render,
    /// Terminal events such as key input and resize.
    Crossterm(CrosstermEvent),
}
