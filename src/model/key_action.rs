//! Domain-level keyboard actions independent of key bindings.

/// User intents in the timeline viewer.
///
/// The mapping from `crossterm` key events to actions lives in
/// [`KeyBindings`](crate::config::KeyBindings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Scroll toward earlier years by one step. Default: h/←
    ScrollLeft,
    /// Scroll toward later years by one step. Default: l/→
    ScrollRight,
    /// Scroll one viewport toward earlier years. Default: H/Page Up
    PageLeft,
    /// Scroll one viewport toward later years. Default: L/Page Down
    PageRight,
    /// Scroll one card row up. Default: k/↑
    ScrollUp,
    /// Scroll one card row down. Default: j/↓
    ScrollDown,
    /// Jump to the start of the timeline. Default: g/Home
    ScrollToStart,
    /// Jump to the present. Default: G/End
    ScrollToPresent,
    /// Switch between century and decade density. Default: z
    ToggleZoom,
    /// Centre on a named jump point. Field: index into the jump list. Default: 1-5
    JumpTo(usize),
    /// Show or hide the "no historical era" sidebar. Default: Tab
    ToggleSidebar,
    /// Leave the viewer. Default: q/Esc
    Quit,
}
