//! Trait seams for platform capabilities and output forwarding
//!
//! These traits are the injection points for everything the core cannot
//! do portably: locating a server's window to ask it to close, and
//! delivering forwarded child output. Mock implementations are generated
//! for tests.

/// Opaque reference to a top-level window.
///
/// On Windows this wraps an `HWND`; the Unix implementation uses the
/// process id itself as the closable handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRef(pub isize);

/// Locates a process's top-level window and asks it to close.
///
/// The close request is asynchronous, equivalent to a user clicking the
/// close button; it triggers the target's own graceful-shutdown path.
#[mockall::automock]
pub trait WindowLocator: Send + Sync {
    /// First top-level window owned by the given process, if any.
    fn find_top_level_window(&self, pid: u32) -> Option<WindowRef>;

    /// Post a close request to the window. Fire-and-forget.
    fn post_close(&self, window: WindowRef);
}

/// Destination for child output lines that did not match a sentinel.
///
/// Implementations must not block; lines arrive in emission order.
#[mockall::automock]
pub trait LogSink: Send + Sync {
    /// Forward one line verbatim.
    fn forward(&self, line: &str);
}
