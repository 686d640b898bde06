//! Scripted child-process fixtures
//!
//! Shell bodies that impersonate the two real participants of a run.
//! Each body is installed as an executable script; the arguments the
//! launcher passes (`/path:`, `--config=`, script path) are ignored.

/// Canned script bodies for fake servers and runners.
pub struct TestFixtures;

impl TestFixtures {
    /// Exact sentinel the launcher waits for.
    pub const READY_LINE: &'static str = "IIS Express is running.";

    /// Exact sentinel that marks a runner failure.
    pub const UNREACHABLE_LINE: &'static str = "Unable to load the address!";

    /// Server that becomes ready and then honors a close request.
    pub fn cooperative_server() -> String {
        format!(
            "trap 'exit 0' TERM\necho \"{}\"\nwhile :; do sleep 1; done",
            Self::READY_LINE
        )
    }

    /// Server that becomes ready but ignores close requests.
    pub fn stubborn_server() -> String {
        format!(
            "trap '' TERM\necho \"{}\"\nwhile :; do sleep 1; done",
            Self::READY_LINE
        )
    }

    /// Server that exits before ever printing the readiness line.
    pub fn crashing_server() -> String {
        "echo starting\nexit 1".to_string()
    }

    /// Server that never becomes ready and never exits.
    pub fn silent_server() -> String {
        "exec sleep 60".to_string()
    }

    /// Runner that prints a report and exits cleanly.
    pub fn passing_runner() -> String {
        "echo suite passed\nexit 0".to_string()
    }

    /// Runner that exits nonzero without printing any sentinel.
    pub fn failing_runner() -> String {
        "echo suite failed\nexit 3".to_string()
    }

    /// Runner that hits the unreachable-address sentinel and then hangs.
    pub fn unreachable_runner() -> String {
        format!("echo \"{}\"\nexec sleep 60", Self::UNREACHABLE_LINE)
    }

    /// Runner that never finishes.
    pub fn hanging_runner() -> String {
        "exec sleep 60".to_string()
    }
}
