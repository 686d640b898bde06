//! Platform implementations of the graceful-close capability
//!
//! Windows walks the top-level window list and posts `WM_CLOSE` to the
//! first window owned by the target process, exactly what a user clicking
//! the close button would produce. Unix has no window registry, so the
//! process itself is treated as the closable handle and `SIGTERM` plays
//! the role of the close message; IIS Express does not exist there, but
//! the contract keeps the core testable everywhere.

use crate::traits::{WindowLocator, WindowRef};

#[derive(Debug, Default)]
pub struct NativeWindowLocator;

#[cfg(windows)]
impl WindowLocator for NativeWindowLocator {
    fn find_top_level_window(&self, pid: u32) -> Option<WindowRef> {
        use windows::Win32::Foundation::HWND;
        use windows::Win32::UI::WindowsAndMessaging::{
            GetTopWindow, GetWindow, GetWindowThreadProcessId, GW_HWNDNEXT,
        };

        unsafe {
            let mut hwnd = GetTopWindow(HWND::default()).ok()?;
            loop {
                let mut owner = 0u32;
                GetWindowThreadProcessId(hwnd, Some(&mut owner));
                if owner == pid {
                    return Some(WindowRef(hwnd.0 as isize));
                }
                hwnd = GetWindow(hwnd, GW_HWNDNEXT).ok()?;
            }
        }
    }

    fn post_close(&self, window: WindowRef) {
        use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
        use windows::Win32::UI::WindowsAndMessaging::{PostMessageW, WM_CLOSE};

        unsafe {
            let hwnd = HWND(window.0 as *mut core::ffi::c_void);
            let _ = PostMessageW(hwnd, WM_CLOSE, WPARAM(0), LPARAM(0));
        }
    }
}

#[cfg(unix)]
impl WindowLocator for NativeWindowLocator {
    fn find_top_level_window(&self, pid: u32) -> Option<WindowRef> {
        use nix::sys::signal;
        use nix::unistd::Pid;

        // signal 0 checks for existence without delivering anything
        signal::kill(Pid::from_raw(pid as i32), None).ok()?;
        Some(WindowRef(pid as isize))
    }

    fn post_close(&self, window: WindowRef) {
        use nix::sys::signal::{self, Signal};
        use nix::unistd::Pid;

        let _ = signal::kill(Pid::from_raw(window.0 as i32), Signal::SIGTERM);
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn locating_the_current_process_succeeds() {
        let locator = NativeWindowLocator;
        let pid = std::process::id();

        assert_eq!(
            locator.find_top_level_window(pid),
            Some(WindowRef(pid as isize))
        );
    }

    #[test]
    fn locating_a_dead_process_returns_none() {
        let locator = NativeWindowLocator;

        // pids wrap well below this on any reasonable configuration
        assert_eq!(locator.find_top_level_window(0x7fff_fff0), None);
    }
}
