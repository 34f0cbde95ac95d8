use sudo::RunningAs;

use crate::common::package::session::SessionError;

/// Fail before any side effect when not running as root.
pub fn require_root() -> Result<(), SessionError> {
    match sudo::check() {
        RunningAs::Root => Ok(()),
        _ => Err(SessionError::NotRoot),
    }
}
