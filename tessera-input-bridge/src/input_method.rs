//! Soft keyboard control through the platform input-method service.
//!
//! ## Usage
//!
//! Implement [`InputMethodService`] for the platform and hand it to the
//! bridge, or bind it later through the lifecycle hooks.

use std::{error::Error, fmt};

/// Errors reported by an input-method service.
#[derive(Debug)]
pub enum InputMethodError {
    /// The platform did not provide an input-method service.
    Unavailable,
    /// A platform call failed.
    Platform(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for InputMethodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "input method service is unavailable"),
            Self::Platform(err) => write!(f, "input method call failed: {err}"),
        }
    }
}

impl Error for InputMethodError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable => None,
            Self::Platform(err) => Some(err.as_ref()),
        }
    }
}

/// Platform component that shows and hides the on-screen keyboard for the
/// current window.
pub trait InputMethodService: Send + Sync {
    /// Requests the soft keyboard.
    ///
    /// `implicit` marks the request as not coming from an explicit user
    /// action, which lets the platform decline it.
    fn show_soft_input(&self, implicit: bool) -> Result<(), InputMethodError>;

    /// Requests that the soft keyboard be hidden.
    fn hide_soft_input(&self) -> Result<(), InputMethodError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            InputMethodError::Unavailable.to_string(),
            "input method service is unavailable"
        );
        let err = InputMethodError::Platform("window token missing".into());
        assert_eq!(
            err.to_string(),
            "input method call failed: window token missing"
        );
        assert!(err.source().is_some());
    }
}
