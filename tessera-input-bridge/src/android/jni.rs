//! JNI error plumbing shared by the Android input-method service and the
//! exported entry points.

use std::fmt;

use jni::{JNIEnv, errors::Error as JniError};

use crate::input_method::InputMethodError;

/// Errors returned by Android JNI helper calls.
#[derive(Debug)]
pub enum AndroidJniError {
    /// A JNI call failed.
    Jni(JniError),
    /// A Java method returned null for a non-nullable type.
    NullReturn(&'static str),
    /// A required Java object was null.
    NullObject(&'static str),
}

impl fmt::Display for AndroidJniError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jni(err) => write!(f, "JNI error: {err}"),
            Self::NullReturn(name) => write!(f, "Java returned null for {name}"),
            Self::NullObject(name) => write!(f, "Java object {name} was null"),
        }
    }
}

impl std::error::Error for AndroidJniError {}

impl From<JniError> for AndroidJniError {
    fn from(err: JniError) -> Self {
        Self::Jni(err)
    }
}

impl From<AndroidJniError> for InputMethodError {
    fn from(err: AndroidJniError) -> Self {
        Self::Platform(Box::new(err))
    }
}

impl From<JniError> for InputMethodError {
    fn from(err: JniError) -> Self {
        AndroidJniError::Jni(err).into()
    }
}

/// Maps a JNI error, describing and clearing a pending Java exception so the
/// thread can keep making JNI calls.
pub(crate) fn map_jni_error(env: &mut JNIEnv<'_>, err: JniError) -> AndroidJniError {
    if matches!(err, JniError::JavaException) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
    AndroidJniError::Jni(err)
}
