//! Android backend for the input bridge.
//!
//! ## Usage
//!
//! With `android-activity`, build a [`HostContext`] on resume and route key
//! events through [`dispatch_android_key`]:
//!
//! ```ignore
//! app.input_events_iter()?.next(|event| match event {
//!     InputEvent::KeyEvent(key) => dispatch_android_key(&bridge, &app, key),
//!     _ => InputStatus::Unhandled,
//! });
//! ```
//!
//! Apps whose Java activity owns key dispatch use the entry points in
//! [`exports`] instead.

pub mod exports;
pub mod ime;
pub mod jni;

use std::sync::Arc;

use tracing::{debug, warn};
use winit::platform::android::activity::{
    AndroidApp, InputStatus,
    input::{KeyEvent as AndroidKeyEvent, KeyMapChar},
};

pub use ime::AndroidInputMethod;
pub use jni::AndroidJniError;

use crate::{
    bridge::InputBridge,
    input_method::InputMethodService,
    key_event::{COMBINING_ACCENT, KeyAction, KeyEvent, NO_CHAR},
    lifecycle::HostContext,
};

/// Builds the lifecycle context for the app's current activity.
///
/// The context carries no input method when the JNI lookup fails, which
/// turns soft keyboard requests into no-ops.
pub fn host_context(android_app: &AndroidApp) -> HostContext {
    match AndroidInputMethod::from_app(android_app) {
        Ok(service) => {
            let service: Arc<dyn InputMethodService> = Arc::new(service);
            HostContext::new(Some(service))
        }
        Err(err) => {
            warn!("Input method service unavailable: {err}");
            HostContext::new(None)
        }
    }
}

/// Converts an `android-activity` key event, resolving its Unicode value
/// against the event's meta state.
pub fn key_event_from_android(android_app: &AndroidApp, event: &AndroidKeyEvent<'_>) -> KeyEvent {
    let action = KeyAction::from_raw(u32::from(event.action()) as i32);
    KeyEvent {
        action,
        key_code: u32::from(event.key_code()) as i32,
        meta_state: event.meta_state().0,
        unicode_char: resolve_unicode_char(android_app, event),
    }
}

/// Routes an `android-activity` key event through the bridge.
///
/// Returns [`InputStatus::Unhandled`] unless the host handler consumed the
/// event, so the system keeps its default handling.
pub fn dispatch_android_key(
    bridge: &impl InputBridge,
    android_app: &AndroidApp,
    event: &AndroidKeyEvent<'_>,
) -> InputStatus {
    let event = key_event_from_android(android_app, event);
    if bridge.dispatch_key(&event) {
        InputStatus::Handled
    } else {
        InputStatus::Unhandled
    }
}

fn resolve_unicode_char(android_app: &AndroidApp, event: &AndroidKeyEvent<'_>) -> u32 {
    let key_map = match android_app.device_key_character_map(event.device_id()) {
        Ok(key_map) => key_map,
        Err(err) => {
            debug!("No key character map for device {}: {err:?}", event.device_id());
            return NO_CHAR;
        }
    };
    match key_map.get(event.key_code(), event.meta_state()) {
        Ok(KeyMapChar::Unicode(ch)) => ch as u32,
        Ok(KeyMapChar::CombiningAccent(ch)) => ch as u32 | COMBINING_ACCENT,
        Ok(_) => NO_CHAR,
        Err(err) => {
            debug!("Key character lookup failed: {err:?}");
            NO_CHAR
        }
    }
}
