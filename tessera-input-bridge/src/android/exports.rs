//! Native methods for a Java activity that owns key dispatch.
//!
//! The activity declares these on `com.tessera.inputbridge.InputBridge`:
//!
//! ```java
//! static native void nativeInit(Activity activity);
//! static native void nativeRelease();
//! static native boolean nativeDispatchKey(int action, int unicodeChar);
//! static native int nativePollUnicodeChar();
//! static native void nativeShowSoftInput();
//! static native void nativeHideSoftInput();
//! ```
//!
//! and falls through to `super.dispatchKeyEvent` whenever
//! `nativeDispatchKey` returns `false`.

use std::sync::Arc;

use jni::{
    JNIEnv,
    objects::{JClass, JObject},
    sys::{JNI_FALSE, JNI_TRUE, jboolean, jint},
};
use tracing::{debug, trace, warn};

use super::ime::AndroidInputMethod;
use crate::{
    bridge::{InputBridge, InputEventBridge},
    key_event::{KeyAction, KeyEvent, NO_CHAR},
    lifecycle::{install_bridge, installed_bridge, uninstall_bridge},
};

/// Installs a bridge for the calling activity and binds its input method.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tessera_inputbridge_InputBridge_nativeInit<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    activity: JObject<'local>,
) {
    let bridge = match installed_bridge() {
        Some(bridge) => bridge,
        None => {
            let bridge = Arc::new(InputEventBridge::builder().build());
            install_bridge(bridge.clone());
            bridge
        }
    };
    match AndroidInputMethod::from_env(&mut env, &activity) {
        Ok(service) => bridge.bind_input_method(Arc::new(service)),
        Err(err) => warn!("Failed to bind input method service: {err}"),
    }
}

/// Uninstalls the bridge. Pending characters are dropped.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tessera_inputbridge_InputBridge_nativeRelease<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
) {
    if let Some(bridge) = uninstall_bridge() {
        bridge.unbind_input_method();
        let dropped = bridge.queue().clear();
        debug!("Input bridge released with {dropped} pending chars");
    }
}

/// Queues the resolved value of a key-down. Returns whether the event was
/// consumed on the native side.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tessera_inputbridge_InputBridge_nativeDispatchKey<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    action: jint,
    unicode_char: jint,
) -> jboolean {
    let Some(bridge) = installed_bridge() else {
        trace!("No input bridge installed, ignoring key event");
        return JNI_FALSE;
    };
    // Keep the bit pattern so a combining accent flag survives.
    let event = KeyEvent::new(KeyAction::from_raw(action), unicode_char as u32);
    if bridge.dispatch_key(&event) {
        JNI_TRUE
    } else {
        JNI_FALSE
    }
}

/// Returns the next pending value, `0` when none is pending.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tessera_inputbridge_InputBridge_nativePollUnicodeChar<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jint {
    installed_bridge().map_or(NO_CHAR, |bridge| bridge.poll_next_char()) as jint
}

/// Shows the soft keyboard through the installed bridge.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tessera_inputbridge_InputBridge_nativeShowSoftInput<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
) {
    if let Some(bridge) = installed_bridge() {
        bridge.show_soft_input();
    }
}

/// Hides the soft keyboard through the installed bridge.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_tessera_inputbridge_InputBridge_nativeHideSoftInput<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
) {
    if let Some(bridge) = installed_bridge() {
        bridge.hide_soft_input();
    }
}
