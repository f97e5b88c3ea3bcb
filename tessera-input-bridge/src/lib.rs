//! Key event and soft keyboard bridge for Tessera's Android backend.
//!
//! The host application framework delivers key events on its own thread,
//! while the native render loop wants characters on its own schedule. The
//! [`InputEventBridge`] sits between the two: key-down events are queued as
//! resolved Unicode code points and handed out one at a time by
//! [`InputBridge::poll_next_char`], and soft keyboard requests are relayed to
//! the platform input-method service.
//!
//! # Dispatch and poll
//!
//! ```
//! use tessera_input_bridge::{InputBridge, InputEventBridge, KeyEvent};
//!
//! let bridge = InputEventBridge::builder().build();
//!
//! // Host event thread.
//! for ch in "Hi".chars() {
//!     bridge.dispatch_key(&KeyEvent::down(ch as u32));
//!     bridge.dispatch_key(&KeyEvent::up(ch as u32));
//! }
//!
//! // Render loop.
//! assert_eq!(bridge.poll_next_char(), 'H' as u32);
//! assert_eq!(bridge.poll_next_char(), 'i' as u32);
//! assert_eq!(bridge.poll_next_char(), 0);
//! ```
//!
//! `0` doubles as "no character" for keys without a printable value and as
//! "nothing pending". Use [`InputEventBridge::try_poll_next_char`] when the
//! two need to be told apart.
//!
//! # Soft keyboard
//!
//! The input-method service is injected as an [`InputMethodService`] handle,
//! either at build time or through the [`lifecycle`] hooks. Without one,
//! [`InputBridge::show_soft_input`] and [`InputBridge::hide_soft_input`] do
//! nothing.
//!
//! ```
//! use std::sync::Arc;
//!
//! use tessera_input_bridge::{
//!     InputBridge, InputEventBridge, InputMethodError, InputMethodService,
//! };
//!
//! struct Keyboard;
//!
//! impl InputMethodService for Keyboard {
//!     fn show_soft_input(&self, _implicit: bool) -> Result<(), InputMethodError> {
//!         Ok(())
//!     }
//!
//!     fn hide_soft_input(&self) -> Result<(), InputMethodError> {
//!         Ok(())
//!     }
//! }
//!
//! let bridge = InputEventBridge::builder()
//!     .input_method(Arc::new(Keyboard))
//!     .build();
//! bridge.show_soft_input();
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

#[cfg(target_os = "android")]
pub mod android;
pub mod bridge;
pub mod char_queue;
pub mod input_method;
pub mod key_event;
pub mod lifecycle;
pub mod logging;

pub use bridge::{
    BridgeConfig, HostKeyHandler, InputBridge, InputEventBridge, InputEventBridgeBuilder,
    Unhandled,
};
pub use char_queue::{CharConsumer, CharProducer, PendingCharQueue};
pub use input_method::{InputMethodError, InputMethodService};
pub use key_event::{
    COMBINING_ACCENT, COMBINING_ACCENT_MASK, KeyAction, KeyEvent, NO_CHAR, decode_char,
    is_combining_accent,
};
pub use lifecycle::{
    BridgeHook, BridgePlugin, HookResult, HostContext, LifecycleHost, install_bridge,
    installed_bridge, uninstall_bridge,
};
pub use logging::init_tracing;

#[cfg(target_os = "android")]
pub use winit;
