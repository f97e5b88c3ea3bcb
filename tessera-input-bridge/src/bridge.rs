//! # Input Event Bridge
//!
//! Mediates between the host's key dispatch and a native polling caller.
//!
//! ## Overview
//!
//! The host calls [`InputBridge::dispatch_key`] for every key event on its
//! event thread. Key-down events append their resolved Unicode value to the
//! [`PendingCharQueue`], then the event continues down the host's default
//! handling path. The native render loop calls
//! [`InputBridge::poll_next_char`] at its own cadence and receives each value
//! exactly once, in arrival order.
//!
//! Soft keyboard requests are relayed to an injected
//! [`InputMethodService`]. When no service is bound the requests are dropped.
//!
//! ## Usage
//!
//! ```
//! use tessera_input_bridge::{InputBridge, InputEventBridge, KeyEvent};
//!
//! let bridge = InputEventBridge::builder().build();
//! bridge.dispatch_key(&KeyEvent::down('H' as u32));
//! bridge.dispatch_key(&KeyEvent::up('H' as u32));
//!
//! assert_eq!(bridge.poll_next_char(), 'H' as u32);
//! assert_eq!(bridge.poll_next_char(), 0);
//! ```

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::{
    char_queue::PendingCharQueue,
    input_method::{InputMethodError, InputMethodService},
    key_event::KeyEvent,
};

/// Configuration for an [`InputEventBridge`].
#[derive(Debug, Clone, Default)]
pub struct BridgeConfig {
    /// Marks show requests as implicit.
    ///
    /// Defaults to `false`, which issues the request without flags.
    pub show_implicit: bool,
    /// Discards pending characters when the host suspends.
    ///
    /// Defaults to `false`, so text typed right before a suspend is still
    /// delivered after resume.
    pub drain_on_suspend: bool,
}

/// The host's default key handling path.
pub trait HostKeyHandler: Send + Sync {
    /// Handles the event and returns whether it was consumed.
    fn dispatch_default(&self, event: &KeyEvent) -> bool;
}

impl<F> HostKeyHandler for F
where
    F: Fn(&KeyEvent) -> bool + Send + Sync,
{
    fn dispatch_default(&self, event: &KeyEvent) -> bool {
        self(event)
    }
}

/// Default handler that never consumes events, leaving them to the platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unhandled;

impl HostKeyHandler for Unhandled {
    fn dispatch_default(&self, _event: &KeyEvent) -> bool {
        false
    }
}

/// Capability surface a host drives from its lifecycle hooks.
pub trait InputBridge: Send + Sync {
    /// Queues the resolved value of key-down events, then forwards the event
    /// to the host's default handling and returns its result.
    fn dispatch_key(&self, event: &KeyEvent) -> bool;

    /// Removes and returns the oldest pending value, `0` when none is pending.
    fn poll_next_char(&self) -> u32;

    /// Asks the input-method service to show the soft keyboard.
    fn show_soft_input(&self);

    /// Asks the input-method service to hide the soft keyboard.
    fn hide_soft_input(&self);
}

/// Standard [`InputBridge`] implementation.
pub struct InputEventBridge {
    queue: PendingCharQueue,
    input_method: RwLock<Option<Arc<dyn InputMethodService>>>,
    host_handler: Box<dyn HostKeyHandler>,
    config: BridgeConfig,
}

impl InputEventBridge {
    /// Creates a bridge builder.
    pub fn builder() -> InputEventBridgeBuilder {
        InputEventBridgeBuilder::new()
    }

    /// Returns the bridge configuration.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Returns the pending character queue.
    pub fn queue(&self) -> &PendingCharQueue {
        &self.queue
    }

    /// Removes and returns the oldest pending value, or `None` when empty.
    ///
    /// Unlike [`InputBridge::poll_next_char`] this tells an empty queue apart
    /// from a key that produced no character.
    pub fn try_poll_next_char(&self) -> Option<u32> {
        self.queue.pop()
    }

    /// Removes and returns every pending value, oldest first.
    pub fn take_pending_chars(&self) -> Vec<u32> {
        self.queue.take_chars()
    }

    /// Binds or replaces the input-method service.
    pub fn bind_input_method(&self, service: Arc<dyn InputMethodService>) {
        *self.input_method.write() = Some(service);
    }

    /// Drops the input-method service. Later show/hide requests are no-ops.
    pub fn unbind_input_method(&self) {
        *self.input_method.write() = None;
    }

    /// Whether an input-method service is currently bound.
    pub fn has_input_method(&self) -> bool {
        self.input_method.read().is_some()
    }

    fn with_input_method(
        &self,
        request: &'static str,
        f: impl FnOnce(&dyn InputMethodService) -> Result<(), InputMethodError>,
    ) {
        let Some(service) = self.input_method.read().clone() else {
            debug!("Input method service unavailable, dropping {request} request");
            return;
        };
        match f(service.as_ref()) {
            Ok(()) => {}
            Err(InputMethodError::Unavailable) => {
                debug!("Input method service unavailable, dropping {request} request");
            }
            Err(err) => warn!("Soft input {request} request failed: {err}"),
        }
    }
}

impl InputBridge for InputEventBridge {
    fn dispatch_key(&self, event: &KeyEvent) -> bool {
        if event.is_down() {
            self.queue.push(event.unicode_char);
        }
        let consumed = self.host_handler.dispatch_default(event);
        trace!(
            action = ?event.action,
            key_code = event.key_code,
            consumed,
            "dispatched key event"
        );
        consumed
    }

    fn poll_next_char(&self) -> u32 {
        self.queue.poll()
    }

    fn show_soft_input(&self) {
        let implicit = self.config.show_implicit;
        self.with_input_method("show", |service| service.show_soft_input(implicit));
    }

    fn hide_soft_input(&self) {
        self.with_input_method("hide", |service| service.hide_soft_input());
    }
}

impl<T: InputBridge + ?Sized> InputBridge for Arc<T> {
    fn dispatch_key(&self, event: &KeyEvent) -> bool {
        (**self).dispatch_key(event)
    }

    fn poll_next_char(&self) -> u32 {
        (**self).poll_next_char()
    }

    fn show_soft_input(&self) {
        (**self).show_soft_input()
    }

    fn hide_soft_input(&self) {
        (**self).hide_soft_input()
    }
}

/// Builder for [`InputEventBridge`].
pub struct InputEventBridgeBuilder {
    config: BridgeConfig,
    input_method: Option<Arc<dyn InputMethodService>>,
    host_handler: Box<dyn HostKeyHandler>,
}

impl Default for InputEventBridgeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InputEventBridgeBuilder {
    /// Creates a builder with default config, no service and [`Unhandled`].
    pub fn new() -> Self {
        Self {
            config: BridgeConfig::default(),
            input_method: None,
            host_handler: Box::new(Unhandled),
        }
    }

    /// Overrides the bridge configuration.
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the input-method service.
    pub fn input_method(mut self, service: Arc<dyn InputMethodService>) -> Self {
        self.input_method = Some(service);
        self
    }

    /// Sets the host's default key handling path.
    pub fn host_handler(mut self, handler: impl HostKeyHandler + 'static) -> Self {
        self.host_handler = Box::new(handler);
        self
    }

    /// Builds the bridge.
    pub fn build(self) -> InputEventBridge {
        InputEventBridge {
            queue: PendingCharQueue::new(),
            input_method: RwLock::new(self.input_method),
            host_handler: self.host_handler,
            config: self.config,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        thread,
    };

    use parking_lot::Mutex;

    use super::*;
    use crate::key_event::{KeyAction, NO_CHAR};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Request {
        Show { implicit: bool },
        Hide,
    }

    #[derive(Default)]
    pub(crate) struct RecordingInputMethod {
        pub(crate) requests: Mutex<Vec<Request>>,
    }

    impl InputMethodService for RecordingInputMethod {
        fn show_soft_input(&self, implicit: bool) -> Result<(), InputMethodError> {
            self.requests.lock().push(Request::Show { implicit });
            Ok(())
        }

        fn hide_soft_input(&self) -> Result<(), InputMethodError> {
            self.requests.lock().push(Request::Hide);
            Ok(())
        }
    }

    struct FailingInputMethod;

    impl InputMethodService for FailingInputMethod {
        fn show_soft_input(&self, _implicit: bool) -> Result<(), InputMethodError> {
            Err(InputMethodError::Platform("keyboard is animating".into()))
        }

        fn hide_soft_input(&self) -> Result<(), InputMethodError> {
            Err(InputMethodError::Unavailable)
        }
    }

    #[test]
    fn test_dispatch_then_poll_in_order() {
        let bridge = InputEventBridge::builder().build();
        for code_point in [72, 101, 0, 108] {
            bridge.dispatch_key(&KeyEvent::down(code_point));
        }
        assert_eq!(bridge.poll_next_char(), 72);
        assert_eq!(bridge.poll_next_char(), 101);
        assert_eq!(bridge.poll_next_char(), 0);
        assert_eq!(bridge.poll_next_char(), 108);
        assert_eq!(bridge.poll_next_char(), NO_CHAR);
    }

    #[test]
    fn test_non_down_events_are_not_queued() {
        let bridge = InputEventBridge::builder().build();
        bridge.dispatch_key(&KeyEvent::up('a' as u32));
        bridge.dispatch_key(&KeyEvent::new(KeyAction::Multiple, 'b' as u32));
        bridge.dispatch_key(&KeyEvent::new(KeyAction::Other(9), 'c' as u32));
        assert!(bridge.queue().is_empty());
        assert_eq!(bridge.poll_next_char(), NO_CHAR);
        assert_eq!(bridge.try_poll_next_char(), None);
    }

    #[test]
    fn test_host_handler_sees_every_event() {
        let seen = Arc::new(AtomicUsize::new(0));
        let bridge = {
            let seen = seen.clone();
            InputEventBridge::builder()
                .host_handler(move |event: &KeyEvent| {
                    seen.fetch_add(1, Ordering::SeqCst);
                    event.key_code == 4
                })
                .build()
        };

        assert!(!bridge.dispatch_key(&KeyEvent::down('x' as u32)));
        assert!(bridge.dispatch_key(&KeyEvent::up(0).with_key_code(4)));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert_eq!(bridge.take_pending_chars(), vec!['x' as u32]);
    }

    #[test]
    fn test_unhandled_is_default() {
        let bridge = InputEventBridge::builder().build();
        assert!(!bridge.dispatch_key(&KeyEvent::down('q' as u32)));
    }

    #[test]
    fn test_soft_input_requests_reach_service() {
        let service = Arc::new(RecordingInputMethod::default());
        let bridge = InputEventBridge::builder()
            .config(BridgeConfig {
                show_implicit: true,
                ..BridgeConfig::default()
            })
            .input_method(service.clone())
            .build();

        bridge.show_soft_input();
        bridge.hide_soft_input();
        assert_eq!(
            *service.requests.lock(),
            vec![Request::Show { implicit: true }, Request::Hide]
        );
    }

    #[test]
    fn test_soft_input_without_service_is_noop() {
        let bridge = InputEventBridge::builder().build();
        bridge.dispatch_key(&KeyEvent::down('z' as u32));
        assert!(!bridge.has_input_method());

        bridge.show_soft_input();
        bridge.hide_soft_input();
        assert_eq!(bridge.take_pending_chars(), vec!['z' as u32]);
    }

    #[test]
    fn test_failing_service_leaves_queue_alone() {
        let bridge = InputEventBridge::builder()
            .input_method(Arc::new(FailingInputMethod))
            .build();
        bridge.dispatch_key(&KeyEvent::down(1));
        bridge.show_soft_input();
        bridge.hide_soft_input();
        assert_eq!(bridge.poll_next_char(), 1);
        assert_eq!(bridge.poll_next_char(), NO_CHAR);
    }

    #[test]
    fn test_bind_and_unbind() {
        let service = Arc::new(RecordingInputMethod::default());
        let bridge = InputEventBridge::builder().build();

        bridge.bind_input_method(service.clone());
        bridge.show_soft_input();
        bridge.unbind_input_method();
        bridge.hide_soft_input();

        assert_eq!(
            *service.requests.lock(),
            vec![Request::Show { implicit: false }]
        );
    }

    #[test]
    fn test_interleaved_dispatch_and_poll() {
        const COUNT: u32 = 5_000;
        let bridge = Arc::new(InputEventBridge::builder().build());

        let host = {
            let bridge = bridge.clone();
            thread::spawn(move || {
                for code_point in 1..=COUNT {
                    bridge.dispatch_key(&KeyEvent::down(code_point));
                    bridge.dispatch_key(&KeyEvent::up(code_point));
                }
            })
        };

        let mut received = Vec::with_capacity(COUNT as usize);
        while received.len() < COUNT as usize {
            match bridge.poll_next_char() {
                NO_CHAR => thread::yield_now(),
                code_point => received.push(code_point),
            }
        }
        host.join().expect("host thread panicked");

        assert_eq!(received, (1..=COUNT).collect::<Vec<_>>());
        assert_eq!(bridge.poll_next_char(), NO_CHAR);
    }
}
