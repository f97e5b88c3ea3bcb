//! Host lifecycle hooks for the input bridge.
//!
//! ## Usage
//!
//! Register a [`BridgePlugin`] with a [`LifecycleHost`] and forward the
//! host's resume, suspend and shutdown callbacks to it.

use std::{
    error::Error,
    sync::{Arc, OnceLock},
};

use parking_lot::RwLock;
use tracing::{debug, error};

use crate::{bridge::InputEventBridge, input_method::InputMethodService};

/// The result type used by lifecycle hooks.
pub type HookResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Lifecycle hooks invoked by the host.
pub trait BridgeHook: Send + Sync + 'static {
    /// Returns the hook name for logging and diagnostics.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Called when the host creates or resumes its window.
    fn on_resumed(&self, _context: &HostContext) -> HookResult {
        Ok(())
    }

    /// Called when the host suspends and releases its window.
    fn on_suspended(&self, _context: &HostContext) -> HookResult {
        Ok(())
    }

    /// Called when the host is shutting down.
    fn on_shutdown(&self, _context: &HostContext) -> HookResult {
        Ok(())
    }
}

/// Platform context shared with hooks during lifecycle events.
#[derive(Clone, Default)]
pub struct HostContext {
    input_method: Option<Arc<dyn InputMethodService>>,
}

impl HostContext {
    /// Creates a context, `None` when the platform has no input-method service.
    pub fn new(input_method: Option<Arc<dyn InputMethodService>>) -> Self {
        Self { input_method }
    }

    /// Returns the input-method service for the current window.
    pub fn input_method(&self) -> Option<&Arc<dyn InputMethodService>> {
        self.input_method.as_ref()
    }
}

/// Hook that keeps an [`InputEventBridge`] in step with the host lifecycle.
#[derive(Clone)]
pub struct BridgePlugin {
    bridge: Arc<InputEventBridge>,
}

impl BridgePlugin {
    /// Creates a plugin driving the given bridge.
    pub fn new(bridge: Arc<InputEventBridge>) -> Self {
        Self { bridge }
    }

    /// Returns the bridge driven by this plugin.
    pub fn bridge(&self) -> &Arc<InputEventBridge> {
        &self.bridge
    }
}

impl BridgeHook for BridgePlugin {
    fn name(&self) -> &'static str {
        "input-bridge"
    }

    fn on_resumed(&self, context: &HostContext) -> HookResult {
        match context.input_method() {
            Some(service) => {
                self.bridge.bind_input_method(service.clone());
                debug!("Input method service bound");
            }
            None => {
                self.bridge.unbind_input_method();
                debug!("No input method service on resume, soft input disabled");
            }
        }
        Ok(())
    }

    fn on_suspended(&self, _context: &HostContext) -> HookResult {
        self.bridge.unbind_input_method();
        if self.bridge.config().drain_on_suspend {
            let dropped = self.bridge.queue().clear();
            debug!("Dropped {dropped} pending chars on suspend");
        }
        Ok(())
    }

    fn on_shutdown(&self, _context: &HostContext) -> HookResult {
        self.bridge.unbind_input_method();
        self.bridge.queue().clear();
        Ok(())
    }
}

/// Dispatches lifecycle stages to registered hooks.
pub struct LifecycleHost {
    hooks: Vec<Arc<dyn BridgeHook>>,
    shutdown_called: bool,
}

impl Default for LifecycleHost {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleHost {
    /// Creates a host with no hooks.
    pub fn new() -> Self {
        Self {
            hooks: Vec::new(),
            shutdown_called: false,
        }
    }

    /// Registers a hook. Hooks run in registration order.
    pub fn register(&mut self, hook: impl BridgeHook) {
        self.hooks.push(Arc::new(hook));
    }

    /// Registers a hook wrapped in an `Arc`.
    pub fn register_arc(&mut self, hook: Arc<dyn BridgeHook>) {
        self.hooks.push(hook);
    }

    /// Runs the resume stage.
    pub fn resumed(&self, context: &HostContext) {
        self.dispatch("resumed", context, BridgeHook::on_resumed);
    }

    /// Runs the suspend stage.
    pub fn suspended(&self, context: &HostContext) {
        self.dispatch("suspended", context, BridgeHook::on_suspended);
    }

    /// Runs the shutdown stage once. Later calls do nothing.
    pub fn shutdown(&mut self, context: &HostContext) {
        if self.shutdown_called {
            return;
        }
        self.shutdown_called = true;
        self.dispatch("shutdown", context, BridgeHook::on_shutdown);
    }

    fn dispatch(
        &self,
        stage: &'static str,
        context: &HostContext,
        handler: fn(&dyn BridgeHook, &HostContext) -> HookResult,
    ) {
        for hook in &self.hooks {
            if let Err(err) = handler(hook.as_ref(), context) {
                error!("Hook '{}' {} stage failed: {}", hook.name(), stage, err);
            }
        }
    }
}

fn bridge_slot() -> &'static RwLock<Option<Arc<InputEventBridge>>> {
    static SLOT: OnceLock<RwLock<Option<Arc<InputEventBridge>>>> = OnceLock::new();
    SLOT.get_or_init(|| RwLock::new(None))
}

/// Installs the process-wide bridge used by native entry points.
///
/// Returns the previously installed bridge, if any.
pub fn install_bridge(bridge: Arc<InputEventBridge>) -> Option<Arc<InputEventBridge>> {
    bridge_slot().write().replace(bridge)
}

/// Returns the process-wide bridge, if one is installed.
pub fn installed_bridge() -> Option<Arc<InputEventBridge>> {
    bridge_slot().read().clone()
}

/// Removes the process-wide bridge.
pub fn uninstall_bridge() -> Option<Arc<InputEventBridge>> {
    bridge_slot().write().take()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{
        bridge::{
            BridgeConfig, InputBridge,
            tests::{RecordingInputMethod, Request},
        },
        key_event::{KeyEvent, NO_CHAR},
    };

    fn recording_context() -> (Arc<RecordingInputMethod>, HostContext) {
        let service = Arc::new(RecordingInputMethod::default());
        let handle: Arc<dyn InputMethodService> = service.clone();
        let context = HostContext::new(Some(handle));
        (service, context)
    }

    #[test]
    fn test_resume_binds_and_suspend_unbinds() {
        let bridge = Arc::new(InputEventBridge::builder().build());
        let mut host = LifecycleHost::new();
        host.register(BridgePlugin::new(bridge.clone()));
        let (service, context) = recording_context();

        host.resumed(&context);
        assert!(bridge.has_input_method());
        bridge.show_soft_input();

        host.suspended(&context);
        assert!(!bridge.has_input_method());
        bridge.hide_soft_input();

        assert_eq!(
            *service.requests.lock(),
            vec![Request::Show { implicit: false }]
        );
    }

    #[test]
    fn test_resume_without_service() {
        let bridge = Arc::new(InputEventBridge::builder().build());
        let plugin = BridgePlugin::new(bridge.clone());
        let (_, context) = recording_context();

        plugin.on_resumed(&context).expect("resume failed");
        assert!(bridge.has_input_method());
        plugin
            .on_resumed(&HostContext::default())
            .expect("resume failed");
        assert!(!bridge.has_input_method());
    }

    #[test]
    fn test_suspend_keeps_pending_chars_by_default() {
        let bridge = Arc::new(InputEventBridge::builder().build());
        let plugin = BridgePlugin::new(bridge.clone());
        bridge.dispatch_key(&KeyEvent::down('k' as u32));

        plugin
            .on_suspended(&HostContext::default())
            .expect("suspend failed");
        assert_eq!(bridge.poll_next_char(), 'k' as u32);
    }

    #[test]
    fn test_drain_on_suspend() {
        let bridge = Arc::new(
            InputEventBridge::builder()
                .config(BridgeConfig {
                    drain_on_suspend: true,
                    ..BridgeConfig::default()
                })
                .build(),
        );
        let plugin = BridgePlugin::new(bridge.clone());
        bridge.dispatch_key(&KeyEvent::down('k' as u32));

        plugin
            .on_suspended(&HostContext::default())
            .expect("suspend failed");
        assert_eq!(bridge.poll_next_char(), NO_CHAR);
    }

    struct CountingHook {
        shutdowns: Arc<AtomicUsize>,
    }

    impl BridgeHook for CountingHook {
        fn on_shutdown(&self, _context: &HostContext) -> HookResult {
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingHook;

    impl BridgeHook for FailingHook {
        fn on_resumed(&self, _context: &HostContext) -> HookResult {
            Err("surface not ready".into())
        }
    }

    #[test]
    fn test_shutdown_runs_once() {
        let shutdowns = Arc::new(AtomicUsize::new(0));
        let bridge = Arc::new(InputEventBridge::builder().build());
        let mut host = LifecycleHost::new();
        host.register(BridgePlugin::new(bridge.clone()));
        host.register(CountingHook {
            shutdowns: shutdowns.clone(),
        });

        bridge.dispatch_key(&KeyEvent::down('s' as u32));
        host.shutdown(&HostContext::default());
        host.shutdown(&HostContext::default());

        assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
        assert!(bridge.queue().is_empty());
    }

    #[test]
    fn test_failing_hook_does_not_stop_others() {
        let bridge = Arc::new(InputEventBridge::builder().build());
        let mut host = LifecycleHost::new();
        host.register(FailingHook);
        host.register(BridgePlugin::new(bridge.clone()));
        let (_, context) = recording_context();

        host.resumed(&context);
        assert!(bridge.has_input_method());
    }

    #[test]
    fn test_install_bridge_slot() {
        let bridge = Arc::new(InputEventBridge::builder().build());
        uninstall_bridge();
        assert!(install_bridge(bridge.clone()).is_none());

        let installed = installed_bridge().expect("bridge not installed");
        assert!(Arc::ptr_eq(&installed, &bridge));

        let previous = uninstall_bridge().expect("bridge not installed");
        assert!(Arc::ptr_eq(&previous, &bridge));
        assert!(installed_bridge().is_none());
    }
}
