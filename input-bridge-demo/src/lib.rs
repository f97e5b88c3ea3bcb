//! Demo wiring for the input bridge.
//!
//! On desktop a host thread types a short string while a simulated render
//! loop polls it back. On Android the same bridge is driven by the
//! `android-activity` event loop.

use std::sync::Arc;

use tessera_input_bridge::{
    BridgePlugin, InputBridge, InputEventBridge, LifecycleHost, decode_char, is_combining_accent,
};
use tracing::info;

#[cfg(not(target_os = "android"))]
use std::{thread, time::Duration};

#[cfg(not(target_os = "android"))]
use tessera_input_bridge::{HostContext, InputMethodError, InputMethodService, KeyEvent};

/// Text typed by the simulated host.
#[cfg(not(target_os = "android"))]
const DEMO_TEXT: &str = "Hello, Tessera!";

#[cfg(not(target_os = "android"))]
const FRAME_TIME: Duration = Duration::from_millis(16);

/// Input method that only logs requests.
#[cfg(not(target_os = "android"))]
struct ConsoleInputMethod;

#[cfg(not(target_os = "android"))]
impl InputMethodService for ConsoleInputMethod {
    fn show_soft_input(&self, implicit: bool) -> Result<(), InputMethodError> {
        info!(implicit, "soft keyboard shown");
        Ok(())
    }

    fn hide_soft_input(&self) -> Result<(), InputMethodError> {
        info!("soft keyboard hidden");
        Ok(())
    }
}

fn new_bridge() -> (Arc<InputEventBridge>, LifecycleHost) {
    let bridge = Arc::new(InputEventBridge::builder().build());
    let mut host = LifecycleHost::new();
    host.register(BridgePlugin::new(bridge.clone()));
    (bridge, host)
}

/// Appends every pending character to `text`. Returns how many values were
/// drained, including ones without a printable character.
fn drain_frame(bridge: &InputEventBridge, text: &mut String) -> usize {
    let mut drained = 0;
    while let Some(code_point) = bridge.try_poll_next_char() {
        drained += 1;
        if is_combining_accent(code_point) {
            info!(code_point, "combining accent");
            continue;
        }
        if let Some(ch) = decode_char(code_point) {
            text.push(ch);
        }
    }
    drained
}

/// Runs the desktop simulation.
#[cfg(not(target_os = "android"))]
pub fn desktop_main() {
    tessera_input_bridge::init_tracing();

    let (bridge, mut host) = new_bridge();
    let service: Arc<dyn InputMethodService> = Arc::new(ConsoleInputMethod);
    let context = HostContext::new(Some(service));
    host.resumed(&context);
    bridge.show_soft_input();

    let typist = {
        let bridge = bridge.clone();
        thread::Builder::new()
            .name("host-events".to_string())
            .spawn(move || {
                // Shift press without a character, then the text itself.
                bridge.dispatch_key(&KeyEvent::down(0).with_key_code(59));
                for ch in DEMO_TEXT.chars() {
                    bridge.dispatch_key(&KeyEvent::down(ch as u32));
                    bridge.dispatch_key(&KeyEvent::up(ch as u32));
                    thread::sleep(Duration::from_millis(5));
                }
                bridge.dispatch_key(&KeyEvent::up(0).with_key_code(59));
            })
    };
    let typist = match typist {
        Ok(handle) => handle,
        Err(err) => {
            tracing::error!("Failed to spawn host thread: {err}");
            return;
        }
    };

    let expected = DEMO_TEXT.chars().count() + 1;
    let mut text = String::new();
    let mut drained = 0;
    let mut frame = 0u32;
    while drained < expected {
        drained += drain_frame(&bridge, &mut text);
        frame += 1;
        thread::sleep(FRAME_TIME);
    }
    if typist.join().is_err() {
        tracing::error!("Host thread panicked");
    }

    info!(frames = frame, "received {text:?}");
    bridge.hide_soft_input();
    host.shutdown(&context);
}

#[cfg(target_os = "android")]
#[unsafe(no_mangle)]
fn android_main(android_app: tessera_input_bridge::winit::platform::android::activity::AndroidApp) {
    use std::time::Duration;

    use tessera_input_bridge::{
        HostContext,
        android::{dispatch_android_key, host_context},
        winit::platform::android::activity::{
            InputStatus, MainEvent, PollEvent, input::InputEvent,
        },
    };

    tessera_input_bridge::init_tracing();

    let (bridge, mut host) = new_bridge();
    let mut context = HostContext::default();
    let mut text = String::new();
    let mut running = true;

    while running {
        android_app.poll_events(Some(Duration::from_millis(16)), |event| {
            if let PollEvent::Main(main_event) = event {
                match main_event {
                    MainEvent::InitWindow { .. } => {
                        context = host_context(&android_app);
                        host.resumed(&context);
                        bridge.show_soft_input();
                    }
                    MainEvent::TerminateWindow { .. } => {
                        bridge.hide_soft_input();
                        host.suspended(&context);
                    }
                    MainEvent::Destroy => running = false,
                    _ => {}
                }
            }
        });

        if let Ok(mut events) = android_app.input_events_iter() {
            while events.next(|event| match event {
                InputEvent::KeyEvent(key_event) => {
                    dispatch_android_key(&bridge, &android_app, key_event)
                }
                _ => InputStatus::Unhandled,
            }) {}
        }

        if drain_frame(&bridge, &mut text) > 0 {
            info!("typed so far: {text:?}");
        }
    }

    host.shutdown(&context);
}
