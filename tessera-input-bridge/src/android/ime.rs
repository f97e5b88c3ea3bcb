//! `InputMethodManager` access through JNI.
//!
//! Based on the pattern from
//! https://github.com/rust-mobile/android-activity/pull/178

use jni::{
    JNIEnv, JavaVM,
    objects::{GlobalRef, JObject, JValue},
};
use tracing::debug;
use winit::platform::android::activity::AndroidApp;

use super::jni::{AndroidJniError, map_jni_error};
use crate::input_method::{InputMethodError, InputMethodService};

/// Local reference slots reserved for one show/hide call.
const LOCAL_FRAME_CAPACITY: i32 = 8;

/// [`InputMethodService`] backed by the activity's `InputMethodManager`.
pub struct AndroidInputMethod {
    vm: JavaVM,
    activity: GlobalRef,
}

impl AndroidInputMethod {
    /// Creates the service for the activity behind an `AndroidApp`.
    pub fn from_app(android_app: &AndroidApp) -> Result<Self, AndroidJniError> {
        let vm = unsafe { JavaVM::from_raw(android_app.vm_as_ptr().cast()) }?;
        let activity = {
            let mut env = vm.attach_current_thread()?;
            let activity = unsafe { JObject::from_raw(android_app.activity_as_ptr().cast()) };
            pin_activity(&mut env, &activity)?
        };
        Ok(Self { vm, activity })
    }

    /// Creates the service from the process-wide `ndk_context`.
    pub fn from_ndk_context() -> Result<Self, AndroidJniError> {
        let context = ndk_context::android_context();
        if context.vm().is_null() {
            return Err(AndroidJniError::NullObject("JavaVM"));
        }
        let vm = unsafe { JavaVM::from_raw(context.vm().cast()) }?;
        let activity = {
            let mut env = vm.attach_current_thread()?;
            let activity = unsafe { JObject::from_raw(context.context().cast()) };
            pin_activity(&mut env, &activity)?
        };
        Ok(Self { vm, activity })
    }

    /// Creates the service from a JNI call made by the Java activity.
    pub fn from_env(env: &mut JNIEnv<'_>, activity: &JObject<'_>) -> Result<Self, AndroidJniError> {
        let vm = env.get_java_vm().map_err(|err| map_jni_error(env, err))?;
        let activity = pin_activity(env, activity)?;
        Ok(Self { vm, activity })
    }

    fn with_env(
        &self,
        f: impl FnOnce(&mut JNIEnv<'_>, &JObject<'static>) -> Result<(), InputMethodError>,
    ) -> Result<(), InputMethodError> {
        let mut env = self.vm.attach_current_thread()?;
        env.with_local_frame(LOCAL_FRAME_CAPACITY, |env| f(env, self.activity.as_obj()))
    }
}

impl InputMethodService for AndroidInputMethod {
    fn show_soft_input(&self, implicit: bool) -> Result<(), InputMethodError> {
        self.with_env(|env, activity| {
            let Some(manager) = input_method_manager(env, activity)? else {
                return Err(InputMethodError::Unavailable);
            };
            let view = decor_view(env, activity)?;
            let flags = if implicit {
                ndk_sys::ANATIVEACTIVITY_SHOW_SOFT_INPUT_IMPLICIT as i32
            } else {
                0
            };
            let result = env.call_method(
                &manager,
                "showSoftInput",
                "(Landroid/view/View;I)Z",
                &[JValue::Object(&view), JValue::Int(flags)],
            );
            // Throws while the keyboard is animating open or closed.
            if let Err(err) = result {
                let err = map_jni_error(env, err);
                debug!("showSoftInput raised: {err}");
            }
            Ok(())
        })
    }

    fn hide_soft_input(&self) -> Result<(), InputMethodError> {
        self.with_env(|env, activity| {
            let Some(manager) = input_method_manager(env, activity)? else {
                return Err(InputMethodError::Unavailable);
            };
            let view = decor_view(env, activity)?;
            let token = env
                .call_method(&view, "getWindowToken", "()Landroid/os/IBinder;", &[])
                .and_then(|value| value.l())
                .map_err(|err| map_jni_error(env, err))?;
            if token.is_null() {
                debug!("Decor view is not attached to a window, nothing to hide");
                return Ok(());
            }
            let result = env.call_method(
                &manager,
                "hideSoftInputFromWindow",
                "(Landroid/os/IBinder;I)Z",
                &[JValue::Object(&token), JValue::Int(0)],
            );
            if let Err(err) = result {
                let err = map_jni_error(env, err);
                debug!("hideSoftInputFromWindow raised: {err}");
            }
            Ok(())
        })
    }
}

fn pin_activity(
    env: &mut JNIEnv<'_>,
    activity: &JObject<'_>,
) -> Result<GlobalRef, AndroidJniError> {
    if activity.is_null() {
        return Err(AndroidJniError::NullObject("Activity"));
    }
    env.new_global_ref(activity)
        .map_err(|err| map_jni_error(env, err))
}

/// Returns `None` when the activity has no input-method service.
fn input_method_manager<'local>(
    env: &mut JNIEnv<'local>,
    activity: &JObject<'_>,
) -> Result<Option<JObject<'local>>, AndroidJniError> {
    let service_name = env
        .get_static_field(
            "android/content/Context",
            "INPUT_METHOD_SERVICE",
            "Ljava/lang/String;",
        )
        .and_then(|value| value.l())
        .map_err(|err| map_jni_error(env, err))?;
    let manager = env
        .call_method(
            activity,
            "getSystemService",
            "(Ljava/lang/String;)Ljava/lang/Object;",
            &[JValue::Object(&service_name)],
        )
        .and_then(|value| value.l())
        .map_err(|err| map_jni_error(env, err))?;
    if manager.is_null() {
        return Ok(None);
    }
    Ok(Some(manager))
}

fn decor_view<'local>(
    env: &mut JNIEnv<'local>,
    activity: &JObject<'_>,
) -> Result<JObject<'local>, AndroidJniError> {
    let window = env
        .call_method(activity, "getWindow", "()Landroid/view/Window;", &[])
        .and_then(|value| value.l())
        .map_err(|err| map_jni_error(env, err))?;
    if window.is_null() {
        return Err(AndroidJniError::NullReturn("Window"));
    }
    let view = env
        .call_method(&window, "getDecorView", "()Landroid/view/View;", &[])
        .and_then(|value| value.l())
        .map_err(|err| map_jni_error(env, err))?;
    if view.is_null() {
        return Err(AndroidJniError::NullReturn("View"));
    }
    Ok(view)
}
