//! JNI entry points for the Android `RnLocalP2pModule`.

use std::ffi::c_void;

use log::debug;

use crate::bridge::bridge_multiply;

#[allow(non_camel_case_types)]
type jint = i32;
#[allow(non_camel_case_types)]
type jdouble = f64;

/// `JNI_VERSION_1_6` from `jni.h`.
pub const JNI_VERSION_1_6: jint = 0x0001_0006;

/// Called by the JVM when `System.loadLibrary("rnlocalp2p")` loads this library.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub extern "system" fn JNI_OnLoad(_vm: *mut c_void, _reserved: *mut c_void) -> jint {
    debug!("rnlocalp2p loaded, requesting JNI {JNI_VERSION_1_6:#x}");
    JNI_VERSION_1_6
}

/// Native half of `RnLocalP2pModule.nativeMultiply(a: Double, b: Double): Double`.
///
/// `env` and `class` are unused and may be null.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_rnlocalp2p_RnLocalP2pModule_nativeMultiply(
    _env: *mut c_void,
    _class: *mut c_void,
    a: jdouble,
    b: jdouble,
) -> jdouble {
    bridge_multiply("nativeMultiply", a, b)
}
