//! Native bridge for the `RnLocalP2p` React Native module.
//!
//! Exposes the module's native multiply both as a plain C ABI function and as the
//! JNI symbol the Android module class binds to.

mod android;
mod bridge;
mod error;
mod ffi;
mod logging;
mod module;

pub use android::{
    JNI_OnLoad, JNI_VERSION_1_6, Java_com_rnlocalp2p_RnLocalP2pModule_nativeMultiply,
};
pub use bridge::{multiply, rnlocalp2p_multiply};
pub use error::{
    NullArgument, rnlocalp2p_error_code, rnlocalp2p_error_code_t, rnlocalp2p_error_free,
    rnlocalp2p_error_message, rnlocalp2p_error_t,
};
pub use logging::{
    rnlocalp2p_log_callback_t, rnlocalp2p_log_config_init, rnlocalp2p_log_config_t,
    rnlocalp2p_log_init, rnlocalp2p_log_level_t, rnlocalp2p_log_record_t,
};
pub use module::{
    MODULE_INFO, ModuleError, ModuleInfo, find_module, rnlocalp2p_module_info,
    rnlocalp2p_module_info_t, rnlocalp2p_module_name, rnlocalp2p_version,
};
