//! Descriptor of the `RnLocalP2p` native module, as registered with the React Native host.

use std::ffi::CStr;
use std::os::raw::c_char;

use log::debug;
use thiserror::Error;

use crate::error::{
    ErrorCode, NullArgument, clear_error, rnlocalp2p_error_code_t, rnlocalp2p_error_t, write_error,
};
use crate::ffi::read_cstr;

const VERSION: &CStr = match CStr::from_bytes_with_nul(
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes(),
) {
    Ok(value) => value,
    Err(_) => panic!("package version contains a NUL byte"),
};

/// Registration flags for a native module.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModuleInfo {
    pub name: &'static CStr,
    pub can_override_existing_module: bool,
    pub needs_eager_init: bool,
    pub is_cxx_module: bool,
    pub is_turbo_module: bool,
}

/// The only module this library provides.
pub const MODULE_INFO: ModuleInfo = ModuleInfo {
    name: c"RnLocalP2p",
    can_override_existing_module: false,
    needs_eager_init: false,
    is_cxx_module: false,
    is_turbo_module: true,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModuleError {
    #[error(transparent)]
    Null(#[from] NullArgument),
    #[error("unknown native module `{0}`")]
    Unknown(String),
}

impl ErrorCode for ModuleError {
    fn code(&self) -> rnlocalp2p_error_code_t {
        match self {
            Self::Null(err) => err.code(),
            Self::Unknown(_) => rnlocalp2p_error_code_t::RNLOCALP2P_ERROR_UNKNOWN_MODULE,
        }
    }
}

/// Looks up a module by the name the host registers it under.
pub fn find_module(name: &str) -> Result<ModuleInfo, ModuleError> {
    if name.as_bytes() == MODULE_INFO.name.to_bytes() {
        Ok(MODULE_INFO)
    } else {
        Err(ModuleError::Unknown(name.to_string()))
    }
}

/// C view of [`ModuleInfo`]. `name` points to static storage and must not be freed.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct rnlocalp2p_module_info_t {
    pub name: *const c_char,
    pub can_override_existing_module: bool,
    pub needs_eager_init: bool,
    pub is_cxx_module: bool,
    pub is_turbo_module: bool,
}

impl From<ModuleInfo> for rnlocalp2p_module_info_t {
    fn from(value: ModuleInfo) -> Self {
        Self {
            name: value.name.as_ptr(),
            can_override_existing_module: value.can_override_existing_module,
            needs_eager_init: value.needs_eager_init,
            is_cxx_module: value.is_cxx_module,
            is_turbo_module: value.is_turbo_module,
        }
    }
}

/// Returns the module name. The string is static and must not be freed.
#[unsafe(no_mangle)]
pub extern "C" fn rnlocalp2p_module_name() -> *const c_char {
    MODULE_INFO.name.as_ptr()
}

/// Returns the library version. The string is static and must not be freed.
#[unsafe(no_mangle)]
pub extern "C" fn rnlocalp2p_version() -> *const c_char {
    VERSION.as_ptr()
}

/// Writes the descriptor of the module registered as `name` into `out_info`.
///
/// Returns false and sets `out_error` when `name` is unknown or a pointer is null.
#[unsafe(no_mangle)]
pub extern "C" fn rnlocalp2p_module_info(
    name: *const c_char,
    out_info: *mut rnlocalp2p_module_info_t,
    out_error: *mut *mut rnlocalp2p_error_t,
) -> bool {
    clear_error(out_error);
    if out_info.is_null() {
        write_error(out_error, &NullArgument("out_info"));
        return false;
    }

    let result = read_cstr(name, "name")
        .map_err(ModuleError::from)
        .and_then(|name| find_module(&name));

    match result {
        Ok(info) => {
            // Safety: out_info is non-null and points to writable memory.
            unsafe {
                *out_info = info.into();
            }
            true
        }
        Err(err) => {
            debug!("module lookup failed: {err}");
            write_error(out_error, &err);
            false
        }
    }
}
