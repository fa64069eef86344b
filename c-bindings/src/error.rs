//! Error handles handed to C callers through `out_error` pointers.

use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use thiserror::Error;

/// Opaque error type for C callers.
#[allow(non_camel_case_types)]
pub struct rnlocalp2p_error_t;

/// Kind of failure carried by an error handle.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(C)]
pub enum rnlocalp2p_error_code_t {
    RNLOCALP2P_ERROR_NONE = 0,
    RNLOCALP2P_ERROR_NULL_ARGUMENT = 1,
    RNLOCALP2P_ERROR_UNKNOWN_MODULE = 2,
    RNLOCALP2P_ERROR_INVALID_LOG_FILTER = 3,
    RNLOCALP2P_ERROR_LOGGER_ALREADY_INSTALLED = 4,
}

/// An error that can cross the C boundary.
pub(crate) trait ErrorCode: std::error::Error {
    fn code(&self) -> rnlocalp2p_error_code_t;
}

/// A required pointer argument was null.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{0} was null")]
pub struct NullArgument(pub &'static str);

impl ErrorCode for NullArgument {
    fn code(&self) -> rnlocalp2p_error_code_t {
        rnlocalp2p_error_code_t::RNLOCALP2P_ERROR_NULL_ARGUMENT
    }
}

struct ErrorHandle {
    code: rnlocalp2p_error_code_t,
    message: CString,
}

impl ErrorHandle {
    fn from_error(error: &dyn ErrorCode) -> Self {
        Self {
            code: error.code(),
            message: cstring_from_str_lossy(&error.to_string()),
        }
    }

    /// Borrows the handle behind a pointer returned by `write_error`.
    fn from_ptr<'a>(error: *const rnlocalp2p_error_t) -> Option<&'a Self> {
        // Safety: non-null error pointers are handles allocated by `write_error`.
        unsafe { (error as *const Self).as_ref() }
    }
}

/// Converts to a C string, replacing interior NULs with spaces.
pub(crate) fn cstring_from_str_lossy(value: &str) -> CString {
    CString::new(value.replace('\0', " ")).unwrap_or_default()
}

pub(crate) fn clear_error(out_error: *mut *mut rnlocalp2p_error_t) {
    if !out_error.is_null() {
        // Safety: caller provided a valid out_error pointer.
        unsafe {
            *out_error = ptr::null_mut();
        }
    }
}

/// Stores `error` in `*out_error` unless the caller passed null.
pub(crate) fn write_error(out_error: *mut *mut rnlocalp2p_error_t, error: &dyn ErrorCode) {
    if out_error.is_null() {
        return;
    }
    let handle = Box::new(ErrorHandle::from_error(error));
    // Safety: out_error is non-null and points to writable memory.
    unsafe {
        *out_error = Box::into_raw(handle) as *mut rnlocalp2p_error_t;
    }
}

/// Returns the kind of an error, or `RNLOCALP2P_ERROR_NONE` for a null handle.
#[unsafe(no_mangle)]
pub extern "C" fn rnlocalp2p_error_code(
    error: *const rnlocalp2p_error_t,
) -> rnlocalp2p_error_code_t {
    ErrorHandle::from_ptr(error).map_or(rnlocalp2p_error_code_t::RNLOCALP2P_ERROR_NONE, |handle| {
        handle.code
    })
}

/// Returns the message for an error, valid while the handle is alive.
#[unsafe(no_mangle)]
pub extern "C" fn rnlocalp2p_error_message(error: *const rnlocalp2p_error_t) -> *const c_char {
    ErrorHandle::from_ptr(error).map_or(ptr::null(), |handle| handle.message.as_ptr())
}

/// Frees an error returned by rnlocalp2p. Null is ignored.
#[unsafe(no_mangle)]
pub extern "C" fn rnlocalp2p_error_free(error: *mut rnlocalp2p_error_t) {
    if error.is_null() {
        return;
    }
    // Safety: error must be a handle allocated by `write_error`.
    unsafe {
        drop(Box::from_raw(error as *mut ErrorHandle));
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;

    use super::*;

    #[derive(Debug, Error)]
    #[error("unknown native module `Other`")]
    struct UnknownModule;

    impl ErrorCode for UnknownModule {
        fn code(&self) -> rnlocalp2p_error_code_t {
            rnlocalp2p_error_code_t::RNLOCALP2P_ERROR_UNKNOWN_MODULE
        }
    }

    fn message_of(error: *mut rnlocalp2p_error_t) -> String {
        let message = rnlocalp2p_error_message(error);
        assert!(!message.is_null());
        // Safety: message points into a live handle.
        unsafe { CStr::from_ptr(message) }.to_string_lossy().into_owned()
    }

    #[test]
    fn test_handle_carries_code_and_message() {
        let mut error = ptr::null_mut();
        write_error(&mut error, &UnknownModule);
        assert!(!error.is_null());
        assert_eq!(
            rnlocalp2p_error_code(error),
            rnlocalp2p_error_code_t::RNLOCALP2P_ERROR_UNKNOWN_MODULE
        );
        assert_eq!(message_of(error), "unknown native module `Other`");
        rnlocalp2p_error_free(error);
    }

    #[test]
    fn test_null_argument_code() {
        let mut error = ptr::null_mut();
        write_error(&mut error, &NullArgument("name"));
        assert_eq!(
            rnlocalp2p_error_code(error),
            rnlocalp2p_error_code_t::RNLOCALP2P_ERROR_NULL_ARGUMENT
        );
        assert_eq!(message_of(error), "name was null");
        rnlocalp2p_error_free(error);
    }

    #[test]
    fn test_clear_error_resets_pointer() {
        let mut error = ptr::null_mut();
        write_error(&mut error, &NullArgument("stale"));
        let stale = error;
        clear_error(&mut error);
        assert!(error.is_null());
        rnlocalp2p_error_free(stale);
    }

    #[test]
    fn test_null_handles_are_ignored() {
        clear_error(ptr::null_mut());
        write_error(ptr::null_mut(), &NullArgument("dropped"));
        assert!(rnlocalp2p_error_message(ptr::null()).is_null());
        assert_eq!(
            rnlocalp2p_error_code(ptr::null()),
            rnlocalp2p_error_code_t::RNLOCALP2P_ERROR_NONE
        );
        rnlocalp2p_error_free(ptr::null_mut());
    }

    #[test]
    fn test_interior_nul_is_replaced() {
        let value = cstring_from_str_lossy("a\0b");
        assert_eq!(value.to_str(), Ok("a b"));
    }
}
