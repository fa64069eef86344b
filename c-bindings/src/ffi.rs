//! Shared pointer helpers for the C ABI.

use std::ffi::CStr;
use std::os::raw::c_char;

use crate::error::NullArgument;

pub(crate) fn read_cstr(value: *const c_char, field: &'static str) -> Result<String, NullArgument> {
    read_optional_cstr(value).ok_or(NullArgument(field))
}

pub(crate) fn read_optional_cstr(value: *const c_char) -> Option<String> {
    if value.is_null() {
        return None;
    }
    // Safety: caller guarantees a valid, NUL-terminated C string.
    let cstr = unsafe { CStr::from_ptr(value) };
    Some(cstr.to_string_lossy().into_owned())
}
