//! Runs in its own test binary because it mutates `RUST_LOG` and installs the
//! process-wide logger.

use std::ffi::CStr;
use std::mem::MaybeUninit;
use std::ptr;

use log::LevelFilter;
use rnlocalp2p::{
    rnlocalp2p_error_code, rnlocalp2p_error_code_t, rnlocalp2p_error_free,
    rnlocalp2p_error_message, rnlocalp2p_log_config_init, rnlocalp2p_log_config_t,
    rnlocalp2p_log_init, rnlocalp2p_log_level_t,
};

fn config(
    level: rnlocalp2p_log_level_t,
    filter: Option<&'static CStr>,
) -> rnlocalp2p_log_config_t {
    let mut config = MaybeUninit::uninit();
    rnlocalp2p_log_config_init(config.as_mut_ptr());
    // Safety: rnlocalp2p_log_config_init wrote every field.
    let mut config = unsafe { config.assume_init() };
    config.level = level;
    config.filter = filter.map_or(ptr::null(), CStr::as_ptr);
    config
}

fn set_rust_log(value: Option<&str>) {
    // Safety: this binary runs a single test, so no other thread reads the environment.
    unsafe {
        match value {
            Some(value) => std::env::set_var("RUST_LOG", value),
            None => std::env::remove_var("RUST_LOG"),
        }
    }
}

#[test]
fn filter_sources_apply_in_precedence_order() {
    let mut error = ptr::null_mut();

    set_rust_log(Some("rnlocalp2p=bogus"));
    assert!(!rnlocalp2p_log_init(ptr::null(), &mut error));
    assert_eq!(
        rnlocalp2p_error_code(error),
        rnlocalp2p_error_code_t::RNLOCALP2P_ERROR_INVALID_LOG_FILTER
    );
    // Safety: message points into the live error handle.
    let message = unsafe { CStr::from_ptr(rnlocalp2p_error_message(error)) };
    assert_eq!(
        message.to_str(),
        Ok("invalid RUST_LOG value `rnlocalp2p=bogus`: invalid level `bogus`")
    );
    rnlocalp2p_error_free(error);

    // RUST_LOG wins over `level`.
    set_rust_log(Some("rnlocalp2p=debug"));
    let off = config(rnlocalp2p_log_level_t::RNLOCALP2P_LOG_LEVEL_OFF, None);
    assert!(rnlocalp2p_log_init(&off, &mut error));
    assert!(error.is_null());
    assert_eq!(log::max_level(), LevelFilter::Debug);

    // An explicit filter wins over RUST_LOG.
    let warn = config(rnlocalp2p_log_level_t::RNLOCALP2P_LOG_LEVEL_OFF, Some(c"warn"));
    assert!(rnlocalp2p_log_init(&warn, &mut error));
    assert_eq!(log::max_level(), LevelFilter::Warn);

    // Without either, `level` applies.
    set_rust_log(None);
    let trace = config(rnlocalp2p_log_level_t::RNLOCALP2P_LOG_LEVEL_TRACE, None);
    assert!(rnlocalp2p_log_init(&trace, &mut error));
    assert_eq!(log::max_level(), LevelFilter::Trace);

    // A null config falls back to INFO.
    assert!(rnlocalp2p_log_init(ptr::null(), &mut error));
    assert!(error.is_null());
    assert_eq!(log::max_level(), LevelFilter::Info);
}
