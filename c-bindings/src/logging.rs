//! Logging configuration for the rnlocalp2p C bindings.

use std::os::raw::{c_char, c_void};
use std::ptr;
use std::sync::RwLock;

use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::{Lazy, OnceCell};
use thiserror::Error;

use crate::error::{
    ErrorCode, clear_error, cstring_from_str_lossy, rnlocalp2p_error_code_t, rnlocalp2p_error_t,
    write_error,
};
use crate::ffi::read_optional_cstr;

const DEFAULT_TARGET: &str = "rnlocalp2p";

static LOGGER_INSTALLED: OnceCell<bool> = OnceCell::new();
static LOGGER: Lazy<BridgeLogger> = Lazy::new(BridgeLogger::new);

/// Log level values for rnlocalp2p logging.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(C)]
pub enum rnlocalp2p_log_level_t {
    RNLOCALP2P_LOG_LEVEL_OFF = 0,
    RNLOCALP2P_LOG_LEVEL_ERROR = 1,
    RNLOCALP2P_LOG_LEVEL_WARN = 2,
    RNLOCALP2P_LOG_LEVEL_INFO = 3,
    RNLOCALP2P_LOG_LEVEL_DEBUG = 4,
    RNLOCALP2P_LOG_LEVEL_TRACE = 5,
}

impl From<rnlocalp2p_log_level_t> for LevelFilter {
    fn from(value: rnlocalp2p_log_level_t) -> Self {
        match value {
            rnlocalp2p_log_level_t::RNLOCALP2P_LOG_LEVEL_OFF => LevelFilter::Off,
            rnlocalp2p_log_level_t::RNLOCALP2P_LOG_LEVEL_ERROR => LevelFilter::Error,
            rnlocalp2p_log_level_t::RNLOCALP2P_LOG_LEVEL_WARN => LevelFilter::Warn,
            rnlocalp2p_log_level_t::RNLOCALP2P_LOG_LEVEL_INFO => LevelFilter::Info,
            rnlocalp2p_log_level_t::RNLOCALP2P_LOG_LEVEL_DEBUG => LevelFilter::Debug,
            rnlocalp2p_log_level_t::RNLOCALP2P_LOG_LEVEL_TRACE => LevelFilter::Trace,
        }
    }
}

impl From<Level> for rnlocalp2p_log_level_t {
    fn from(value: Level) -> Self {
        match value {
            Level::Error => rnlocalp2p_log_level_t::RNLOCALP2P_LOG_LEVEL_ERROR,
            Level::Warn => rnlocalp2p_log_level_t::RNLOCALP2P_LOG_LEVEL_WARN,
            Level::Info => rnlocalp2p_log_level_t::RNLOCALP2P_LOG_LEVEL_INFO,
            Level::Debug => rnlocalp2p_log_level_t::RNLOCALP2P_LOG_LEVEL_DEBUG,
            Level::Trace => rnlocalp2p_log_level_t::RNLOCALP2P_LOG_LEVEL_TRACE,
        }
    }
}

/// Log record delivered to a C callback.
///
/// String pointers are only valid for the duration of the callback.
/// `module_path` and `file` may be null. `line` is 0 when unknown.
#[allow(non_camel_case_types)]
#[repr(C)]
pub struct rnlocalp2p_log_record_t {
    pub level: rnlocalp2p_log_level_t,
    pub target: *const c_char,
    pub message: *const c_char,
    pub module_path: *const c_char,
    pub file: *const c_char,
    pub line: u32,
}

/// Callback invoked for each log record, from whichever thread emitted it.
#[allow(non_camel_case_types)]
pub type rnlocalp2p_log_callback_t =
    Option<extern "C" fn(record: *const rnlocalp2p_log_record_t, user_data: *mut c_void)>;

/// Configuration for `rnlocalp2p_log_init`.
///
/// A non-null `filter` is parsed as a `RUST_LOG`-style string and overrides `level`.
/// Otherwise `RUST_LOG` is used when set, and `level` applies to the `rnlocalp2p`
/// target when it is not. A null `callback` sends records to stderr.
#[allow(non_camel_case_types)]
#[repr(C)]
pub struct rnlocalp2p_log_config_t {
    pub level: rnlocalp2p_log_level_t,
    pub filter: *const c_char,
    pub callback: rnlocalp2p_log_callback_t,
    pub user_data: *mut c_void,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum LogFilterError {
    #[error("empty log directive at position {0}")]
    EmptyDirective(usize),
    #[error("missing log level for target `{0}`")]
    MissingLevel(String),
    #[error("invalid level `{0}`")]
    InvalidLevel(String),
}

#[derive(Debug, Error)]
enum LogInitError {
    #[error("invalid log filter `{filter}`: {source}")]
    Filter {
        filter: String,
        source: LogFilterError,
    },
    #[error("invalid RUST_LOG value `{filter}`: {source}")]
    Env {
        filter: String,
        source: LogFilterError,
    },
    #[error("logging already initialized by another logger")]
    AlreadyInitialized,
}

impl ErrorCode for LogInitError {
    fn code(&self) -> rnlocalp2p_error_code_t {
        match self {
            Self::Filter { .. } | Self::Env { .. } => {
                rnlocalp2p_error_code_t::RNLOCALP2P_ERROR_INVALID_LOG_FILTER
            }
            Self::AlreadyInitialized => {
                rnlocalp2p_error_code_t::RNLOCALP2P_ERROR_LOGGER_ALREADY_INSTALLED
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct TargetFilter {
    target: String,
    level: LevelFilter,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct LogFilter {
    default: LevelFilter,
    directives: Vec<TargetFilter>,
}

impl LogFilter {
    fn for_level(level: LevelFilter) -> Self {
        Self {
            default: LevelFilter::Off,
            directives: vec![TargetFilter {
                target: DEFAULT_TARGET.to_string(),
                level,
            }],
        }
    }

    fn parse(spec: &str) -> Result<Self, LogFilterError> {
        let mut default = LevelFilter::Off;
        let mut directives = Vec::new();

        for (index, raw) in spec.split(',').enumerate() {
            let directive = raw.trim();
            if directive.is_empty() {
                continue;
            }
            let (left, right) = match directive.split_once('=') {
                Some((left, right)) => (left.trim(), Some(right.trim())),
                None => (directive, None),
            };

            if left.is_empty() {
                return Err(LogFilterError::EmptyDirective(index));
            }

            match right {
                Some("") => return Err(LogFilterError::MissingLevel(left.to_string())),
                Some(level) => {
                    let level = parse_level(level)
                        .ok_or_else(|| LogFilterError::InvalidLevel(level.to_string()))?;
                    directives.push(TargetFilter {
                        target: left.to_string(),
                        level,
                    });
                }
                None => match parse_level(left) {
                    Some(level) => default = level,
                    None => directives.push(TargetFilter {
                        target: left.to_string(),
                        level: LevelFilter::Trace,
                    }),
                },
            }
        }

        Ok(Self { default, directives })
    }

    /// Longest matching target prefix wins; ties go to the later directive.
    fn level_for(&self, target: &str) -> LevelFilter {
        let mut best_level = self.default;
        let mut best_len = 0usize;
        for directive in &self.directives {
            if target.starts_with(&directive.target) && directive.target.len() >= best_len {
                best_len = directive.target.len();
                best_level = directive.level;
            }
        }
        best_level
    }

    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level_for(metadata.target())
    }

    fn max_level(&self) -> LevelFilter {
        self.directives
            .iter()
            .map(|directive| directive.level)
            .fold(self.default, std::cmp::max)
    }
}

struct LoggerConfig {
    filter: LogFilter,
    callback: rnlocalp2p_log_callback_t,
    user_data: usize,
}

struct BridgeLogger {
    config: RwLock<LoggerConfig>,
}

impl BridgeLogger {
    fn new() -> Self {
        Self {
            config: RwLock::new(LoggerConfig {
                filter: LogFilter::for_level(LevelFilter::Info),
                callback: None,
                user_data: 0,
            }),
        }
    }

    /// Swaps the configuration and the facade's max level under one write lock.
    fn update(&self, config: LoggerConfig) {
        let mut guard = self.config.write().unwrap_or_else(|err| err.into_inner());
        log::set_max_level(config.filter.max_level());
        *guard = config;
    }

    fn with_config<T>(&self, f: impl FnOnce(&LoggerConfig) -> T) -> T {
        let guard = self.config.read().unwrap_or_else(|err| err.into_inner());
        f(&guard)
    }
}

impl Log for BridgeLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.with_config(|config| config.filter.enabled(metadata))
    }

    fn log(&self, record: &Record) {
        let (callback, user_data, enabled) = self.with_config(|config| {
            (
                config.callback,
                config.user_data,
                config.filter.enabled(record.metadata()),
            )
        });
        if !enabled {
            return;
        }

        let Some(callback) = callback else {
            eprintln!("{} {}: {}", record.level(), record.target(), record.args());
            return;
        };

        let target = cstring_from_str_lossy(record.target());
        let message = cstring_from_str_lossy(&record.args().to_string());
        let module_path = record.module_path().map(cstring_from_str_lossy);
        let file = record.file().map(cstring_from_str_lossy);
        let c_record = rnlocalp2p_log_record_t {
            level: record.level().into(),
            target: target.as_ptr(),
            message: message.as_ptr(),
            module_path: module_path.as_ref().map_or(ptr::null(), |value| value.as_ptr()),
            file: file.as_ref().map_or(ptr::null(), |value| value.as_ptr()),
            line: record.line().unwrap_or(0),
        };
        callback(&c_record, user_data as *mut c_void);
    }

    fn flush(&self) {}
}

fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

fn resolve_filter(config: Option<&rnlocalp2p_log_config_t>) -> Result<LogFilter, LogInitError> {
    if let Some(filter) = config.and_then(|config| read_optional_cstr(config.filter)) {
        return LogFilter::parse(&filter).map_err(|source| LogInitError::Filter { filter, source });
    }

    if let Ok(filter) = std::env::var("RUST_LOG") {
        return LogFilter::parse(&filter).map_err(|source| LogInitError::Env { filter, source });
    }

    let level = config
        .map(|config| config.level)
        .unwrap_or(rnlocalp2p_log_level_t::RNLOCALP2P_LOG_LEVEL_INFO);
    Ok(LogFilter::for_level(level.into()))
}

fn ensure_logger() -> Result<(), LogInitError> {
    let installed = *LOGGER_INSTALLED.get_or_init(|| log::set_logger(&*LOGGER).is_ok());
    if installed {
        Ok(())
    } else {
        Err(LogInitError::AlreadyInitialized)
    }
}

/// Writes default logging configuration values: INFO for rnlocalp2p, no filter, no callback.
#[unsafe(no_mangle)]
pub extern "C" fn rnlocalp2p_log_config_init(config: *mut rnlocalp2p_log_config_t) {
    if config.is_null() {
        return;
    }
    // Safety: caller provided a writable config pointer.
    unsafe {
        *config = rnlocalp2p_log_config_t {
            level: rnlocalp2p_log_level_t::RNLOCALP2P_LOG_LEVEL_INFO,
            filter: ptr::null(),
            callback: None,
            user_data: ptr::null_mut(),
        };
    }
}

/// Initializes logging, or reconfigures it when called again.
///
/// A null `config` selects the defaults.
#[unsafe(no_mangle)]
pub extern "C" fn rnlocalp2p_log_init(
    config: *const rnlocalp2p_log_config_t,
    out_error: *mut *mut rnlocalp2p_error_t,
) -> bool {
    clear_error(out_error);

    // Safety: caller passes null or a valid config pointer.
    let config = unsafe { config.as_ref() };
    let result = resolve_filter(config).and_then(|filter| ensure_logger().map(|()| filter));
    let filter = match result {
        Ok(filter) => filter,
        Err(err) => {
            write_error(out_error, &err);
            return false;
        }
    };

    let callback = config.and_then(|config| config.callback);
    let user_data = config.map_or(0, |config| config.user_data as usize);
    LOGGER.update(LoggerConfig {
        filter,
        callback,
        user_data,
    });
    true
}
