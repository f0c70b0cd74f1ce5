//! Logging macros that forward to `tracing` when the feature is enabled and
//! compile to nothing otherwise.

#[cfg(feature = "tracing")]
macro_rules! log_trace {
    ($($arg:tt)*) => { ::tracing::trace!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        if false {
            ::std::mem::drop(format!($($arg)*));
        }
    }};
}

#[cfg(feature = "tracing")]
macro_rules! log_debug {
    ($($arg:tt)*) => { ::tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        if false {
            ::std::mem::drop(format!($($arg)*));
        }
    }};
}

/// Log a diagnostic at the level matching its severity.
#[cfg(feature = "tracing")]
macro_rules! log_diagnostic {
    ($diag:expr) => {{
        let diag: &::pagerecon_core::Diagnostic = $diag;
        match diag.severity {
            ::pagerecon_core::Severity::Error => {
                ::tracing::error!(code = %diag.code, page = ?diag.page, "{}", diag.description)
            }
            ::pagerecon_core::Severity::Warning => {
                ::tracing::warn!(code = %diag.code, page = ?diag.page, "{}", diag.description)
            }
        }
    }};
}

#[cfg(not(feature = "tracing"))]
macro_rules! log_diagnostic {
    ($diag:expr) => {{
        let _: &::pagerecon_core::Diagnostic = $diag;
    }};
}
