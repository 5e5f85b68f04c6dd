//! Operation boundary macros
//!
//! The verification run, the summary render and each ingest step open with
//! `log_op_start!` and close with exactly one of `log_op_end!` or
//! `log_op_error!`. All three share one event shape (`component`, `op`,
//! `event`) so captured logs can be filtered by operation regardless of
//! which crate emitted them.
//!
//! `tracing` is reached through this crate, so callers only need
//! `scrutiny-core` as a dependency.

#[doc(hidden)]
#[macro_export]
macro_rules! __scrutiny_op_event {
    ($level:expr, $op:expr, $event:expr $(, $($field:tt)*)?) => {
        $crate::__tracing::event!(
            $level,
            component = module_path!(),
            op = $op,
            event = $event,
            $($($field)*)?
        )
    };
}

/// Opens an operation. Extra fields such as the section name or the schema
/// path follow the op name.
///
/// ```
/// # use scrutiny_core::log_op_start;
/// log_op_start!("verify");
/// log_op_start!("compare_section", section = "CPLC");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__scrutiny_op_event!(
            $crate::__tracing::Level::INFO,
            $op,
            $crate::core_types::schema::EVENT_START
            $(, $($field)*)?
        )
    };
}

/// Closes an operation that succeeded; `duration_ms` is mandatory.
///
/// ```
/// # use scrutiny_core::log_op_end;
/// log_op_end!("verify", duration_ms = 42, section_count = 3, severity = "WARN");
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__scrutiny_op_event!(
            $crate::__tracing::Level::INFO,
            $op,
            $crate::core_types::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Closes an operation that failed.
///
/// `err` is converted into `ExError` and logged at ERROR with its kind and
/// stable `ERR_*` code, so a `ScrutinyError` can be passed directly.
///
/// ```
/// # use scrutiny_core::log_op_error;
/// # use scrutiny_core::errors::ScrutinyError;
/// let err = ScrutinyError::MissingSection { section: "CPLC".to_string() };
/// log_op_error!("ingest", err, duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__scrutiny_op_event!(
            $crate::__tracing::Level::ERROR,
            $op,
            $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code()
            $(, $($field)*)?
        )
    }};
}
