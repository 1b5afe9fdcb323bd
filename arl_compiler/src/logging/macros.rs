//! Logging macros. Context values accept anything implementing `Display`.

/// `log_error!(code, message [, span = s] [, "key" => value]*)`
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr, span = $span:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::log_error_with_context(
            $code,
            $message,
            Some($span),
            &[$(($key, format!("{}", $value))),*],
        )
    };

    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::log_error_with_context(
            $code,
            $message,
            None,
            &[$(($key, format!("{}", $value))),*],
        )
    };
}

/// `log_warning!([code = c,] message [, span = s] [, "key" => value]*)`
#[macro_export]
macro_rules! log_warning {
    (code = $code:expr, $message:expr, span = $span:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::log_warning_with_context(
            Some($code),
            $message,
            Some($span),
            &[$(($key, format!("{}", $value))),*],
        )
    };

    (code = $code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::log_warning_with_context(
            Some($code),
            $message,
            None,
            &[$(($key, format!("{}", $value))),*],
        )
    };

    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::log_warning_with_context(
            None,
            $message,
            None,
            &[$(($key, format!("{}", $value))),*],
        )
    };
}

#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::log_success_with_context(
            $code,
            $message,
            &[$(($key, format!("{}", $value))),*],
        )
    };
}

#[macro_export]
macro_rules! log_info {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::log_info_with_context(
            $message,
            &[$(($key, format!("{}", $value))),*],
        )
    };
}

/// Debug events skip formatting entirely unless the configured level allows them
#[macro_export]
macro_rules! log_debug {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        if $crate::logging::config::get_min_log_level() >= $crate::logging::LogLevel::Debug {
            $crate::logging::log_debug_with_context(
                $message,
                &[$(($key, format!("{}", $value))),*],
            )
        }
    };
}

/// Success event with a `duration_ms` entry
#[macro_export]
macro_rules! log_performance {
    ($code:expr, $message:expr, duration = $duration:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::log_success!($code, $message,
            "duration_ms" => format!("{:.3}", $duration.as_secs_f64() * 1000.0)
            $(, $key => $value)*
        )
    };
}
