//! Logging macros for ergonomic argument passing.
//!
//! The level methods on [`Logger`](crate::Logger) take a template and a
//! `Vec<Arg>`. These macros convert each argument with `Arg::from`, so
//! plain values and [`Secret`](crate::Secret)s can be passed directly.
//!
//! # Examples
//!
//! ```
//! use modlog::prelude::*;
//! use modlog::{error, info};
//!
//! let memory = MemoryBackend::new(8);
//! let logger = Logger::builder().module("server").backend(memory.clone()).build();
//!
//! info!(logger, "Server started");
//! info!(logger, "Server listening on port {}", 8080);
//! error!(logger, "login failed for {} with {}", "alice", Secret::new("pw"));
//!
//! assert_eq!(
//!     memory.messages(),
//!     vec![
//!         "Server started",
//!         "Server listening on port 8080",
//!         "login failed for alice with **",
//!     ]
//! );
//! ```

/// Build a `Vec<Arg>` from heterogeneous values.
///
/// ```
/// use modlog::{args, Arg, Secret};
///
/// let args: Vec<Arg> = args![1, "two", Secret::new("three")];
/// assert_eq!(args.len(), 3);
/// assert_eq!(args[2].render(), "*****");
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        vec![$($crate::Arg::from($arg)),+]
    };
}

/// Log at an explicit level.
///
/// ```
/// # use modlog::prelude::*;
/// # let memory = MemoryBackend::new(8);
/// # let logger = Logger::builder().backend(memory.clone()).build();
/// use modlog::log;
/// log!(logger, Level::Notice, "Simple message");
/// log!(logger, Level::Error, "Error code: {}", 500);
/// # assert_eq!(memory.len(), 2);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $template:expr) => {
        $logger.emit($level, $template, $crate::args![])
    };
    ($logger:expr, $level:expr, $template:expr, $($arg:expr),+ $(,)?) => {
        $logger.emit($level, $template, $crate::args![$($arg),+])
    };
}

#[macro_export]
macro_rules! critical {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Critical, $($rest)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($rest)+)
    };
}

#[macro_export]
macro_rules! warning {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Warning, $($rest)+)
    };
}

#[macro_export]
macro_rules! notice {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Notice, $($rest)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($rest)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($rest)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::backends::MemoryBackend;
    use crate::core::{Level, Logger, SequenceGenerator};
    use std::sync::Arc;

    fn logger() -> (Logger, MemoryBackend) {
        let memory = MemoryBackend::new(16);
        let logger = Logger::builder()
            .module("macros")
            .backend(memory.clone())
            .sequence(Arc::new(SequenceGenerator::new()))
            .build();
        (logger, memory)
    }

    #[test]
    fn test_level_macros() {
        let (logger, memory) = logger();
        critical!(logger, "c");
        error!(logger, "Code: {}", 500);
        warning!(logger, "Retry {} of {}", 1, 3);
        notice!(logger, "n");
        info!(logger, "Items: {}", 100);
        debug!(logger, "Count: {}", 5);

        let levels: Vec<_> = memory.records().iter().map(|r| r.level).collect();
        assert_eq!(levels, Level::ALL.to_vec());
        assert_eq!(
            memory.messages(),
            vec!["c", "Code: 500", "Retry 1 of 3", "n", "Items: 100", "Count: 5"]
        );
    }

    #[test]
    fn test_log_macro_trailing_comma() {
        let (logger, memory) = logger();
        log!(logger, Level::Info, "{} and {}", "a", 'b',);
        assert_eq!(memory.messages(), vec!["a and b"]);
    }

    #[test]
    fn test_args_macro() {
        let empty = args![];
        assert!(empty.is_empty());
        let args = args![1u8, 2.5, true];
        let rendered: Vec<_> = args.iter().map(|a| a.render()).collect();
        assert_eq!(rendered, vec!["1", "2.5", "true"]);
    }
}
