//! Terminal-facing logging macros.
//!
//! Thin wrappers over `tracing` so that binaries can emit user-facing status lines
//! without depending on `tracing` directly. `success!` uses a dedicated target that the
//! CLI formatter renders differently from plain `info!`.

pub const SUCCESS_TARGET: &str = "adscout::success";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "adscout::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!($($arg)*)
    };
}
