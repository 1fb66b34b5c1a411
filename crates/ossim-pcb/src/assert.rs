/// In debug builds, panics on failure just like `debug_assert!`. In
/// release builds, logs via `tracing::error!` instead of aborting the
/// process — used at tick boundaries to check invariants (e.g. PCB
/// uniqueness across queues) that should never fail but that a transport
/// bug could in principle violate.
#[macro_export]
macro_rules! safe_assert {
    ($cond:expr $(,)?) => {
        #[cfg(debug_assertions)]
        {
            debug_assert!($cond);
        }
        #[cfg(not(debug_assertions))]
        {
            if !$cond {
                tracing::error!("assertion failed: {}", stringify!($cond));
            }
        }
    };

    ($cond:expr, $($arg:tt)+) => {
        #[cfg(debug_assertions)]
        {
            debug_assert!($cond, $($arg)+);
        }
        #[cfg(not(debug_assertions))]
        {
            if !$cond {
                tracing::error!($($arg)+);
            }
        }
    };
}
