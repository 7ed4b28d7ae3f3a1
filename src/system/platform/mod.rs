/// Ticks per second assumed when the platform cannot report `_SC_CLK_TCK`.
pub const DEFAULT_CLOCK_TICKS: u64 = 100;

pub trait PlatformExtensions {
    /// Kernel clock ticks per second (USER_HZ), the unit of the jiffy
    /// counters in `/proc/stat` and `/proc/<pid>/stat`.
    fn clock_ticks_per_second() -> Option<u64>;
}

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod fallback;

#[cfg(not(unix))]
use fallback as platform_impl;
#[cfg(unix)]
use unix as platform_impl;

pub fn clock_ticks_per_second() -> u64 {
    platform_impl::Platform::clock_ticks_per_second().unwrap_or(DEFAULT_CLOCK_TICKS)
}
