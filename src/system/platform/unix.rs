use super::PlatformExtensions;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn clock_ticks_per_second() -> Option<u64> {
        // sysconf only reads a constant, it has no preconditions
        let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
        if ticks > 0 { Some(ticks as u64) } else { None }
    }
}
