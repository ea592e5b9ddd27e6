use std::path::PathBuf;
use std::time::Duration;

/// What to do when a single per-attribute parameter read fails.
///
/// The compact-drive dialect reads every parameter individually, so one bad
/// read does not have to take the whole device down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadFailurePolicy {
    /// Log the failure, drop the parameter, keep walking the device.
    #[default]
    SkipParameter,
    /// Stop walking the device and mark its catalog incomplete.
    AbortDevice,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Upper bound for a single attribute request on a session.
    pub timeout: Duration,
    /// Recovery policy for per-attribute read failures.
    pub read_failure_policy: ReadFailurePolicy,
    /// Directory snapshot files are written into.
    pub output_dir: PathBuf,
    /// 0 = full output, 1 = results only, 2 = errors only.
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            read_failure_policy: ReadFailurePolicy::default(),
            output_dir: PathBuf::from("backups"),
            quiet: 0,
        }
    }
}
