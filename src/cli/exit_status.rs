use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// Partial failures (a translation that errored, a table that could not be
/// written) are reported but still exit with `Success`; only fatal errors
/// such as an invalid configuration map to `Error`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    /// Command failed before touching any table (config error, missing root, etc.).
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
