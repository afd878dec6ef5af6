//! Exit codes.

/// Exit codes for the dupefinder application.
///
/// - 0: Success (scan completed, with or without duplicates or skipped files)
/// - 1: General error (unexpected failure, bad config file, unwritable stdout)
/// - 2: Invalid argument (root missing or not a directory; also clap's usage errors)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: Scan completed.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Invalid argument: The scan root cannot be used.
    InvalidArgument = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DF000",
            Self::GeneralError => "DF001",
            Self::InvalidArgument => "DF002",
        }
    }

    /// Pick the exit code for an error returned by [`crate::run_app`].
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        if err.downcast_ref::<crate::duplicates::FinderError>().is_some() {
            Self::InvalidArgument
        } else {
            Self::GeneralError
        }
    }
}
