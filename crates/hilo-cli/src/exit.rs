//! Process exit codes.

use hilo_core::entities::BatchReport;
use hilo_pipeline::{PipelineError, SourceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    /// Bad configuration, arguments or engine data.
    Failure,
    /// The source could not be read even after retries.
    IngestionFailed,
    /// The batch finished but some chats failed or were cancelled.
    Partial,
}

impl ExitStatus {
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::IngestionFailed => 2,
            Self::Partial => 3,
        }
    }

    #[must_use]
    pub fn from_report(report: &BatchReport) -> Self {
        if report.all_complete() {
            Self::Success
        } else {
            Self::Partial
        }
    }

    #[must_use]
    pub fn from_error(error: &anyhow::Error) -> Self {
        let ingestion = error.chain().any(|cause| {
            cause.downcast_ref::<SourceError>().is_some()
                || matches!(
                    cause.downcast_ref::<PipelineError>(),
                    Some(PipelineError::Source(_))
                )
        });
        if ingestion {
            Self::IngestionFailed
        } else {
            Self::Failure
        }
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        Self::from(status.code())
    }
}
