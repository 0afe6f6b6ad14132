// Job Context Port
// The executing job as seen by infrastructure services

use super::cancellation::CancellationToken;
use tracing::debug;

/// Execution context of a single job
pub trait JobContext: Send + Sync {
    /// Identifier of the job
    fn job_id(&self) -> &str;

    /// Write a line to the job's debug output
    fn debug(&self, message: &str);

    /// Cancellation signal of the job
    fn cancellation_token(&self) -> &CancellationToken;
}

/// Job context whose debug output goes to `tracing` (production)
pub struct TracingJobContext {
    job_id: String,
    cancellation: CancellationToken,
}

impl TracingJobContext {
    pub fn new(job_id: impl Into<String>, cancellation: CancellationToken) -> Self {
        Self {
            job_id: job_id.into(),
            cancellation,
        }
    }
}

impl JobContext for TracingJobContext {
    fn job_id(&self) -> &str {
        &self.job_id
    }

    fn debug(&self, message: &str) {
        debug!(job_id = %self.job_id, "{}", message);
    }

    fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::port::cancellation::{cancellation_channel, CancellationSource};
    use std::sync::{Arc, Mutex};

    /// Job context that records every debug line
    pub struct RecordingJobContext {
        job_id: String,
        source: CancellationSource,
        cancellation: CancellationToken,
        lines: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingJobContext {
        pub fn new(job_id: impl Into<String>) -> Self {
            let (source, cancellation) = cancellation_channel();
            Self {
                job_id: job_id.into(),
                source,
                cancellation,
                lines: Arc::new(Mutex::new(Vec::new())),
            }
        }
        pub fn cancel(&self) {
            self.source.cancel();
        }
        pub fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl JobContext for RecordingJobContext {
        fn job_id(&self) -> &str {
            &self.job_id
        }
        fn debug(&self, message: &str) {
            self.lines.lock().unwrap().push(message.to_string());
        }
        fn cancellation_token(&self) -> &CancellationToken {
            &self.cancellation
        }
    }
}
