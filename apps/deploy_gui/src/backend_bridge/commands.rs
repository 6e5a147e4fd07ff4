//! Backend commands queued from UI to backend worker.

use client_core::PendingSubmission;

#[derive(Debug)]
pub enum BackendCommand {
    Deploy(PendingSubmission),
}
