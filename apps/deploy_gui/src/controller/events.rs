//! Events flowing from the backend worker to the UI thread.

use client_core::{Completion, SubmissionController, SubmissionState};
use shared::error::SubmissionError;

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    /// The worker cannot run requests; anything pending is failed.
    BackendUnavailable(String),
    DeploymentCompleted(Completion),
}

impl UiEvent {
    pub fn apply(self, controller: &mut SubmissionController, status: &mut String) {
        match self {
            UiEvent::Info(message) => {
                *status = message;
            }
            UiEvent::BackendUnavailable(reason) => {
                tracing::error!("{reason}");
                *status = reason;
                let pending = match controller.state() {
                    SubmissionState::Pending { token } => Some(*token),
                    _ => None,
                };
                if let Some(token) = pending {
                    controller.complete(Completion {
                        token,
                        outcome: Err(SubmissionError::transport()),
                    });
                }
            }
            UiEvent::DeploymentCompleted(completion) => {
                controller.complete(completion);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::{ErrorKind, FALLBACK_FAILURE_MESSAGE};

    #[test]
    fn backend_unavailable_fails_pending_submission() {
        let mut controller = SubmissionController::new();
        let mut status = String::new();
        controller
            .begin("https://github.com/acme/site")
            .expect("accepted");

        UiEvent::BackendUnavailable("backend worker startup failure".into())
            .apply(&mut controller, &mut status);

        let error = controller.state().error().expect("failed");
        assert_eq!(error.kind, ErrorKind::Transport);
        assert_eq!(error.message, FALLBACK_FAILURE_MESSAGE);
        assert_eq!(status, "backend worker startup failure");
    }

    #[test]
    fn backend_unavailable_leaves_settled_state_alone() {
        let mut controller = SubmissionController::new();
        let mut status = String::new();

        UiEvent::BackendUnavailable("gone".into()).apply(&mut controller, &mut status);
        assert_eq!(controller.state(), &SubmissionState::Idle);
    }

    #[test]
    fn info_only_updates_status() {
        let mut controller = SubmissionController::new();
        let mut status = String::new();

        UiEvent::Info("Backend worker ready".into()).apply(&mut controller, &mut status);
        assert_eq!(status, "Backend worker ready");
        assert_eq!(controller.state(), &SubmissionState::Idle);
    }
}
