//! Command orchestration from UI actions to the backend command queue.

use client_core::{Completion, SubmissionController};
use crossbeam_channel::{Sender, TrySendError};
use shared::error::SubmissionError;

use crate::backend_bridge::commands::BackendCommand;

/// Starts a submission for the current input and queues it for the worker.
/// A queue failure settles the submission as a transport failure so the page
/// never stays busy.
pub fn submit_current_input(
    controller: &mut SubmissionController,
    cmd_tx: &Sender<BackendCommand>,
    status: &mut String,
) {
    let input = controller.input().to_string();
    let Some(pending) = controller.begin(input) else {
        return;
    };
    let token = pending.token;

    let reason = match cmd_tx.try_send(BackendCommand::Deploy(pending)) {
        Ok(()) => {
            tracing::debug!(command = "deploy", token = token.0, "queued ui->backend command");
            return;
        }
        Err(TrySendError::Full(_)) => "UI command queue is full; please retry",
        Err(TrySendError::Disconnected(_)) => {
            "Backend command processor disconnected (possible startup/runtime failure); restart the app"
        }
    };

    tracing::warn!(token = token.0, "{reason}");
    *status = reason.to_string();
    controller.complete(Completion {
        token,
        outcome: Err(SubmissionError::transport()),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::SubmissionState;
    use crossbeam_channel::bounded;
    use shared::error::{ErrorKind, MISSING_REPOSITORY_MESSAGE};

    fn controller_with_input(input: &str) -> SubmissionController {
        let mut controller = SubmissionController::new();
        controller.input_mut().push_str(input);
        controller
    }

    #[test]
    fn queues_deploy_with_current_token() {
        let (cmd_tx, cmd_rx) = bounded(1);
        let mut controller = controller_with_input("https://github.com/acme/site");
        let mut status = String::new();

        submit_current_input(&mut controller, &cmd_tx, &mut status);

        let BackendCommand::Deploy(pending) = cmd_rx.try_recv().expect("queued");
        assert_eq!(pending.request.url, "https://github.com/acme/site");
        assert_eq!(
            controller.state(),
            &SubmissionState::Pending {
                token: pending.token
            }
        );
        assert!(status.is_empty());
    }

    #[test]
    fn empty_input_queues_nothing() {
        let (cmd_tx, cmd_rx) = bounded(1);
        let mut controller = controller_with_input("  ");
        let mut status = String::new();

        submit_current_input(&mut controller, &cmd_tx, &mut status);

        assert!(cmd_rx.try_recv().is_err());
        assert_eq!(
            controller.state().error_message(),
            Some(MISSING_REPOSITORY_MESSAGE)
        );
    }

    #[test]
    fn full_queue_settles_as_transport_failure() {
        let (cmd_tx, _cmd_rx) = bounded(1);
        let mut controller = controller_with_input("https://github.com/acme/site");
        let mut status = String::new();
        submit_current_input(&mut controller, &cmd_tx, &mut status);

        submit_current_input(&mut controller, &cmd_tx, &mut status);

        assert_eq!(
            controller.state().error().map(|e| e.kind),
            Some(ErrorKind::Transport)
        );
        assert!(status.contains("queue is full"));
    }

    #[test]
    fn disconnected_worker_settles_as_transport_failure() {
        let (cmd_tx, cmd_rx) = bounded(1);
        drop(cmd_rx);
        let mut controller = controller_with_input("https://github.com/acme/site");
        let mut status = String::new();

        submit_current_input(&mut controller, &cmd_tx, &mut status);

        assert!(!controller.state().is_busy());
        assert!(status.contains("disconnected"));
    }
}
