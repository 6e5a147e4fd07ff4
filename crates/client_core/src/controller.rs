//! Submission state machine: a pure reducer plus the controller that owns the
//! state, issues request tokens and discards stale completions.

use shared::{
    domain::{DeploymentResult, RequestToken},
    error::SubmissionError,
    protocol::DeployRequest,
};
use tracing::{debug, info, warn};

use crate::{clipboard::copy_text, ClipboardSink, DeploymentService};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending {
        token: RequestToken,
    },
    Succeeded(DeploymentResult),
    Failed(SubmissionError),
}

impl SubmissionState {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    pub fn result(&self) -> Option<&DeploymentResult> {
        match self {
            Self::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SubmissionError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error().map(|error| error.message.as_str())
    }

    fn is_awaiting(&self, token: RequestToken) -> bool {
        matches!(self, Self::Pending { token: pending } if *pending == token)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionEvent {
    /// A request tagged with `token` is about to be dispatched.
    Started { token: RequestToken },
    /// Input failed local validation; nothing was dispatched.
    Rejected(SubmissionError),
    Completed(Completion),
}

/// The eventual outcome of one dispatched request.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub token: RequestToken,
    pub outcome: Result<DeploymentResult, SubmissionError>,
}

/// A request that has been accepted by the controller and must be handed to
/// a [`DeploymentService`]; its completion goes back through
/// [`SubmissionController::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub token: RequestToken,
    pub request: DeployRequest,
}

/// Advances `state` by one event. `latest` is the most recently issued token;
/// a completion for any other request leaves the state untouched.
pub fn reduce(
    state: SubmissionState,
    latest: RequestToken,
    event: SubmissionEvent,
) -> SubmissionState {
    match event {
        SubmissionEvent::Started { token } => SubmissionState::Pending { token },
        SubmissionEvent::Rejected(error) => SubmissionState::Failed(error),
        SubmissionEvent::Completed(completion) => {
            if completion.token != latest || !state.is_awaiting(completion.token) {
                return state;
            }
            match completion.outcome {
                Ok(result) => SubmissionState::Succeeded(result),
                Err(error) => SubmissionState::Failed(error),
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct SubmissionController {
    input: String,
    state: SubmissionState,
    latest: RequestToken,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Editable input buffer for the view. Edits never touch the state.
    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn latest_token(&self) -> RequestToken {
        self.latest
    }

    /// Starts a submission. Every call issues a fresh token, so anything
    /// still in flight is superseded even when the input is rejected.
    ///
    /// Returns `None` when the input is empty; the state is then `Failed`
    /// and nothing must be dispatched.
    pub fn begin(&mut self, input: impl Into<String>) -> Option<PendingSubmission> {
        self.input = input.into();
        self.latest = self.latest.next();
        let token = self.latest;

        if self.input.trim().is_empty() {
            info!(token = token.0, "submission rejected: missing repository reference");
            self.apply(SubmissionEvent::Rejected(
                SubmissionError::missing_repository(),
            ));
            return None;
        }

        self.apply(SubmissionEvent::Started { token });
        Some(PendingSubmission {
            token,
            request: DeployRequest::new(self.input.clone()),
        })
    }

    /// Applies a completion. Returns `false` when it belonged to a
    /// superseded request and was dropped.
    pub fn complete(&mut self, completion: Completion) -> bool {
        let token = completion.token;
        let applies = token == self.latest && self.state.is_awaiting(token);
        if !applies {
            debug!(
                token = token.0,
                latest = self.latest.0,
                "discarding completion of superseded submission"
            );
        }
        self.apply(SubmissionEvent::Completed(completion));
        applies
    }

    /// Runs one full submission against `service`: validate, dispatch once,
    /// apply the outcome.
    pub async fn submit<S>(&mut self, service: &S, input: impl Into<String>) -> &SubmissionState
    where
        S: DeploymentService + ?Sized,
    {
        if let Some(pending) = self.begin(input) {
            let completion = dispatch(service, pending).await;
            self.complete(completion);
        }
        &self.state
    }

    /// Copies `text` to the clipboard. Failures are logged and reported
    /// through the return value only; the submission state is never touched.
    pub fn copy<C>(&self, clipboard: &mut C, text: &str) -> bool
    where
        C: ClipboardSink + ?Sized,
    {
        copy_text(clipboard, text)
    }

    fn apply(&mut self, event: SubmissionEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, self.latest, event);
    }
}

/// Sends exactly one request for `pending`. Never fails: every error is
/// carried in the returned completion.
pub async fn dispatch<S>(service: &S, pending: PendingSubmission) -> Completion
where
    S: DeploymentService + ?Sized,
{
    let PendingSubmission { token, request } = pending;
    info!(token = token.0, url = %request.url, "deploy: dispatching request");
    let outcome = service.deploy(&request).await;
    if let Err(error) = &outcome {
        warn!(
            token = token.0,
            kind = ?error.kind,
            message = %error.message,
            "deploy: submission failed"
        );
    }
    Completion { token, outcome }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
