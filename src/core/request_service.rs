use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::conversation::{RequestId, SendCommand};
use crate::core::errors::RemoteFailure;
use crate::core::inference::{run_inference, InferenceClient, InferenceOutcome};

/// Runs accepted sends as background tasks and reports each outcome, tagged
/// with its request id, on a channel the event loop drains.
#[derive(Clone)]
pub struct RequestService {
    tx: mpsc::UnboundedSender<(InferenceOutcome, RequestId)>,
    cancel_token: CancellationToken,
}

impl RequestService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(InferenceOutcome, RequestId)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                cancel_token: CancellationToken::new(),
            },
            rx,
        )
    }

    pub fn spawn_request(&self, client: Arc<dyn InferenceClient>, command: SendCommand) {
        let tx = self.tx.clone();
        let cancel_token = self.cancel_token.clone();
        tokio::spawn(async move {
            let SendCommand {
                request_id,
                payload,
                timeout,
            } = command;

            // Cancellation still yields an outcome so the conversation
            // leaves its awaiting state.
            let outcome = tokio::select! {
                outcome = run_inference(client.as_ref(), &payload, timeout) => outcome,
                _ = cancel_token.cancelled() => {
                    debug!(request_id = request_id.get(), "Request cancelled");
                    InferenceOutcome::Failure(RemoteFailure::new("request cancelled"))
                }
            };
            let _ = tx.send((outcome, request_id));
        });
    }

    /// Cancels every outstanding request.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
