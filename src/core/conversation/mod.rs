//! The conversation controller: owns history and the single-flight send state
//! machine, and is the only surface the view layer talks to.
//!
//! A send is split in two halves so callers can drive the upstream call on
//! their own executor: [`ConversationController::send`] records the user
//! message and hands back a [`SendCommand`]; the outcome of running that
//! command comes back through [`ConversationController::resolve`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::core::config::Settings;
use crate::core::constants::{QUICK_ACTIONS, WELCOME_MESSAGE, WELCOME_SUGGESTIONS};
use crate::core::errors::{classify, ErrorKind, RemoteFailure};
use crate::core::inference::{run_inference, GeminiClient, InferenceClient, InferenceOutcome};
use crate::core::message::{Message, MessageId, Suggestion};
use crate::core::prompt::{build_prompt, PromptPayload};
use crate::core::suggestions::suggest;


/// Identifies one accepted send; outcomes for any other id are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Work produced by an accepted send.
#[derive(Debug, Clone)]
pub struct SendCommand {
    pub request_id: RequestId,
    pub payload: PromptPayload,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
struct InFlight {
    request_id: RequestId,
    query: String,
}

/// Read-only view of the conversation for rendering.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    history: Vec<Message>,
    in_flight: Option<InFlight>,
    last_error: Option<ErrorKind>,
    staged_input: String,
}

impl ConversationState {
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// True exactly while a request is outstanding.
    pub fn pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last_error
    }

    /// Text staged for the input field by a suggestion or quick action.
    pub fn staged_input(&self) -> &str {
        &self.staged_input
    }

    pub fn last_user_message(&self) -> Option<&Message> {
        self.history.iter().rev().find(|message| message.is_user())
    }
}

pub struct ConversationController {
    state: ConversationState,
    client: Arc<dyn InferenceClient>,
    request_timeout: Duration,
    next_message_id: u64,
    next_request_id: u64,
    revision: watch::Sender<u64>,
}

impl ConversationController {
    /// Builds a conversation seeded with the welcome message.
    pub fn new(client: Arc<dyn InferenceClient>, settings: &Settings) -> Self {
        let (revision, _) = watch::channel(0);
        let mut controller = Self {
            state: ConversationState::default(),
            client,
            request_timeout: settings.request_timeout,
            next_message_id: 1,
            next_request_id: 1,
            revision,
        };

        let id = controller.allocate_message_id();
        let suggestions = WELCOME_SUGGESTIONS
            .iter()
            .map(|text| Suggestion::prompt(*text))
            .collect();
        controller
            .state
            .history
            .push(Message::welcome(id, WELCOME_MESSAGE, suggestions));
        controller
    }

    /// Builds a conversation backed by the HTTP client described by `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(GeminiClient::from_settings(settings).into_shared(), settings)
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn history(&self) -> &[Message] {
        self.state.history()
    }

    pub fn pending(&self) -> bool {
        self.state.pending()
    }

    pub fn last_error(&self) -> Option<ErrorKind> {
        self.state.last_error()
    }

    pub fn client(&self) -> Arc<dyn InferenceClient> {
        Arc::clone(&self.client)
    }

    /// Receives a new revision number after every state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Accepts `text` as the next user turn.
    ///
    /// Returns `None`, leaving the state untouched, when the text is blank or
    /// a request is already in flight.
    pub fn send(&mut self, text: &str) -> Option<SendCommand> {
        let query = text.trim();
        if query.is_empty() {
            debug!("Ignoring blank send");
            return None;
        }
        if let Some(in_flight) = &self.state.in_flight {
            debug!(
                request_id = in_flight.request_id.get(),
                "Ignoring send while a request is in flight"
            );
            return None;
        }

        let payload = build_prompt(&self.state.history, query);

        let message_id = self.allocate_message_id();
        self.state.history.push(Message::user(message_id, query));
        self.state.last_error = None;
        self.state.staged_input.clear();

        let request_id = RequestId(self.next_request_id);
        self.next_request_id += 1;
        self.state.in_flight = Some(InFlight {
            request_id,
            query: query.to_string(),
        });

        info!(
            request_id = request_id.get(),
            message_id = message_id.get(),
            context_entries = payload.context.len(),
            "Send accepted"
        );
        self.bump_revision();

        Some(SendCommand {
            request_id,
            payload,
            timeout: self.request_timeout,
        })
    }

    /// Applies the outcome of the request identified by `request_id`.
    ///
    /// Returns `false` if that request is not the one in flight.
    pub fn resolve(&mut self, request_id: RequestId, outcome: InferenceOutcome) -> bool {
        let Some(in_flight) = self
            .state
            .in_flight
            .take_if(|in_flight| in_flight.request_id == request_id)
        else {
            warn!(request_id = request_id.get(), "Dropping outcome for a stale request");
            return false;
        };

        match outcome {
            InferenceOutcome::Reply(reply) => self.append_reply(reply, &in_flight.query),
            InferenceOutcome::Failure(failure) => self.append_failure(&failure),
        }
        self.bump_revision();
        true
    }

    /// Sends `text` and waits for the reply in place. Returns `false` if the
    /// send was rejected.
    pub async fn send_and_wait(&mut self, text: &str) -> bool {
        let Some(command) = self.send(text) else {
            return false;
        };
        let outcome = run_inference(self.client.as_ref(), &command.payload, command.timeout).await;
        self.resolve(command.request_id, outcome)
    }

    /// Clears the error banner. History keeps the error message.
    pub fn dismiss_error(&mut self) {
        if self.state.last_error.take().is_some() {
            self.bump_revision();
        }
    }

    /// Stages a suggestion as the next input without sending it. The retry
    /// suggestion stages the most recent user message instead of its label.
    pub fn select_suggestion(&mut self, suggestion: &Suggestion) {
        let staged = if suggestion.is_retry() {
            self.state
                .last_user_message()
                .map(|message| message.raw_content().to_string())
                .unwrap_or_default()
        } else {
            suggestion.text.clone()
        };
        self.stage_input(staged);
    }

    /// Stages the query behind the quick action at `index`.
    pub fn select_quick_action(&mut self, index: usize) -> bool {
        let Some((_, query)) = QUICK_ACTIONS.get(index) else {
            return false;
        };
        self.stage_input((*query).to_string());
        true
    }

    pub fn stage_input(&mut self, text: String) {
        self.state.staged_input = text;
        self.bump_revision();
    }

    pub fn take_staged_input(&mut self) -> String {
        std::mem::take(&mut self.state.staged_input)
    }

    fn append_reply(&mut self, reply: String, query: &str) {
        let suggestions = suggest(&reply, query)
            .into_iter()
            .map(Suggestion::prompt)
            .collect();
        let id = self.allocate_message_id();
        let message = Message::assistant(id, reply, suggestions);
        // Format once up front so the view always finds a render tree.
        let node_count = message.rendered_content().map_or(0, <[_]>::len);
        debug!(message_id = id.get(), nodes = node_count, "Reply appended");
        self.state.history.push(message);
    }

    fn append_failure(&mut self, failure: &RemoteFailure) {
        let kind = classify(failure);
        warn!(kind = %kind, detail = %failure, "Request failed");
        let id = self.allocate_message_id();
        let message = Message::error(id, kind.user_message(), kind.suggestions());
        let _ = message.rendered_content();
        self.state.history.push(message);
        self.state.last_error = Some(kind);
    }

    fn allocate_message_id(&mut self) -> MessageId {
        let id = MessageId::new(self.next_message_id);
        self.next_message_id += 1;
        id
    }

    fn bump_revision(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}
