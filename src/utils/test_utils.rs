use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::core::config::Settings;
use crate::core::conversation::ConversationController;
use crate::core::errors::RemoteFailure;
use crate::core::inference::InferenceClient;
use crate::core::prompt::PromptPayload;

/// In-memory client that answers from a script and records every prompt.
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, RemoteFailure>>>,
    prompts: Mutex<Vec<PromptPayload>>,
    delay: Option<Duration>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn reply(self, text: &str) -> Self {
        self.push(Ok(text.to_string()))
    }

    pub fn fail(self, message: &str) -> Self {
        self.push(Err(RemoteFailure::new(message)))
    }

    fn push(self, entry: Result<String, RemoteFailure>) -> Self {
        self.replies.lock().unwrap().push_back(entry);
        self
    }

    pub fn prompts(&self) -> Vec<PromptPayload> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl InferenceClient for ScriptedClient {
    async fn generate(
        &self,
        payload: &PromptPayload,
        _timeout: Duration,
    ) -> Result<String, RemoteFailure> {
        self.prompts.lock().unwrap().push(payload.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RemoteFailure::new("script exhausted")))
    }
}

pub fn test_settings() -> Settings {
    Settings {
        api_key: Some("test-key".to_string()),
        base_url: "http://127.0.0.1:9".to_string(),
        model: "test-model".to_string(),
        ..Settings::default()
    }
}

pub fn create_test_controller(client: ScriptedClient) -> (ConversationController, Arc<ScriptedClient>) {
    let client = Arc::new(client);
    let controller = ConversationController::new(client.clone(), &test_settings());
    (controller, client)
}
