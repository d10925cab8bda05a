use super::config::ChatConfig;
use crate::llm::provider::{AssistantInput, LlmProvider, LlmResult, Turn};

/// One conversation with the remote model.
///
/// The service is stateless, so the turn history lives here and is replayed
/// on every request. History only grows, and only on a successful exchange.
#[derive(Debug)]
pub struct ChatSession<P> {
    provider: P,
    config: ChatConfig,
    history: Vec<Turn>,
}

impl<P: LlmProvider> ChatSession<P> {
    pub fn new(provider: P, config: ChatConfig) -> Self {
        Self {
            provider,
            config,
            history: Vec::new(),
        }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn last_text(&self) -> Option<&str> {
        self.history.last().map(|turn| turn.text.as_str())
    }

    pub async fn send_message(&mut self, text: &str) -> LlmResult<&str> {
        let mut turns = self.history.clone();
        turns.push(Turn::user(text));

        let output = self
            .provider
            .generate(AssistantInput {
                system_instruction: Some(self.config.system_instruction.clone()),
                generation: self.config.generation,
                safety: self.config.safety.clone(),
                turns,
            })
            .await?;

        self.history.push(Turn::user(text));
        self.history.push(Turn::model(output.text));
        Ok(self.last_text().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::ChatSession;
    use crate::chat::config::{ChatConfig, DEFAULT_SYSTEM_INSTRUCTION};
    use crate::llm::provider::{
        AssistantInput, AssistantOutput, LlmError, LlmProvider, LlmResult, Role, Turn,
    };
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct ScriptedProvider {
        requests: Arc<Mutex<Vec<AssistantInput>>>,
        fail_on: Option<String>,
    }

    impl LlmProvider for ScriptedProvider {
        async fn generate(&self, input: AssistantInput) -> LlmResult<AssistantOutput> {
            let last = input
                .turns
                .last()
                .map(|turn| turn.text.clone())
                .unwrap_or_default();
            self.requests.lock().expect("requests lock").push(input);

            if self.fail_on.as_deref() == Some(last.as_str()) {
                return Err(LlmError::Transport("connection reset".to_string()));
            }
            Ok(AssistantOutput {
                text: format!("re: {last}"),
            })
        }
    }

    #[test]
    fn new_session_starts_with_empty_history() {
        let session = ChatSession::new(ScriptedProvider::default(), ChatConfig::default());
        assert!(session.history().is_empty());
        assert_eq!(session.last_text(), None);
        assert_eq!(
            session.config().system_instruction,
            DEFAULT_SYSTEM_INSTRUCTION
        );
    }

    #[tokio::test]
    async fn send_message_appends_user_and_model_turns() {
        let provider = ScriptedProvider::default();
        let mut session = ChatSession::new(provider.clone(), ChatConfig::default());

        let reply = session.send_message("hello").await.expect("send");
        assert_eq!(reply, "re: hello");
        assert_eq!(
            session.history(),
            &[Turn::user("hello"), Turn::model("re: hello")]
        );
    }

    #[tokio::test]
    async fn each_request_replays_full_history() {
        let provider = ScriptedProvider::default();
        let mut session = ChatSession::new(provider.clone(), ChatConfig::default());

        session.send_message("first").await.expect("first send");
        session.send_message("second").await.expect("second send");

        let requests = provider.requests.lock().expect("requests lock");
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].turns, vec![Turn::user("first")]);
        assert_eq!(
            requests[1].turns,
            vec![
                Turn::user("first"),
                Turn::model("re: first"),
                Turn::user("second"),
            ]
        );
        assert!(
            requests
                .iter()
                .all(|req| req.system_instruction.as_deref() == Some(DEFAULT_SYSTEM_INSTRUCTION))
        );
        assert_eq!(session.history().len(), 4);
        assert_eq!(session.history()[3].role, Role::Model);
    }

    #[tokio::test]
    async fn failed_send_leaves_history_unchanged() {
        let provider = ScriptedProvider {
            fail_on: Some("boom".to_string()),
            ..ScriptedProvider::default()
        };
        let mut session = ChatSession::new(provider, ChatConfig::default());

        session.send_message("ok").await.expect("first send");
        let err = session.send_message("boom").await.expect_err("should fail");

        assert_eq!(err, LlmError::Transport("connection reset".to_string()));
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.last_text(), Some("re: ok"));
    }
}
