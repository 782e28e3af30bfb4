//! One chat turn against a profile.
//!
//! Remembers what the analyzer finds in the user's message, builds the system
//! prompt from the profile and its memories, calls the model with a trailing
//! window of the conversation, then persists the exchange.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use allki_core::analyzer::analyze;
use allki_core::config::AppConfig;
use allki_core::conversation::{Conversation, ConversationRepository, HISTORY_WINDOW};
use allki_core::llm::{ChatMessage, CompletionRequest, LlmClient};
use allki_core::memory::ContextMemoryService;
use allki_core::prompt::{build_system_prompt, temperature_for};
use allki_core::{AllkiError, Result};

use crate::profile_service::ProfileService;

/// Maximum length of a conversation title derived from the first message.
pub const TITLE_CHARS: usize = 50;

/// Title used when title generation fails.
pub const FALLBACK_TITLE: &str = "Neue Unterhaltung";

const TITLE_TEMPERATURE: f64 = 0.5;
const TITLE_MAX_TOKENS: u32 = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    pub max_tokens: u32,
    pub history_window: usize,
    pub max_message_chars: usize,
    pub generate_titles: bool,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            history_window: HISTORY_WINDOW,
            max_message_chars: 4000,
            generate_titles: false,
        }
    }
}

impl ChatSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_tokens: config.llm.max_tokens,
            history_window: config.memory.history_window,
            max_message_chars: config.limits.max_message_chars,
            generate_titles: config.llm.generate_titles,
        }
    }
}

/// Result of a chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub reply: String,
    pub tokens: u64,
    pub conversation_id: String,
    /// Whether the analyzer extracted anything from the user's message
    pub learned: bool,
}

pub struct ChatUseCase {
    profiles: Arc<ProfileService>,
    conversations: Arc<dyn ConversationRepository>,
    memory: Arc<ContextMemoryService>,
    llm: Arc<dyn LlmClient>,
    settings: ChatSettings,
}

impl ChatUseCase {
    pub fn new(
        profiles: Arc<ProfileService>,
        conversations: Arc<dyn ConversationRepository>,
        memory: Arc<ContextMemoryService>,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            profiles,
            conversations,
            memory,
            llm,
            settings: ChatSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ChatSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sends `message` to the profile and returns the assistant's reply.
    ///
    /// A missing `conversation_id` starts a new conversation. What the
    /// analyzer extracts is remembered before the prompt is built, so the
    /// reply already sees it. A failed model call keeps those memories but
    /// persists neither the exchange nor the usage.
    pub async fn send(
        &self,
        profile_id: &str,
        user_id: &str,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<ChatReply> {
        self.validate_message(message)?;
        let profile = self.profiles.get(profile_id, user_id).await?;
        let existing = match conversation_id {
            Some(id) => Some(self.find_conversation(id, user_id, profile_id).await?),
            None => None,
        };

        let learned = self
            .memory
            .record_candidates(profile_id, &analyze(message))
            .await?;
        let memories = self.memory.get_memories(profile_id).await?;
        let system_prompt = build_system_prompt(&profile, &memories);
        let temperature = temperature_for(&profile);

        let mut conversation = match existing {
            Some(conversation) => conversation,
            None => {
                let title = self.title_for(message).await;
                Conversation::new(user_id, profile_id, &title, self.llm.model_name())
            }
        };

        let mut messages = conversation.recent_history(self.settings.history_window);
        messages.push(ChatMessage::user(message));
        debug!(
            profile_id,
            history = messages.len(),
            memories = memories.len(),
            temperature,
            "Prepared completion request"
        );

        let started = Instant::now();
        let completion = self
            .llm
            .complete(CompletionRequest {
                system_prompt,
                messages,
                temperature,
                max_tokens: self.settings.max_tokens,
            })
            .await
            .inspect_err(|err| warn!(profile_id, error = %err, "Chat completion failed"))?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        conversation.push_user_message(message);
        conversation.push_assistant_reply(&completion, elapsed_ms);
        self.conversations.save(&conversation).await?;

        self.profiles
            .record_usage(profile_id, completion.token_count)
            .await?;
        self.memory
            .record_exchange(profile_id, message, &completion.text)
            .await?;

        info!(
            profile_id,
            conversation_id = %conversation.id,
            tokens = completion.token_count,
            learned,
            elapsed_ms,
            "Chat turn completed"
        );

        Ok(ChatReply {
            reply: completion.text,
            tokens: completion.token_count,
            conversation_id: conversation.id,
            learned: learned > 0,
        })
    }

    /// Non-archived conversations of a user with one profile, newest first.
    pub async fn conversations(&self, profile_id: &str, user_id: &str) -> Result<Vec<Conversation>> {
        self.conversations.list_for_profile(user_id, profile_id).await
    }

    fn validate_message(&self, message: &str) -> Result<()> {
        let len = message.chars().count();
        if message.trim().is_empty() {
            return Err(AllkiError::validation("Message must not be empty"));
        }
        if len > self.settings.max_message_chars {
            return Err(AllkiError::validation(format!(
                "Message must be at most {} characters",
                self.settings.max_message_chars
            )));
        }
        Ok(())
    }

    async fn find_conversation(
        &self,
        conversation_id: &str,
        user_id: &str,
        profile_id: &str,
    ) -> Result<Conversation> {
        self.conversations
            .find_by_id(conversation_id)
            .await?
            .filter(|c| c.user_id == user_id && c.profile_id == profile_id)
            .ok_or_else(|| AllkiError::not_found("conversation", conversation_id))
    }

    async fn title_for(&self, first_message: &str) -> String {
        if !self.settings.generate_titles {
            return truncate_title(first_message);
        }

        let request = CompletionRequest {
            system_prompt: String::new(),
            messages: vec![ChatMessage::user(format!(
                "Erstelle einen kurzen, prägnanten Titel (max 50 Zeichen) für eine Konversation, die mit dieser Nachricht beginnt:\n\n\"{first_message}\"\n\nAntworte nur mit dem Titel, ohne Anführungszeichen."
            ))],
            temperature: TITLE_TEMPERATURE,
            max_tokens: TITLE_MAX_TOKENS,
        };
        match self.llm.complete(request).await {
            Ok(completion) if !completion.text.trim().is_empty() => {
                truncate_title(completion.text.trim().trim_matches('"'))
            }
            Ok(_) => FALLBACK_TITLE.to_string(),
            Err(err) => {
                warn!(error = %err, "Title generation failed");
                FALLBACK_TITLE.to_string()
            }
        }
    }
}

fn truncate_title(text: &str) -> String {
    let title: String = text.trim().chars().take(TITLE_CHARS).collect();
    let title = title.trim();
    if title.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        title.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use allki_core::llm::{Completion, LlmError};
    use allki_core::memory::{InMemoryContextStore, keys};
    use allki_core::profile::ProfileCategory;
    use allki_core::conversation::MessageRole;
    use allki_infrastructure::{InMemoryConversationRepository, InMemoryProfileRepository};
    use async_trait::async_trait;

    /// Replies with a fixed text and records every request.
    struct ScriptedLlm {
        reply: std::result::Result<String, LlmError>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedLlm {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing(err: LlmError) -> Self {
            Self {
                reply: Err(err),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn complete(&self, request: CompletionRequest) -> std::result::Result<Completion, LlmError> {
            self.requests.lock().unwrap().push(request);
            self.reply.clone().map(|text| Completion {
                text,
                token_count: 42,
                model: "mock-model".to_string(),
                finish_reason: "stop".to_string(),
            })
        }

        fn model_name(&self) -> &str {
            "mock-model"
        }
    }

    struct Fixture {
        chat: ChatUseCase,
        llm: Arc<ScriptedLlm>,
        memory: Arc<ContextMemoryService>,
        profiles: Arc<ProfileService>,
        conversations: Arc<InMemoryConversationRepository>,
    }

    fn fixture(llm: ScriptedLlm) -> Fixture {
        let llm = Arc::new(llm);
        let memory = Arc::new(ContextMemoryService::new(Arc::new(InMemoryContextStore::new())));
        let profiles = Arc::new(ProfileService::new(Arc::new(InMemoryProfileRepository::new())));
        let conversations = Arc::new(InMemoryConversationRepository::new());
        let chat = ChatUseCase::new(profiles.clone(), conversations.clone(), memory.clone(), llm.clone());
        Fixture {
            chat,
            llm,
            memory,
            profiles,
            conversations,
        }
    }

    #[tokio::test]
    async fn test_send_starts_conversation_and_learns() {
        let f = fixture(ScriptedLlm::replying("Klingt nach einem Plan!"));
        let profile = f.profiles.create_from_template("u1", ProfileCategory::Personal).await.unwrap();

        let reply = f
            .chat
            .send(&profile.id, "u1", "Ich möchte einen Marathon laufen", None)
            .await
            .unwrap();

        assert_eq!(reply.reply, "Klingt nach einem Plan!");
        assert_eq!(reply.tokens, 42);
        assert!(reply.learned);

        let conversation = f.conversations.find_by_id(&reply.conversation_id).await.unwrap().unwrap();
        assert_eq!(conversation.title, "Ich möchte einen Marathon laufen");
        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.messages[1].role, MessageRole::Assistant);

        let goals = f.memory.get_memory(&profile.id, keys::GOALS).await.unwrap().unwrap();
        assert_eq!(goals.confidence, 0.7);
        assert!(f.memory.get_memory(&profile.id, keys::LAST_INTERACTION).await.unwrap().is_some());
        let context = f.memory.context(&profile.id).await.unwrap().unwrap();
        assert_eq!(context.conversation_count, 1);

        let stored = f.profiles.get(&profile.id, "u1").await.unwrap();
        assert_eq!(stored.usage.total_chats, 1);
        assert_eq!(stored.usage.total_tokens, 42);
    }

    #[tokio::test]
    async fn test_request_carries_prompt_history_and_temperature() {
        let f = fixture(ScriptedLlm::replying("ok"));
        let profile = f.profiles.create_from_template("u1", ProfileCategory::Creative).await.unwrap();

        let first = f.chat.send(&profile.id, "u1", "Hallo", None).await.unwrap();
        f.chat
            .send(&profile.id, "u1", "Noch eine Frage", Some(&first.conversation_id))
            .await
            .unwrap();

        let requests = f.llm.requests();
        assert_eq!(requests.len(), 2);
        let second = &requests[1];
        assert!(second.system_prompt.starts_with(&profile.system_prompt));
        assert_eq!(second.messages.len(), 3);
        assert_eq!(second.messages[0].content, "Hallo");
        assert_eq!(second.messages[2].content, "Noch eine Frage");
        assert_eq!(second.max_tokens, 1000);
        // inspiring tone with creative style
        assert!(second.temperature > 0.9);
        // the second turn sees what the first one remembered
        assert!(second.system_prompt.contains("WICHTIGE KONTEXTINFORMATIONEN"));
    }

    #[tokio::test]
    async fn test_history_is_windowed() {
        let f = fixture(ScriptedLlm::replying("ok"));
        let chat = ChatUseCase::new(
            f.profiles.clone(),
            f.conversations.clone(),
            f.memory.clone(),
            f.llm.clone(),
        )
        .with_settings(ChatSettings {
            history_window: 4,
            ..Default::default()
        });
        let profile = f.profiles.create_from_template("u1", ProfileCategory::General).await.unwrap();

        let first = chat.send(&profile.id, "u1", "eins", None).await.unwrap();
        for text in ["zwei", "drei", "vier"] {
            chat.send(&profile.id, "u1", text, Some(&first.conversation_id)).await.unwrap();
        }
        let last = f.llm.requests().pop().unwrap();
        assert_eq!(last.messages.len(), 5);
        assert_eq!(last.messages[0].content, "zwei");
    }

    #[tokio::test]
    async fn test_invalid_messages_are_rejected() {
        let f = fixture(ScriptedLlm::replying("ok"));
        let profile = f.profiles.create_from_template("u1", ProfileCategory::General).await.unwrap();

        assert!(f.chat.send(&profile.id, "u1", "   ", None).await.unwrap_err().is_validation());
        let long = "a".repeat(4001);
        assert!(f.chat.send(&profile.id, "u1", &long, None).await.unwrap_err().is_validation());
        assert!(f.llm.requests().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_profile_and_conversation_are_not_found() {
        let f = fixture(ScriptedLlm::replying("ok"));
        let profile = f.profiles.create_from_template("u1", ProfileCategory::General).await.unwrap();
        let other = f.profiles.create_from_template("u1", ProfileCategory::Student).await.unwrap();

        assert!(f.chat.send(&profile.id, "u2", "Hallo", None).await.unwrap_err().is_not_found());

        let reply = f.chat.send(&profile.id, "u1", "Hallo", None).await.unwrap();
        let err = f
            .chat
            .send(&other.id, "u1", "Hallo", Some(&reply.conversation_id))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_new_memories_reach_the_prompt_of_the_same_turn() {
        let f = fixture(ScriptedLlm::replying("ok"));
        let profile = f.profiles.create_from_template("u1", ProfileCategory::Student).await.unwrap();

        f.chat
            .send(&profile.id, "u1", "Mathe bestanden!", None)
            .await
            .unwrap();
        let prompt = &f.llm.requests()[0].system_prompt;
        assert!(prompt.contains("- Erreichte Erfolge: Mathe bestanden!\n"));
    }

    #[tokio::test]
    async fn test_llm_failure_keeps_only_extracted_memories() {
        let f = fixture(ScriptedLlm::failing(LlmError::Unavailable("down".into())));
        let profile = f.profiles.create_from_template("u1", ProfileCategory::Developer).await.unwrap();

        let err = f
            .chat
            .send(&profile.id, "u1", "Ich möchte Rust lernen", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AllkiError::Llm(LlmError::Unavailable(_))));
        assert!(f.chat.conversations(&profile.id, "u1").await.unwrap().is_empty());
        assert_eq!(f.profiles.get(&profile.id, "u1").await.unwrap().usage.total_chats, 0);

        let context = f.memory.context(&profile.id).await.unwrap().unwrap();
        assert_eq!(context.conversation_count, 0);
        assert!(f.memory.get_memory(&profile.id, keys::GOALS).await.unwrap().is_some());
        assert!(f.memory.get_memory(&profile.id, keys::LAST_INTERACTION).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_conversation_records_nothing() {
        let f = fixture(ScriptedLlm::replying("ok"));
        let profile = f.profiles.create_from_template("u1", ProfileCategory::General).await.unwrap();

        let err = f
            .chat
            .send(&profile.id, "u1", "Ich möchte kochen lernen", Some("missing"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(f.memory.context(&profile.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_generated_title_falls_back_on_empty_reply() {
        let f = fixture(ScriptedLlm::replying("  "));
        let chat = ChatUseCase::new(
            f.profiles.clone(),
            f.conversations.clone(),
            f.memory.clone(),
            f.llm.clone(),
        )
        .with_settings(ChatSettings {
            generate_titles: true,
            ..Default::default()
        });
        let profile = f.profiles.create_from_template("u1", ProfileCategory::General).await.unwrap();

        let reply = chat.send(&profile.id, "u1", "Hallo", None).await.unwrap();
        let conversation = f.conversations.find_by_id(&reply.conversation_id).await.unwrap().unwrap();
        assert_eq!(conversation.title, FALLBACK_TITLE);

        let title_request = &f.llm.requests()[0];
        assert_eq!(title_request.temperature, TITLE_TEMPERATURE);
        assert_eq!(title_request.max_tokens, TITLE_MAX_TOKENS);
    }

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title(&"ä".repeat(80)).chars().count(), TITLE_CHARS);
        assert_eq!(truncate_title("  "), FALLBACK_TITLE);
    }
}
