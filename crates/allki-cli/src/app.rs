//! Wiring: configuration, file-backed stores and the services on top.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use allki_application::{ChatSettings, ChatUseCase, InterviewService, ProfileService};
use allki_core::config::AppConfig;
use allki_core::memory::ContextMemoryService;
use allki_infrastructure::config_loader::apply_env_fallbacks;
use allki_infrastructure::{
    AllkiPaths, FileContextStore, JsonConversationRepository, TomlProfileRepository, load_config,
};
use allki_interaction::OpenAiChatClient;

/// Resolves the config and the directory layout from the global flags.
///
/// With `--home`, a `config/config.toml` below it is picked up if present.
pub fn resolve(config_path: Option<&Path>, home: Option<&Path>) -> Result<(AppConfig, AllkiPaths)> {
    let paths = match home {
        Some(home) => AllkiPaths::with_base(home),
        None => AllkiPaths::default_location()?,
    };

    let config = match (config_path, home) {
        (Some(path), _) => load_config(Some(path))?,
        (None, Some(_)) if paths.config_file().exists() => load_config(Some(&paths.config_file()))?,
        (None, Some(_)) => {
            let mut config = AppConfig::default();
            apply_env_fallbacks(&mut config, |key| std::env::var(key).ok());
            config
        }
        (None, None) => load_config(None)?,
    };
    Ok((config, paths))
}

pub struct App {
    pub config: AppConfig,
    pub paths: AllkiPaths,
    pub user: String,
    pub profiles: Arc<ProfileService>,
    pub memory: Arc<ContextMemoryService>,
    pub conversations: Arc<JsonConversationRepository>,
}

impl App {
    pub fn new(config: AppConfig, paths: AllkiPaths, user: String) -> Self {
        let memory = ContextMemoryService::new(Arc::new(FileContextStore::from_paths(&paths)))
            .with_max_memories(config.memory.max_memories_per_profile);
        let profiles = ProfileService::new(Arc::new(TomlProfileRepository::from_paths(&paths)))
            .with_max_profiles_per_user(config.limits.max_profiles_per_user);
        let conversations = Arc::new(JsonConversationRepository::from_paths(&paths));

        Self {
            config,
            paths,
            user,
            profiles: Arc::new(profiles),
            memory: Arc::new(memory),
            conversations,
        }
    }

    /// Chat use case backed by the OpenAI client. Fails without an API key.
    pub fn chat(&self) -> Result<ChatUseCase> {
        let client = OpenAiChatClient::from_settings(&self.config.llm)?;
        Ok(ChatUseCase::new(
            self.profiles.clone(),
            self.conversations.clone(),
            self.memory.clone(),
            Arc::new(client),
        )
        .with_settings(ChatSettings::from_config(&self.config)))
    }

    pub fn interview(&self) -> InterviewService {
        InterviewService::new(self.profiles.clone(), self.memory.clone())
    }
}
