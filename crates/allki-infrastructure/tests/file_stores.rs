use std::sync::Arc;

use allki_core::conversation::{Conversation, ConversationRepository};
use allki_core::memory::{ContextMemoryService, ContextStore, MemorySource, keys};
use allki_core::profile::{ProfileCategory, ProfileRepository, Tone, template_for};
use allki_infrastructure::{
    AllkiPaths, FileContextStore, JsonConversationRepository, TomlProfileRepository,
};
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn test_profile_repository_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let paths = AllkiPaths::with_base(temp_dir.path());
    let repo = TomlProfileRepository::from_paths(&paths);

    let developer = template_for(ProfileCategory::Developer).into_profile("user-1");
    let mut coach = template_for(ProfileCategory::Personal).into_profile("user-1");
    let other = template_for(ProfileCategory::General).into_profile("user-2");
    repo.save(&developer).await.unwrap();
    repo.save(&coach).await.unwrap();
    repo.save(&other).await.unwrap();

    let loaded = repo.find_by_id(&developer.id).await.unwrap().unwrap();
    assert_eq!(loaded, developer);

    coach.personality.tone = Some(Tone::Unspecified);
    coach.deactivate();
    repo.save(&coach).await.unwrap();

    let listed = repo.list_by_user("user-1").await.unwrap();
    assert_eq!(listed.len(), 2);
    let reloaded = listed.iter().find(|p| p.id == coach.id).unwrap();
    assert!(!reloaded.is_active);
    assert_eq!(reloaded.personality.tone, Some(Tone::Unspecified));

    assert!(repo.find_by_id("missing").await.unwrap().is_none());
    assert!(paths.profiles_file().exists());
}

#[tokio::test]
async fn test_context_store_persists_arbitrary_values() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileContextStore::from_paths(&AllkiPaths::with_base(temp_dir.path())));
    let service = ContextMemoryService::new(store.clone());

    service
        .add_memory(
            "interview-1700000000000",
            keys::PREFERENCES,
            json!({"responseLength": "short", "note": null}),
            MemorySource::Chat,
            Some(0.6),
        )
        .await
        .unwrap();
    service
        .add_memory(
            "interview-1700000000000",
            keys::GOALS,
            json!(["Marathon", 42]),
            MemorySource::Interview,
            Some(0.9),
        )
        .await
        .unwrap();

    // A fresh service over the same directory sees the same data.
    let reopened = ContextMemoryService::new(Arc::new(FileContextStore::new(store.dir())));
    let memories = reopened.get_memories("interview-1700000000000").await.unwrap();
    assert_eq!(memories.len(), 2);
    assert_eq!(memories[1].value, json!(["Marathon", 42]));

    assert_eq!(
        store.profile_ids().await.unwrap(),
        vec!["interview-1700000000000".to_string()]
    );

    reopened.clear_context("interview-1700000000000").await.unwrap();
    assert!(store.load("interview-1700000000000").await.unwrap().is_none());
}

#[tokio::test]
async fn test_transfer_between_file_contexts() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileContextStore::new(temp_dir.path().join("contexts")));
    let service = ContextMemoryService::new(store);

    for (key, value) in [("profile_name", "Lauf-Coach"), ("category", "personal"), ("goals", "Marathon")] {
        service
            .add_memory("interview-1", key, json!(value), MemorySource::UserInput, Some(0.9))
            .await
            .unwrap();
    }

    let copied = service
        .transfer_memories_to_profile("interview-1", "profile-1")
        .await
        .unwrap();
    assert_eq!(copied, 3);
    assert_eq!(service.get_memories("profile-1").await.unwrap().len(), 3);
    assert_eq!(service.get_memories("interview-1").await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_conversation_repository_lists_newest_first() {
    let temp_dir = TempDir::new().unwrap();
    let repo = JsonConversationRepository::new(temp_dir.path().join("conversations"));
    assert!(repo.list_for_profile("u1", "p1").await.unwrap().is_empty());

    let mut older = Conversation::new("u1", "p1", "Erste", "gpt-4");
    older.push_user_message("Hallo");
    repo.save(&older).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let mut newer = Conversation::new("u1", "p1", "Zweite", "gpt-4");
    newer.push_user_message("Noch einmal");
    repo.save(&newer).await.unwrap();

    repo.save(&Conversation::new("u1", "p2", "Andere", "gpt-4"))
        .await
        .unwrap();

    let listed = repo.list_for_profile("u1", "p1").await.unwrap();
    let titles: Vec<_> = listed.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Zweite", "Erste"]);

    let found = repo.find_by_id(&older.id).await.unwrap().unwrap();
    assert_eq!(found.messages.len(), 1);
}

#[tokio::test]
async fn test_similar_profile_ids_keep_separate_contexts() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileContextStore::new(temp_dir.path().join("contexts")));
    let service = ContextMemoryService::new(store.clone());

    service
        .add_memory("team.alpha", keys::GOALS, json!("secret of alpha"), MemorySource::Chat, Some(0.9))
        .await
        .unwrap();
    assert!(service.get_memories("team_alpha").await.unwrap().is_empty());
    assert!(store.load("team_alpha").await.unwrap().is_none());

    service
        .add_memory("team_alpha", keys::GOALS, json!("beta"), MemorySource::Chat, Some(0.95))
        .await
        .unwrap();

    let alpha = service.get_memories("team.alpha").await.unwrap();
    assert_eq!(alpha.len(), 1);
    assert_eq!(alpha[0].value, json!("secret of alpha"));
    let beta = service.get_memories("team_alpha").await.unwrap();
    assert_eq!(beta.len(), 1);
    assert_eq!(beta[0].value, json!("beta"));

    assert_eq!(
        store.profile_ids().await.unwrap(),
        vec!["team.alpha".to_string(), "team_alpha".to_string()]
    );
}
