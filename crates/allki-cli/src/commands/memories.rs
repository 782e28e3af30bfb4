use anyhow::Result;
use colored::Colorize;

use crate::app::App;

pub async fn list(app: &App, profile_id: &str) -> Result<()> {
    // ownership check only; memories are keyed by profile id
    app.profiles.get(profile_id, &app.user).await?;

    let memories = app.memory.get_memories(profile_id).await?;
    if memories.is_empty() {
        println!("{}", "Nothing remembered yet.".bright_black());
        return Ok(());
    }
    for memory in &memories {
        println!(
            "{} {}  {}",
            memory.key.bold(),
            format!("({:.1})", memory.confidence).bright_black(),
            memory.display_values().join(", ")
        );
        println!(
            "   {}",
            format!("{} · {:?} · {}", memory.id, memory.source, memory.updated_at.format("%Y-%m-%d %H:%M"))
                .bright_black()
        );
    }

    if let Some(context) = app.memory.context(profile_id).await? {
        println!();
        println!(
            "{}",
            format!(
                "{} memories, {} conversations, {} interactions",
                context.memories.len(),
                context.conversation_count,
                context.total_interactions
            )
            .bright_black()
        );
    }
    Ok(())
}

pub async fn summary(app: &App, profile_id: &str) -> Result<()> {
    app.profiles.get(profile_id, &app.user).await?;
    let summary = app.memory.context_summary(profile_id).await?;
    if summary.is_empty() {
        println!("{}", "Nothing relevant remembered yet.".bright_black());
    } else {
        println!("{summary}");
    }
    Ok(())
}

pub async fn remove(app: &App, profile_id: &str, memory_id: &str) -> Result<()> {
    app.profiles.get(profile_id, &app.user).await?;
    app.memory.remove_memory(profile_id, memory_id).await?;
    println!("{}", "Memory removed".green());
    Ok(())
}

pub async fn clear(app: &App, profile_id: &str) -> Result<()> {
    app.profiles.get(profile_id, &app.user).await?;
    app.memory.clear_context(profile_id).await?;
    println!("{}", "Context cleared".green());
    Ok(())
}

pub async fn contexts(app: &App) -> Result<()> {
    let ids = app.memory.profile_ids().await?;
    if ids.is_empty() {
        println!("{}", "No contexts recorded.".bright_black());
        return Ok(());
    }
    for id in ids {
        let Some(context) = app.memory.context(&id).await? else {
            continue;
        };
        let label = if id.starts_with("interview-") {
            "interview".yellow()
        } else {
            "profile".normal()
        };
        println!(
            "{}  {}  {}",
            id.bold(),
            label,
            format!(
                "{} memories, last update {}",
                context.memories.len(),
                context.last_updated.format("%Y-%m-%d %H:%M")
            )
            .bright_black()
        );
    }
    Ok(())
}
