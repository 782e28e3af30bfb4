use anyhow::{Context, Result};
use colored::Colorize;

use allki_core::profile::{self, Profile, ProfileCategory};
use allki_core::prompt::{build_system_prompt, temperature_for};

use crate::app::App;

fn print_profile_line(profile: &Profile) {
    println!(
        "{} {}  {}",
        profile.avatar,
        profile.name.bold(),
        format!("[{}]", profile.category).bright_black()
    );
    println!("   {}", profile.id.bright_black());
    println!(
        "   {} chats, {} tokens",
        profile.usage.total_chats, profile.usage.total_tokens
    );
}

pub async fn list(app: &App) -> Result<()> {
    let profiles = app.profiles.list_active(&app.user).await?;
    if profiles.is_empty() {
        println!("{}", "No profiles yet. Try `allki profiles create developer` or `allki interview`.".bright_black());
        return Ok(());
    }
    for profile in &profiles {
        print_profile_line(profile);
    }
    Ok(())
}

pub fn templates() {
    for template in profile::templates() {
        println!(
            "{} {}  {}",
            template.avatar.as_deref().unwrap_or_default(),
            template.name.bold(),
            format!("[{}]", template.category).bright_black()
        );
        println!("   {}", template.description);
    }
}

pub async fn create(app: &App, category: &str) -> Result<()> {
    let category: ProfileCategory = category
        .parse()
        .with_context(|| format!("Unknown category '{category}'"))?;
    let profile = app.profiles.create_from_template(&app.user, category).await?;
    println!("{}", "Profile created".green());
    print_profile_line(&profile);
    Ok(())
}

pub async fn show(app: &App, id: &str) -> Result<()> {
    let profile = app.profiles.get(id, &app.user).await?;
    let memories = app.memory.get_memories(id).await?;

    print_profile_line(&profile);
    println!("   {}", profile.description);
    if !profile.personality.expertise.is_empty() {
        println!("   Expertise: {}", profile.personality.expertise.join(", "));
    }
    if !profile.personality.interests.is_empty() {
        println!("   Interests: {}", profile.personality.interests.join(", "));
    }
    println!("   Temperature: {:.1}", temperature_for(&profile));
    println!();
    println!("{}", "System prompt:".bright_magenta());
    println!("{}", build_system_prompt(&profile, &memories));
    Ok(())
}

pub async fn delete(app: &App, id: &str) -> Result<()> {
    app.profiles.delete(id, &app.user).await?;
    println!("{}", format!("Profile {id} deactivated").green());
    Ok(())
}
