use anyhow::Result;
use colored::Colorize;

use allki_core::AllkiError;
use allki_core::conversation::ConversationRepository;

use crate::app::App;
use crate::repl::{self, Input};

const COMMANDS: &[&str] = &["/memories", "/summary", "/new", "/quit"];

pub async fn run(app: &App, profile_id: &str, conversation: Option<String>) -> Result<()> {
    let profile = app.profiles.get(profile_id, &app.user).await?;
    let chat = app.chat()?;
    let mut rl = repl::editor(COMMANDS)?;
    let mut conversation_id = conversation;

    println!("{}", format!("=== {} {} ===", profile.avatar, profile.name).bright_magenta().bold());
    println!(
        "{}",
        "Type a message, /memories, /summary, /new for a fresh conversation, or /quit.".bright_black()
    );
    println!();

    let prompt = format!("{} > ", profile.name);
    loop {
        let line = match repl::read_line(&mut rl, &prompt)? {
            Input::Quit => break,
            Input::Line(line) => line,
        };

        match line.as_str() {
            "/memories" => {
                super::memories::list(app, profile_id).await?;
                continue;
            }
            "/summary" => {
                super::memories::summary(app, profile_id).await?;
                continue;
            }
            "/new" => {
                conversation_id = None;
                println!("{}", "Starting a new conversation.".bright_black());
                continue;
            }
            _ => {}
        }

        match chat
            .send(profile_id, &app.user, &line, conversation_id.as_deref())
            .await
        {
            Ok(reply) => {
                for text in reply.reply.lines() {
                    println!("{}", text.bright_blue());
                }
                let mut footer = format!("{} tokens", reply.tokens);
                if reply.learned {
                    footer.push_str(" · noted something about you");
                }
                println!("{}", footer.bright_black());
                println!();
                conversation_id = Some(reply.conversation_id);
            }
            Err(AllkiError::Llm(err)) if err.is_transient() => {
                eprintln!("{}", format!("{err}. Try again in a moment.").yellow());
            }
            Err(err) => eprintln!("{}", format!("Error: {err}").red()),
        }
    }

    println!("{}", "Goodbye!".bright_green());
    Ok(())
}

pub async fn list_conversations(app: &App, profile_id: &str) -> Result<()> {
    app.profiles.get(profile_id, &app.user).await?;
    let conversations = app
        .conversations
        .list_for_profile(&app.user, profile_id)
        .await?;
    if conversations.is_empty() {
        println!("{}", "No conversations yet.".bright_black());
        return Ok(());
    }
    for conversation in &conversations {
        println!(
            "{}  {}",
            conversation.title.bold(),
            format!(
                "{} messages · {} tokens · {}",
                conversation.messages.len(),
                conversation.metadata.total_tokens,
                conversation.updated_at.format("%Y-%m-%d %H:%M")
            )
            .bright_black()
        );
        println!("   {}", conversation.id.bright_black());
    }
    Ok(())
}
