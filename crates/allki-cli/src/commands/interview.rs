use anyhow::Result;
use colored::Colorize;

use crate::app::App;
use crate::repl::{self, Input};

const COMMANDS: &[&str] = &["/create", "/quit"];

pub async fn run(app: &App) -> Result<()> {
    let interview = app.interview();
    let mut session = interview.start();
    let mut rl = repl::editor(COMMANDS)?;

    println!("{}", "=== Neuer Assistent ===".bright_magenta().bold());
    println!(
        "{}",
        "Answer the questions. /create finishes early once possible, /quit aborts.".bright_black()
    );
    println!();
    println!("{}", session.current_question().bright_blue());

    loop {
        let prompt = format!("[{}/6] > ", session.question_number());
        let line = match repl::read_line(&mut rl, &prompt)? {
            Input::Quit => {
                println!("{}", "Interview aborted.".yellow());
                return Ok(());
            }
            Input::Line(line) => line,
        };

        if line == "/create" {
            if session.can_create_profile() {
                break;
            }
            println!("{}", "Name, Bereich und Stil werden mindestens gebraucht.".yellow());
            continue;
        }

        let turn = interview.answer(&mut session, &line).await?;
        println!("{}", format!("{}%", turn.progress).bright_black());

        if let Some(summary) = turn.summary {
            println!();
            for text in summary.lines() {
                println!("{}", text.bright_blue());
            }
            break;
        }
        if let Some(question) = turn.next_question {
            if turn.can_create_profile {
                println!("{}", "(/create erstellt den Assistenten schon jetzt)".bright_black());
            }
            println!("{}", question.bright_blue());
        }
    }

    if session.is_complete() {
        let confirmed = match repl::read_line(&mut rl, "(j/n) > ")? {
            Input::Line(answer) => matches!(answer.to_lowercase().as_str(), "j" | "ja" | "y" | "yes"),
            Input::Quit => false,
        };
        if !confirmed {
            println!("{}", "Interview aborted.".yellow());
            return Ok(());
        }
    }

    let done = interview.complete(&session, &app.user).await?;
    println!();
    println!(
        "{}",
        format!("{} {} wurde erstellt", done.profile.avatar, done.profile.name).green()
    );
    println!("   {}", done.profile.id.bright_black());
    println!(
        "{}",
        format!("{} Erinnerungen aus dem Interview übernommen", done.transferred).bright_black()
    );
    Ok(())
}
