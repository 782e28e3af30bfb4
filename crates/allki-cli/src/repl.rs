//! rustyline helper shared by the interactive commands.

use std::borrow::Cow::{self, Borrowed, Owned};

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

/// Completes, hints and highlights `/commands`.
#[derive(Clone)]
pub struct SlashHelper {
    commands: Vec<&'static str>,
}

impl SlashHelper {
    pub fn new(commands: &[&'static str]) -> Self {
        Self {
            commands: commands.to_vec(),
        }
    }
}

impl Helper for SlashHelper {}

impl Completer for SlashHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }
        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for SlashHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for SlashHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for SlashHelper {}

pub fn editor(commands: &[&'static str]) -> Result<Editor<SlashHelper, DefaultHistory>> {
    let mut rl: Editor<SlashHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(SlashHelper::new(commands)));
    Ok(rl)
}

/// What the user typed at a prompt.
pub enum Input {
    Line(String),
    Quit,
}

/// Reads one non-empty line. Ctrl-C asks again, Ctrl-D quits.
pub fn read_line(rl: &mut Editor<SlashHelper, DefaultHistory>, prompt: &str) -> Result<Input> {
    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == "/quit" || trimmed == "quit" || trimmed == "exit" {
                    return Ok(Input::Quit);
                }
                let _ = rl.add_history_entry(trimmed);
                return Ok(Input::Line(trimmed.to_string()));
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => return Ok(Input::Quit),
            Err(err) => return Err(err.into()),
        }
    }
}
