use colored::Colorize;

use allki_core::analyzer::analyze;
use allki_core::analyzer::extract::{extract_expertise, extract_goals, extract_preferences};

pub fn run(message: &str) {
    let candidates = analyze(message);
    if candidates.is_empty() {
        println!("{}", "No memory candidates.".bright_black());
    }
    for candidate in &candidates {
        println!(
            "{} {}  {}",
            candidate.key().bold(),
            format!("({:.1})", candidate.confidence).bright_black(),
            candidate.value
        );
    }

    let goals = extract_goals(message);
    if !goals.is_empty() {
        println!("{} {}", "goals:".bright_magenta(), goals.join(", "));
    }
    let preferences = extract_preferences(message);
    if !preferences.is_empty() {
        println!("{} {}", "preferences:".bright_magenta(), preferences.to_value());
    }
    let expertise = extract_expertise(message);
    if !expertise.is_empty() {
        println!("{} {}", "expertise:".bright_magenta(), expertise.join(", "));
    }
}
