//! Prompt construction and sampling temperature.
//!
//! Both are pure functions of a profile (plus its memories for the prompt).
//! All German fragments live in [`tables`].

mod builder;
pub mod tables;
mod temperature;

pub use builder::build_system_prompt;
pub use temperature::{MAX_TEMPERATURE, MIN_TEMPERATURE, temperature_for};
