//! API Module
//!
//! Structure:
//! - commands.rs: command handlers over the loaded pipeline
//! - prompt.rs: interactive questionnaire input
//! - render.rs: terminal output

pub mod commands;
pub mod prompt;
pub mod render;
