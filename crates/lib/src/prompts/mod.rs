//! # Prompt Templates
//!
//! The system prompts and user-prompt builders sent to the backend. One
//! template pair per reply-schema variant; the wording follows the original
//! Russian-language investigator persona.

pub mod plan;

pub use plan::{build_user_prompt, system_prompt};
