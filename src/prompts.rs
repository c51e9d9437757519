//! System instruction sent ahead of every image prompt.
//!
//! Callers can override it via [`crate::config::VisionConfig::system_prompt`];
//! the constant here is used only when no override is provided.

/// Default system message for every model.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a professional Data Scientist specializing in Image Data Analysis and Research Data Management.";
