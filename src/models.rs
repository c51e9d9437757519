//! Hosted vision models reachable through the inference endpoint.
//!
//! Every model is prompted the same way; only the identifier sent in the
//! request body differs. [`VisionModel`] therefore replaces a family of
//! near-identical "prompt model X" functions with one value passed to
//! [`crate::vision::VisionClient::prompt`].

use crate::error::SlideError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A vision-capable model served by the inference endpoint.
///
/// | Variant | Identifier | Alias |
/// |---------|------------|-------|
/// | `Gpt4o` | `gpt-4o` | `chatgpt` |
/// | `Gpt4oMini` | `gpt-4o-mini` | `gpt-mini` |
/// | `Llama32Vision11b` | `Llama-3.2-11B-Vision-Instruct` | `llama-11b` |
/// | `Llama32Vision90b` | `Llama-3.2-90B-Vision-Instruct` | `llama-90b` |
/// | `Phi35Vision` | `Phi-3.5-vision-instruct` | `phi` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VisionModel {
    #[default]
    Gpt4o,
    Gpt4oMini,
    Llama32Vision11b,
    Llama32Vision90b,
    Phi35Vision,
}

impl VisionModel {
    /// All supported models, in the order they are listed by the CLI.
    pub const ALL: [VisionModel; 5] = [
        VisionModel::Gpt4o,
        VisionModel::Llama32Vision11b,
        VisionModel::Phi35Vision,
        VisionModel::Llama32Vision90b,
        VisionModel::Gpt4oMini,
    ];

    /// The identifier sent as `model` in the request body.
    pub fn id(&self) -> &'static str {
        match self {
            VisionModel::Gpt4o => "gpt-4o",
            VisionModel::Gpt4oMini => "gpt-4o-mini",
            VisionModel::Llama32Vision11b => "Llama-3.2-11B-Vision-Instruct",
            VisionModel::Llama32Vision90b => "Llama-3.2-90B-Vision-Instruct",
            VisionModel::Phi35Vision => "Phi-3.5-vision-instruct",
        }
    }

    /// Short name accepted on the command line.
    pub fn alias(&self) -> &'static str {
        match self {
            VisionModel::Gpt4o => "chatgpt",
            VisionModel::Gpt4oMini => "gpt-mini",
            VisionModel::Llama32Vision11b => "llama-11b",
            VisionModel::Llama32Vision90b => "llama-90b",
            VisionModel::Phi35Vision => "phi",
        }
    }
}

impl fmt::Display for VisionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for VisionModel {
    type Err = SlideError;

    /// Accepts the exact identifier (case-insensitive) or the short alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        VisionModel::ALL
            .into_iter()
            .find(|m| m.id().eq_ignore_ascii_case(wanted) || m.alias().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let known: Vec<&str> = VisionModel::ALL.iter().map(|m| m.id()).collect();
                SlideError::InvalidConfig(format!(
                    "unknown model '{}', expected one of: {}",
                    wanted,
                    known.join(", ")
                ))
            })
    }
}

impl TryFrom<String> for VisionModel {
    type Error = SlideError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VisionModel> for String {
    fn from(model: VisionModel) -> Self {
        model.id().to_string()
    }
}
