//! Conversational tone: the closed set of framings given to the model.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// The tone the assistant answers in. Defaults to [`Tone::Friendly`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    #[default]
    Friendly,
    Formal,
    Professional,
    Casual,
    Empathetic,
    Humorous,
}

impl Tone {
    /// Every tone, in display order.
    pub const ALL: [Tone; 6] = [
        Tone::Friendly,
        Tone::Formal,
        Tone::Professional,
        Tone::Casual,
        Tone::Empathetic,
        Tone::Humorous,
    ];

    /// The instruction line placed at the top of every answer prompt.
    pub fn instruction(self) -> &'static str {
        match self {
            Tone::Friendly => "Answer in a warm, conversational, and helpful tone.",
            Tone::Formal => "Answer in a professional, concise, and respectful manner.",
            Tone::Professional => "Answer with clarity, expertise, and a business-oriented tone.",
            Tone::Casual => "Answer informally and naturally, using relaxed language.",
            Tone::Empathetic => "Answer with compassion and understanding, acknowledging emotions.",
            Tone::Humorous => {
                "Answer with light humor and wit, while staying accurate and respectful."
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tone::Friendly => "Friendly",
            Tone::Formal => "Formal",
            Tone::Professional => "Professional",
            Tone::Casual => "Casual",
            Tone::Empathetic => "Empathetic",
            Tone::Humorous => "Humorous",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Case-insensitive; anything outside the six names is a configuration error.
impl FromStr for Tone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Tone::ALL
            .into_iter()
            .find(|tone| tone.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::Config {
                message: format!(
                    "Unknown tone '{wanted}' (expected one of: {})",
                    Tone::ALL.map(Tone::name).join(", ")
                ),
            })
    }
}
