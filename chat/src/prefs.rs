//! Tier, persona, and model selection.
//!
//! DESIGN
//! ======
//! Each tier offers its own model list. The selected model is kept as the
//! backend identifier string because the backend treats it as opaque; the
//! tier only decides which identifiers are valid choices.

#[cfg(test)]
#[path = "prefs_test.rs"]
mod prefs_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const FREE_MODELS: [&str; 2] = ["Chat", "Image"];

const PRO_MODELS: [&str; 7] = [
    "nvidia/llama3-chatqa-1.5-70b",
    "speakleash/bielik-11b-v2.6-instruct",
    "speakleash/bielik-11b-v2.3-instruct",
    "thudm/chatglm3-6b",
    "meta/llama-3.1-405b-instruct",
    "nvidia/llama3-chatqa-1.5-8b",
    "mediatek/breeze-7b-instruct",
];

/// A user-supplied selection that matches nothing on offer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
}

// =============================================================================
// TIER
// =============================================================================

/// Product tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    #[default]
    Free,
    Pro,
}

impl Tier {
    /// Wire value sent as `version` on queries.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Pro => "Pro",
        }
    }

    /// Models selectable on this tier, default first.
    #[must_use]
    pub fn models(self) -> &'static [&'static str] {
        match self {
            Self::Free => &FREE_MODELS,
            Self::Pro => &PRO_MODELS,
        }
    }

    #[must_use]
    pub fn default_model(self) -> &'static str {
        self.models()[0]
    }

    /// Whether file upload is offered.
    #[must_use]
    pub fn can_upload(self) -> bool {
        matches!(self, Self::Pro)
    }

    /// Whether the query carries the selected model.
    #[must_use]
    pub fn sends_model(self) -> bool {
        matches!(self, Self::Pro)
    }

    /// Resolve user input to one of this tier's models.
    ///
    /// Matches the full identifier or the part after the vendor prefix,
    /// ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownChoice`] when nothing matches.
    pub fn resolve_model(self, input: &str) -> Result<&'static str, UnknownChoice> {
        let wanted = input.trim();
        self.models()
            .iter()
            .copied()
            .find(|m| {
                m.eq_ignore_ascii_case(wanted)
                    || m.rsplit_once('/').is_some_and(|(_, short)| short.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| UnknownChoice { kind: "model", value: wanted.to_owned() })
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            other => Err(UnknownChoice { kind: "tier", value: other.to_owned() }),
        }
    }
}

// =============================================================================
// PERSONA
// =============================================================================

/// Assistant persona offered on the Free tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Persona {
    #[default]
    Tutor,
    Dev,
    Friendly,
    Concise,
    Pro,
}

impl Persona {
    pub const ALL: [Persona; 5] = [Self::Tutor, Self::Dev, Self::Friendly, Self::Concise, Self::Pro];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tutor => "Tutor",
            Self::Dev => "Dev",
            Self::Friendly => "Friendly",
            Self::Concise => "Concise",
            Self::Pro => "Pro",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Persona {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownChoice { kind: "persona", value: wanted.to_owned() })
    }
}

// =============================================================================
// PREFERENCES
// =============================================================================

/// Per-namespace UI preferences.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub tier: Tier,
    #[serde(default)]
    pub persona: Persona,
    #[serde(default = "default_free_model")]
    pub model: String,
    #[serde(default)]
    pub agent_mode: bool,
}

fn default_free_model() -> String {
    Tier::Free.default_model().to_owned()
}

impl Default for Preferences {
    fn default() -> Self {
        Self { tier: Tier::Free, persona: Persona::default(), model: default_free_model(), agent_mode: false }
    }
}

impl Preferences {
    /// Switch tier, falling back to the new tier's default model when the
    /// current one is not offered there.
    pub fn set_tier(&mut self, tier: Tier) {
        self.tier = tier;
        if !tier.models().contains(&self.model.as_str()) {
            self.model = tier.default_model().to_owned();
        }
    }

    /// Select a model offered by the current tier.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownChoice`] if the current tier does not offer `input`.
    pub fn set_model(&mut self, input: &str) -> Result<(), UnknownChoice> {
        self.model = self.tier.resolve_model(input)?.to_owned();
        Ok(())
    }

    /// Repair a loaded record whose model does not belong to its tier.
    pub(crate) fn normalize(&mut self) {
        self.set_tier(self.tier);
    }
}
