//! Intake conversation settings

use serde::{Deserialize, Serialize};

/// Opening line spoken when a visitor arrives
pub const DEFAULT_GREETING: &str =
    "Welcome. Please tell me the apartment number you are visiting.";

/// System instructions handed to the conversational engine
pub const DEFAULT_INSTRUCTIONS: &str = "You are a doorman assistant. Your task is to ask visitors for:\n\
- Apartment number\n\
- Resident name\n\
- Visitor name\n\
- Reason for visit\n\
After collecting, confirm and send to the admin via email.";

/// Extra instruction appended when resident validation is enabled
const VALIDATION_INSTRUCTIONS: &str = "Once you have the apartment number and resident name, \
call check_resident before asking for the visitor's name. \
If the resident is not found, politely end the conversation.";

/// Intake conversation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Check residents against the directory before taking visitor details
    #[serde(default = "default_true")]
    pub validation_enabled: bool,

    /// Greeting spoken at session start
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Engine instructions
    #[serde(default = "default_instructions")]
    pub instructions: String,
}

fn default_true() -> bool {
    true
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

fn default_instructions() -> String {
    DEFAULT_INSTRUCTIONS.to_string()
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            validation_enabled: true,
            greeting: default_greeting(),
            instructions: default_instructions(),
        }
    }
}

impl IntakeConfig {
    /// Instructions for the engine, including the directory step when enabled
    pub fn effective_instructions(&self) -> String {
        if self.validation_enabled {
            format!("{}\n{}", self.instructions, VALIDATION_INSTRUCTIONS)
        } else {
            self.instructions.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_instructions() {
        let mut config = IntakeConfig::default();
        assert!(config.effective_instructions().contains("check_resident"));

        config.validation_enabled = false;
        assert_eq!(config.effective_instructions(), DEFAULT_INSTRUCTIONS);
    }
}
