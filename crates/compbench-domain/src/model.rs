//! Model backend identifiers

use serde::{Deserialize, Serialize};

/// Supported model backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelType {
    /// Anthropic Claude Sonnet
    ClaudeSonnet,

    /// Anthropic Claude Haiku
    ClaudeHaiku,

    /// OpenAI GPT-4
    #[serde(rename = "gpt-4")]
    Gpt4,
}

/// Backend family, which decides request shape and credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    /// Anthropic Messages API
    Claude,

    /// OpenAI Chat Completions API
    Gpt,
}

impl ModelType {
    /// All backends in their default comparison order
    pub const ALL: [ModelType; 3] = [ModelType::ClaudeSonnet, ModelType::ClaudeHaiku, ModelType::Gpt4];

    /// Identifier as accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::ClaudeSonnet => "claude-sonnet",
            ModelType::ClaudeHaiku => "claude-haiku",
            ModelType::Gpt4 => "gpt-4",
        }
    }

    /// Backend family of this model
    pub fn family(&self) -> ModelFamily {
        match self {
            ModelType::ClaudeSonnet | ModelType::ClaudeHaiku => ModelFamily::Claude,
            ModelType::Gpt4 => ModelFamily::Gpt,
        }
    }

    /// Parse a model identifier (internal use)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "claude-sonnet" => Some(ModelType::ClaudeSonnet),
            "claude-haiku" => Some(ModelType::ClaudeHaiku),
            "gpt-4" => Some(ModelType::Gpt4),
            _ => None,
        }
    }

    /// Parse a comma-separated list such as `"claude-haiku,gpt-4"`, preserving order
    pub fn parse_list(s: &str) -> Result<Vec<Self>, String> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!("Invalid model: {}. Use: claude-sonnet, claude-haiku, gpt-4", s)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_parsing() {
        assert_eq!("claude-sonnet".parse::<ModelType>(), Ok(ModelType::ClaudeSonnet));
        assert_eq!("Claude-Haiku".parse::<ModelType>(), Ok(ModelType::ClaudeHaiku));
        assert_eq!("gpt-4".parse::<ModelType>(), Ok(ModelType::Gpt4));
        assert!("llama".parse::<ModelType>().is_err());
    }

    #[test]
    fn test_model_family() {
        assert_eq!(ModelType::ClaudeSonnet.family(), ModelFamily::Claude);
        assert_eq!(ModelType::ClaudeHaiku.family(), ModelFamily::Claude);
        assert_eq!(ModelType::Gpt4.family(), ModelFamily::Gpt);
    }

    #[test]
    fn test_serde_names_match_cli_names() {
        for model in ModelType::ALL {
            let json = serde_json::to_string(&model).unwrap();
            assert_eq!(json, format!("\"{}\"", model.as_str()));
        }
    }

    #[test]
    fn test_parse_list() {
        let models = ModelType::parse_list("gpt-4, claude-haiku").unwrap();
        assert_eq!(models, vec![ModelType::Gpt4, ModelType::ClaudeHaiku]);
        assert!(ModelType::parse_list("gpt-4,bard").is_err());
    }
}
