use crate::client::relay::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, RelaySettings, SYSTEM_PROMPT};

use clap::Parser;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.anthropic.com/v1";
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

#[derive(Debug, Parser)]
#[command(name = "datechat", version, about = "Chat with a model that can do date arithmetic")]
pub struct Args {
    /// API credential for the chat endpoint
    #[arg(long, env = API_KEY_VAR, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the chat-completions endpoint
    #[arg(long, env = "DATECHAT_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    #[arg(long, env = "DATECHAT_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Maximum tokens in each reply
    #[arg(long, env = "DATECHAT_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Do not resend tool descriptors with the follow-up request
    #[arg(long)]
    pub omit_followup_tools: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("ANTHROPIC_API_KEY not found. Set it in the environment or in a .env file.")]
    MissingApiKey,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub relay: RelaySettings,
}

impl TryFrom<Args> for Config {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let api_key = args
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        Ok(Self {
            api_key,
            api_base: args.api_base,
            relay: RelaySettings {
                model: args.model,
                max_tokens: args.max_tokens,
                system_prompt: SYSTEM_PROMPT.to_string(),
                followup_tools: !args.omit_followup_tools,
            },
        })
    }
}
