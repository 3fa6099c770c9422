use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::memory::DEFAULT_MEMORY_FILE;
use crate::outputs::voice::DEFAULT_VOICE_COMMAND;
use crate::services::docs::auth::{DEFAULT_CREDENTIALS_FILE, DEFAULT_TOKEN_FILE};
use crate::services::{llm, stt};
use crate::session::SessionConfig;
use crate::vision::pipeline::DEFAULT_TESSERACT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputMode {
    /// Typed commands on stdin
    Keyboard,
    /// Spoken commands from the default microphone
    Microphone,
}

/// Voice-controlled desktop assistant
#[derive(Debug, Clone, Parser)]
#[command(name = "ds-assistant", version, about)]
pub struct Args {
    /// Where notes and the last screen text are kept between sessions
    #[arg(long, env = "DS_MEMORY_FILE", default_value = DEFAULT_MEMORY_FILE)]
    pub memory_file: PathBuf,

    #[arg(long, env = "DS_INPUT", value_enum, default_value_t = InputMode::Keyboard)]
    pub input: InputMode,

    /// Text-to-speech program invoked with the response as its argument; empty prints only
    #[arg(long, env = "DS_VOICE_COMMAND", default_value = DEFAULT_VOICE_COMMAND)]
    pub voice_command: String,

    #[arg(long, env = "DS_LLM_BASE_URL", default_value = llm::client::DEFAULT_BASE_URL)]
    pub llm_base_url: String,

    #[arg(long, env = "DS_LLM_MODEL", default_value = llm::client::DEFAULT_MODEL)]
    pub llm_model: String,

    #[arg(long, env = "DEEPSEEK_API_KEY", hide_env_values = true)]
    pub deepseek_api_key: Option<String>,

    #[arg(long, env = "DS_STT_BASE_URL", default_value = stt::DEFAULT_BASE_URL)]
    pub stt_base_url: String,

    #[arg(long, env = "DS_STT_MODEL", default_value = stt::DEFAULT_MODEL)]
    pub stt_model: String,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub stt_api_key: Option<String>,

    /// OAuth client secrets downloaded from the Google Cloud console
    #[arg(long, env = "DS_GOOGLE_CREDENTIALS", default_value = DEFAULT_CREDENTIALS_FILE)]
    pub google_credentials: PathBuf,

    /// Cached Google access/refresh token
    #[arg(long, env = "DS_GOOGLE_TOKEN", default_value = DEFAULT_TOKEN_FILE)]
    pub google_token: PathBuf,

    #[arg(long, env = "DS_TESSERACT", default_value = DEFAULT_TESSERACT)]
    pub tesseract: String,

    /// Upper bound on each call to an external service
    #[arg(long, env = "DS_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,

    /// Upper bound on document export, including first-time authorization
    #[arg(long, env = "DS_PUBLISH_TIMEOUT_SECS", default_value_t = 300)]
    pub publish_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct SttConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
}

/// Validated settings the binary wires the assistant from.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub memory_file: PathBuf,
    pub input: InputMode,
    /// `None` prints responses without speaking them.
    pub voice_command: Option<String>,
    pub llm: LlmConfig,
    /// Present only for microphone input.
    pub stt: Option<SttConfig>,
    pub google_credentials: PathBuf,
    pub google_token: PathBuf,
    pub tesseract: String,
    pub timeout: Duration,
    pub publish_timeout: Duration,
}

impl AssistantConfig {
    pub fn from_args(args: Args) -> Result<Self> {
        let api_key = args
            .deepseek_api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Config("DEEPSEEK_API_KEY environment variable is not set.".to_string()))?;

        let stt = match args.input {
            InputMode::Keyboard => None,
            InputMode::Microphone => {
                let key = args
                    .stt_api_key
                    .filter(|key| !key.trim().is_empty())
                    .ok_or_else(|| Error::Config("OPENAI_API_KEY is required for microphone input".to_string()))?;
                Some(SttConfig {
                    base_url: args.stt_base_url,
                    model: args.stt_model,
                    api_key: key,
                })
            }
        };

        if args.timeout_secs == 0 || args.publish_timeout_secs == 0 {
            return Err(Error::Config("timeouts must be at least one second".to_string()));
        }

        let voice_command = Some(args.voice_command.trim().to_string()).filter(|cmd| !cmd.is_empty());

        Ok(Self {
            memory_file: args.memory_file,
            input: args.input,
            voice_command,
            llm: LlmConfig {
                base_url: args.llm_base_url,
                model: args.llm_model,
                api_key,
            },
            stt,
            google_credentials: args.google_credentials,
            google_token: args.google_token,
            tesseract: args.tesseract,
            timeout: Duration::from_secs(args.timeout_secs),
            publish_timeout: Duration::from_secs(args.publish_timeout_secs),
        })
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            capability_timeout: self.timeout,
            publish_timeout: self.publish_timeout,
        }
    }
}
