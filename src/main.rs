use anyhow::Context;
use clap::Parser;
use ds_assistant::config::{Args, AssistantConfig, InputMode};
use ds_assistant::inputs::{KeyboardTranscriber, MicrophoneTranscriber};
use ds_assistant::memory::FileMemoryStore;
use ds_assistant::outputs::{TextSpeaker, VoiceSpeaker};
use ds_assistant::services::docs::{GoogleAuthorizer, GoogleDocsPublisher};
use ds_assistant::services::stt::SpeechToText;
use ds_assistant::services::{Capabilities, LanguageModel, Speaker, Transcriber};
use ds_assistant::services::llm::LLMService;
use ds_assistant::session::{Session, SessionEnd};
use ds_assistant::vision::ScreenReader;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the dialogue.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    let config = AssistantConfig::from_args(Args::parse())?;
    tracing::info!("DS Assistant booting ({:?} input)", config.input);

    let caps = build_capabilities(&config)?;
    let store = Box::new(FileMemoryStore::new(&config.memory_file));
    let mut session = Session::start(caps, store, config.session())
        .with_context(|| format!("loading memory from {}", config.memory_file.display()))?;

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => trigger.cancel(),
            Err(e) => tracing::error!("Failed to listen for Ctrl+C: {}", e),
        }
    });

    tracing::info!("Press Ctrl+C to stop.");
    match session.run(shutdown).await {
        SessionEnd::Interrupted => println!("\nVoice-controlled DS stopped by user."),
        SessionEnd::InputClosed => println!("Voice-controlled DS stopped: input closed."),
    }

    Ok(())
}

fn build_capabilities(config: &AssistantConfig) -> anyhow::Result<Capabilities> {
    let llm: Box<dyn LanguageModel> = Box::new(LLMService::new(
        &config.llm.base_url,
        &config.llm.api_key,
        &config.llm.model,
        config.timeout,
    )?);

    let transcriber: Box<dyn Transcriber> = match (config.input, &config.stt) {
        (InputMode::Microphone, Some(stt)) => {
            let client = SpeechToText::new(&stt.base_url, &stt.api_key, &stt.model, config.timeout)?;
            Box::new(MicrophoneTranscriber::new(client).context("microphone input unavailable")?)
        }
        _ => Box::new(KeyboardTranscriber::stdin()),
    };

    let speaker: Box<dyn Speaker> = match &config.voice_command {
        Some(program) => Box::new(VoiceSpeaker::new(program)),
        None => Box::new(TextSpeaker),
    };

    let auth = GoogleAuthorizer::new(&config.google_credentials, &config.google_token, config.timeout)?;
    let publisher = GoogleDocsPublisher::new(auth, config.timeout)?;

    Ok(Capabilities {
        transcriber,
        speaker,
        screen: Box::new(ScreenReader::new(&config.tesseract)),
        llm,
        publisher: Box::new(publisher),
    })
}
