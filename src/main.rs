use anyhow::{Context, Result};
use clap::Parser;
use mockmate::{
    create_router, AppState, BridgeHub, Config, FeedbackManager, HttpChatClient,
    HttpFeedbackClient, InterviewHandle, Orchestrator, SpeechInputController,
    SpeechOutputController, TextChat,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "mockmate")]
#[command(about = "Voice mock-interview turn-taking service")]
struct Args {
    /// Config file (without extension)
    #[arg(short, long, default_value = "config/mockmate")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("MockMate v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);
    info!("Feedback endpoint: {}", cfg.feedback.endpoint);
    info!("Default question set: {} questions", cfg.interview.questions.len());

    let bridge = BridgeHub::new();

    let output = SpeechOutputController::new(bridge.synthesizer(), cfg.speech.clone());
    let input = SpeechInputController::new(bridge.recognizer(), cfg.recognition.clone());

    let feedback_client =
        HttpFeedbackClient::new(cfg.feedback.endpoint.clone(), cfg.feedback.timeout())
            .context("Failed to build feedback client")?;
    let (feedback, feedback_rx) = FeedbackManager::new(Arc::new(feedback_client), cfg.feedback.clone());

    let orchestrator = Orchestrator::new(cfg.interview.questions.clone(), output, input, feedback);
    let (interview, _runtime) = InterviewHandle::spawn(orchestrator, feedback_rx);

    let chat_client = HttpChatClient::new(cfg.chat.endpoint.clone(), cfg.chat.timeout())?;
    let chat = TextChat::new(Arc::new(chat_client));

    let app = create_router(AppState::new(interview, bridge, chat));

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}
