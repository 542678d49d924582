use std::{
    net::{IpAddr, SocketAddr},
    time::Duration,
};

use analysis_store::InMemoryStore;
use anyhow::Context;
use clap::{Parser, Subcommand};
use comment_pulse::{
    api::{api_routes, AppState, HttpCollaborators},
    groq::GroqClient,
    tracing::init_tracing_subscriber,
    types::{EventSink, StreamEvent},
    CommentProcessorBuilder, YouTubeClient,
};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(
    name = "comment-pulse",
    about = "YouTube comment translation and summarization service"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API server
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: IpAddr,

        #[arg(long, env = "PORT", default_value = "5000")]
        port: u16,

        /// Keep-alive cadence for idle streaming responses, in milliseconds
        #[arg(long, default_value = "1000")]
        idle_tick_ms: u64,
    },
    /// Run the pipeline once against a video URL and print each record
    Analyze {
        url: String,

        /// YouTube Data API key
        #[arg(long, env = "YOUTUBE_API_KEY")]
        youtube_api_key: String,

        /// Groq API key
        #[arg(long, env = "GROQ_API_KEY")]
        groq_api_key: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    match cli.command {
        Command::Serve {
            host,
            port,
            idle_tick_ms,
        } => serve(host, port, Duration::from_millis(idle_tick_ms)).await,
        Command::Analyze {
            url,
            youtube_api_key,
            groq_api_key,
        } => analyze(url, youtube_api_key, groq_api_key).await,
    }
}

async fn serve(host: IpAddr, port: u16, idle_tick: Duration) -> anyhow::Result<()> {
    let state =
        AppState::new(HttpCollaborators, InMemoryStore::default()).with_idle_tick(idle_tick);
    let app = api_routes(state);

    let addr = SocketAddr::new(host, port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "comment-pulse listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "Failed to install Ctrl+C handler");
    }
}

async fn analyze(url: String, youtube_api_key: String, groq_api_key: String) -> anyhow::Result<()> {
    let (events, mut events_rx) = EventSink::channel();
    let cancel = CancellationToken::new();

    let processor = CommentProcessorBuilder::new()
        .comment_source(YouTubeClient::new(&youtube_api_key))
        .translator(GroqClient::new(&groq_api_key))
        .summarizer(GroqClient::new(&groq_api_key))
        .store(InMemoryStore::default())
        .build();

    tokio::spawn(processor.run(url, "local".to_string(), events, cancel));

    while let Some(event) = events_rx.recv().await {
        if let StreamEvent::Data(record) = event {
            println!("{}", serde_json::to_string(&record)?);
        }
    }

    Ok(())
}
