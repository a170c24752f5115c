use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docent::api::{create_router, AppState};
use docent::config::Config;
use docent::services::SessionSweeper;

#[derive(Parser)]
#[command(name = "docent")]
#[command(about = "Documentation answering backend for LLM-grounded doc search")]
struct Args {
    /// Print the resolved configuration and exit
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docent=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if args.check_config {
        print_config_summary(&config);
        return Ok(());
    }

    if config.server.api_keys.is_empty() {
        tracing::warn!(
            "DOCENT_API_KEYS is not set - discourse endpoints are locked. Set DOCENT_API_KEYS to enable them."
        );
    }

    if let Some(llm_config) = &config.llm {
        tracing::info!("Initializing LLM provider: {}...", llm_config.model);
    }

    let state = AppState::new(config.clone())?;
    if !state.llm.is_available() {
        tracing::warn!("LLM unavailable - answer endpoints will return 503");
    }
    if state.botcheck.is_enabled() {
        tracing::info!("Bot-score verification enabled");
    }

    let cancel_token = CancellationToken::new();

    tracing::info!("Starting session sweeper...");
    let sweeper = SessionSweeper::new(
        state.sessions.clone(),
        state.config.session.ttl_secs,
        state.config.session.sweep_interval_secs,
    );
    let token = cancel_token.child_token();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!("Session sweeper shutting down...");
                    break;
                }
                _ = tokio::time::sleep(tokio::time::Duration::from_secs(sweeper.interval_secs())) => {
                    sweeper.run_once();
                }
            }
        }
    });

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Docent starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/health", addr);
    tracing::info!("  API docs:     http://{}/api/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token))
        .await?;

    Ok(())
}

fn print_config_summary(config: &Config) {
    println!("server:         {}:{}", config.server.host, config.server.port);
    println!(
        "llm:            {}",
        config
            .llm
            .as_ref()
            .map_or("not configured", |llm| llm.model.as_str())
    );
    println!(
        "rate limit:     {}",
        if config.server.rate_limit_enabled && config.server.rate_limit_per_minute > 0 {
            format!("{}/min", config.server.rate_limit_per_minute)
        } else {
            "disabled".to_string()
        }
    );
    println!("api keys:       {}", config.server.api_keys.len());
    println!(
        "session ttl:    {}s (sweep every {}s)",
        config.session.ttl_secs, config.session.sweep_interval_secs
    );
    println!(
        "github search:  {}",
        config
            .aggregation
            .github
            .as_ref()
            .map_or("not configured", |github| github.repo.as_str())
    );
    println!(
        "blog search:    {}",
        config
            .aggregation
            .blog_search_url
            .as_deref()
            .unwrap_or("not configured")
    );
    println!(
        "changelog:      {}",
        config
            .aggregation
            .changelog_search_url
            .as_deref()
            .unwrap_or("not configured")
    );
    println!(
        "bot check:      {}",
        if config.botcheck.is_some() {
            "enabled"
        } else {
            "disabled"
        }
    );
}

async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, cancelling background tasks...");
    cancel_token.cancel();
}
