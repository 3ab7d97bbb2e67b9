//! Portfolio API server
//!
//! Login issues signed access tokens; every route sits behind an
//! authenticator and an authorizer guard driven by the route policy table
//! in `routes::route_table`.

use anyhow::{bail, Context, Result};
use portfolio_api::config::AppConfig;
use portfolio_api::{db, routes, services::UserService, state::AppState};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let production = AppConfig::is_production();
    init_tracing(production);

    let config = AppConfig::load().context("loading configuration")?;
    if production {
        reject_unsafe_config(&config)?;
    }
    info!(version = env!("CARGO_PKG_VERSION"), production, "Starting Portfolio API");

    let pool = db::create_pool(&config.database)
        .await
        .context("connecting to the credential store")?;
    // Production applies migrations from a separate job
    if !production {
        db::run_migrations(&pool).await?;
    }
    if UserService::ensure_admin(&pool, &config.admin).await? {
        info!("Admin account provisioned from configuration");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = routes::create_router(AppState::new(pool, config));
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Pretty logs in development, JSON in production; `RUST_LOG` wins over both
fn init_tracing(production: bool) {
    let default_filter = if production {
        "portfolio_api=info,tower_http=info"
    } else {
        "portfolio_api=debug,tower_http=debug,sqlx=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());
    let registry = tracing_subscriber::registry().with(filter);

    if production {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }
}

fn reject_unsafe_config(config: &AppConfig) -> Result<()> {
    let problems = config.production_errors();
    if problems.is_empty() {
        return Ok(());
    }
    for problem in &problems {
        error!(problem = %problem, "Unsafe production configuration");
    }
    bail!("refusing to start with {} configuration problem(s)", problems.len())
}

/// Resolves on Ctrl+C, or SIGTERM on unix
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {}
        _ = terminate => {}
    }
    info!("Shutdown signal received, draining connections");
}
