// Fairness Audit - Web Server
// Form-driven audit UI with Axum

use anyhow::{Context, Result};
use std::path::PathBuf;

use fairness_audit::web::{router, AppState};
use fairness_audit::{init_tracing, AuditConfig};

/// Optional config file, same as the CLI's --config
const ENV_CONFIG: &str = "FAIRNESS_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config_path = std::env::var(ENV_CONFIG).ok().map(PathBuf::from);
    let config = AuditConfig::load(config_path.as_deref()).context("Failed to load configuration")?;

    tracing::info!(
        version = fairness_audit::VERSION,
        data_path = %config.data_path.display(),
        bind_address = %config.bind_addr,
        "fairness server starting"
    );

    let bind_addr = config.bind_addr.clone();
    let state = AppState::discover(config);
    let app = router(state, std::path::Path::new("web"));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    tracing::info!(address = %listener.local_addr()?, "listening");
    println!("\n🚀 Server running on http://{}", bind_addr);
    println!("   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
