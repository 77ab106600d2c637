use anyhow::Context;
use dispatch_runtime::client::TriageClient;
use dispatch_runtime::runtime::LogSink;
use dispatch_runtime::{config_from_env, init_tracing, Dashboard};

mod routes;

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("dispatch-server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = config_from_env()?;
    let listen = std::env::var("DISPATCH_LISTEN").unwrap_or_else(|_| "0.0.0.0:8080".into());

    let client = TriageClient::new(&config)?;
    let dashboard = Dashboard::start(config, client, LogSink);
    let app = routes::dashboard_router(dashboard.state().clone());

    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .with_context(|| format!("bind {listen}"))?;
    tracing::info!(%listen, "dispatch-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("serve")?;

    dashboard.shutdown().await;
    Ok(())
}
