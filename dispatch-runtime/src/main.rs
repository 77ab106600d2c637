use dispatch_runtime::client::TriageClient;
use dispatch_runtime::fixtures::FixtureSource;
use dispatch_runtime::runtime::LogSink;
use dispatch_runtime::{config_from_env, demo_config, init_tracing, run_console, Dashboard};

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("dispatch console failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let demo_mode = std::env::args().any(|arg| arg == "--demo");

    let dashboard = if demo_mode {
        Dashboard::start(demo_config(), FixtureSource, LogSink)
    } else {
        let config = config_from_env()?;
        let client = TriageClient::new(&config)?;
        Dashboard::start(config, client, LogSink)
    };

    run_console(dashboard).await
}
