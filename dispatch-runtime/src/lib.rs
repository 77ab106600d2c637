pub mod client;
pub mod commands;
pub mod console;
pub mod fixtures;
pub mod runtime;
pub mod state;

use crate::client::TriageSource;
use crate::runtime::EventSink;
use crate::state::AppState;
use anyhow::Context;
use dispatch_core::config::{
    parse_lat_lng, parse_schedule, parse_units, schedule_from, DashboardConfig,
};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Running dashboard: one ingestion task per schedule entry plus the ticker.
/// Dropping it, or calling [`Dashboard::shutdown`], cancels every task so no
/// timer can write into a torn-down dashboard.
pub struct Dashboard {
    state: AppState,
    tasks: JoinSet<()>,
}

impl Dashboard {
    /// Must be called from within a tokio runtime.
    pub fn start<S: TriageSource>(
        config: DashboardConfig,
        source: S,
        sink: impl EventSink,
    ) -> Self {
        let state = AppState::new(config);
        let sink: Arc<dyn EventSink> = Arc::new(sink);
        let source = Arc::new(source);
        let mut tasks = JoinSet::new();

        for entry in state.config().schedule.clone() {
            tasks.spawn(runtime::run_ingestion(
                state.clone(),
                Arc::clone(&source),
                entry,
                state.config().retry,
                Arc::clone(&sink),
            ));
        }
        tasks.spawn(runtime::run_ticker(
            state.clone(),
            Arc::clone(&sink),
            state.config().tick_interval(),
        ));

        tracing::info!(
            scheduled = state.config().schedule.len(),
            base_url = %state.config().triage_base_url,
            "dashboard started"
        );
        Self { state, tasks }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub async fn shutdown(mut self) {
        self.tasks.abort_all();
        while self.tasks.join_next().await.is_some() {}
        tracing::info!("dashboard stopped");
    }
}

pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn config_from_env() -> anyhow::Result<DashboardConfig> {
    let mut config = DashboardConfig::default();

    if let Ok(url) = std::env::var("TRIAGE_BASE_URL") {
        config.triage_base_url = url;
    }
    if let Ok(schedule) = std::env::var("DISPATCH_SCHEDULE") {
        config.schedule = parse_schedule(&schedule)
            .map_err(anyhow::Error::msg)
            .context("DISPATCH_SCHEDULE")?;
    }
    if let Ok(units) = std::env::var("DISPATCH_UNITS") {
        config.units = parse_units(&units)
            .map_err(anyhow::Error::msg)
            .context("DISPATCH_UNITS")?;
    }
    if let Ok(hq) = std::env::var("DISPATCH_HQ") {
        config.headquarters = parse_lat_lng(&hq)
            .map_err(anyhow::Error::msg)
            .context("DISPATCH_HQ")?;
    }
    if let Ok(ms) = std::env::var("DISPATCH_TICK_MS") {
        config.tick_interval_ms = ms
            .trim()
            .parse::<u64>()
            .with_context(|| format!("DISPATCH_TICK_MS: invalid value '{ms}'"))?;
    }

    Ok(config)
}

/// Compressed schedule used by `--demo`, so the whole shift plays out in
/// seconds against the canned fixtures.
pub fn demo_config() -> DashboardConfig {
    DashboardConfig {
        schedule: schedule_from(&[(1, 0), (2, 5), (3, 8), (4, 12)]),
        ..Default::default()
    }
}

pub async fn run_console(dashboard: Dashboard) -> anyhow::Result<()> {
    let period = dashboard.state().config().tick_interval();
    let mut refresh = tokio::time::interval(period);
    loop {
        tokio::select! {
            _ = refresh.tick() => {
                let view = commands::get_dashboard(dashboard.state());
                println!("{}", console::render(&view));
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("listen for ctrl-c")?;
                break;
            }
        }
    }
    dashboard.shutdown().await;
    Ok(())
}
