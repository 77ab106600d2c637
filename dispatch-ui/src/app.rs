use crate::bridge;
use dispatch_core::card::CardSummary;
use dispatch_core::config::{DashboardConfig, ScheduleEntry};
use dispatch_core::recommend::unit_service_name;
use dispatch_core::view::{DashboardView, DetailView, PendingView};
use dispatch_core::{DashboardError, DashboardState, Event, IncidentId, UnitType};
use leptos::logging;
use leptos::*;
use wasm_bindgen_futures::spawn_local;

/// Applies `event` to the snapshot in `state`. A rejected event leaves the
/// snapshot as it was apart from the notice. Events arriving after the
/// dashboard was unmounted are dropped.
fn apply(state: RwSignal<DashboardState>, event: &Event) -> Result<(), DashboardError> {
    state
        .try_update(|current| match current.apply(event) {
            Ok(next) => {
                *current = next;
                Ok(())
            }
            Err(err) => {
                logging::warn!("event rejected: {err}");
                *current = current.with_notice(event.incident_id(), &err);
                Err(err)
            }
        })
        .unwrap_or(Ok(()))
}

async fn ingest(state: RwSignal<DashboardState>, config: DashboardConfig, entry: ScheduleEntry) {
    let id = entry.incident_id;
    let mut attempt = 0;
    loop {
        attempt += 1;
        let error = match bridge::transcribe(&config, id).await {
            Ok(payload) => {
                if let Err(err) = apply(state, &Event::Ingested { id, payload }) {
                    let failure = config.retry.failure(attempt, false, err.to_string());
                    let _ = apply(state, &Event::IngestFailed { id, failure });
                }
                return;
            }
            Err(error) => error,
        };

        logging::warn!(
            "triage for incident {id} failed on attempt {attempt}: {}",
            error.message
        );
        let failure = config.retry.failure(attempt, error.retryable, error.message);
        let exhausted = failure.exhausted;
        let _ = apply(state, &Event::IngestFailed { id, failure });
        if exhausted {
            return;
        }
        bridge::sleep(config.retry.backoff(attempt)).await;
    }
}

/// Starts the schedule and the clock. Every timer is cleared when the owning
/// component is torn down.
fn start_timers(state: RwSignal<DashboardState>, config: &DashboardConfig) {
    for entry in config.schedule.iter().copied() {
        let config = config.clone();
        match set_timeout_with_handle(
            move || spawn_local(ingest(state, config, entry)),
            entry.delay(),
        ) {
            Ok(handle) => on_cleanup(move || handle.clear()),
            Err(e) => logging::error!("could not schedule incident {}: {e:?}", entry.incident_id),
        }
    }

    match set_interval_with_handle(
        move || {
            let _ = apply(state, &Event::Tick);
        },
        config.tick_interval(),
    ) {
        Ok(handle) => on_cleanup(move || handle.clear()),
        Err(e) => logging::error!("could not start the clock: {e:?}"),
    }
}

#[component]
pub fn App() -> impl IntoView {
    let mut config = DashboardConfig::default();
    if let Some(url) = bridge::triage_base_url() {
        config.triage_base_url = url.to_string();
    }

    let state = create_rw_signal(DashboardState::new(config.callers.clone(), config.units));
    start_timers(state, &config);

    let dashboard = create_memo(move |_| state.with(|s| DashboardView::new(s, &config)));

    let select = Callback::new(move |id: Option<IncidentId>| {
        let _ = apply(state, &Event::Select { id });
    });
    let dispatch = Callback::new(move |(id, unit): (IncidentId, UnitType)| {
        let _ = apply(state, &Event::Dispatch { id, unit });
    });

    view! {
      <div class="layout">
        <section class="panel incidents">
          <h2>{move || format!("Active Incidents ({} active calls)", dashboard.with(|d| d.active_calls))}</h2>
          <ul class="cards">
            {move || {
                let selected = dashboard.with(|d| d.selected.as_ref().map(|s| s.id));
                dashboard
                    .get()
                    .active
                    .into_iter()
                    .map(|card| {
                        let is_selected = selected == Some(card.id);
                        view! { <IncidentCard card selected=is_selected on_select=select/> }
                    })
                    .collect_view()
            }}
          </ul>
          <Show when=move || dashboard.with(|d| !d.pending.is_empty()) fallback=|| ()>
            <PendingList pending=Signal::derive(move || dashboard.get().pending)/>
          </Show>
        </section>

        <section class="panel detail">
          {move || match dashboard.get().selected {
              Some(detail) => view! { <DetailPanel detail on_dispatch=dispatch on_close=select/> }.into_view(),
              None => view! { <p class="meta">"Select an incident to see details"</p> }.into_view(),
          }}
        </section>

        <section class="panel summary">
          <SummaryPanel dashboard=dashboard.into()/>
          <Show when=move || dashboard.with(|d| d.notice.is_some()) fallback=|| ()>
            <pre class="error">
              {move || dashboard.with(|d| d.notice.as_ref().map(|n| n.message.clone()).unwrap_or_default())}
            </pre>
          </Show>
        </section>
      </div>
    }
}

#[component]
fn IncidentCard(card: CardSummary, selected: bool, on_select: Callback<Option<IncidentId>>) -> impl IntoView {
    let id = card.id;
    let class = format!(
        "card {}{}",
        card.priority_class,
        if selected { " selected" } else { "" }
    );
    view! {
      <li class=class on:click=move |_| on_select.call(Some(id))>
        <div class="card-head">
          <b>{card.name}</b>
          <span class="emotion" style=format!("color: {}", card.emotion_color)>
            {card.emotion.unwrap_or("unknown")}
          </span>
          <IncidentTimer elapsed=card.elapsed flashing=card.flashing/>
        </div>
        <div class="meta">{card.location}</div>
        <div class="badges">
          {card
              .badges
              .into_iter()
              .map(|b| view! { <span class=format!("badge {}", b.class())>{b.label()}</span> })
              .collect_view()}
        </div>
        <ul class="dispatched">
          {card.dispatch_lines.into_iter().map(|line| view! { <li>{line}</li> }).collect_view()}
        </ul>
      </li>
    }
}

#[component]
fn IncidentTimer(elapsed: String, flashing: bool) -> impl IntoView {
    let class = if flashing { "timer flash" } else { "timer" };
    view! { <span class=class>{elapsed}</span> }
}

#[component]
fn PendingList(pending: Signal<Vec<PendingView>>) -> impl IntoView {
    view! {
      <h3>"Awaiting triage"</h3>
      <ul class="pending">
        <For
          each=move || pending.get()
          key=|p| (p.id, p.status.clone())
          children=move |p| {
              let class = if p.failed { "warn" } else { "meta" };
              view! {
                <li>
                  <div><b>{format!("#{} {}", p.id, p.name)}</b> " " <span class="meta">{p.location}</span></div>
                  <div class=class>{p.status}</div>
                </li>
              }
          }
        />
      </ul>
    }
}

#[component]
fn MapView(url: String) -> impl IntoView {
    view! { <iframe class="map" src=url width="100%" height="280" loading="lazy"></iframe> }
}

#[component]
fn DetailPanel(
    detail: DetailView,
    on_dispatch: Callback<(IncidentId, UnitType)>,
    on_close: Callback<Option<IncidentId>>,
) -> impl IntoView {
    let id = detail.id;
    let buttons = UnitType::ALL
        .into_iter()
        .map(|unit| {
            let sent = detail.dispatched.get(unit);
            view! {
              <button disabled=sent on:click=move |_| on_dispatch.call((id, unit))>
                {format!("Dispatch {}", unit_service_name(unit))}
              </button>
            }
        })
        .collect_view();

    view! {
      <div class=format!("detail {}", detail.priority_class)>
        <div class="row">
          <h2>{format!("#{} {}", detail.id, detail.name)}</h2>
          <button on:click=move |_| on_close.call(None)>"Close"</button>
        </div>
        <div class="meta">{format!("{} | {}", detail.phone, detail.priority.unwrap_or("unassigned"))}</div>
        <MapView url=detail.map_url/>
        <div>{detail.location}</div>
        <table class="facts">
          <tr><td>"Time elapsed"</td><td>{detail.elapsed}</td></tr>
          <tr><td>"Injuries"</td><td>{detail.injuries}</td></tr>
          <tr><td>"Entrapment"</td><td>{detail.trapped}</td></tr>
          <tr><td>"Vehicles"</td><td>{detail.vehicles}</td></tr>
          <tr><td>"Fire"</td><td>{detail.fire}</td></tr>
          <tr><td>"Units dispatched"</td><td>{detail.units_dispatched}</td></tr>
        </table>
        <h3>"Transcript"</h3>
        <p>{detail.transcript}</p>
        <h3>"Suggested response"</h3>
        <p>{detail.generated_response}</p>
        <h3>{format!("Recommended: {}", detail.recommended_units)}</h3>
        <div class="row">{buttons}</div>
      </div>
    }
}

#[component]
fn SummaryPanel(dashboard: Signal<DashboardView>) -> impl IntoView {
    view! {
      <h3>"Average time"</h3>
      <div class=move || if dashboard.with(|d| d.average_over_goal) { "average warn" } else { "average ok" }>
        {move || dashboard.with(|d| d.average_display.clone())}
      </div>
      <div class="meta">{move || dashboard.with(|d| format!("Goal {}", d.goal_display))}</div>

      <h3>"Available units"</h3>
      <ul class="units">
        <li>{move || format!("Ambulances: {}", dashboard.with(|d| d.units.ambulances))}</li>
        <li>{move || format!("Fire trucks: {}", dashboard.with(|d| d.units.fire_trucks))}</li>
        <li>{move || format!("Police: {}", dashboard.with(|d| d.units.police))}</li>
      </ul>

      <h3>"Severity"</h3>
      <ul class="legend">
        {move || {
            dashboard
                .with(|d| d.legend.clone())
                .into_iter()
                .map(|style| {
                    view! {
                      <li>
                        <span class="swatch" style=format!("border-color: {}", style.border_color)></span>
                        {style.legend}
                      </li>
                    }
                })
                .collect_view()
        }}
      </ul>
    }
}
