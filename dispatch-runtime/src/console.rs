//! Plain-text rendering of the dashboard for terminals and logs.

use dispatch_core::card::CardSummary;
use dispatch_core::view::{DashboardView, DetailView};
use std::fmt::Write;

pub fn render(view: &DashboardView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Active Incidents ({} active calls) ===", view.active_calls);
    if view.active.is_empty() {
        let _ = writeln!(out, "  (no triaged incidents yet)");
    }
    for card in &view.active {
        render_card(&mut out, card);
    }

    if !view.pending.is_empty() {
        let _ = writeln!(out, "--- Awaiting triage ---");
        for pending in &view.pending {
            let marker = if pending.failed { "!!" } else { ".." };
            let _ = writeln!(
                out,
                "  {marker} #{} {} ({}): {}",
                pending.id, pending.name, pending.location, pending.status
            );
        }
    }

    if let Some(detail) = &view.selected {
        render_detail(&mut out, detail);
    }

    let _ = writeln!(
        out,
        "--- Average time {}{} | Goal {} ---",
        view.average_display,
        if view.average_over_goal { " (over goal)" } else { "" },
        view.goal_display
    );
    let _ = writeln!(
        out,
        "Available units: {} ambulances, {} fire trucks, {} police",
        view.units.ambulances, view.units.fire_trucks, view.units.police
    );
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "NOTICE: {}", notice.message);
    }
    out
}

fn render_card(out: &mut String, card: &CardSummary) {
    let flash = if card.flashing { " <<< WAITING" } else { "" };
    let _ = writeln!(
        out,
        "[{}] #{} {} ({}) {} {}{}",
        card.priority.unwrap_or("unassigned").to_uppercase(),
        card.id,
        card.name,
        card.emotion.unwrap_or("unknown"),
        card.location,
        card.elapsed,
        flash
    );
    if !card.badges.is_empty() {
        let badges: Vec<String> = card.badges.iter().map(|b| b.label()).collect();
        let _ = writeln!(out, "      {}", badges.join(" | "));
    }
    for line in &card.dispatch_lines {
        let _ = writeln!(out, "      + {line}");
    }
}

fn render_detail(out: &mut String, detail: &DetailView) {
    let _ = writeln!(
        out,
        "--- #{} {} [{}] {} ---",
        detail.id,
        detail.name,
        detail.priority.unwrap_or("unassigned"),
        detail.phone
    );
    let _ = writeln!(out, "  Location: {} ({})", detail.location, detail.map_url);
    let _ = writeln!(
        out,
        "  Elapsed {} | Injuries {} | Entrapment {} | Vehicles {} | Fire {} | Units dispatched {}",
        detail.elapsed,
        detail.injuries,
        detail.trapped,
        detail.vehicles,
        detail.fire,
        detail.units_dispatched
    );
    let _ = writeln!(out, "  Transcript: {}", detail.transcript);
    let _ = writeln!(out, "  Suggestion: {}", detail.generated_response);
    let _ = writeln!(out, "  Recommended: {}", detail.recommended_units);
}
