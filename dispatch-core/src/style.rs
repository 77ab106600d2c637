//! Lookup tables shared by the card and detail views.

use crate::incident::{EmotionClass, Priority};
use serde::Serialize;

/// Unset `priority` in a view falls back to this class.
pub const UNSET_PRIORITY_CLASS: &str = "unassigned";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PriorityStyle {
    pub class: &'static str,
    pub border_color: &'static str,
    pub legend: &'static str,
}

pub const PRIORITY_STYLES: [(Priority, PriorityStyle); 4] = [
    (
        Priority::Critical,
        PriorityStyle {
            class: "critical",
            border_color: "red",
            legend: "Critical - Immediate response",
        },
    ),
    (
        Priority::High,
        PriorityStyle {
            class: "high",
            border_color: "#f57c00",
            legend: "High - Urgent response",
        },
    ),
    (
        Priority::Medium,
        PriorityStyle {
            class: "medium",
            border_color: "#fbc02d",
            legend: "Medium - Standard response",
        },
    ),
    (
        Priority::Low,
        PriorityStyle {
            class: "low",
            border_color: "#5285be",
            legend: "Low - Minor incident",
        },
    ),
];

pub fn priority_style(priority: Priority) -> PriorityStyle {
    PRIORITY_STYLES
        .iter()
        .find(|(p, _)| *p == priority)
        .map(|(_, style)| *style)
        .unwrap_or(PRIORITY_STYLES[3].1)
}

pub fn priority_class(priority: Option<Priority>) -> &'static str {
    priority
        .map(|p| priority_style(p).class)
        .unwrap_or(UNSET_PRIORITY_CLASS)
}

pub fn emotion_color(emotion: Option<EmotionClass>) -> &'static str {
    match emotion {
        Some(EmotionClass::Calm) => "green",
        Some(EmotionClass::Concerned) => "yellow",
        Some(EmotionClass::Distressed) => "orange",
        Some(EmotionClass::Panicked) => "red",
        None => "white",
    }
}

pub fn severity_legend() -> impl Iterator<Item = PriorityStyle> {
    PRIORITY_STYLES.into_iter().map(|(_, style)| style)
}
