use crate::incident::Incident;
use std::cmp::Ordering;

/// Rank given to incidents whose triage carried no label; sorts after `low`.
pub const UNSET_PRIORITY_RANK: u8 = 5;

pub fn priority_rank(incident: &Incident) -> u8 {
    incident
        .priority
        .map(|p| p.rank())
        .unwrap_or(UNSET_PRIORITY_RANK)
}

/// Undispatched first, then priority rank ascending, then longest wait first.
pub fn display_order(a: &Incident, b: &Incident) -> Ordering {
    a.is_dispatched()
        .cmp(&b.is_dispatched())
        .then_with(|| priority_rank(a).cmp(&priority_rank(b)))
        .then_with(|| b.time.cmp(&a.time))
}

/// Ready incidents in display order. Full ties keep their input order.
pub fn active_list<'a>(incidents: impl IntoIterator<Item = &'a Incident>) -> Vec<&'a Incident> {
    let mut list: Vec<&Incident> = incidents.into_iter().filter(|i| i.ready).collect();
    list.sort_by(|a, b| display_order(a, b));
    list
}
