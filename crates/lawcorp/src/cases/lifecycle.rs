//! Case lifecycle state machine.
//!
//! ```text
//! Active ──► OnHold
//!   │  ◄────────┘
//!   ├──► Closed   (terminal)
//!   └──► Settled  (terminal)
//! ```

use crate::model::CaseStatus;

/// Statuses reachable from `from` in one step.
pub fn legal_targets(from: CaseStatus) -> &'static [CaseStatus] {
    match from {
        CaseStatus::Active => &[CaseStatus::OnHold, CaseStatus::Closed, CaseStatus::Settled],
        CaseStatus::OnHold => &[CaseStatus::Active],
        CaseStatus::Closed | CaseStatus::Settled => &[],
    }
}

pub fn is_legal(from: CaseStatus, to: CaseStatus) -> bool {
    legal_targets(from).contains(&to)
}

pub fn is_terminal(status: CaseStatus) -> bool {
    legal_targets(status).is_empty()
}

/// `"Active, OnHold, Closed, Settled"`.
pub fn valid_status_list() -> String {
    join(&CaseStatus::ALL)
}

/// Message for an unparseable status value.
pub fn invalid_status_message(input: &str) -> String {
    format!("Invalid status '{input}'. Valid values: {}.", valid_status_list())
}

/// Message for an edge that does not exist.
pub fn illegal_transition_message(from: CaseStatus, to: CaseStatus) -> String {
    let targets = legal_targets(from);
    let options = if targets.is_empty() {
        "none".to_string()
    } else {
        join(targets)
    };
    format!("Cannot transition from {from} to {to}. Valid options from {from}: {options}.")
}

fn join(statuses: &[CaseStatus]) -> String {
    statuses
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
