//! Contract lifecycle state machine.
//!
//! The graph is a fixed table keyed by the current status. It is not acyclic:
//! a revoked contract may be restarted as a fresh draft (`REVOKED -> CREATED`).
//!
//! ```text
//! CREATED ──► APPROVED ──► SENT ──► SIGNED ──► LOCKED
//!    │  ▲         │          │
//!    │  └──────┐  │          │
//!    └──────► REVOKED ◄──────┘
//! ```

use quill_types::ContractStatus;

use crate::{Contract, ContractError};

/// Legal next statuses from `status`, in display order.
#[must_use]
pub const fn available_transitions(status: ContractStatus) -> &'static [ContractStatus] {
    use ContractStatus::{Approved, Created, Locked, Revoked, Sent, Signed};
    match status {
        Created => &[Approved, Revoked],
        Approved => &[Sent, Revoked],
        Sent => &[Signed, Revoked],
        Signed => &[Locked],
        Locked => &[],
        Revoked => &[Created],
    }
}

/// Like [`available_transitions`], for a status read from untyped input.
/// Unrecognized values have no transitions.
#[must_use]
pub fn available_transitions_for(raw: &str) -> &'static [ContractStatus] {
    match ContractStatus::parse(raw) {
        Some(status) => available_transitions(status),
        None => &[],
    }
}

#[must_use]
pub fn can_transition(from: ContractStatus, to: ContractStatus) -> bool {
    available_transitions(from).contains(&to)
}

/// Move `contract` to `target`. Only the status changes.
pub fn apply_transition(
    contract: &Contract,
    target: ContractStatus,
) -> Result<Contract, ContractError> {
    let from = contract.status();
    if !can_transition(from, target) {
        tracing::warn!(contract = %contract.id(), %from, to = %target, "Rejected status transition");
        return Err(ContractError::InvalidTransition { from, to: target });
    }
    tracing::debug!(contract = %contract.id(), %from, to = %target, "Contract status changed");
    Ok(contract.with_status(target))
}

/// No further transitions exist.
#[must_use]
pub fn is_terminal(status: ContractStatus) -> bool {
    available_transitions(status).is_empty()
}

/// Statuses rendered with a draft watermark.
#[must_use]
pub const fn is_draft(status: ContractStatus) -> bool {
    matches!(status, ContractStatus::Created | ContractStatus::Revoked)
}

// ── Display colors ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusColor {
    Blue,
    Green,
    Yellow,
    Purple,
    Gray,
    Red,
    Neutral,
}

impl StatusColor {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StatusColor::Blue => "blue",
            StatusColor::Green => "green",
            StatusColor::Yellow => "yellow",
            StatusColor::Purple => "purple",
            StatusColor::Gray => "gray",
            StatusColor::Red => "red",
            StatusColor::Neutral => "neutral",
        }
    }

    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            StatusColor::Blue => "#3498db",
            StatusColor::Green => "#2ecc71",
            StatusColor::Yellow => "#f1c40f",
            StatusColor::Purple => "#9b59b6",
            StatusColor::Gray => "#95a5a6",
            StatusColor::Red => "#e74c3c",
            StatusColor::Neutral => "#ecf0f1",
        }
    }
}

#[must_use]
pub const fn status_color(status: ContractStatus) -> StatusColor {
    match status {
        ContractStatus::Created => StatusColor::Blue,
        ContractStatus::Approved => StatusColor::Green,
        ContractStatus::Sent => StatusColor::Yellow,
        ContractStatus::Signed => StatusColor::Purple,
        ContractStatus::Locked => StatusColor::Gray,
        ContractStatus::Revoked => StatusColor::Red,
    }
}

#[must_use]
pub fn status_color_for(raw: &str) -> StatusColor {
    ContractStatus::parse(raw).map_or(StatusColor::Neutral, status_color)
}
