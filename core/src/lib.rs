//! Core domain logic for Quill.
//!
//! Blueprint authoring, contract instantiation, the lifecycle state machine and
//! the field mutability policy. Every operation is a pure function over an
//! immutable snapshot that returns a new aggregate; storage is injected through
//! [`Repository`].

#![allow(clippy::missing_errors_doc)]

pub mod blueprint;
mod contract;
pub mod demo;
pub mod lifecycle;
pub mod listing;
pub mod policy;
pub mod repository;
pub mod service;

pub use blueprint::{
    Blueprint, BlueprintEdit, EditError, UNTITLED_BLUEPRINT, ValidationError, editor,
};
pub use contract::{
    Contract, ContractError, ContractField, instantiate_contract, instantiate_contract_at,
};
pub use lifecycle::{
    StatusColor, apply_transition, available_transitions, available_transitions_for,
    can_transition, is_draft, is_terminal, status_color, status_color_for,
};
pub use listing::{ContractFilter, ContractQuery, ContractSort, DashboardStats, query_contracts};
pub use policy::{
    can_edit_signature, clear_signature, is_editable, is_status_editable, set_field_value,
    set_signature, set_signature_with_format,
};
pub use repository::{InMemoryRepository, Keyed, Repository};
pub use service::{
    UNKNOWN_BLUEPRINT, blueprint_display_name, create_contract, find_blueprint_by_id,
    find_contract_by_id, save_blueprint,
};
