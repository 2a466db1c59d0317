//! Core domain types for Quill.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! The field model lives here; aggregates and the lifecycle engine build on it in
//! `quill-core`.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod field;
mod ids;
mod status;
mod value;

pub use field::{
    DEFAULT_SELECT_OPTIONS, Field, FieldKind, FieldType, FieldUpdate, FieldUpdateError,
    FieldWidth, GRID_SIZE, INPUT_DEFAULT_WIDTH, PAGE_HEIGHT, PAGE_WIDTH, Position,
    TEXT_BLOCK_DEFAULT_WIDTH, TEXT_BLOCK_PLACEHOLDER,
};
pub use ids::{BlueprintId, ContractId, FieldId};
pub use status::{ContractStatus, UnknownStatusError};
pub use value::{
    BlankSignerName, DEFAULT_SIGNATURE_TIMESTAMP_FORMAT, FieldValue, InvalidTimestampFormat,
    SignatureStamp, SignerName, TimestampFormat,
};
