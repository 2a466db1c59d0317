//! Field mutability policy.
//!
//! A single gate per contract decides whether any value may change. Signatures
//! have their own, narrower gate on top of it.

use std::fmt;

use chrono::{DateTime, TimeZone};
use quill_types::{
    ContractStatus, FieldId, FieldType, FieldValue, SignatureStamp, SignerName, TimestampFormat,
};

use crate::{Contract, ContractError, ContractField};

/// Whether field values of a contract in `status` may change.
#[must_use]
pub const fn is_status_editable(status: ContractStatus) -> bool {
    !matches!(
        status,
        ContractStatus::Signed | ContractStatus::Locked | ContractStatus::Revoked
    )
}

#[must_use]
pub fn is_editable(contract: &Contract) -> bool {
    is_status_editable(contract.status())
}

/// Whether a signature may be authored or cleared in `status`.
#[must_use]
pub const fn can_edit_signature(status: ContractStatus) -> bool {
    matches!(
        status,
        ContractStatus::Created | ContractStatus::Sent | ContractStatus::Approved
    )
}

/// Replace one field value. `None` clears the answer.
///
/// Checks run in order: the contract gate, the field lookup, then the value
/// shape.
pub fn set_field_value(
    contract: &Contract,
    field_id: &FieldId,
    value: Option<FieldValue>,
) -> Result<Contract, ContractError> {
    if !is_editable(contract) {
        tracing::warn!(contract = %contract.id(), field = %field_id, status = %contract.status(), "Rejected edit on read-only contract");
        return Err(ContractError::ReadOnlyContract {
            status: contract.status(),
        });
    }
    let index = contract
        .position_of(field_id)
        .ok_or_else(|| ContractError::UnknownField {
            field_id: field_id.clone(),
        })?;
    let field_type = contract.fields()[index].field_type();
    if let Some(value) = &value
        && !value.fits(field_type)
    {
        return Err(ContractError::ValueMismatch {
            field_id: field_id.clone(),
            field_type,
        });
    }
    Ok(contract.with_value(index, value))
}

/// Sign `field_id` as `signer` at `now` with the default timestamp format.
///
/// A blank signer leaves the contract unchanged.
pub fn set_signature<Tz>(
    contract: &Contract,
    field_id: &FieldId,
    signer: &str,
    now: &DateTime<Tz>,
) -> Result<Contract, ContractError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    set_signature_with_format(contract, field_id, signer, now, &TimestampFormat::default())
}

pub fn set_signature_with_format<Tz>(
    contract: &Contract,
    field_id: &FieldId,
    signer: &str,
    now: &DateTime<Tz>,
    format: &TimestampFormat,
) -> Result<Contract, ContractError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let Ok(signer) = SignerName::new(signer) else {
        return Ok(contract.clone());
    };
    check_signature_gate(contract, field_id)?;
    if contract.field(field_id).is_some_and(ContractField::is_answered) {
        return Err(ContractError::AlreadySigned {
            field_id: field_id.clone(),
        });
    }
    let stamp = SignatureStamp::at(&signer, now, format);
    let signed = set_field_value(contract, field_id, Some(FieldValue::Text(stamp.encode())))?;
    tracing::debug!(contract = %contract.id(), field = %field_id, "Signature recorded");
    Ok(signed)
}

/// Remove a signature, under the same gate as signing.
pub fn clear_signature(contract: &Contract, field_id: &FieldId) -> Result<Contract, ContractError> {
    check_signature_gate(contract, field_id)?;
    set_field_value(contract, field_id, None)
}

fn check_signature_gate(contract: &Contract, field_id: &FieldId) -> Result<(), ContractError> {
    if !can_edit_signature(contract.status()) {
        return Err(ContractError::ReadOnlyContract {
            status: contract.status(),
        });
    }
    let field = contract
        .field(field_id)
        .ok_or_else(|| ContractError::UnknownField {
            field_id: field_id.clone(),
        })?;
    if field.field_type() != FieldType::Signature {
        return Err(ContractError::NotASignatureField {
            field_id: field_id.clone(),
        });
    }
    Ok(())
}
