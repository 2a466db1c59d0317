//! Contract aggregate: a snapshot of a blueprint's fields plus filled values
//! and a lifecycle status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use quill_types::{
    BlueprintId, ContractId, ContractStatus, Field, FieldId, FieldType, FieldValue,
};

use crate::Blueprint;

/// A blueprint field copied onto a contract, carrying the filled-in answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractField {
    #[serde(flatten)]
    field: Field,
    #[serde(default)]
    value: Option<FieldValue>,
}

impl ContractField {
    /// Independent copy of `field` with no answer.
    #[must_use]
    pub fn from_template(field: &Field) -> Self {
        Self {
            field: field.clone(),
            value: None,
        }
    }

    #[must_use]
    pub fn field(&self) -> &Field {
        &self.field
    }

    #[must_use]
    pub fn id(&self) -> &FieldId {
        self.field.id()
    }

    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.field.field_type()
    }

    #[must_use]
    pub fn value(&self) -> Option<&FieldValue> {
        self.value.as_ref()
    }

    /// Answered means a value other than an empty string.
    #[must_use]
    pub fn is_answered(&self) -> bool {
        match &self.value {
            Some(FieldValue::Text(text)) => !text.trim().is_empty(),
            Some(FieldValue::Bool(_)) => true,
            None => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    id: ContractId,
    name: String,
    blueprint_id: BlueprintId,
    fields: Vec<ContractField>,
    status: ContractStatus,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("contract is {status} and can no longer be edited")]
    ReadOnlyContract { status: ContractStatus },
    #[error("field {field_id} not found on contract")]
    UnknownField { field_id: FieldId },
    #[error("cannot move contract from {from} to {to}")]
    InvalidTransition {
        from: ContractStatus,
        to: ContractStatus,
    },
    #[error("value does not fit {field_type} field {field_id}")]
    ValueMismatch {
        field_id: FieldId,
        field_type: FieldType,
    },
    #[error("field {field_id} is already signed; clear it before signing again")]
    AlreadySigned { field_id: FieldId },
    #[error("field {field_id} is not a signature field")]
    NotASignatureField { field_id: FieldId },
    #[error("blueprint {0} not found")]
    UnknownBlueprint(BlueprintId),
    #[error("contract name cannot be empty")]
    BlankContractName,
}

impl Contract {
    #[must_use]
    pub fn id(&self) -> &ContractId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Weak reference to the originating blueprint, which may no longer exist.
    #[must_use]
    pub fn blueprint_id(&self) -> &BlueprintId {
        &self.blueprint_id
    }

    #[must_use]
    pub fn fields(&self) -> &[ContractField] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, field_id: &FieldId) -> Option<&ContractField> {
        self.fields.iter().find(|field| field.id() == field_id)
    }

    #[must_use]
    pub fn status(&self) -> ContractStatus {
        self.status
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Required fields that still have no answer.
    #[must_use]
    pub fn missing_required(&self) -> Vec<&ContractField> {
        self.fields
            .iter()
            .filter(|field| field.field().is_required() && !field.is_answered())
            .collect()
    }

    pub(crate) fn with_status(&self, status: ContractStatus) -> Self {
        let mut next = self.clone();
        next.status = status;
        next
    }

    pub(crate) fn position_of(&self, field_id: &FieldId) -> Option<usize> {
        self.fields.iter().position(|field| field.id() == field_id)
    }

    pub(crate) fn with_value(&self, index: usize, value: Option<FieldValue>) -> Self {
        let mut next = self.clone();
        next.fields[index].value = value;
        next
    }
}

impl PartialEq for Contract {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Contract {}

/// Instantiate a contract from `blueprint` with a fresh id, stamped now.
///
/// Fields are deep-copied with no answers; later blueprint edits are not seen
/// by the contract.
#[must_use]
pub fn instantiate_contract(blueprint: &Blueprint, name: impl Into<String>) -> Contract {
    instantiate_contract_at(blueprint, name, ContractId::generate(), Utc::now())
}

#[must_use]
pub fn instantiate_contract_at(
    blueprint: &Blueprint,
    name: impl Into<String>,
    id: ContractId,
    created_at: DateTime<Utc>,
) -> Contract {
    Contract {
        id,
        name: name.into(),
        blueprint_id: blueprint.id().clone(),
        fields: blueprint
            .fields()
            .iter()
            .map(ContractField::from_template)
            .collect(),
        status: ContractStatus::Created,
        created_at,
    }
}

#[cfg(test)]
mod tests {
    use quill_types::{FieldKind, FieldUpdate, Position};

    use super::*;
    use crate::blueprint::editor;

    fn nda() -> Blueprint {
        Blueprint::new(
            BlueprintId::new("bp1"),
            "NDA",
            vec![
                Field::new(
                    FieldId::new("f1"),
                    "Name",
                    FieldKind::Text { required: true },
                    Position::new(0.0, 0.0),
                ),
                Field::new(
                    FieldId::new("f2"),
                    "Agree",
                    FieldKind::Checkbox { required: false },
                    Position::new(0.0, 60.0),
                ),
            ],
        )
    }

    #[test]
    fn instantiate_copies_layout_with_null_values() {
        let bp = nda();
        let contract = instantiate_contract(&bp, "Acme NDA");
        assert_eq!(contract.status(), ContractStatus::Created);
        assert_eq!(contract.blueprint_id(), bp.id());
        assert_eq!(contract.fields().len(), bp.fields().len());
        for (copy, original) in contract.fields().iter().zip(bp.fields()) {
            assert_eq!(copy.id(), original.id());
            assert_eq!(copy.field().position(), original.position());
            assert!(copy.value().is_none());
        }
    }

    #[test]
    fn blueprint_edits_do_not_reach_existing_contracts() {
        let bp = nda();
        let contract = instantiate_contract(&bp, "Acme NDA");
        let edited = editor::update_field(
            &bp,
            &FieldId::new("f1"),
            FieldUpdate {
                label: Some("Company".into()),
                ..FieldUpdate::default()
            },
        )
        .unwrap();
        assert_eq!(edited.fields()[0].label(), "Company");
        assert_eq!(contract.fields()[0].field().label(), "Name");
    }

    #[test]
    fn missing_required_lists_unanswered_required_fields() {
        let contract = instantiate_contract(&nda(), "Acme NDA");
        let missing: Vec<_> = contract.missing_required().iter().map(|f| f.id().clone()).collect();
        assert_eq!(missing, vec![FieldId::new("f1")]);

        let filled = contract.with_value(0, Some(FieldValue::text("Acme")));
        assert!(filled.missing_required().is_empty());
    }

    #[test]
    fn contract_json_uses_camel_case_and_null_values() {
        let created_at = Utc::now();
        let contract =
            instantiate_contract_at(&nda(), "Acme NDA", ContractId::new("c1"), created_at);
        let json = serde_json::to_value(&contract).unwrap();
        assert_eq!(json["blueprintId"], "bp1");
        assert_eq!(json["status"], "CREATED");
        assert!(json["fields"][0]["value"].is_null());
        assert_eq!(json["fields"][0]["required"], true);

        let back: Contract = serde_json::from_value(json).unwrap();
        assert_eq!(back.created_at(), created_at);
        assert_eq!(back.fields()[1].field_type(), FieldType::Checkbox);
    }

    #[test]
    fn contract_field_reads_flat_wire_shape() {
        let json = r#"{"id":"check_full_time","type":"checkbox","label":"Full time","position":{"x":50,"y":460},"value":true}"#;
        let field: ContractField = serde_json::from_str(json).unwrap();
        assert_eq!(field.value(), Some(&FieldValue::Bool(true)));
        assert!(field.is_answered());
    }
}
