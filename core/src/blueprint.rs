//! Blueprint aggregate: a named, ordered field layout used as a contract template.
//!
//! Authoring goes through [`editor`], which applies edits as pure transforms:
//! the input blueprint is left untouched and a successor is returned. Drafts may
//! be in any shape; [`Blueprint::validate`] is the gate for saving.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use quill_types::{BlueprintId, Field, FieldId, FieldUpdate, FieldUpdateError, Position};

/// Name a fresh blueprint starts with in the builder.
pub const UNTITLED_BLUEPRINT: &str = "Untitled Blueprint";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blueprint {
    id: BlueprintId,
    name: String,
    fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("blueprint name cannot be empty")]
    BlankName,
    #[error("blueprint must contain at least one field")]
    NoFields,
    #[error("duplicate field id {0}")]
    DuplicateFieldId(FieldId),
    #[error("select field {0} has no options")]
    SelectWithoutOptions(FieldId),
    #[error("field {0} has a non-finite position or width")]
    NonFiniteGeometry(FieldId),
}

impl Blueprint {
    #[must_use]
    pub fn new(id: BlueprintId, name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            id,
            name: name.into(),
            fields,
        }
    }

    /// Start an empty draft with a fresh id.
    #[must_use]
    pub fn create(name: impl Into<String>) -> Self {
        Self::new(BlueprintId::generate(), name, Vec::new())
    }

    #[must_use]
    pub fn id(&self) -> &BlueprintId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, field_id: &FieldId) -> Option<&Field> {
        self.fields.iter().find(|field| field.id() == field_id)
    }

    /// Checks applied before a blueprint may be persisted.
    ///
    /// The name is checked first so a blank name is reported regardless of
    /// the field list.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }
        if self.fields.is_empty() {
            return Err(ValidationError::NoFields);
        }
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.id()) {
                return Err(ValidationError::DuplicateFieldId(field.id().clone()));
            }
            if !field.is_usable() {
                return Err(ValidationError::SelectWithoutOptions(field.id().clone()));
            }
            if !field.has_finite_geometry() {
                return Err(ValidationError::NonFiniteGeometry(field.id().clone()));
            }
        }
        Ok(())
    }
}

impl PartialEq for Blueprint {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Blueprint {}

// ── Edit operations ──────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum BlueprintEdit {
    AddField(Field),
    UpdateField {
        field_id: FieldId,
        update: FieldUpdate,
    },
    /// Move to a raw drop point; the result is snapped and kept on the page.
    MoveField {
        field_id: FieldId,
        to: Position,
    },
    DeleteField(FieldId),
    Rename(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("field {0} not found")]
    UnknownField(FieldId),
    #[error("field {0} already exists on this blueprint")]
    DuplicateFieldId(FieldId),
    #[error("field {0} cannot move to a non-finite position")]
    NonFinitePosition(FieldId),
    #[error(transparent)]
    Field(#[from] FieldUpdateError),
}

pub mod editor {
    use quill_types::{Field, FieldId, FieldType, FieldUpdate, Position};

    use super::{Blueprint, BlueprintEdit, EditError};

    fn index_of(blueprint: &Blueprint, field_id: &FieldId) -> Result<usize, EditError> {
        blueprint
            .fields
            .iter()
            .position(|field| field.id() == field_id)
            .ok_or_else(|| EditError::UnknownField(field_id.clone()))
    }

    /// Applies an edit as a pure transform, returning the successor blueprint.
    pub fn apply(blueprint: &Blueprint, edit: BlueprintEdit) -> Result<Blueprint, EditError> {
        let mut next = blueprint.clone();
        match edit {
            BlueprintEdit::AddField(field) => {
                if next.field(field.id()).is_some() {
                    return Err(EditError::DuplicateFieldId(field.id().clone()));
                }
                next.fields.push(field);
            }
            BlueprintEdit::UpdateField { field_id, update } => {
                let index = index_of(&next, &field_id)?;
                next.fields[index] = next.fields[index].update(&update)?;
            }
            BlueprintEdit::MoveField { field_id, to } => {
                let index = index_of(&next, &field_id)?;
                if !to.is_finite() {
                    return Err(EditError::NonFinitePosition(field_id));
                }
                next.fields[index] = next.fields[index].moved_to(to);
            }
            BlueprintEdit::DeleteField(field_id) => {
                let index = index_of(&next, &field_id)?;
                next.fields.remove(index);
            }
            BlueprintEdit::Rename(name) => {
                next.name = name;
            }
        }
        Ok(next)
    }

    pub fn add_field(blueprint: &Blueprint, field: Field) -> Result<Blueprint, EditError> {
        apply(blueprint, BlueprintEdit::AddField(field))
    }

    /// Add a field of `field_type` at the next stacked drop point.
    ///
    /// Returns the successor blueprint and the id of the new field.
    #[must_use]
    pub fn add_new_field(
        blueprint: &Blueprint,
        field_type: FieldType,
        label: Option<&str>,
    ) -> (Blueprint, FieldId) {
        let label = label.map_or_else(|| field_type.default_label(), ToOwned::to_owned);
        let field = Field::create(field_type, label, Position::stacked(blueprint.fields.len()));
        let field_id = field.id().clone();
        let mut next = blueprint.clone();
        next.fields.push(field);
        (next, field_id)
    }

    pub fn update_field(
        blueprint: &Blueprint,
        field_id: &FieldId,
        update: FieldUpdate,
    ) -> Result<Blueprint, EditError> {
        apply(
            blueprint,
            BlueprintEdit::UpdateField {
                field_id: field_id.clone(),
                update,
            },
        )
    }

    pub fn move_field(
        blueprint: &Blueprint,
        field_id: &FieldId,
        to: Position,
    ) -> Result<Blueprint, EditError> {
        apply(
            blueprint,
            BlueprintEdit::MoveField {
                field_id: field_id.clone(),
                to,
            },
        )
    }

    pub fn delete_field(blueprint: &Blueprint, field_id: &FieldId) -> Result<Blueprint, EditError> {
        apply(blueprint, BlueprintEdit::DeleteField(field_id.clone()))
    }

    #[must_use]
    pub fn rename_blueprint(blueprint: &Blueprint, name: impl Into<String>) -> Blueprint {
        let mut next = blueprint.clone();
        next.name = name.into();
        next
    }
}

#[cfg(test)]
mod tests {
    use quill_types::{FieldKind, FieldType, FieldWidth};

    use super::editor::{
        add_field, add_new_field, delete_field, move_field, rename_blueprint, update_field,
    };
    use super::*;

    fn text(id: &str) -> Field {
        Field::new(
            FieldId::new(id),
            "Name",
            FieldKind::Text { required: false },
            Position::new(0.0, 0.0),
        )
    }

    fn nda() -> Blueprint {
        Blueprint::new(BlueprintId::new("bp1"), "NDA", vec![text("f1")])
    }

    #[test]
    fn create_starts_empty_with_fresh_id() {
        let a = Blueprint::create(UNTITLED_BLUEPRINT);
        let b = Blueprint::create(UNTITLED_BLUEPRINT);
        assert!(a.fields().is_empty());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn empty_draft_fails_validation() {
        let draft = Blueprint::create("Lease");
        assert_eq!(draft.validate(), Err(ValidationError::NoFields));
    }

    #[test]
    fn blank_name_reported_before_missing_fields() {
        let draft = Blueprint::create("   ");
        assert_eq!(draft.validate(), Err(ValidationError::BlankName));
        let filled = rename_blueprint(&nda(), "");
        assert_eq!(filled.validate(), Err(ValidationError::BlankName));
    }

    #[test]
    fn duplicate_ids_fail_validation() {
        let bp = Blueprint::new(BlueprintId::new("bp"), "Dup", vec![text("a"), text("a")]);
        assert_eq!(
            bp.validate(),
            Err(ValidationError::DuplicateFieldId(FieldId::new("a")))
        );
    }

    #[test]
    fn select_without_options_fails_validation() {
        let (bp, id) = add_new_field(&nda(), FieldType::Select, None);
        let bp = update_field(
            &bp,
            &id,
            FieldUpdate {
                options: Some(Vec::new()),
                ..FieldUpdate::default()
            },
        )
        .unwrap();
        assert_eq!(bp.validate(), Err(ValidationError::SelectWithoutOptions(id)));
    }

    #[test]
    fn add_field_rejects_existing_id() {
        let err = add_field(&nda(), text("f1")).unwrap_err();
        assert_eq!(err, EditError::DuplicateFieldId(FieldId::new("f1")));
    }

    #[test]
    fn add_new_field_uses_defaults_and_stacks() {
        let (bp, id) = add_new_field(&nda(), FieldType::Checkbox, None);
        let field = bp.field(&id).unwrap();
        assert_eq!(field.label(), "New checkbox");
        assert_eq!(field.position(), Position::stacked(1));
        assert_eq!(bp.fields().len(), 2);
    }

    #[test]
    fn edits_leave_the_original_untouched() {
        let original = nda();
        let renamed = rename_blueprint(&original, "Mutual NDA");
        let without = delete_field(&original, &FieldId::new("f1")).unwrap();
        assert_eq!(original.name(), "NDA");
        assert_eq!(original.fields().len(), 1);
        assert_eq!(renamed.name(), "Mutual NDA");
        assert!(without.fields().is_empty());
    }

    #[test]
    fn unknown_field_edits_fail() {
        let missing = FieldId::new("nope");
        assert_eq!(
            delete_field(&nda(), &missing).unwrap_err(),
            EditError::UnknownField(missing.clone())
        );
        assert!(update_field(&nda(), &missing, FieldUpdate::default()).is_err());
    }

    #[test]
    fn move_field_snaps_to_grid() {
        let moved = move_field(&nda(), &FieldId::new("f1"), Position::new(33.0, 2000.0)).unwrap();
        assert_eq!(
            moved.field(&FieldId::new("f1")).unwrap().position(),
            Position::new(40.0, 1073.0)
        );
    }

    #[test]
    fn move_field_rejects_non_finite_drop_point() {
        let f1 = FieldId::new("f1");
        for to in [
            Position::new(f64::NAN, 10.0),
            Position::new(0.0, f64::INFINITY),
        ] {
            assert_eq!(
                move_field(&nda(), &f1, to).unwrap_err(),
                EditError::NonFinitePosition(f1.clone())
            );
        }
    }

    #[test]
    fn non_finite_geometry_fails_validation() {
        let nan = Field::new(
            FieldId::new("f2"),
            "Lost",
            FieldKind::Text { required: false },
            Position::new(f64::NAN, 0.0),
        );
        let bp = add_field(&nda(), nan).unwrap();
        assert_eq!(
            bp.validate(),
            Err(ValidationError::NonFiniteGeometry(FieldId::new("f2")))
        );

        let wide = add_field(&nda(), text("f3").with_width(FieldWidth::Units(f64::INFINITY)))
            .unwrap();
        assert_eq!(
            wide.validate(),
            Err(ValidationError::NonFiniteGeometry(FieldId::new("f3")))
        );
    }

    #[test]
    fn blueprint_json_keeps_field_order() {
        let (bp, _) = add_new_field(&nda(), FieldType::TextBlock, Some("Intro"));
        let json = serde_json::to_value(&bp).unwrap();
        assert_eq!(json["fields"][0]["id"], "f1");
        assert_eq!(json["fields"][1]["type"], "textBlock");
        let back: Blueprint = serde_json::from_value(json).unwrap();
        assert_eq!(back.fields().len(), 2);
    }
}
