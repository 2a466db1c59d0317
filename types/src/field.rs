//! Positioned, typed form fields.
//!
//! A field's variant is a closed sum type: each [`FieldKind`] carries only the
//! attributes that apply to it, so "content only on text blocks" and "options
//! only on selects" hold by construction. The variant of an existing field can
//! never change; [`FieldUpdate`] has no way to express it.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::FieldId;

// ── Page geometry ────────────────────────────────────────────

/// Page width in document units (A4 at 96 DPI).
pub const PAGE_WIDTH: f64 = 794.0;
/// Page height in document units (A4 at 96 DPI).
pub const PAGE_HEIGHT: f64 = 1123.0;
/// Snap grid used when fields are moved on the page.
pub const GRID_SIZE: f64 = 20.0;

/// Space kept free at the right edge so a moved field stays grabbable.
const MOVE_MARGIN_X: f64 = 200.0;
/// Space kept free at the bottom edge so a moved field stays grabbable.
const MOVE_MARGIN_Y: f64 = 50.0;

pub const INPUT_DEFAULT_WIDTH: f64 = 220.0;
pub const TEXT_BLOCK_DEFAULT_WIDTH: f64 = 300.0;

pub const TEXT_BLOCK_PLACEHOLDER: &str = "Double click to edit this text...";
pub const DEFAULT_SELECT_OPTIONS: [&str; 2] = ["Option 1", "Option 2"];

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

/// Top-left anchored coordinates on the page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Snap to the grid, then clamp so the field stays on the page.
    #[must_use]
    pub fn snapped(self) -> Self {
        let snap = |v: f64| (v / GRID_SIZE).round() * GRID_SIZE;
        Self {
            x: snap(self.x).clamp(0.0, PAGE_WIDTH - MOVE_MARGIN_X),
            y: snap(self.y).clamp(0.0, PAGE_HEIGHT - MOVE_MARGIN_Y),
        }
    }

    /// Default drop point for the `index`-th field added to a layout.
    #[must_use]
    pub fn stacked(index: usize) -> Self {
        Self {
            x: GRID_SIZE * 2.0,
            y: 50.0 + index as f64 * GRID_SIZE * 3.0,
        }
    }
}

/// Sizing hint: a plain number of units or a CSS length such as `"250px"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldWidth {
    Units(f64),
    Css(String),
}

impl FieldWidth {
    /// JSON has no encoding for NaN or infinities.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Units(units) => units.is_finite(),
            Self::Css(_) => true,
        }
    }
}

impl fmt::Display for FieldWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Units(units) => write!(f, "{units}"),
            Self::Css(css) => f.write_str(css),
        }
    }
}

// ── Field type tag ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Text,
    Date,
    Signature,
    Checkbox,
    Select,
    TextBlock,
}

impl FieldType {
    pub const ALL: [FieldType; 6] = [
        FieldType::Text,
        FieldType::Date,
        FieldType::Signature,
        FieldType::Checkbox,
        FieldType::Select,
        FieldType::TextBlock,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Date => "date",
            FieldType::Signature => "signature",
            FieldType::Checkbox => "checkbox",
            FieldType::Select => "select",
            FieldType::TextBlock => "textBlock",
        }
    }

    /// Parse the wire tag. Accepts `text_block` as an alias for `textBlock`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "text" => Some(FieldType::Text),
            "date" => Some(FieldType::Date),
            "signature" => Some(FieldType::Signature),
            "checkbox" => Some(FieldType::Checkbox),
            "select" => Some(FieldType::Select),
            "textBlock" | "text_block" | "textblock" => Some(FieldType::TextBlock),
            _ => None,
        }
    }

    /// Label given to a freshly added field before the author renames it.
    #[must_use]
    pub fn default_label(self) -> String {
        match self {
            FieldType::TextBlock => "Text Block".to_owned(),
            other => format!("New {}", other.as_str()),
        }
    }

    /// Whether the field collects a value when a contract is filled in.
    #[must_use]
    pub const fn takes_value(self) -> bool {
        !matches!(self, FieldType::TextBlock)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Field variants ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldKind {
    Text {
        #[serde(default, skip_serializing_if = "is_false")]
        required: bool,
    },
    Date {
        #[serde(default, skip_serializing_if = "is_false")]
        required: bool,
    },
    Signature {
        #[serde(default, skip_serializing_if = "is_false")]
        required: bool,
    },
    Checkbox {
        #[serde(default, skip_serializing_if = "is_false")]
        required: bool,
    },
    Select {
        #[serde(default, skip_serializing_if = "is_false")]
        required: bool,
        #[serde(default)]
        options: Vec<String>,
    },
    TextBlock {
        #[serde(default)]
        content: String,
    },
}

impl FieldKind {
    /// Variant with the defaults a new field of `field_type` starts from.
    #[must_use]
    pub fn default_for(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Text => FieldKind::Text { required: false },
            FieldType::Date => FieldKind::Date { required: false },
            FieldType::Signature => FieldKind::Signature { required: false },
            FieldType::Checkbox => FieldKind::Checkbox { required: false },
            FieldType::Select => FieldKind::Select {
                required: false,
                options: DEFAULT_SELECT_OPTIONS.iter().map(|&o| o.to_owned()).collect(),
            },
            FieldType::TextBlock => FieldKind::TextBlock {
                content: TEXT_BLOCK_PLACEHOLDER.to_owned(),
            },
        }
    }

    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        match self {
            FieldKind::Text { .. } => FieldType::Text,
            FieldKind::Date { .. } => FieldType::Date,
            FieldKind::Signature { .. } => FieldType::Signature,
            FieldKind::Checkbox { .. } => FieldType::Checkbox,
            FieldKind::Select { .. } => FieldType::Select,
            FieldKind::TextBlock { .. } => FieldType::TextBlock,
        }
    }

    fn required_mut(&mut self) -> Option<&mut bool> {
        match self {
            FieldKind::Text { required }
            | FieldKind::Date { required }
            | FieldKind::Signature { required }
            | FieldKind::Checkbox { required }
            | FieldKind::Select { required, .. } => Some(required),
            FieldKind::TextBlock { .. } => None,
        }
    }
}

// ── Field ────────────────────────────────────────────────────

/// A positioned element of a blueprint layout.
///
/// Equality and hashing go through [`Field::id`] only. Compare serialized
/// forms when full structural equality is needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    id: FieldId,
    label: String,
    #[serde(flatten)]
    kind: FieldKind,
    position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<FieldWidth>,
    #[serde(default, skip_serializing_if = "is_false")]
    hide_label: bool,
}

impl Field {
    #[must_use]
    pub fn new(id: FieldId, label: impl Into<String>, kind: FieldKind, position: Position) -> Self {
        Self {
            id,
            label: label.into(),
            kind,
            position,
            width: None,
            hide_label: false,
        }
    }

    /// New field with a fresh id and the defaults for `field_type`.
    #[must_use]
    pub fn create(field_type: FieldType, label: impl Into<String>, position: Position) -> Self {
        Self::new(
            FieldId::generate(),
            label,
            FieldKind::default_for(field_type),
            position,
        )
    }

    #[must_use]
    pub fn with_width(mut self, width: FieldWidth) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn id(&self) -> &FieldId {
        &self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn width(&self) -> Option<&FieldWidth> {
        self.width.as_ref()
    }

    /// Width the field renders at; `None` means auto-sized.
    #[must_use]
    pub fn effective_width(&self) -> Option<FieldWidth> {
        if let Some(width) = &self.width {
            return Some(width.clone());
        }
        match self.field_type() {
            FieldType::Checkbox => None,
            FieldType::TextBlock => Some(FieldWidth::Units(TEXT_BLOCK_DEFAULT_WIDTH)),
            FieldType::Text | FieldType::Date | FieldType::Signature | FieldType::Select => {
                Some(FieldWidth::Units(INPUT_DEFAULT_WIDTH))
            }
        }
    }

    #[must_use]
    pub fn hide_label(&self) -> bool {
        self.hide_label
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        match &self.kind {
            FieldKind::Text { required }
            | FieldKind::Date { required }
            | FieldKind::Signature { required }
            | FieldKind::Checkbox { required }
            | FieldKind::Select { required, .. } => *required,
            FieldKind::TextBlock { .. } => false,
        }
    }

    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::TextBlock { content } => Some(content),
            _ => None,
        }
    }

    #[must_use]
    pub fn options(&self) -> Option<&[String]> {
        match &self.kind {
            FieldKind::Select { options, .. } => Some(options),
            _ => None,
        }
    }

    /// A select without options cannot be answered.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.options().is_none_or(|options| !options.is_empty())
    }

    /// Position and width can be written to JSON without loss.
    #[must_use]
    pub fn has_finite_geometry(&self) -> bool {
        self.position.is_finite() && self.width.as_ref().is_none_or(FieldWidth::is_finite)
    }

    /// Merge a partial update into a copy of this field.
    ///
    /// The id and variant are preserved. Properties the variant does not carry
    /// are rejected rather than dropped.
    pub fn update(&self, update: &FieldUpdate) -> Result<Self, FieldUpdateError> {
        let mut next = self.clone();
        let field_type = self.field_type();

        if let Some(label) = &update.label {
            next.label.clone_from(label);
        }
        if let Some(position) = update.position {
            if !position.is_finite() {
                return Err(FieldUpdateError::NonFinite {
                    property: "position",
                });
            }
            next.position = position;
        }
        if let Some(width) = &update.width {
            if !width.is_finite() {
                return Err(FieldUpdateError::NonFinite { property: "width" });
            }
            next.width = Some(width.clone());
        }
        if let Some(hide_label) = update.hide_label {
            next.hide_label = hide_label;
        }
        if let Some(required) = update.required {
            let slot = next.kind.required_mut().ok_or(FieldUpdateError::NotApplicable {
                property: "required",
                field_type,
            })?;
            *slot = required;
        }
        if let Some(content) = &update.content {
            match &mut next.kind {
                FieldKind::TextBlock { content: slot } => slot.clone_from(content),
                _ => {
                    return Err(FieldUpdateError::NotApplicable {
                        property: "content",
                        field_type,
                    });
                }
            }
        }
        if let Some(options) = &update.options {
            match &mut next.kind {
                FieldKind::Select { options: slot, .. } => slot.clone_from(options),
                _ => {
                    return Err(FieldUpdateError::NotApplicable {
                        property: "options",
                        field_type,
                    });
                }
            }
        }
        Ok(next)
    }

    /// Copy of this field moved to `raw`, snapped to the grid and kept on the page.
    #[must_use]
    pub fn moved_to(&self, raw: Position) -> Self {
        let mut next = self.clone();
        next.position = raw.snapped();
        next
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Field {}

impl Hash for Field {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// ── Partial updates ──────────────────────────────────────────

/// Partial field update as sent by an editor.
///
/// There is deliberately no `type` member: a `"type"` key in incoming JSON is
/// ignored, so a variant change can only happen as delete plus re-create.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldUpdate {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub width: Option<FieldWidth>,
    #[serde(default)]
    pub hide_label: Option<bool>,
}

impl FieldUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldUpdateError {
    #[error("`{property}` does not apply to {field_type} fields")]
    NotApplicable {
        property: &'static str,
        field_type: FieldType,
    },
    #[error("`{property}` must be a finite number")]
    NonFinite { property: &'static str },
}
