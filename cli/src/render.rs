//! Plain-text rendering of blueprints and contracts for terminal output.

use std::io::{self, Write};

use quill_core::{
    Blueprint, Contract, ContractField, DashboardStats, available_transitions, is_draft,
    is_editable, status_color,
};
use quill_types::{ContractStatus, Field, FieldKind, FieldValue, SignatureStamp};

pub(crate) fn status_badge(status: ContractStatus) -> String {
    let color = status_color(status);
    format!("{status} ({} {})", color.as_str(), color.hex())
}

pub(crate) fn blueprint_line(out: &mut impl Write, blueprint: &Blueprint) -> io::Result<()> {
    let count = blueprint.fields().len();
    let noun = if count == 1 { "field" } else { "fields" };
    writeln!(out, "{}  {}  ({count} {noun})", blueprint.id(), blueprint.name())
}

fn field_attributes(field: &Field) -> String {
    let mut attrs = Vec::new();
    if field.is_required() {
        attrs.push("required".to_owned());
    }
    if field.hide_label() {
        attrs.push("label hidden".to_owned());
    }
    match field.kind() {
        FieldKind::Select { options, .. } => attrs.push(format!("options: {}", options.join(" | "))),
        FieldKind::TextBlock { content } => attrs.push(format!("\"{content}\"")),
        _ => {}
    }
    if let Some(width) = field.effective_width() {
        attrs.push(format!("width {width}"));
    }
    attrs.join(", ")
}

fn field_line(out: &mut impl Write, field: &Field) -> io::Result<()> {
    let pos = field.position();
    writeln!(
        out,
        "  {:<20} {:<10} {:<24} @ ({}, {})  {}",
        field.id().as_str(),
        field.field_type().as_str(),
        field.label(),
        pos.x,
        pos.y,
        field_attributes(field)
    )
}

pub(crate) fn blueprint_detail(out: &mut impl Write, blueprint: &Blueprint) -> io::Result<()> {
    writeln!(out, "{}", blueprint.name())?;
    writeln!(out, "id: {}", blueprint.id())?;
    writeln!(out, "fields:")?;
    for field in blueprint.fields() {
        field_line(out, field)?;
    }
    Ok(())
}

pub(crate) fn contract_line(
    out: &mut impl Write,
    contract: &Contract,
    blueprint_name: &str,
) -> io::Result<()> {
    writeln!(
        out,
        "{}  {:<8}  {}  [{blueprint_name}]  {}",
        contract.id().short(),
        contract.status().as_str(),
        contract.name(),
        contract.created_at().format("%Y-%m-%d")
    )
}

pub(crate) fn field_value(field: &ContractField) -> String {
    match (field.field().kind(), field.value()) {
        (FieldKind::TextBlock { content }, _) => content.clone(),
        (FieldKind::Checkbox { .. }, value) => {
            let checked = value.and_then(FieldValue::as_bool).unwrap_or(false);
            (if checked { "[x]" } else { "[ ]" }).to_owned()
        }
        (FieldKind::Signature { .. }, Some(FieldValue::Text(raw))) => {
            match SignatureStamp::parse(raw) {
                Some(stamp) => match stamp.signed_at() {
                    Some(at) => format!("signed by {} on {at}", stamp.signer()),
                    None => format!("signed by {}", stamp.signer()),
                },
                None => "(unsigned)".to_owned(),
            }
        }
        (FieldKind::Signature { .. }, _) => "(unsigned)".to_owned(),
        (_, Some(value)) => value.to_string(),
        (_, None) => "(empty)".to_owned(),
    }
}

pub(crate) fn contract_detail(
    out: &mut impl Write,
    contract: &Contract,
    blueprint_name: &str,
) -> io::Result<()> {
    let watermark = if is_draft(contract.status()) {
        "  [DRAFT]"
    } else {
        ""
    };
    writeln!(out, "{}{watermark}", contract.name())?;
    writeln!(out, "id: {}", contract.id())?;
    writeln!(out, "blueprint: {blueprint_name} ({})", contract.blueprint_id())?;
    writeln!(out, "status: {}", status_badge(contract.status()))?;
    writeln!(out, "created: {}", contract.created_at().to_rfc3339())?;
    writeln!(
        out,
        "editable: {}",
        if is_editable(contract) { "yes" } else { "no" }
    )?;
    let next: Vec<_> = available_transitions(contract.status())
        .iter()
        .map(|s| s.as_str())
        .collect();
    writeln!(
        out,
        "next: {}",
        if next.is_empty() { "none".to_owned() } else { next.join(", ") }
    )?;
    writeln!(out, "fields:")?;
    for field in contract.fields() {
        let marker = if field.field().is_required() && !field.is_answered() {
            "*"
        } else {
            " "
        };
        writeln!(
            out,
            " {marker}{:<20} {:<10} {:<24} {}",
            field.id().as_str(),
            field.field_type().as_str(),
            field.field().label(),
            field_value(field)
        )?;
    }
    Ok(())
}

pub(crate) fn stats(out: &mut impl Write, stats: &DashboardStats) -> io::Result<()> {
    writeln!(out, "total:  {}", stats.total)?;
    writeln!(out, "active: {}", stats.active)?;
    writeln!(out, "signed: {}", stats.signed)
}
