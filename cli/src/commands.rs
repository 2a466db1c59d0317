//! Command handlers. Each one reads from and writes to the loaded [`Store`] and
//! reports whether the store needs saving.

use std::io::Write;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Local, Utc};

use quill_core::{
    Blueprint, Contract, ContractField, ContractQuery, DashboardStats, Repository,
    apply_transition, available_transitions, blueprint_display_name, clear_signature,
    create_contract, editor, query_contracts, save_blueprint, set_field_value,
    set_signature_with_format,
};
use quill_store::Store;
use quill_types::{
    BlueprintId, ContractId, FieldId, FieldType, FieldUpdate, FieldValue, FieldWidth, Position,
    TimestampFormat,
};

use crate::{BlueprintCommand, ContractCommand, FieldUpdateArgs, render};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Unchanged,
    Changed,
}

pub(crate) struct Session<'a> {
    store: &'a mut Store,
    timestamp_format: TimestampFormat,
}

/// `<type>[:<label>]`, as accepted by `blueprint create --field`.
pub(crate) fn parse_field_spec(spec: &str) -> Result<(FieldType, Option<&str>)> {
    let (raw_type, label) = match spec.split_once(':') {
        Some((raw_type, label)) => (raw_type, Some(label.trim()).filter(|l| !l.is_empty())),
        None => (spec, None),
    };
    let field_type = FieldType::parse(raw_type.trim())
        .ok_or_else(|| anyhow!("unknown field type `{}` in `{spec}`", raw_type.trim()))?;
    Ok((field_type, label))
}

/// Interpret a command-line value for a field of `field_type`.
///
/// Unknown fields get a text value so the policy reports the real problem.
pub(crate) fn parse_value(field_type: Option<FieldType>, raw: &str) -> Result<FieldValue> {
    if field_type != Some(FieldType::Checkbox) {
        return Ok(FieldValue::text(raw));
    }
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" | "x" => Ok(FieldValue::Bool(true)),
        "false" | "no" | "off" | "0" => Ok(FieldValue::Bool(false)),
        other => bail!("checkbox value must be true or false, got `{other}`"),
    }
}

fn parse_width(raw: &str) -> Result<FieldWidth> {
    match raw.trim().parse::<f64>() {
        Ok(units) if units.is_finite() => Ok(FieldWidth::Units(units)),
        Ok(_) => bail!("width must be a finite number, got `{}`", raw.trim()),
        Err(_) => Ok(FieldWidth::Css(raw.trim().to_owned())),
    }
}

impl FieldUpdateArgs {
    pub(crate) fn into_update(self) -> Result<FieldUpdate> {
        if let Some(json) = self.json {
            return serde_json::from_str(&json).context("invalid field update JSON");
        }
        Ok(FieldUpdate {
            label: self.label,
            content: self.content,
            required: self.required,
            options: (!self.options.is_empty()).then_some(self.options),
            position: None,
            width: self.width.as_deref().map(parse_width).transpose()?,
            hide_label: self.hide_label,
        })
    }
}

impl<'a> Session<'a> {
    pub(crate) fn new(store: &'a mut Store, timestamp_format: TimestampFormat) -> Self {
        Self {
            store,
            timestamp_format,
        }
    }

    fn blueprint_by_id(&self, id: &str) -> Result<&Blueprint> {
        self.store
            .blueprints()
            .get(&BlueprintId::new(id))
            .ok_or_else(|| anyhow!("blueprint {id} not found"))
    }

    fn contract_by_id(&self, id: &str) -> Result<&Contract> {
        let contracts = self.store.contracts();
        if let Some(contract) = contracts.get(&ContractId::new(id)) {
            return Ok(contract);
        }
        // Listings show short ids, so accept an unambiguous prefix.
        let mut matches = contracts
            .list()
            .iter()
            .filter(|c| c.id().as_str().starts_with(id));
        match (matches.next(), matches.next()) {
            (Some(contract), None) if !id.is_empty() => Ok(contract),
            (Some(_), Some(_)) => bail!("contract id prefix {id} is ambiguous"),
            _ => bail!("contract {id} not found"),
        }
    }

    fn save(&mut self, blueprint: Blueprint) -> Result<Blueprint> {
        let saved = save_blueprint(self.store.blueprints_mut(), blueprint)?;
        Ok(saved)
    }

    fn replace(&mut self, contract: Contract) {
        self.store.contracts_mut().put(contract);
    }

    pub(crate) fn blueprint(
        &mut self,
        command: BlueprintCommand,
        out: &mut impl Write,
    ) -> Result<Outcome> {
        match command {
            BlueprintCommand::List => {
                let blueprints = self.store.blueprints().list();
                if blueprints.is_empty() {
                    writeln!(out, "No blueprints.")?;
                }
                for blueprint in blueprints {
                    render::blueprint_line(out, blueprint)?;
                }
                Ok(Outcome::Unchanged)
            }
            BlueprintCommand::Show { id } => {
                render::blueprint_detail(out, self.blueprint_by_id(&id)?)?;
                Ok(Outcome::Unchanged)
            }
            BlueprintCommand::Create { name, fields } => {
                let mut draft = Blueprint::create(name);
                for spec in &fields {
                    let (field_type, label) = parse_field_spec(spec)?;
                    draft = editor::add_new_field(&draft, field_type, label).0;
                }
                let saved = self.save(draft)?;
                writeln!(out, "Created blueprint {}", saved.id())?;
                Ok(Outcome::Changed)
            }
            BlueprintCommand::AddField {
                id,
                field_type,
                label,
            } => {
                let (next, field_id) =
                    editor::add_new_field(self.blueprint_by_id(&id)?, field_type, label.as_deref());
                self.save(next)?;
                writeln!(out, "Added {field_type} field {field_id}")?;
                Ok(Outcome::Changed)
            }
            BlueprintCommand::UpdateField { id, field, update } => {
                let update = update.into_update()?;
                if update.is_empty() {
                    bail!("nothing to update");
                }
                let next = editor::update_field(
                    self.blueprint_by_id(&id)?,
                    &FieldId::new(field.as_str()),
                    update,
                )?;
                self.save(next)?;
                writeln!(out, "Updated field {field}")?;
                Ok(Outcome::Changed)
            }
            BlueprintCommand::DeleteField { id, field } => {
                let next =
                    editor::delete_field(self.blueprint_by_id(&id)?, &FieldId::new(field.as_str()))?;
                self.save(next)?;
                writeln!(out, "Deleted field {field}")?;
                Ok(Outcome::Changed)
            }
            BlueprintCommand::Rename { id, name } => {
                let next = editor::rename_blueprint(self.blueprint_by_id(&id)?, name);
                let saved = self.save(next)?;
                writeln!(out, "Renamed blueprint {} to {}", saved.id(), saved.name())?;
                Ok(Outcome::Changed)
            }
            BlueprintCommand::MoveField { id, field, x, y } => {
                let field_id = FieldId::new(field.as_str());
                let next = editor::move_field(
                    self.blueprint_by_id(&id)?,
                    &field_id,
                    Position::new(x, y),
                )?;
                let saved = self.save(next)?;
                if let Some(moved) = saved.field(&field_id) {
                    let pos = moved.position();
                    writeln!(out, "Moved field {field} to ({}, {})", pos.x, pos.y)?;
                }
                Ok(Outcome::Changed)
            }
        }
    }

    pub(crate) fn contract(
        &mut self,
        command: ContractCommand,
        out: &mut impl Write,
    ) -> Result<Outcome> {
        match command {
            ContractCommand::List {
                filter,
                search,
                sort,
            } => {
                let query = ContractQuery {
                    filter,
                    search,
                    sort,
                };
                let blueprints = self.store.blueprints();
                let found = query_contracts(self.store.contracts(), blueprints, &query);
                if found.is_empty() {
                    writeln!(out, "No contracts.")?;
                }
                for contract in found {
                    let name = blueprint_display_name(blueprints, contract.blueprint_id());
                    render::contract_line(out, contract, name)?;
                }
                Ok(Outcome::Unchanged)
            }
            ContractCommand::Show { id } => {
                let contract = self.contract_by_id(&id)?;
                let name = blueprint_display_name(self.store.blueprints(), contract.blueprint_id());
                render::contract_detail(out, contract, name)?;
                Ok(Outcome::Unchanged)
            }
            ContractCommand::Create { blueprint, name } => {
                let (blueprints, contracts) = self.store.split_mut();
                let contract =
                    create_contract(blueprints, contracts, &BlueprintId::new(blueprint), &name)?;
                writeln!(out, "Created contract {}", contract.id())?;
                Ok(Outcome::Changed)
            }
            ContractCommand::Set {
                id,
                field,
                value,
                clear,
            } => {
                let contract = self.contract_by_id(&id)?;
                let field_id = FieldId::new(field.as_str());
                let value = if clear {
                    None
                } else {
                    let field_type = contract.field(&field_id).map(ContractField::field_type);
                    Some(parse_value(field_type, value.as_deref().unwrap_or_default())?)
                };
                let updated = set_field_value(contract, &field_id, value)?;
                self.replace(updated);
                writeln!(out, "Updated {field}")?;
                Ok(Outcome::Changed)
            }
            ContractCommand::Sign { id, field, signer } => {
                let contract = self.contract_by_id(&id)?;
                let signed = set_signature_with_format(
                    contract,
                    &FieldId::new(field.as_str()),
                    &signer,
                    &Local::now(),
                    &self.timestamp_format,
                )?;
                if signer.trim().is_empty() {
                    writeln!(out, "Signer name is empty; nothing signed")?;
                    return Ok(Outcome::Unchanged);
                }
                self.replace(signed);
                writeln!(out, "Signed {field} as {}", signer.trim())?;
                Ok(Outcome::Changed)
            }
            ContractCommand::Unsign { id, field } => {
                let contract = self.contract_by_id(&id)?;
                let cleared = clear_signature(contract, &FieldId::new(field.as_str()))?;
                self.replace(cleared);
                writeln!(out, "Cleared signature {field}")?;
                Ok(Outcome::Changed)
            }
            ContractCommand::Transition { id, status } => {
                let contract = self.contract_by_id(&id)?;
                let from = contract.status();
                let moved = apply_transition(contract, status)?;
                let short = moved.id().short().to_owned();
                self.replace(moved);
                writeln!(out, "Contract {short}: {from} -> {status}")?;
                Ok(Outcome::Changed)
            }
            ContractCommand::Transitions { id } => {
                let contract = self.contract_by_id(&id)?;
                let next = available_transitions(contract.status());
                if next.is_empty() {
                    writeln!(out, "{} is final; no transitions", contract.status())?;
                }
                for status in next {
                    writeln!(out, "{}", render::status_badge(*status))?;
                }
                Ok(Outcome::Unchanged)
            }
        }
    }

    pub(crate) fn stats(&mut self, out: &mut impl Write) -> Result<Outcome> {
        let stats = DashboardStats::collect(self.store.contracts().list());
        render::stats(out, &stats)?;
        Ok(Outcome::Unchanged)
    }

    pub(crate) fn seed_demo(&mut self, out: &mut impl Write) -> Result<Outcome> {
        if self.store.seed_demo(Utc::now()) {
            writeln!(out, "Seeded demo blueprint and contract")?;
            Ok(Outcome::Changed)
        } else {
            writeln!(out, "Store is not empty; demo not seeded")?;
            Ok(Outcome::Unchanged)
        }
    }
}
