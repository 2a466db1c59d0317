//! Blueprint to signed contract, through the public API of the core crates.

use chrono::Utc;
use quill_core::{
    Blueprint, ContractError, InMemoryRepository, Repository, apply_transition,
    available_transitions, create_contract, editor, instantiate_contract, is_editable,
    save_blueprint, set_field_value, set_signature,
};
use quill_types::{
    BlueprintId, ContractStatus, FieldId, FieldType, FieldUpdate, FieldValue, SignatureStamp,
};

use crate::common::nda_blueprint;

#[test]
fn nda_contract_runs_the_full_lifecycle() {
    let f1 = FieldId::new("f1");
    let contract = instantiate_contract(&nda_blueprint(), "Acme NDA");
    assert_eq!(contract.status(), ContractStatus::Created);
    assert!(contract.fields()[0].value().is_none());

    let contract = set_field_value(&contract, &f1, Some(FieldValue::text("Acme"))).unwrap();
    let contract = apply_transition(&contract, ContractStatus::Approved).unwrap();

    let err = apply_transition(&contract, ContractStatus::Signed).unwrap_err();
    assert_eq!(
        err,
        ContractError::InvalidTransition {
            from: ContractStatus::Approved,
            to: ContractStatus::Signed,
        }
    );

    let contract = apply_transition(&contract, ContractStatus::Sent).unwrap();
    let contract = apply_transition(&contract, ContractStatus::Signed).unwrap();
    assert!(!is_editable(&contract));

    let err = set_field_value(&contract, &f1, Some(FieldValue::text("X"))).unwrap_err();
    assert_eq!(
        err,
        ContractError::ReadOnlyContract {
            status: ContractStatus::Signed
        }
    );
    assert_eq!(
        contract.field(&f1).unwrap().value(),
        Some(&FieldValue::text("Acme"))
    );
}

#[test]
fn every_reachable_status_stays_in_the_table() {
    let mut frontier = vec![instantiate_contract(&nda_blueprint(), "Walk")];
    let mut seen = vec![ContractStatus::Created];
    while let Some(contract) = frontier.pop() {
        for &next in available_transitions(contract.status()) {
            let moved = apply_transition(&contract, next).unwrap();
            assert!(ContractStatus::ALL.contains(&moved.status()));
            if !seen.contains(&next) {
                seen.push(next);
                frontier.push(moved);
            }
        }
    }
    seen.sort();
    assert_eq!(seen, ContractStatus::ALL.to_vec());
}

#[test]
fn empty_update_leaves_field_identical() {
    let bp = nda_blueprint();
    let field = &bp.fields()[0];
    let updated = field.update(&FieldUpdate::default()).unwrap();
    assert_eq!(
        serde_json::to_value(&updated).unwrap(),
        serde_json::to_value(field).unwrap()
    );
}

#[test]
fn contract_edits_never_reach_the_blueprint() {
    let bp = nda_blueprint();
    let before = serde_json::to_value(&bp).unwrap();
    let contract = instantiate_contract(&bp, "Copy");
    let _ = set_field_value(&contract, &FieldId::new("f1"), Some("Acme".into())).unwrap();
    assert_eq!(serde_json::to_value(&bp).unwrap(), before);
}

#[test]
fn signing_records_signer_on_first_line() {
    let (bp, sig) = editor::add_new_field(&nda_blueprint(), FieldType::Signature, Some("Signer"));
    let contract = instantiate_contract(&bp, "Signed NDA");
    let contract = apply_transition(&contract, ContractStatus::Approved).unwrap();
    let contract = apply_transition(&contract, ContractStatus::Sent).unwrap();

    let signed = set_signature(&contract, &sig, "Jane Doe", &Utc::now()).unwrap();
    let raw = signed.field(&sig).unwrap().value().unwrap().as_text().unwrap();
    assert_eq!(raw.split('\n').next(), Some("Jane Doe"));
    assert!(SignatureStamp::parse(raw).unwrap().signed_at().is_some());
}

#[test]
fn saving_requires_a_name_and_fields() {
    let mut repo = InMemoryRepository::new();
    assert!(save_blueprint(&mut repo, Blueprint::create("Lease")).is_err());
    assert!(save_blueprint(&mut repo, editor::rename_blueprint(&nda_blueprint(), " ")).is_err());
    assert!(save_blueprint(&mut repo, Blueprint::create("")).is_err());
    assert!(repo.is_empty());
}

#[test]
fn contracts_are_snapshots_of_their_blueprint() {
    let mut blueprints = InMemoryRepository::new();
    let mut contracts = InMemoryRepository::new();
    save_blueprint(&mut blueprints, nda_blueprint()).unwrap();
    let contract =
        create_contract(&blueprints, &mut contracts, &BlueprintId::new("bp1"), "Acme").unwrap();

    let renamed_field = editor::update_field(
        blueprints.get(&BlueprintId::new("bp1")).unwrap(),
        &FieldId::new("f1"),
        FieldUpdate {
            label: Some("Company".into()),
            ..FieldUpdate::default()
        },
    )
    .unwrap();
    save_blueprint(&mut blueprints, renamed_field).unwrap();

    let stored = contracts.get(contract.id()).unwrap();
    assert_eq!(stored.fields()[0].field().label(), "Name");
}
