//! Store and config files on disk.

use chrono::Utc;
use quill_config::{QuillConfig, persist_store_path_to};
use quill_core::{ContractFilter, DashboardStats, Repository, apply_transition, create_contract};
use quill_core::save_blueprint;
use quill_store::Store;
use quill_types::{BlueprintId, ContractStatus, FieldId, FieldValue};

use crate::common::nda_blueprint;

#[test]
fn filled_contract_survives_a_reload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("store.json");

    let mut store = Store::new();
    save_blueprint(store.blueprints_mut(), nda_blueprint()).expect("save blueprint");
    let (blueprints, contracts) = store.split_mut();
    let contract = create_contract(blueprints, contracts, &BlueprintId::new("bp1"), "Acme")
        .expect("create");
    let filled = quill_core::set_field_value(&contract, &FieldId::new("f1"), Some("Acme".into()))
        .expect("fill");
    let sent = apply_transition(&filled, ContractStatus::Approved)
        .and_then(|c| apply_transition(&c, ContractStatus::Sent))
        .expect("advance");
    store.contracts_mut().put(sent);
    store.save(&path).expect("save");

    let loaded = Store::load(&path).expect("load");
    let reloaded = loaded.contracts().get(contract.id()).expect("contract");
    assert_eq!(reloaded.status(), ContractStatus::Sent);
    assert_eq!(
        reloaded.field(&FieldId::new("f1")).and_then(|f| f.value()),
        Some(&FieldValue::text("Acme"))
    );
    assert_eq!(reloaded.created_at(), contract.created_at());
    assert!(ContractFilter::Active.matches(reloaded.status()));
}

#[test]
fn demo_store_reports_stats() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("store.json");
    let mut store = Store::new();
    assert!(store.seed_demo(Utc::now()));
    store.save(&path).expect("save");

    let loaded = Store::load(&path).expect("load");
    let stats = DashboardStats::collect(loaded.contracts().list());
    assert_eq!((stats.total, stats.active, stats.signed), (1, 1, 0));
}

#[test]
fn corrupt_store_is_an_error_not_an_empty_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{ not json").expect("write");
    assert!(Store::load(&path).is_err());
    assert_eq!(std::fs::read_to_string(&path).expect("read"), "{ not json");
}

#[test]
fn persisted_store_path_keeps_other_settings() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join(".quill").join("config.toml");
    std::fs::create_dir_all(config.parent().expect("parent")).expect("mkdir");
    std::fs::write(
        &config,
        "# personal settings\n[signature]\ntimestamp_format = \"%Y-%m-%d\"\n",
    )
    .expect("write");

    let store = dir.path().join("contracts.json");
    persist_store_path_to(&config, &store).expect("persist");

    let raw = std::fs::read_to_string(&config).expect("read");
    assert!(raw.starts_with("# personal settings"));

    let loaded = QuillConfig::load_from(&config).expect("load").expect("present");
    assert_eq!(loaded.store_path(), store);
    assert_eq!(
        loaded.timestamp_format().expect("format").as_str(),
        "%Y-%m-%d"
    );
}

#[test]
fn missing_config_means_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let loaded = QuillConfig::load_from(&dir.path().join("config.toml")).expect("load");
    assert!(loaded.is_none());
    assert!(QuillConfig::default().seed_demo());
}
