//! The `quill` binary driven against a throwaway home directory.

use crate::common::{Sandbox, last_word};

/// Create a one-field blueprint plus a signature field, returning
/// `(blueprint, text field, signature field)`.
fn blueprint_with_signature(sandbox: &Sandbox) -> (String, String, String) {
    let blueprint = last_word(&sandbox.ok(&["blueprint", "create", "NDA", "--field", "text:Name"]));
    let text = last_word(&sandbox.ok(&["blueprint", "add-field", &blueprint, "text", "--label", "Company"]));
    let signature = last_word(&sandbox.ok(&[
        "blueprint",
        "add-field",
        &blueprint,
        "signature",
        "--label",
        "Signer",
    ]));
    (blueprint, text, signature)
}

#[test]
fn contract_goes_from_draft_to_signed() {
    let sandbox = Sandbox::new();
    let (blueprint, text, signature) = blueprint_with_signature(&sandbox);

    let contract = last_word(&sandbox.ok(&["contract", "create", &blueprint, "Acme NDA"]));
    sandbox.ok(&["contract", "set", &contract, &text, "Acme"]);

    let shown = sandbox.ok(&["contract", "show", &contract]);
    assert!(shown.starts_with("Acme NDA  [DRAFT]"), "{shown}");
    assert!(shown.contains("Acme"));

    sandbox.ok(&["contract", "transition", &contract, "APPROVED"]);
    sandbox.ok(&["contract", "transition", &contract, "SENT"]);
    let signed = sandbox.ok(&["contract", "sign", &contract, &signature, "Jane Doe"]);
    assert_eq!(signed.trim(), format!("Signed {signature} as Jane Doe"));
    sandbox.ok(&["contract", "transition", &contract, "signed"]);

    let err = sandbox.fails(&["contract", "set", &contract, &text, "Other"]);
    assert!(err.contains("can no longer be edited"), "{err}");

    let shown = sandbox.ok(&["contract", "show", &contract]);
    assert!(!shown.contains("[DRAFT]"));
    assert!(shown.contains("signed by Jane Doe"));
    assert!(shown.contains("next: LOCKED"));
}

#[test]
fn illegal_transition_is_reported() {
    let sandbox = Sandbox::new();
    let (blueprint, _, _) = blueprint_with_signature(&sandbox);
    let contract = last_word(&sandbox.ok(&["contract", "create", &blueprint, "Skip"]));

    let err = sandbox.fails(&["contract", "transition", &contract, "SIGNED"]);
    assert!(err.contains("CREATED"), "{err}");
    let shown = sandbox.ok(&["contract", "show", &contract]);
    assert!(shown.contains("status: CREATED"));
}

#[test]
fn blueprint_create_needs_a_name() {
    let sandbox = Sandbox::new();
    sandbox.fails(&["blueprint", "create", "  ", "--field", "text"]);
    assert_eq!(sandbox.ok(&["blueprint", "list"]).trim(), "No blueprints.");
}

#[test]
fn first_run_seeds_the_demo() {
    let sandbox = Sandbox::with_demo();
    let listed = sandbox.ok(&["contract", "list"]);
    assert!(listed.contains("Employment Agreement (Standard)"), "{listed}");
    assert!(sandbox.store_path().exists());

    let stats = sandbox.ok(&["stats"]);
    assert!(stats.contains("total:  1"));
    assert!(stats.contains("active: 1"));
}

#[test]
fn list_filters_and_searches() {
    let sandbox = Sandbox::new();
    let (blueprint, _, _) = blueprint_with_signature(&sandbox);
    let first = last_word(&sandbox.ok(&["contract", "create", &blueprint, "Alpha"]));
    sandbox.ok(&["contract", "create", &blueprint, "Beta"]);
    sandbox.ok(&["contract", "transition", &first, "REVOKED"]);

    let active = sandbox.ok(&["contract", "list", "--filter", "active"]);
    assert!(active.contains("Beta") && !active.contains("Alpha"), "{active}");

    let searched = sandbox.ok(&["contract", "list", "--search", "alp"]);
    assert!(searched.contains("Alpha") && !searched.contains("Beta"), "{searched}");

    let by_name = sandbox.ok(&["contract", "list", "--sort", "name-asc"]);
    let alpha = by_name.find("Alpha").expect("alpha listed");
    let beta = by_name.find("Beta").expect("beta listed");
    assert!(alpha < beta);
}

#[test]
fn store_flag_overrides_configured_location() {
    let sandbox = Sandbox::new();
    let custom = sandbox.home().join("elsewhere.json");
    let custom_arg = custom.to_str().expect("utf8 path");
    sandbox.ok(&["--store", custom_arg, "blueprint", "create", "Lease", "--field", "date"]);

    assert!(custom.exists());
    assert!(!sandbox.store_path().exists());
    assert!(sandbox.ok(&["--store", custom_arg, "blueprint", "list"]).contains("Lease"));
}

#[test]
fn config_set_store_is_picked_up() {
    let sandbox = Sandbox::new();
    let custom = sandbox.home().join("data").join("quill.json");
    let custom_arg = custom.to_str().expect("utf8 path");
    sandbox.ok(&["config", "set-store", custom_arg]);
    sandbox.ok(&["blueprint", "create", "Lease", "--field", "text:Tenant"]);
    assert!(custom.exists());

    let config = std::fs::read_to_string(sandbox.home().join(".quill").join("config.toml"))
        .expect("read config");
    assert!(config.contains("seed = false"), "{config}");
}
