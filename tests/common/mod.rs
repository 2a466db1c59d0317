//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use quill_core::Blueprint;
use quill_types::{BlueprintId, Field, FieldId, FieldKind, Position};

/// `NDA` blueprint with one optional text field `f1`.
pub fn nda_blueprint() -> Blueprint {
    Blueprint::new(
        BlueprintId::new("bp1"),
        "NDA",
        vec![Field::new(
            FieldId::new("f1"),
            "Name",
            FieldKind::Text { required: false },
            Position::new(0.0, 0.0),
        )],
    )
}

/// A throwaway home directory with the CLI pointed at it.
pub struct Sandbox {
    dir: tempfile::TempDir,
}

impl Sandbox {
    /// Fresh home with demo seeding switched off.
    pub fn new() -> Self {
        let sandbox = Self::with_demo();
        let config = sandbox.home().join(".quill").join("config.toml");
        std::fs::create_dir_all(config.parent().expect("config dir")).expect("create config dir");
        std::fs::write(&config, "[demo]\nseed = false\n").expect("write config");
        sandbox
    }

    /// Fresh home with default config, so the first run seeds the demo.
    pub fn with_demo() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn home(&self) -> &Path {
        self.dir.path()
    }

    pub fn store_path(&self) -> PathBuf {
        self.home().join(".quill").join("store.json")
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_quill"))
            .args(args)
            .env("HOME", self.home())
            .env_remove("RUST_LOG")
            .current_dir(self.home())
            .output()
            .expect("run quill")
    }

    /// Run and require success, returning stdout.
    pub fn ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "quill {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).expect("utf8 stdout")
    }

    /// Run and require failure, returning stderr.
    pub fn fails(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(!output.status.success(), "quill {args:?} unexpectedly succeeded");
        String::from_utf8(output.stderr).expect("utf8 stderr")
    }
}

/// Last whitespace-separated word, where commands print created ids.
pub fn last_word(output: &str) -> String {
    output
        .split_whitespace()
        .last()
        .expect("non-empty output")
        .to_owned()
}
