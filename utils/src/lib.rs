//! Shared infrastructure utilities for Quill.
//!
//! Cross-cutting helpers that the config and store crates need but that don't
//! belong in the domain-pure `quill-types` crate:
//!
//! - **`atomic_write`**: Crash-safe file persistence (temp + rename)

pub mod atomic_write;

pub use atomic_write::{
    WriteOptions, atomic_write, atomic_write_with_options, backup_path, recover_bak_file,
};
