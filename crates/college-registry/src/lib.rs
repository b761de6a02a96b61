//! Foundation registry loading.
//!
//! Reads the canonical college list from JSON or CSV, validates each row,
//! extracts parenthetical previous names and produces immutable
//! [`CollegeRecord`](college_model::CollegeRecord) values. Also loads the
//! curated alias table applied by the matcher before its first pass.

#![deny(unsafe_code)]

mod aliases;
mod error;
mod loader;
mod reader;

// === Error Types ===
pub use error::{RegistryError, Result};

// === Loading ===
pub use loader::{LoadOutcome, SkipReason, SkippedEntry, load_colleges, split_previous_name};

// === File Reading ===
pub use reader::read_registry;

// === Aliases ===
pub use aliases::{AliasEntry, AliasTable, read_aliases};
