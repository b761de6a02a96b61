//! Curated alias table: free-text counselling names mapped to registry names.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use college_normalization::{collapse_whitespace, normalize_state};

use crate::error::Result;
use crate::reader::read_rows;

/// One curated alias as stored in the alias file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    /// Free-text name as it appears in counselling data.
    pub alias: String,
    /// Registry name the alias stands for.
    pub name: String,
    /// Restricts the alias to one state when present.
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AliasKey {
    alias: String,
    state: Option<String>,
}

impl AliasKey {
    fn new(alias: &str, state: Option<&str>) -> Self {
        Self {
            alias: alias_form(alias),
            state: state.map(normalize_state).filter(|s| !s.is_empty()),
        }
    }
}

fn alias_form(text: &str) -> String {
    collapse_whitespace(&text.trim().to_uppercase())
}

/// Lookup from free-text alias (optionally state-scoped) to registry name.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<AliasKey, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = AliasEntry>,
    {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry);
        }
        table
    }

    /// Add an alias. The first entry for a given alias and state wins.
    ///
    /// Returns false when the entry was ignored.
    pub fn insert(&mut self, entry: AliasEntry) -> bool {
        let target = entry.name.trim();
        let key = AliasKey::new(&entry.alias, entry.state.as_deref());
        if key.alias.is_empty() || target.is_empty() {
            warn!(alias = %entry.alias, "ignoring alias with empty alias or name");
            return false;
        }

        match self.entries.entry(key) {
            Entry::Occupied(existing) => {
                if existing.get() != target {
                    warn!(
                        alias = %existing.key().alias,
                        kept = %existing.get(),
                        ignored = target,
                        "conflicting alias entry"
                    );
                }
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(target.to_string());
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registry name for `name` in `state`, preferring a state-scoped alias.
    pub fn resolve(&self, name: &str, state: &str) -> Option<&str> {
        let alias = alias_form(name);
        if alias.is_empty() {
            return None;
        }
        let state = normalize_state(state);
        let mut key = AliasKey { alias, state: None };

        if !state.is_empty() {
            key.state = Some(state);
            if let Some(target) = self.entries.get(&key) {
                return Some(target.as_str());
            }
            key.state = None;
        }
        self.entries.get(&key).map(String::as_str)
    }
}

/// Read an alias table from a JSON array or CSV file (`alias,name,state`).
///
/// Rows that fail to decode are skipped with a warning.
pub fn read_aliases(path: &Path) -> Result<AliasTable> {
    let mut table = AliasTable::new();
    for (index, row) in read_rows::<AliasEntry>(path)?.into_iter().enumerate() {
        match row {
            Ok(entry) => {
                table.insert(entry);
            }
            Err(message) => warn!(row = index + 1, %message, "skipping alias row"),
        }
    }
    info!(path = %path.display(), aliases = table.len(), "loaded alias table");
    Ok(table)
}
