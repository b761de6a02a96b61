//! Text canonicalization shared by registry indexing and query matching.
//!
//! Both sides of every comparison go through the same functions, so a
//! registry entry and a counselling row agree on spelling before any
//! lookup or similarity score is computed.

#![deny(unsafe_code)]

pub mod name;
pub mod state;

pub use name::{collapse_whitespace, normalize_name};
pub use state::normalize_state;
