#![deny(unsafe_code)]

pub mod college;
pub mod error;
pub mod result;

pub use college::{CollegeDetails, CollegeRecord, CollegeType, RawCollege};
pub use error::{ModelError, Result};
pub use result::{MatchMethod, MatchResult, MatchType};
