//! Registry college types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use college_normalization::{normalize_name, normalize_state};

use crate::error::ModelError;

/// Kind of institution in the foundation registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CollegeType {
    Medical,
    Dental,
    #[serde(rename = "DNB")]
    Dnb,
}

impl CollegeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollegeType::Medical => "Medical",
            CollegeType::Dental => "Dental",
            CollegeType::Dnb => "DNB",
        }
    }
}

impl fmt::Display for CollegeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CollegeType {
    type Err = ModelError;

    /// Case-insensitive; accepts the registry spellings and their upper-case forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MEDICAL" => Ok(CollegeType::Medical),
            "DENTAL" => Ok(CollegeType::Dental),
            "DNB" => Ok(CollegeType::Dnb),
            _ => Err(ModelError::UnknownCollegeType(s.to_string())),
        }
    }
}

/// A registry row as it arrives from the source file, before validation.
///
/// Every field is defaulted so that one malformed row can be reported and
/// skipped instead of failing the whole file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCollege {
    #[serde(deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
    pub name: String,
    pub address: String,
    pub state: String,
    #[serde(rename = "type")]
    pub college_type: String,
    pub management: Option<String>,
    #[serde(alias = "university_affiliation")]
    pub university: Option<String>,
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    let id = Option::<RawId>::deserialize(deserializer)?;
    Ok(id.and_then(|id| match id {
        RawId::Number(value) => Some(value.to_string()),
        RawId::Text(value) => {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
    }))
}

/// Descriptive attributes of a college. Not used for identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollegeDetails {
    pub address: String,
    pub state: String,
    pub college_type: CollegeType,
    pub management: Option<String>,
    pub university_affiliation: Option<String>,
}

/// An immutable registry entity with its searchable name variants.
///
/// `searchable_names` always starts with the canonical name, followed by the
/// previous name when there is one. `normalized_names` is parallel to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollegeRecord {
    id: String,
    canonical_name: String,
    previous_name: Option<String>,
    #[serde(flatten)]
    details: CollegeDetails,
    normalized_state: String,
    searchable_names: Vec<String>,
    normalized_names: Vec<String>,
}

impl CollegeRecord {
    pub fn new(
        id: impl Into<String>,
        canonical_name: impl Into<String>,
        previous_name: Option<String>,
        details: CollegeDetails,
    ) -> Self {
        let canonical_name = canonical_name.into();
        let mut searchable_names = vec![canonical_name.clone()];
        if let Some(previous) = &previous_name {
            searchable_names.push(previous.clone());
        }
        let normalized_names = searchable_names
            .iter()
            .map(|name| normalize_name(name))
            .collect();
        let normalized_state = normalize_state(&details.state);

        Self {
            id: id.into(),
            canonical_name,
            previous_name,
            details,
            normalized_state,
            searchable_names,
            normalized_names,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub fn previous_name(&self) -> Option<&str> {
        self.previous_name.as_deref()
    }

    pub fn details(&self) -> &CollegeDetails {
        &self.details
    }

    pub fn address(&self) -> &str {
        &self.details.address
    }

    /// State exactly as it appears in the registry.
    pub fn state(&self) -> &str {
        &self.details.state
    }

    pub fn normalized_state(&self) -> &str {
        &self.normalized_state
    }

    pub fn college_type(&self) -> CollegeType {
        self.details.college_type
    }

    pub fn searchable_names(&self) -> &[String] {
        &self.searchable_names
    }

    pub fn normalized_names(&self) -> &[String] {
        &self.normalized_names
    }

    /// True when `name` is this record's canonical name rather than its alias.
    pub fn is_current_name(&self, name: &str) -> bool {
        self.canonical_name == name
    }
}
