use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown college type: {0:?}")]
    UnknownCollegeType(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
