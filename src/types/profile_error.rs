use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("ward number must be between 1 and {max}, got {0}", max = super::MAX_WARD)]
    InvalidWard(i64),
    #[error("invalid ward number: {0:?}")]
    InvalidWardText(String),
    #[error("unknown age group: {0:?}")]
    InvalidAgeGroup(String),
    #[error("unknown gender: {0:?}")]
    InvalidGender(String),
    #[error("unknown category: {0:?}")]
    InvalidCategory(String),
    #[error("unsupported locale: {0:?}")]
    InvalidLocale(String),
    #[error("unknown role: {0:?}")]
    InvalidRole(String),
    #[error("unknown page: {0:?}")]
    InvalidPage(String),
    #[error("label must not be empty")]
    EmptyLabel,
    #[error("area must be a finite, non-negative number, got {0}")]
    InvalidArea(f64),
    #[error("count {0} is larger than the store accepts")]
    CountTooLarge(u64),
}
