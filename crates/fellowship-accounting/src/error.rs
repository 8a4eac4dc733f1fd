use thiserror::Error as ThisError;

#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Please enter member name")]
    EmptyName,
    #[error("A member with the name {0} already exists")]
    DuplicateName(String),
    #[error("Month {0} is not between 1 and 12")]
    InvalidMonth(u32),
    #[error("Please enter a valid amount")]
    InvalidAmount,
    #[error("Please enter a description")]
    MissingDescription,
    #[error("Please select a member")]
    MissingMember,
    #[error("Unknown transaction kind {0}")]
    UnknownKind(String),
}
