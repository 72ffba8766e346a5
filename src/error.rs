use crate::domain::pricing::Ineligibility;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TheaterError>;

#[derive(Error, Debug)]
pub enum TheaterError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid licensing model: {0}")]
    InvalidLicensingModel(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Rejected: {0}")]
    Rejected(#[from] Rejection),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for TheaterError {
    fn from(err: rocksdb::Error) -> Self {
        Self::InternalError(Box::new(err))
    }
}

/// A business rule that was not met.
///
/// These are expected outcomes of normal operation and are reported back to
/// the caller instead of aborting the batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Invalid customer id: {0}")]
    UnknownCustomer(u64),
    #[error("Invalid movie id: {0}")]
    UnknownMovie(u64),
    #[error("Customer id is already registered: {0}")]
    CustomerExists(u64),
    #[error("Email is already in use: {0}")]
    EmailInUse(String),
    #[error("The movie is already purchased: {0}")]
    AlreadyPurchased(String),
    #[error("The customer already has the Advanced status")]
    AlreadyAdvanced,
    #[error("Cannot promote the customer: {0}")]
    CannotPromote(Ineligibility),
}
