use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Vehicle with VIN {0} already exists")]
    DuplicateVin(String),

    #[error("Authority with code {0} already exists")]
    DuplicateAuthority(String),

    #[error("Invalid vehicle status: {0}")]
    InvalidStatus(String),

    #[error("Invalid access level: {0}")]
    InvalidAccessLevel(String),

    #[error("Invalid verification result: {0}")]
    InvalidVerificationResult(String),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
