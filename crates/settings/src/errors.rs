use thiserror::Error;

/// Failures surfaced by the settings store's public operations.
///
/// Validation rejection of an individual field is deliberately not a variant:
/// a rejected value only skips that field, it never fails the operation.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("malformed settings document: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to read settings blob: {0}")]
    StorageRead(#[source] std::io::Error),

    #[error("failed to write settings blob: {0}")]
    StorageWrite(#[source] std::io::Error),
}
