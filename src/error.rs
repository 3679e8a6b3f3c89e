use thiserror::Error;

#[derive(Error, Debug)]
pub enum FerryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No serializable data: {0}")]
    NoSerializableData(String),

    #[error("No deserializable data")]
    NoDeserializableData,

    #[error("Serializable data corrupted: {0}")]
    SerializableDataCorrupted(String),

    #[error("Deserializable data corrupted: {0}")]
    DeserializableDataCorrupted(String),

    #[error("Namespace not found: {0}")]
    NoNamespace(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl FerryError {
    pub(crate) fn corrupted(msg: impl Into<String>) -> FerryError {
        FerryError::DeserializableDataCorrupted(msg.into())
    }

    pub(crate) fn encode_failed(msg: impl Into<String>) -> FerryError {
        FerryError::SerializableDataCorrupted(msg.into())
    }

    pub(crate) fn invalid_argument(msg: impl Into<String>) -> FerryError {
        FerryError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, FerryError>;
