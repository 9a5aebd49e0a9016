use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum BridgeError {
    #[error("Attribute read failed: {0}")]
    AttributeRead(String),

    #[error("Attribute write failed: {0}")]
    AttributeWrite(String),

    #[error("Failed to configure reporting: {0}")]
    ConfigureReporting(String),

    #[error("Datapoint write failed: {0}")]
    DatapointWrite(String),

    #[error("Capability write failed: {0}")]
    CapabilityWrite(String),

    #[error("No channel with index {0}")]
    UnknownChannel(u8),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
