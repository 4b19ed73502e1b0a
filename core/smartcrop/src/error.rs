use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmartCropError {
    #[error("expected a target width or height, got 0x0")]
    InvalidTarget,

    #[error("face detector unavailable: {0}")]
    DetectorUnavailable(String),

    #[error("invalid detector input: {0}")]
    DetectorInputInvalid(String),

    #[error("invalid crop configuration: {0}")]
    InvalidConfig(String),

    #[error("no crop candidates fit a {width}x{height} canvas")]
    NoCandidates { width: u32, height: u32 },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SmartCropError>;
