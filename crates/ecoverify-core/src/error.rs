//! Unified Error Model
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("VALIDATION/{0}")]
    Validation(String),

    #[error("IMAGE_FORMAT/{0}")]
    ImageFormat(String),

    #[error("MODEL_INPUT/{0}")]
    ModelInput(String),

    #[error("LABEL_MAP/{0}")]
    LabelMap(String),

    #[error("LOCATION/NO_DATA")]
    NoLocationData,

    #[error("REGISTRY/{0}")]
    Registry(String),

    #[error("ANALYSIS/{0}")]
    Analysis(String),
}
