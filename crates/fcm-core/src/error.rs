use thiserror::Error;

pub type FcmResult<T> = Result<T, FcmError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FcmError {
    #[error("Unknown activation function: {name}")]
    UnknownActivation { name: String },

    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}
