use thiserror::Error;

pub type ShmResult<T> = Result<T, ShmError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShmError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Unknown quantity: {name}")]
    UnknownQuantity { name: String },

    #[error("Unknown oscillator family: {name}")]
    UnknownFamily { name: String },
}
