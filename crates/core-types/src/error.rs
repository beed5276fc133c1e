use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Unparseable {0} field: {1:?}")]
    InvalidDate(String, String),

    #[error("Calculation error: {0}")]
    Calculation(String),
}
