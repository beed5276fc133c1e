use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid month number: {0} (expected 1-12)")]
    InvalidMonth(u32),

    #[error("Calculation error: {0}")]
    Calculation(String),
}
