use crate::error::ConfigError;
use rust_decimal::Decimal;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::Config;

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file if one exists, deserializes it into our strongly-typed
/// `Config` struct, validates it, and returns it. A missing file yields the
/// defaults rather than an error.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // Tells the builder to look for a file named `config.toml`; the host
        // may legitimately run without one.
        .add_source(config::File::with_name("config.toml").required(false))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;

    if config.account_value <= Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "account_value must be positive".to_string(),
        ));
    }

    Ok(config)
}
