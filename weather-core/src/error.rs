use thiserror::Error;

/// Failure to look up weather for a city.
///
/// The mock sources never produce one; real network sources map their
/// failures onto these variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("City '{0}' not found")]
    CityNotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// A reading outside physically plausible bounds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Temperature {0}°C is outside the valid range -100..=150")]
    InvalidTemperature(f64),

    #[error("Humidity {0}% is outside the valid range 0..=100")]
    InvalidHumidity(u8),

    #[error("Wind speed {0} km/h is outside the valid range 0..=500")]
    InvalidWindSpeed(f64),
}
