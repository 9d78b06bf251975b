use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, ops::RangeInclusive};
use uuid::Uuid;

use crate::error::ValidationError;

const VALID_TEMPERATURE: RangeInclusive<f64> = -100.0..=150.0;
const VALID_HUMIDITY: RangeInclusive<u8> = 0..=100;
const VALID_WIND_SPEED: RangeInclusive<f64> = 0.0..=500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    Thunderstorm,
}

impl WeatherCondition {
    pub const ALL: [WeatherCondition; 5] = [
        WeatherCondition::Sunny,
        WeatherCondition::Cloudy,
        WeatherCondition::Rainy,
        WeatherCondition::Snowy,
        WeatherCondition::Thunderstorm,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "Sunny",
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::Rainy => "Rainy",
            WeatherCondition::Snowy => "Snowy",
            WeatherCondition::Thunderstorm => "Thunderstorm",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw readings of a single observation, without identity or time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: u8,
    /// km/h.
    pub wind_speed: f64,
    /// hPa.
    pub pressure: f64,
    pub condition: WeatherCondition,
}

impl Default for Reading {
    fn default() -> Self {
        Self {
            temperature: 22.5,
            humidity: 50,
            wind_speed: 10.0,
            pressure: 1013.0,
            condition: WeatherCondition::Sunny,
        }
    }
}

impl Reading {
    /// Check the reading against physically plausible bounds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !VALID_TEMPERATURE.contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature(self.temperature));
        }
        if !VALID_HUMIDITY.contains(&self.humidity) {
            return Err(ValidationError::InvalidHumidity(self.humidity));
        }
        if !VALID_WIND_SPEED.contains(&self.wind_speed) {
            return Err(ValidationError::InvalidWindSpeed(self.wind_speed));
        }
        Ok(())
    }
}

/// Immutable weather observation.
///
/// Fields are only reachable through accessors; a changed observation is
/// always a new record with a new id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    id: Uuid,
    #[serde(flatten)]
    reading: Reading,
    timestamp: DateTime<Utc>,
}

impl WeatherRecord {
    /// Record observed now. Bounds are not enforced, see [`WeatherRecord::try_new`].
    pub fn new(reading: Reading) -> Self {
        Self::observed_at(reading, Utc::now())
    }

    pub fn observed_at(reading: Reading, timestamp: DateTime<Utc>) -> Self {
        Self { id: Uuid::new_v4(), reading, timestamp }
    }

    pub fn try_new(reading: Reading) -> Result<Self, ValidationError> {
        reading.validate()?;
        Ok(Self::new(reading))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn reading(&self) -> &Reading {
        &self.reading
    }

    pub fn temperature(&self) -> f64 {
        self.reading.temperature
    }

    pub fn humidity(&self) -> u8 {
        self.reading.humidity
    }

    pub fn wind_speed(&self) -> f64 {
        self.reading.wind_speed
    }

    pub fn pressure(&self) -> f64 {
        self.reading.pressure
    }

    pub fn condition(&self) -> WeatherCondition {
        self.reading.condition
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_freezing(&self) -> bool {
        self.temperature() <= 0.0
    }

    pub fn is_precipitating(&self) -> bool {
        matches!(
            self.condition(),
            WeatherCondition::Rainy | WeatherCondition::Snowy | WeatherCondition::Thunderstorm
        )
    }

    pub fn is_extreme_weather(&self) -> bool {
        self.temperature() > 35.0 || self.temperature() < -10.0 || self.wind_speed() > 70.0
    }

    pub fn temperature_in_fahrenheit(&self) -> f64 {
        self.temperature() * 9.0 / 5.0 + 32.0
    }
}
