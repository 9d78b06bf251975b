//! Core library for the weather screen.
//!
//! This crate defines:
//! - The immutable weather model and its business predicates
//! - Abstraction over weather sources, with in-process mock sources
//! - The presenter (view-model) that turns lookups into display state
//! - Configuration handling for the mock sources
//!
//! It is used by `weather-cli`, but any display surface can drive a
//! [`WeatherPresenter`] and subscribe to its [`PresenterState`].

pub mod config;
pub mod error;
pub mod model;
pub mod presenter;
pub mod source;

pub use config::{Config, MockConfig};
pub use error::{LookupError, ValidationError};
pub use model::{Reading, WeatherCondition, WeatherRecord};
pub use presenter::{Phase, PresenterState, TemperatureTone, WeatherPresenter};
pub use source::{SourceId, WeatherSource, mock::MockWeatherSource};
