//! View-model for the weather screen.
//!
//! [`WeatherPresenter`] owns a [`PresenterState`] and publishes every change
//! through a `tokio::sync::watch` channel. Display surfaces either take
//! snapshots with [`WeatherPresenter::state`] or follow changes through
//! [`WeatherPresenter::subscribe`]; they never write to the state.

use serde::{Deserialize, Serialize};
use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{error::LookupError, model::WeatherRecord, source::WeatherSource};

pub const EXTREME_WEATHER_ALERT: &str = "Extreme weather warning: stay indoors if you can";
pub const FREEZING_ALERT: &str = "Freezing temperatures: watch out for ice";

/// Colour hint for the temperature line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureTone {
    Cold,
    Normal,
    Hot,
}

impl TemperatureTone {
    pub fn of(record: &WeatherRecord) -> Self {
        if record.is_freezing() {
            TemperatureTone::Cold
        } else if record.temperature() > 30.0 {
            TemperatureTone::Hot
        } else {
            TemperatureTone::Normal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

/// Everything a display surface needs to render the weather screen.
///
/// The string fields and `temperature_tone` are derived from `record` and are
/// only ever rewritten together with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresenterState {
    pub record: Option<WeatherRecord>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub formatted_temperature: String,
    pub weather_description: String,
    pub weather_alert: Option<String>,
    pub temperature_tone: Option<TemperatureTone>,
}

impl PresenterState {
    pub fn phase(&self) -> Phase {
        if self.is_loading {
            Phase::Loading
        } else if self.error_message.is_some() {
            Phase::Error
        } else if self.record.is_some() {
            Phase::Success
        } else {
            Phase::Idle
        }
    }

    fn apply_record(&mut self, record: WeatherRecord) {
        self.formatted_temperature = format_temperature(&record);
        self.weather_description = describe(&record);
        self.weather_alert = alert_for(&record).map(str::to_owned);
        self.temperature_tone = Some(TemperatureTone::of(&record));
        self.record = Some(record);
    }
}

/// One decimal, Celsius and Fahrenheit, e.g. `22.5°C / 72.5°F`.
pub fn format_temperature(record: &WeatherRecord) -> String {
    format!("{:.1}°C / {:.1}°F", record.temperature(), record.temperature_in_fahrenheit())
}

pub fn describe(record: &WeatherRecord) -> String {
    format!(
        "{}, humidity {}%, wind {:.1} km/h",
        record.condition(),
        record.humidity(),
        record.wind_speed()
    )
}

/// Extreme weather wins over freezing.
pub fn alert_for(record: &WeatherRecord) -> Option<&'static str> {
    if record.is_extreme_weather() {
        Some(EXTREME_WEATHER_ALERT)
    } else if record.is_freezing() {
        Some(FREEZING_ALERT)
    } else {
        None
    }
}

#[derive(Debug)]
pub struct WeatherPresenter {
    source: Arc<dyn WeatherSource>,
    state: watch::Sender<PresenterState>,
    generation: AtomicU64,
}

impl WeatherPresenter {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        let (state, _) = watch::channel(PresenterState::default());
        Self { source, state, generation: AtomicU64::new(0) }
    }

    /// Receiver that is notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<PresenterState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> PresenterState {
        self.state.borrow().clone()
    }

    /// Look up the weather for `city`.
    ///
    /// The loading flag is raised and any previous error cleared when this is
    /// called, before the returned future is polled. If another fetch is
    /// started before this one settles, this one's outcome is dropped and the
    /// newer fetch owns the loading flag.
    pub fn fetch<'a>(&'a self, city: &str) -> impl Future<Output = ()> + Send + use<'a> {
        let city = city.to_owned();
        let generation = self.begin_fetch(&city);

        async move {
            let outcome = self.source.get_weather(&city).await;
            self.finish_fetch(generation, &city, outcome);
        }
    }

    fn begin_fetch(&self, city: &str) -> u64 {
        let mut generation = 0;

        // The generation only moves under the state lock, so a settling fetch
        // never sees a newer fetch half started.
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.is_loading = true;
            state.error_message = None;
        });
        debug!(city, generation, "fetch started");

        generation
    }

    fn finish_fetch(
        &self,
        generation: u64,
        city: &str,
        outcome: Result<WeatherRecord, LookupError>,
    ) {
        self.state.send_if_modified(|state| {
            let latest = self.generation.load(Ordering::SeqCst);
            if generation != latest {
                debug!(city, generation, latest, "discarding result of superseded fetch");
                return false;
            }

            match outcome {
                Ok(record) => {
                    info!(city, temperature = record.temperature(), "weather updated");
                    state.apply_record(record);
                }
                Err(err) => {
                    warn!(city, error = %err, "weather lookup failed");
                    state.error_message = Some(err.to_string());
                }
            }
            state.is_loading = false;
            true
        });
    }
}
