use crate::{Config, WeatherRecord, error::LookupError, source::mock::MockWeatherSource};
use anyhow::Context;
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

pub mod mock;

/// Weather sources selectable from config and the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    Random,
    Fixed,
}

impl SourceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Random => "random",
            SourceId::Fixed => "fixed",
        }
    }

    pub const fn all() -> &'static [SourceId] {
        &[SourceId::Random, SourceId::Fixed]
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SourceId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "random" => Ok(SourceId::Random),
            "fixed" => Ok(SourceId::Fixed),
            _ => Err(anyhow::anyhow!(
                "Unknown source '{value}'. Supported sources: random, fixed."
            )),
        }
    }
}

/// Asynchronous lookup of the current weather for a city.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn get_weather(&self, city: &str) -> Result<WeatherRecord, LookupError>;
}

/// Construct a source from config and explicit SourceId.
pub fn source_from_config(id: SourceId, config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let latency = Duration::from_millis(config.mock.latency_ms);

    let source = match id {
        SourceId::Random => match config.mock.seed {
            Some(seed) => MockWeatherSource::seeded(seed),
            None => MockWeatherSource::random(),
        },
        SourceId::Fixed => {
            let reading = config.fixture().ok_or_else(|| {
                anyhow::anyhow!(
                    "No fixture configured for source '{id}'.\n\
                     Hint: run `weather configure {id}` and enter the reading to serve."
                )
            })?;
            reading.validate().context("Configured fixture is not a plausible reading")?;
            MockWeatherSource::fixed(reading)
        }
    };

    Ok(Box::new(source.with_latency(latency)))
}

/// Construct the default source from config, using `default_source` field.
pub fn default_source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let id = config.default_source_id()?;
    source_from_config(id, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Reading;

    #[test]
    fn source_id_as_str_roundtrip() {
        for id in SourceId::all() {
            let parsed = SourceId::try_from(id.as_str()).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
        assert_eq!(SourceId::try_from("FIXED").unwrap(), SourceId::Fixed);
    }

    #[test]
    fn unknown_source_error() {
        let err = SourceId::try_from("openweather").unwrap_err();
        assert!(err.to_string().contains("Unknown source"));
    }

    #[test]
    fn fixed_source_errors_without_fixture() {
        let cfg = Config::default();
        let err = source_from_config(SourceId::Fixed, &cfg).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No fixture configured for source 'fixed'"));
        assert!(msg.contains("Hint: run `weather configure fixed`"));
    }

    #[test]
    fn fixed_source_rejects_implausible_fixture() {
        let mut cfg = Config::default();
        cfg.set_fixture(Reading { humidity: 140, ..Reading::default() });

        let err = source_from_config(SourceId::Fixed, &cfg).unwrap_err();
        assert!(format!("{err:#}").contains("Humidity 140%"));
    }

    #[test]
    fn default_source_falls_back_to_random() {
        let cfg = Config::default();
        assert!(default_source_from_config(&cfg).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn configured_fixture_is_served() {
        let reading = Reading { temperature: 3.5, ..Reading::default() };
        let mut cfg = Config::default();
        cfg.set_fixture(reading);
        cfg.set_default_source(SourceId::Fixed);

        let source = default_source_from_config(&cfg).expect("fixed source must build");
        let record = source.get_weather("Bergen").await.expect("mock never fails");

        assert_eq!(*record.reading(), reading);
    }
}
