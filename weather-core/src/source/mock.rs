use async_trait::async_trait;
use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use std::time::Duration;
use tracing::debug;

use crate::{
    error::LookupError,
    model::{Reading, WeatherCondition, WeatherRecord},
};

use super::WeatherSource;

pub const DEFAULT_LATENCY: Duration = Duration::from_secs(1);

/// In-process stand-in for a weather service.
///
/// Ignores the city, waits for a simulated latency and answers with either a
/// fixed reading or one drawn at random. Never fails.
#[derive(Debug)]
pub struct MockWeatherSource {
    latency: Duration,
    data: MockData,
}

#[derive(Debug)]
enum MockData {
    Fixed(Reading),
    Random(Mutex<StdRng>),
}

impl MockWeatherSource {
    /// Always answers with `reading`.
    pub fn fixed(reading: Reading) -> Self {
        Self { latency: DEFAULT_LATENCY, data: MockData::Fixed(reading) }
    }

    /// Random readings from an OS-seeded generator.
    pub fn random() -> Self {
        Self { latency: DEFAULT_LATENCY, data: MockData::Random(Mutex::new(StdRng::from_os_rng())) }
    }

    /// Random readings from a reproducible sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            latency: DEFAULT_LATENCY,
            data: MockData::Random(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    fn next_reading(&self) -> Reading {
        match &self.data {
            MockData::Fixed(reading) => *reading,
            MockData::Random(rng) => random_reading(&mut rng.lock()),
        }
    }
}

fn random_reading(rng: &mut StdRng) -> Reading {
    let condition = *WeatherCondition::ALL.choose(rng).unwrap_or(&WeatherCondition::Sunny);

    Reading {
        temperature: one_decimal(rng.random_range(-5.0..=35.0)),
        humidity: rng.random_range(30..=90),
        wind_speed: one_decimal(rng.random_range(0.0..=50.0)),
        pressure: one_decimal(rng.random_range(980.0..=1020.0)),
        condition,
    }
}

fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[async_trait]
impl WeatherSource for MockWeatherSource {
    async fn get_weather(&self, city: &str) -> Result<WeatherRecord, LookupError> {
        debug!(city, latency_ms = self.latency.as_millis() as u64, "simulating weather lookup");
        tokio::time::sleep(self.latency).await;

        Ok(WeatherRecord::new(self.next_reading()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn fixed_source_waits_then_returns_fixture() {
        let reading = Reading { temperature: -15.0, ..Reading::default() };
        let source = MockWeatherSource::fixed(reading);

        let started = Instant::now();
        let record = source.get_weather("Paris").await.expect("mock never fails");

        assert!(started.elapsed() >= DEFAULT_LATENCY);
        assert_eq!(*record.reading(), reading);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_latency_is_honoured() {
        let source = MockWeatherSource::fixed(Reading::default()).with_latency(Duration::from_millis(250));
        assert_eq!(source.latency(), Duration::from_millis(250));
        assert_eq!(MockWeatherSource::seeded(1).latency(), DEFAULT_LATENCY);

        let started = Instant::now();
        source.get_weather("Oslo").await.expect("mock never fails");

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(250));
        assert!(elapsed < DEFAULT_LATENCY);
    }

    #[tokio::test(start_paused = true)]
    async fn same_seed_gives_same_sequence() {
        let a = MockWeatherSource::seeded(7);
        let b = MockWeatherSource::seeded(7);

        for city in ["Paris", "Lima", "Tromsø"] {
            let ra = a.get_weather(city).await.expect("mock never fails");
            let rb = b.get_weather(city).await.expect("mock never fails");
            assert_eq!(ra.reading(), rb.reading());
        }
    }

    #[test]
    fn random_readings_stay_in_range_and_vary_condition() {
        let mut rng = StdRng::seed_from_u64(1234);
        let mut conditions = Vec::new();

        for _ in 0..500 {
            let r = random_reading(&mut rng);
            assert!((-5.0..=35.0).contains(&r.temperature), "temperature {}", r.temperature);
            assert!((30..=90).contains(&r.humidity), "humidity {}", r.humidity);
            assert!((0.0..=50.0).contains(&r.wind_speed), "wind {}", r.wind_speed);
            assert!((980.0..=1020.0).contains(&r.pressure), "pressure {}", r.pressure);
            assert!(r.validate().is_ok());

            if !conditions.contains(&r.condition) {
                conditions.push(r.condition);
            }
        }

        assert_eq!(conditions.len(), WeatherCondition::ALL.len());
    }
}
