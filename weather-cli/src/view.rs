use std::io::Write;

use chrono::Local;
use weather_core::{Phase, PresenterState, TemperatureTone, WeatherPresenter};

/// Run one fetch and write the screen to `out` each time the presenter
/// publishes a change.
pub async fn follow_fetch(
    presenter: &WeatherPresenter,
    city: &str,
    out: &mut impl Write,
) -> std::io::Result<()> {
    let mut rx = presenter.subscribe();
    let fetch = presenter.fetch(city);

    let first = render(&rx.borrow_and_update());
    writeln!(out, "{first}")?;

    let follow = async {
        loop {
            if rx.changed().await.is_err() {
                return Ok::<(), std::io::Error>(());
            }
            let (frame, done) = {
                let state = rx.borrow_and_update();
                (render(&state), !state.is_loading)
            };
            writeln!(out, "{frame}")?;
            if done {
                return Ok(());
            }
        }
    };

    let ((), written) = tokio::join!(fetch, follow);
    written
}

/// Text rendering of the weather screen: status line first, then the last
/// known record, which stays on screen while loading and under an error.
pub fn render(state: &PresenterState) -> String {
    let mut lines = Vec::new();

    match state.phase() {
        Phase::Idle => lines.push("Enter a city name to look up the weather.".to_string()),
        Phase::Loading => lines.push("Fetching weather...".to_string()),
        Phase::Error => {
            if let Some(message) = &state.error_message {
                lines.push(format!("Error: {message}"));
            }
        }
        Phase::Success => {}
    }

    if let Some(record) = &state.record {
        let tone = match state.temperature_tone {
            Some(TemperatureTone::Cold) => " (cold)",
            Some(TemperatureTone::Hot) => " (hot)",
            _ => "",
        };
        lines.push(format!("{}{tone}", state.formatted_temperature));
        lines.push(state.weather_description.clone());
        lines.push(format!(
            "Pressure {:.1} hPa, observed at {}",
            record.pressure(),
            record.timestamp().with_timezone(&Local).format("%H:%M:%S")
        ));
        if let Some(alert) = &state.weather_alert {
            lines.push(format!("! {alert}"));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::{sync::Arc, time::Duration};
    use weather_core::{
        LookupError, MockWeatherSource, Reading, WeatherRecord, WeatherSource,
        presenter::EXTREME_WEATHER_ALERT,
    };

    #[derive(Debug)]
    struct UnknownCity;

    #[async_trait]
    impl WeatherSource for UnknownCity {
        async fn get_weather(&self, city: &str) -> Result<WeatherRecord, LookupError> {
            tokio::task::yield_now().await;
            Err(LookupError::CityNotFound(city.to_owned()))
        }
    }

    fn presenter_with(reading: Reading) -> WeatherPresenter {
        WeatherPresenter::new(Arc::new(
            MockWeatherSource::fixed(reading).with_latency(Duration::ZERO),
        ))
    }

    async fn frames(presenter: &WeatherPresenter, city: &str) -> String {
        let mut out = Vec::new();
        follow_fetch(presenter, city, &mut out).await.expect("writing to a Vec cannot fail");
        String::from_utf8(out).expect("frames are utf-8")
    }

    #[test]
    fn idle_screen_prompts_for_city() {
        let out = render(&PresenterState::default());
        assert!(out.contains("Enter a city name"));
    }

    #[test]
    fn loading_screen_without_record() {
        let state = PresenterState { is_loading: true, ..PresenterState::default() };
        assert_eq!(render(&state), "Fetching weather...");
    }

    #[tokio::test]
    async fn success_screen_shows_record_and_alert() {
        let presenter = presenter_with(Reading { temperature: -15.0, ..Reading::default() });
        presenter.fetch("Yakutsk").await;

        let out = render(&presenter.state());
        assert!(out.contains("-15.0°C / 5.0°F (cold)"));
        assert!(out.contains("Sunny, humidity 50%"));
        assert!(out.contains(EXTREME_WEATHER_ALERT));
        assert!(!out.contains("Error"));
    }

    #[tokio::test]
    async fn error_screen_keeps_previous_record() {
        let presenter = presenter_with(Reading::default());
        presenter.fetch("Paris").await;

        let mut state = presenter.state();
        state.error_message = Some("City 'Atlantis' not found".to_string());

        let out = render(&state);
        let error_at = out.find("Error: City 'Atlantis' not found").expect("error line");
        let record_at = out.find("22.5°C").expect("record line");
        assert!(error_at < record_at);
    }

    #[tokio::test]
    async fn loading_screen_keeps_previous_record() {
        let presenter = presenter_with(Reading::default());
        presenter.fetch("Paris").await;

        let state = PresenterState { is_loading: true, ..presenter.state() };
        let out = render(&state);

        let loading_at = out.find("Fetching weather...").expect("loading line");
        let record_at = out.find("22.5°C").expect("record line");
        assert!(loading_at < record_at);
    }

    #[tokio::test]
    async fn follow_fetch_writes_loading_then_record() {
        let presenter = presenter_with(Reading::default());
        let out = frames(&presenter, "Paris").await;

        let loading_at = out.find("Fetching weather...").expect("loading frame");
        let record_at = out.rfind("22.5°C / 72.5°F").expect("record frame");
        assert!(loading_at < record_at);
        assert_eq!(presenter.state().phase(), Phase::Success);
    }

    #[tokio::test]
    async fn follow_fetch_writes_loading_then_error() {
        let presenter = WeatherPresenter::new(Arc::new(UnknownCity));
        let out = frames(&presenter, "Atlantis").await;

        let loading_at = out.find("Fetching weather...").expect("loading frame");
        let error_at = out.find("Error: City 'Atlantis' not found").expect("error frame");
        assert!(loading_at < error_at);
        assert_eq!(presenter.state().phase(), Phase::Error);
    }
}
