use inquire::{CustomType, Select};
use weather_core::{Config, Reading, SourceId, WeatherCondition};

/// Ask for the settings of `id` and store them, making `id` the default source.
pub fn prompt(id: SourceId, config: &mut Config) -> anyhow::Result<()> {
    println!("Configuring source: {id}");

    if id == SourceId::Fixed {
        config.set_fixture(prompt_fixture(config.fixture().unwrap_or_default())?);
    }

    config.mock.latency_ms = CustomType::<u64>::new("Simulated latency (ms):")
        .with_default(config.mock.latency_ms)
        .prompt()?;

    if id == SourceId::Random {
        config.mock.seed = CustomType::<u64>::new("Seed:")
            .with_help_message("Esc for a fresh sequence on every run")
            .prompt_skippable()?;
    }

    config.set_default_source(id);
    Ok(())
}

fn prompt_fixture(current: Reading) -> anyhow::Result<Reading> {
    let temperature = CustomType::<f64>::new("Temperature (°C):")
        .with_default(current.temperature)
        .prompt()?;
    let humidity = CustomType::<u8>::new("Humidity (%):").with_default(current.humidity).prompt()?;
    let wind_speed = CustomType::<f64>::new("Wind speed (km/h):")
        .with_default(current.wind_speed)
        .prompt()?;
    let pressure = CustomType::<f64>::new("Pressure (hPa):")
        .with_default(current.pressure)
        .prompt()?;

    let cursor =
        WeatherCondition::ALL.iter().position(|c| *c == current.condition).unwrap_or_default();
    let condition = Select::new("Condition:", WeatherCondition::ALL.to_vec())
        .with_starting_cursor(cursor)
        .prompt()?;

    let reading = Reading { temperature, humidity, wind_speed, pressure, condition };
    reading.validate()?;

    Ok(reading)
}
