use crate::error::OwmError;
use crate::model::UnitSystem;
use crate::model::forecast::{DayTime, Forecast, ForecastLocation, WeatherForecast};

use super::weather::{clouds, temperature, timezone, wind};
use super::{Node, parse, pressure, weather_states};

/// `data/2.5/forecast`.
pub(crate) fn forecast(body: &str, units: UnitSystem) -> Result<Forecast, OwmError> {
    parse(body, |root| {
        let entries = root
            .field("list")?
            .elements()?
            .iter()
            .map(|entry| forecast_entry(entry, units))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Forecast {
            location: location(&root.field("city")?)?,
            entries,
        })
    })
}

fn location(city: &Node<'_>) -> Result<ForecastLocation, OwmError> {
    Ok(ForecastLocation {
        id: city.optional("id")?.map(|n| n.u64()).transpose()?,
        name: city.optional_string("name")?,
        country_code: city.optional_string("country")?,
        coordinates: city.optional("coord")?.map(|c| c.coordinates()).transpose()?,
        population: city.optional("population")?.map(|n| n.u64()).transpose()?,
        timezone_offset: city.optional("timezone")?.map(|n| timezone(&n)).transpose()?,
        sunrise: city.optional_timestamp("sunrise")?,
        sunset: city.optional_timestamp("sunset")?,
    })
}

fn forecast_entry(entry: &Node<'_>, units: UnitSystem) -> Result<WeatherForecast, OwmError> {
    let main = entry.field("main")?;

    Ok(WeatherForecast {
        forecast_time: entry.field("dt")?.timestamp()?,
        states: weather_states(entry)?,
        temperature: temperature(&main, units)?,
        pressure: pressure(&main)?,
        humidity: main.field("humidity")?.u8()?,
        wind: wind(&entry.field("wind")?, units)?,
        visibility: entry.optional("visibility")?.map(|n| n.distance()).transpose()?,
        clouds: clouds(entry)?,
        precipitation_probability: entry.optional_f64("pop")?,
        rain: three_hour_volume(entry, "rain")?,
        snow: three_hour_volume(entry, "snow")?,
        day_time: day_time(entry)?,
    })
}

fn three_hour_volume(entry: &Node<'_>, key: &str) -> Result<Option<f64>, OwmError> {
    match entry.optional(key)? {
        Some(block) => block.optional_f64("3h"),
        None => Ok(None),
    }
}

/// `sys.pod`: `"d"` or `"n"`.
fn day_time(entry: &Node<'_>) -> Result<Option<DayTime>, OwmError> {
    let Some(sys) = entry.optional("sys")? else {
        return Ok(None);
    };
    let Some(pod) = sys.optional("pod")? else {
        return Ok(None);
    };

    match pod.string()?.as_str() {
        "d" => Ok(Some(DayTime::Day)),
        "n" => Ok(Some(DayTime::Night)),
        _ => Err(pod.error("expected \"d\" or \"n\"")),
    }
}
