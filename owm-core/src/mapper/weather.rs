use crate::error::OwmError;
use crate::model::UnitSystem;
use crate::model::weather::{Location, Precipitation, TemperatureReading, Weather, Wind};

use super::{Node, parse, pressure, weather_states};

/// `data/2.5/weather`.
pub(crate) fn current_weather(body: &str, units: UnitSystem) -> Result<Weather, OwmError> {
    parse(body, |root| {
        let main = root.field("main")?;
        let sys = root.optional("sys")?;

        Ok(Weather {
            location: Location {
                id: root.optional("id")?.map(|n| n.u64()).transpose()?,
                name: root.optional_string("name")?,
                country_code: sys.as_ref().map(|s| s.optional_string("country")).transpose()?.flatten(),
                coordinates: root.optional("coord")?.map(|c| c.coordinates()).transpose()?,
                sunrise: sys.as_ref().map(|s| s.optional_timestamp("sunrise")).transpose()?.flatten(),
                sunset: sys.as_ref().map(|s| s.optional_timestamp("sunset")).transpose()?.flatten(),
                timezone_offset: root.optional("timezone")?.map(|n| timezone(&n)).transpose()?,
            },
            calculated_at: root.field("dt")?.timestamp()?,
            states: weather_states(&root)?,
            temperature: temperature(&main, units)?,
            pressure: pressure(&main)?,
            humidity: main.field("humidity")?.u8()?,
            wind: wind(&root.field("wind")?, units)?,
            visibility: root.optional("visibility")?.map(|n| n.distance()).transpose()?,
            clouds: clouds(&root)?,
            rain: root.optional("rain")?.map(|n| precipitation(&n)).transpose()?,
            snow: root.optional("snow")?.map(|n| precipitation(&n)).transpose()?,
        })
    })
}

/// `main.temp`, `main.feels_like`, `main.temp_min`, `main.temp_max`.
pub(crate) fn temperature(main: &Node<'_>, units: UnitSystem) -> Result<TemperatureReading, OwmError> {
    Ok(TemperatureReading {
        value: main.field("temp")?.temperature(units)?,
        feels_like: main.optional_temperature("feels_like", units)?,
        min: main.optional_temperature("temp_min", units)?,
        max: main.optional_temperature("temp_max", units)?,
    })
}

/// `wind.speed`, `wind.deg`, `wind.gust`.
pub(crate) fn wind(wind: &Node<'_>, units: UnitSystem) -> Result<Wind, OwmError> {
    Ok(Wind {
        speed: wind.field("speed")?.speed(units)?,
        degrees: wind.optional_f64("deg")?,
        gust: wind.optional("gust")?.map(|n| n.speed(units)).transpose()?,
    })
}

/// `clouds.all`; `None` when the block is missing.
pub(crate) fn clouds(node: &Node<'_>) -> Result<Option<u8>, OwmError> {
    match node.optional("clouds")? {
        Some(clouds) => clouds.field("all")?.u8().map(Some),
        None => Ok(None),
    }
}

fn precipitation(node: &Node<'_>) -> Result<Precipitation, OwmError> {
    Ok(Precipitation {
        one_hour: node.optional_f64("1h")?,
        three_hours: node.optional_f64("3h")?,
    })
}

pub(crate) fn timezone(node: &Node<'_>) -> Result<i32, OwmError> {
    i32::try_from(node.i64()?).map_err(|_| node.error("timezone offset out of range"))
}
