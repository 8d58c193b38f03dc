//! Human-readable output for each command.

use chrono::{DateTime, Utc};

use owm_core::UnitSystem;
use owm_core::measurement::{Distance, DistanceUnit, Measurement, Speed, Temperature};
use owm_core::model::WeatherState;
use owm_core::model::air_pollution::AirPollutionDetails;
use owm_core::model::forecast::{Forecast, WeatherForecast};
use owm_core::model::geocoding::Geocoding;
use owm_core::model::road_risk::RoadRiskRecord;
use owm_core::model::weather::Weather;

pub fn weather(weather: &Weather, units: UnitSystem) -> String {
    let location = &weather.location;
    let mut place = location.name.clone().unwrap_or_else(|| "Unnamed location".to_string());
    if let Some(country) = &location.country_code {
        place.push_str(&format!(", {country}"));
    }

    let mut lines = vec![
        format!("{place} ({})", time(weather.calculated_at)),
        conditions(&weather.states),
    ];

    let t = &weather.temperature;
    let mut temperature = format!("Temperature: {}", temp(&t.value, units));
    if let Some(feels_like) = &t.feels_like {
        temperature.push_str(&format!(" (feels like {})", temp(feels_like, units)));
    }
    lines.push(temperature);
    lines.push(format!("Wind: {}", wind(&weather.wind.speed, weather.wind.degrees, units)));
    let mut details = format!("Humidity: {}%  Pressure: {} hPa", weather.humidity, weather.pressure.sea_level);
    if let Some(clouds) = weather.clouds {
        details.push_str(&format!("  Clouds: {clouds}%"));
    }
    lines.push(details);
    if let Some(visibility) = &weather.visibility {
        lines.push(format!("Visibility: {}", distance(visibility, units)));
    }
    if let Some(rain) = weather.rain.as_ref().and_then(|r| r.one_hour.or(r.three_hours)) {
        lines.push(format!("Rain: {rain} mm"));
    }
    if let Some(snow) = weather.snow.as_ref().and_then(|s| s.one_hour.or(s.three_hours)) {
        lines.push(format!("Snow: {snow} mm"));
    }

    lines.join("\n")
}

pub fn forecast(forecast: &Forecast, units: UnitSystem) -> String {
    let title = match &forecast.location.name {
        Some(name) => format!("Forecast for {name}"),
        None => "Forecast".to_string(),
    };
    let mut lines = vec![title];
    lines.extend(forecast.entries.iter().map(|e| forecast_entry(e, units)));
    lines.join("\n")
}

pub fn forecast_entry(entry: &WeatherForecast, units: UnitSystem) -> String {
    let mut line = format!(
        "{}  {:>10}  {}  wind {}",
        time(entry.forecast_time),
        temp(&entry.temperature.value, units),
        conditions(&entry.states),
        wind(&entry.wind.speed, entry.wind.degrees, units),
    );
    if let Some(pop) = entry.precipitation_probability {
        line.push_str(&format!("  precip {:.0}%", pop * 100.0));
    }
    line
}

pub fn air_pollution(details: &AirPollutionDetails) -> String {
    let mut lines = vec![format!("Air quality at {}", details.coordinates)];
    for record in &details.records {
        let c = &record.components;
        lines.push(format!(
            "{}  AQI {} ({})  PM2.5 {}  PM10 {}  O3 {}  NO2 {}  CO {} µg/m³",
            time(record.forecast_time),
            record.index.value(),
            record.index.description(),
            c.pm2_5,
            c.pm10,
            c.o3,
            c.no2,
            c.co,
        ));
    }
    lines.join("\n")
}

pub fn places(places: &[Geocoding]) -> String {
    if places.is_empty() {
        return "No matches".to_string();
    }

    places
        .iter()
        .map(|p| match &p.state {
            Some(state) => format!("{}, {}, {}  {}", p.name, state, p.country_code, p.coordinates),
            None => format!("{}, {}  {}", p.name, p.country_code, p.coordinates),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn road_risk(records: &[RoadRiskRecord], units: UnitSystem) -> String {
    if records.is_empty() {
        return "No road data".to_string();
    }

    let mut lines = Vec::new();
    for record in records {
        let mut line = time(record.forecast_time);
        if let Some(weather) = &record.weather {
            line.push_str(&format!(
                "  air {}  wind {}",
                temp(&weather.temperature, units),
                wind(&weather.wind_speed, weather.wind_degrees, units)
            ));
        }
        if let Some(road) = &record.road {
            if let Some(state) = road.state {
                line.push_str(&format!("  road {state:?}"));
            }
            if let Some(surface) = &road.surface_temperature {
                line.push_str(&format!(" at {}", temp(surface, units)));
            }
        }
        lines.push(line);

        for alert in &record.alerts {
            let level = alert.level.map(|l| format!("{l:?}")).unwrap_or_else(|| "?".into());
            match &alert.sender_name {
                Some(sender) => lines.push(format!("  [{level}] {} ({sender})", alert.event)),
                None => lines.push(format!("  [{level}] {}", alert.event)),
            }
        }
    }
    lines.join("\n")
}

fn time(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn conditions(states: &[WeatherState]) -> String {
    if states.is_empty() {
        return "-".to_string();
    }
    states.iter().map(|s| s.description.as_str()).collect::<Vec<_>>().join(", ")
}

fn temp(value: &Measurement<Temperature>, units: UnitSystem) -> String {
    value.format_in(units.temperature_unit())
}

fn wind(speed: &Measurement<Speed>, degrees: Option<f64>, units: UnitSystem) -> String {
    match degrees {
        Some(deg) => format!("{} from {deg}°", speed.format_in(units.speed_unit())),
        None => speed.format_in(units.speed_unit()),
    }
}

fn distance(value: &Measurement<Distance>, units: UnitSystem) -> String {
    match units {
        UnitSystem::Imperial => value.format_in(DistanceUnit::Miles),
        UnitSystem::Standard | UnitSystem::Metric => value.format_in(DistanceUnit::Kilometers),
    }
}
