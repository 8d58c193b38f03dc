use crate::error::OwmError;
use crate::model::road_risk::{
    EventLevel, RoadAlert, RoadDetails, RoadRiskRecord, RoadState, RoadWeather,
};
use crate::model::{Coordinates, UnitSystem};

use super::{Node, parse};

/// Road risk values always come back in standard units.
const UNITS: UnitSystem = UnitSystem::Standard;

/// `data/2.5/roadrisk`: one record per submitted track point.
pub(crate) fn road_risk(body: &str) -> Result<Vec<RoadRiskRecord>, OwmError> {
    parse(body, |root| root.elements()?.iter().map(record).collect())
}

pub(crate) fn record(node: &Node<'_>) -> Result<RoadRiskRecord, OwmError> {
    let alerts = match node.optional("alerts")? {
        Some(alerts) => alerts.elements()?.iter().map(alert).collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    Ok(RoadRiskRecord {
        forecast_time: node.field("dt")?.timestamp()?,
        coordinates: node.optional("coord")?.map(|c| coordinates(&c)).transpose()?,
        weather: node.optional("weather")?.map(|w| weather(&w)).transpose()?,
        road: node.optional("road")?.map(|r| road(&r)).transpose()?,
        alerts,
    })
}

/// `[lat, lon]`, the order the track points were sent in.
fn coordinates(coord: &Node<'_>) -> Result<Coordinates, OwmError> {
    match coord.elements() {
        Ok(pair) if pair.len() == 2 => {
            let lat = pair[0].f64()?;
            let lon = pair[1].f64()?;
            Coordinates::new(lat, lon).map_err(|e| coord.error(e.to_string()))
        }
        Ok(_) => Err(coord.error("expected a [lat, lon] pair")),
        Err(_) => coord.coordinates(),
    }
}

fn weather(node: &Node<'_>) -> Result<RoadWeather, OwmError> {
    Ok(RoadWeather {
        temperature: node.field("temp")?.temperature(UNITS)?,
        wind_speed: node.field("wind_speed")?.speed(UNITS)?,
        wind_degrees: node.optional_f64("wind_deg")?,
        dew_point: node.optional_temperature("dew_point", UNITS)?,
        precipitation_intensity: node.optional_f64("precipitation_intensity")?,
        visibility: node.optional("visibility")?.map(|n| n.distance()).transpose()?,
    })
}

fn road(node: &Node<'_>) -> Result<RoadDetails, OwmError> {
    let state = match node.optional("state")? {
        Some(state) => Some(
            RoadState::from_value(state.i64()?)
                .ok_or_else(|| state.error("road state must be within 0..=8"))?,
        ),
        None => None,
    };

    Ok(RoadDetails {
        state,
        surface_temperature: node.optional_temperature("temp", UNITS)?,
    })
}

fn alert(node: &Node<'_>) -> Result<RoadAlert, OwmError> {
    let level = match node.optional("event_level")? {
        Some(level) => Some(
            EventLevel::from_value(level.i64()?)
                .ok_or_else(|| level.error("event level must be within 0..=4"))?,
        ),
        None => None,
    };

    Ok(RoadAlert {
        sender_name: node.optional_string("sender_name")?,
        event: node.field("event")?.string()?,
        level,
    })
}
