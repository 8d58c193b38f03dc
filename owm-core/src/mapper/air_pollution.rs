use crate::error::OwmError;
use crate::model::Coordinates;
use crate::model::air_pollution::{
    AirPollutionComponents, AirPollutionDetails, AirPollutionRecord, AirQualityIndex,
};

use super::{Node, parse};

/// `data/2.5/air_pollution`, `/forecast` and `/history` share this shape.
pub(crate) fn air_pollution(body: &str) -> Result<AirPollutionDetails, OwmError> {
    parse(body, |root| {
        let records = root
            .field("list")?
            .elements()?
            .iter()
            .map(record)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AirPollutionDetails {
            coordinates: coordinates(&root.field("coord")?)?,
            records,
        })
    })
}

/// Documented as `[lon, lat]`, served as `{"lon": .., "lat": ..}`.
fn coordinates(coord: &Node<'_>) -> Result<Coordinates, OwmError> {
    match coord.elements() {
        Ok(pair) if pair.len() == 2 => {
            let lon = pair[0].f64()?;
            let lat = pair[1].f64()?;
            Coordinates::new(lat, lon).map_err(|e| coord.error(e.to_string()))
        }
        Ok(_) => Err(coord.error("expected a [lon, lat] pair")),
        Err(_) => coord.coordinates(),
    }
}

fn record(node: &Node<'_>) -> Result<AirPollutionRecord, OwmError> {
    let aqi = node.field("main")?.field("aqi")?;
    let components = node.field("components")?;

    Ok(AirPollutionRecord {
        forecast_time: node.field("dt")?.timestamp()?,
        index: AirQualityIndex::from_value(aqi.i64()?)
            .ok_or_else(|| aqi.error("air quality index must be within 1..=5"))?,
        components: AirPollutionComponents {
            co: components.field("co")?.f64()?,
            no: components.field("no")?.f64()?,
            no2: components.field("no2")?.f64()?,
            o3: components.field("o3")?.f64()?,
            so2: components.field("so2")?.f64()?,
            pm2_5: components.field("pm2_5")?.f64()?,
            pm10: components.field("pm10")?.f64()?,
            nh3: components.field("nh3")?.f64()?,
        },
    })
}
