use std::collections::BTreeMap;

use crate::error::OwmError;
use crate::model::geocoding::{Geocoding, ZipCodeGeocoding};

use super::{Node, parse};

/// `geo/1.0/direct` and `geo/1.0/reverse`.
pub(crate) fn locations(body: &str) -> Result<Vec<Geocoding>, OwmError> {
    parse(body, |root| root.elements()?.iter().map(location).collect())
}

/// `geo/1.0/zip`.
pub(crate) fn zip_code(body: &str) -> Result<ZipCodeGeocoding, OwmError> {
    parse(body, |root| {
        Ok(ZipCodeGeocoding {
            zip: root.field("zip")?.string()?,
            name: root.field("name")?.string()?,
            coordinates: root.coordinates()?,
            country_code: root.field("country")?.string()?,
        })
    })
}

fn location(node: &Node<'_>) -> Result<Geocoding, OwmError> {
    let local_names = match node.optional("local_names")? {
        Some(names) => names
            .entries()?
            .into_iter()
            .map(|(lang, name)| Ok((lang.to_string(), name.string()?)))
            .collect::<Result<BTreeMap<_, _>, OwmError>>()?,
        None => BTreeMap::new(),
    };

    Ok(Geocoding {
        name: node.field("name")?.string()?,
        local_names,
        coordinates: node.coordinates()?,
        country_code: node.field("country")?.string()?,
        state: node.optional_string("state")?,
    })
}
