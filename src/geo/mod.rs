//! Geographic records and the latitude/longitude to Cartesian projection
//! used to anchor labels on the globe.

use std::f32::consts::PI;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::OrbisError;

/// Capital cities shipped with the crate.
const CAPITALS_JSON: &str = include_str!("../../assets/data/capitals.json");

/// Project a latitude/longitude pair (degrees) onto a sphere of `radius`
/// centred at the origin.
///
/// Uses the polar convention `phi = (90 - lat)`, `theta = (lon + 180)`,
/// which matches the equirectangular UV layout of
/// [`MeshData::sphere`](crate::scene::mesh::MeshData::sphere): latitude 90
/// maps to +Y and (0, 0) maps to +X.
#[must_use]
pub fn lat_lon_to_cartesian(lat_deg: f32, lon_deg: f32, radius: f32) -> Vec3 {
    let phi = (90.0 - lat_deg) * (PI / 180.0);
    let theta = (lon_deg + 180.0) * (PI / 180.0);

    Vec3::new(
        -radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// A named place on the globe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// Display name.
    pub name: String,
    /// Latitude in degrees, expected in `[-90, 90]`.
    pub latitude: f32,
    /// Longitude in degrees, expected in `[-180, 180]`.
    pub longitude: f32,
}

impl City {
    /// Create a city record.
    pub fn new(name: impl Into<String>, latitude: f32, longitude: f32) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// Surface position on a sphere of `radius`.
    #[must_use]
    pub fn position(&self, radius: f32) -> Vec3 {
        lat_lon_to_cartesian(self.latitude, self.longitude, radius)
    }

    /// Whether latitude and longitude fall in their degree ranges.
    #[must_use]
    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Immutable list of cities loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityCatalog {
    cities: Vec<City>,
}

impl CityCatalog {
    /// The embedded capital-city list.
    ///
    /// # Errors
    ///
    /// Returns [`OrbisError::CatalogParse`] if the embedded asset is
    /// malformed.
    pub fn capitals() -> Result<Self, OrbisError> {
        Self::from_json(CAPITALS_JSON)
    }

    /// Parse a JSON array of `{name, latitude, longitude}` records.
    ///
    /// Out-of-range coordinates are kept; they are only reported at debug
    /// level.
    ///
    /// # Errors
    ///
    /// Returns [`OrbisError::CatalogParse`] if `json` is not a valid list.
    pub fn from_json(json: &str) -> Result<Self, OrbisError> {
        let cities: Vec<City> = serde_json::from_str(json)?;
        for city in cities.iter().filter(|c| !c.in_range()) {
            log::debug!(
                "city {} has out-of-range coordinates ({}, {})",
                city.name,
                city.latitude,
                city.longitude
            );
        }
        log::debug!("loaded {} cities", cities.len());
        Ok(Self { cities })
    }

    /// All cities in load order.
    #[must_use]
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Number of cities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Whether the catalog holds no cities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        let diff = (a - b).length();
        assert!(diff <= 1e-5, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn north_pole_maps_to_up() {
        assert_close(lat_lon_to_cartesian(90.0, 0.0, 1.0), Vec3::Y);
    }

    #[test]
    fn null_island_maps_to_positive_x() {
        assert_close(lat_lon_to_cartesian(0.0, 0.0, 1.0), Vec3::X);
    }

    #[test]
    fn projected_points_lie_on_the_sphere() {
        for radius in [0.5_f32, 1.0, 2.5] {
            for lat in (-90..=90).step_by(15) {
                for lon in (-180..=180).step_by(20) {
                    let p =
                        lat_lon_to_cartesian(lat as f32, lon as f32, radius);
                    assert!(
                        (p.length() - radius).abs() < 1e-5 * radius.max(1.0),
                        "({lat}, {lon}) r={radius} landed at |p|={}",
                        p.length()
                    );
                }
            }
        }
    }

    #[test]
    fn embedded_capitals_parse_and_are_in_range() {
        let catalog = CityCatalog::capitals().unwrap();
        assert!(catalog.len() >= 40);
        assert!(catalog.cities().iter().all(City::in_range));
        assert!(catalog.cities().iter().any(|c| c.name == "Seoul"));
    }

    #[test]
    fn malformed_catalog_is_an_error() {
        let err = CityCatalog::from_json("{\"name\": 1}").unwrap_err();
        assert!(matches!(err, OrbisError::CatalogParse(_)));
    }

    #[test]
    fn out_of_range_city_is_kept() {
        let catalog = CityCatalog::from_json(
            r#"[{"name": "Nowhere", "latitude": 120.0, "longitude": 0.0}]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(!catalog.cities()[0].in_range());
    }
}
