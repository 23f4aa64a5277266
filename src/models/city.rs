// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Supported cities and their safe-zone configuration.
//!
//! Each city is a variant of [`CityId`] with a static [`CityDefinition`].
//! Definitions are validated at startup so that bad category lists fail
//! fast instead of surfacing during a sync run.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::RestrictedCategory;
use crate::error::EngineError;

/// Upper bound on restricted categories per city.
///
/// The catalog holds one variant per category subset, so this caps a city
/// at 2^6 = 64 safe-zone computations per sync.
pub const MAX_CATEGORIES_PER_CITY: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum CityId {
    Montevideo,
}

impl CityId {
    pub fn as_str(&self) -> &'static str {
        match self {
            CityId::Montevideo => "montevideo",
        }
    }

    pub fn all() -> &'static [CityId] {
        &[CityId::Montevideo]
    }
}

impl Default for CityId {
    fn default() -> Self {
        CityId::Montevideo
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CityId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| EngineError::UnknownCity(s.to_string()))
    }
}

/// Static per-city configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityDefinition {
    pub id: CityId,
    pub name: String,
    pub country: String,
    pub display_name: String,
    /// Exclusion radius around every active restricted place.
    pub buffer_distance_meters: f64,
    pub restricted_categories: Vec<RestrictedCategory>,
}

impl CityDefinition {
    pub fn for_city(id: CityId) -> Self {
        match id {
            CityId::Montevideo => Self {
                id,
                name: "Montevideo".to_string(),
                country: "Uruguay".to_string(),
                display_name: "Montevideo, Uruguay".to_string(),
                buffer_distance_meters: 200.0,
                restricted_categories: vec![
                    RestrictedCategory::School,
                    RestrictedCategory::CulturalCenter,
                    RestrictedCategory::RehabCenter,
                    RestrictedCategory::Kindergarten,
                ],
            },
        }
    }

    /// Load and validate every known city.
    pub fn registry() -> Result<Vec<Self>, EngineError> {
        CityId::all()
            .iter()
            .map(|id| {
                let definition = Self::for_city(*id);
                definition.validate()?;
                Ok(definition)
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |reason: String| EngineError::InvalidCity {
            city: self.id,
            reason,
        };

        if !self.buffer_distance_meters.is_finite() || self.buffer_distance_meters <= 0.0 {
            return Err(invalid(format!(
                "buffer distance must be positive, got {}",
                self.buffer_distance_meters
            )));
        }

        if self.restricted_categories.len() > MAX_CATEGORIES_PER_CITY {
            return Err(invalid(format!(
                "{} restricted categories exceeds the limit of {}",
                self.restricted_categories.len(),
                MAX_CATEGORIES_PER_CITY
            )));
        }

        let mut seen = HashSet::new();
        for category in &self.restricted_categories {
            if !seen.insert(category) {
                return Err(invalid(format!("duplicate restricted category {}", category)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_valid() {
        let cities = CityDefinition::registry().expect("built-in cities should validate");
        assert_eq!(cities.len(), CityId::all().len());
    }

    #[test]
    fn test_montevideo_definition() {
        let city = CityDefinition::for_city(CityId::Montevideo);
        assert_eq!(city.buffer_distance_meters, 200.0);
        assert_eq!(city.restricted_categories.len(), 4);
    }

    #[test]
    fn test_parse_city_id() {
        assert_eq!("montevideo".parse::<CityId>().unwrap(), CityId::Montevideo);
        assert_eq!(" Montevideo ".parse::<CityId>().unwrap(), CityId::Montevideo);
        assert!(matches!(
            "atlantis".parse::<CityId>(),
            Err(EngineError::UnknownCity(_))
        ));
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let mut city = CityDefinition::for_city(CityId::Montevideo);
        city.restricted_categories.push(RestrictedCategory::School);
        assert!(matches!(
            city.validate(),
            Err(EngineError::InvalidCity { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_buffer() {
        let mut city = CityDefinition::for_city(CityId::Montevideo);
        city.buffer_distance_meters = 0.0;
        assert!(city.validate().is_err());

        city.buffer_distance_meters = f64::NAN;
        assert!(city.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_empty_rejects_oversized_lists() {
        let mut city = CityDefinition::for_city(CityId::Montevideo);
        // Only uncategorized places apply; the catalog has just "none".
        city.restricted_categories.clear();
        assert!(city.validate().is_ok());

        city.restricted_categories = vec![RestrictedCategory::School; MAX_CATEGORIES_PER_CITY + 1];
        assert!(city.validate().is_err());
    }
}
