// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Restricted places and their categories.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::LatLng;
use crate::services::geo_math::normalize_longitude;

/// Categories of places that trigger an exclusion buffer.
///
/// Declared in alphabetical order of their wire names so the derived `Ord`
/// agrees with the canonical cache-key ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum RestrictedCategory {
    CharterSchool,
    CulturalCenter,
    Kindergarten,
    RehabCenter,
    School,
}

impl RestrictedCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestrictedCategory::CharterSchool => "charter_school",
            RestrictedCategory::CulturalCenter => "cultural_center",
            RestrictedCategory::Kindergarten => "kindergarten",
            RestrictedCategory::RehabCenter => "rehab_center",
            RestrictedCategory::School => "school",
        }
    }

    pub fn all() -> &'static [RestrictedCategory] {
        &[
            RestrictedCategory::CharterSchool,
            RestrictedCategory::CulturalCenter,
            RestrictedCategory::Kindergarten,
            RestrictedCategory::RehabCenter,
            RestrictedCategory::School,
        ]
    }
}

impl fmt::Display for RestrictedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RestrictedCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown restricted category: {}", s))
    }
}

/// A restricted location supplied by the places source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RestrictedPoint {
    pub id: String,
    /// Longitude is wrapped into `(-180, 180]` on input.
    #[serde(deserialize_with = "normalized_location")]
    pub location: LatLng,
    /// `None` means the place is restricted regardless of the active filter.
    #[serde(default, alias = "restrictedCategory")]
    pub category: Option<RestrictedCategory>,
}

impl RestrictedPoint {
    pub fn new(
        id: impl Into<String>,
        location: LatLng,
        category: Option<RestrictedCategory>,
    ) -> Self {
        Self {
            id: id.into(),
            location: LatLng::new(location.lat, normalize_longitude(location.lng)),
            category,
        }
    }

    /// Whether this place excludes land when `active` categories are selected.
    pub fn is_active_for(&self, active: &[RestrictedCategory]) -> bool {
        match self.category {
            None => true,
            Some(category) => active.contains(&category),
        }
    }
}

fn normalized_location<'de, D: Deserializer<'de>>(deserializer: D) -> Result<LatLng, D::Error> {
    let raw = LatLng::deserialize(deserializer)?;
    if !(-90.0..=90.0).contains(&raw.lat) {
        return Err(de::Error::custom(format!("latitude {} out of range", raw.lat)));
    }
    if !raw.lng.is_finite() {
        return Err(de::Error::custom(format!("longitude {} is not finite", raw.lng)));
    }
    Ok(LatLng::new(raw.lat, normalize_longitude(raw.lng)))
}
