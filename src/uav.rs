//! UAV attribute record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Static description of an aircraft type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Uav {
    pub name: String,
    pub description: String,
    /// m/s²
    pub acceleration: f32,
    /// Cruise altitude in meters
    pub flight_height: f32,
    /// Hours aloft on a full load
    pub fly_endurance: f32,
    /// Icon asset name shown as the map marker
    pub image_file: String,
    /// Payload capacity in kilograms
    pub load_weight: f32,
    /// km/h
    pub max_speed: f32,
    /// Range in kilometers
    pub voyage: f32,
    /// Empty weight in kilograms
    pub weight: f32,
    /// Weapon name to number carried
    pub weapons: BTreeMap<String, u32>,
}

impl Uav {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn weapon_count(&self, name: &str) -> u32 {
        self.weapons.get(name).copied().unwrap_or(0)
    }

    pub fn total_weapons(&self) -> u32 {
        self.weapons.values().sum()
    }

    /// Empty weight plus full payload.
    pub fn max_takeoff_weight(&self) -> f32 {
        self.weight + self.load_weight
    }
}
