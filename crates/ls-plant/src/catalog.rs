//! Immutable catalog of named plant parameter sets.
//!
//! The catalog replaces the ad-hoc module-level dictionaries of the source
//! material: it is constructed once at process start, passed by reference,
//! and never mutated. Runs select an entry by display name or supply inline
//! parameters instead.

use crate::battery::BatteryParams;
use crate::drone::DroneParams;
use crate::error::{PlantError, PlantResult};
use serde::{Deserialize, Serialize};

/// One plant parameter set, tagged by plant kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlantSpec {
    Drone(DroneParams),
    Battery(BatteryParams),
}

impl PlantSpec {
    /// Display name of the underlying parameter set.
    pub fn name(&self) -> &str {
        match self {
            PlantSpec::Drone(p) => &p.name,
            PlantSpec::Battery(p) => &p.name,
        }
    }

    /// Short kind label for listings.
    pub fn kind(&self) -> &'static str {
        match self {
            PlantSpec::Drone(_) => "drone",
            PlantSpec::Battery(_) => "battery",
        }
    }

    /// Validate the underlying parameter set.
    pub fn validate(&self) -> PlantResult<()> {
        match self {
            PlantSpec::Drone(p) => p.validate(),
            PlantSpec::Battery(p) => p.validate(),
        }
    }
}

/// Immutable table of plant parameter sets keyed by display name.
#[derive(Debug, Clone, Default)]
pub struct PlantCatalog {
    entries: Vec<PlantSpec>,
}

impl PlantCatalog {
    /// Build a catalog from parameter sets, validating each entry.
    pub fn new(entries: Vec<PlantSpec>) -> PlantResult<Self> {
        for entry in &entries {
            entry.validate()?;
        }
        Ok(Self { entries })
    }

    /// The built-in catalog: the drone airframes and phone battery packs
    /// from the source configurations.
    pub fn builtin() -> Self {
        let drones = [
            ("DJI Mini 2", 0.249, 10.0),
            ("DJI Mavic 3", 0.895, 30.0),
            ("DJI Matrice 300 RTK", 3.6, 100.0),
        ];
        let phones = [
            ("iPhone 8", 1.821, 3.14),
            ("iPhone X", 2.716, 4.7),
            ("iPhone 11", 3.110, 4.7),
            ("iPhone 12", 2.815, 5.2),
            ("iPhone 13", 3.240, 6.0),
            ("iPhone 14", 3.279, 6.5),
            ("iPhone 15", 3.349, 6.5),
            ("iPhone 16", 3.561, 6.5),
        ];

        let mut entries = Vec::new();
        for (name, mass_kg, max_thrust_n) in drones {
            entries.push(PlantSpec::Drone(DroneParams {
                name: name.to_string(),
                mass_kg,
                max_thrust_n,
            }));
        }
        for (name, capacity_ah, max_current_a) in phones {
            entries.push(PlantSpec::Battery(BatteryParams {
                name: name.to_string(),
                capacity_ah,
                max_current_a,
                efficiency: 0.9,
            }));
        }

        Self { entries }
    }

    /// Look up an entry by display name.
    pub fn get(&self, name: &str) -> PlantResult<&PlantSpec> {
        self.entries
            .iter()
            .find(|e| e.name() == name)
            .ok_or_else(|| PlantError::UnknownPlant {
                name: name.to_string(),
            })
    }

    /// Iterate all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PlantSpec> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_known_entries() {
        let catalog = PlantCatalog::builtin();
        assert!(catalog.len() >= 11);

        let mini2 = catalog.get("DJI Mini 2").unwrap();
        match mini2 {
            PlantSpec::Drone(p) => {
                assert!((p.mass_kg - 0.249).abs() < 1e-12);
                assert!((p.max_thrust_n - 10.0).abs() < 1e-12);
            }
            _ => panic!("DJI Mini 2 should be a drone"),
        }

        let iphone = catalog.get("iPhone 16").unwrap();
        assert_eq!(iphone.kind(), "battery");
    }

    #[test]
    fn unknown_name_is_an_error() {
        let catalog = PlantCatalog::builtin();
        let err = catalog.get("Parrot Anafi").unwrap_err();
        assert!(matches!(err, PlantError::UnknownPlant { .. }));
    }

    #[test]
    fn new_rejects_invalid_entries() {
        let bad = PlantSpec::Drone(DroneParams {
            name: "bad".to_string(),
            mass_kg: -1.0,
            max_thrust_n: 10.0,
        });
        assert!(PlantCatalog::new(vec![bad]).is_err());
    }

    #[test]
    fn spec_round_trips_through_serde() {
        let spec = PlantSpec::Drone(DroneParams {
            name: "DJI Mini 2".to_string(),
            mass_kg: 0.249,
            max_thrust_n: 10.0,
        });
        let yaml = serde_yaml::to_string(&spec).unwrap();
        let back: PlantSpec = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(spec, back);
    }
}
