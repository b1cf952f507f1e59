// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Plate-to-vehicle lookup.

use crate::error::DomainError;
use crate::types::{Plate, Vehicle};
use std::collections::HashMap;

/// Read-only source of vehicle metadata.
pub trait VehicleRegistry {
    /// Resolves a plate to its vehicle.
    ///
    /// Matching is exact on the canonical plate (trimmed, case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::VehicleNotFound` if no vehicle has this plate.
    fn lookup(&self, plate: &str) -> Result<Vehicle, DomainError>;
}

/// In-memory registry built from fleet configuration.
#[derive(Debug, Clone, Default)]
pub struct FleetRegistry {
    vehicles: HashMap<Plate, Vehicle>,
}

impl FleetRegistry {
    /// Builds a registry from a list of vehicles.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateVehicle` if two vehicles share a plate.
    pub fn new(vehicles: Vec<Vehicle>) -> Result<Self, DomainError> {
        let mut by_plate: HashMap<Plate, Vehicle> = HashMap::with_capacity(vehicles.len());
        for vehicle in vehicles {
            if by_plate.contains_key(&vehicle.plate) {
                return Err(DomainError::DuplicateVehicle {
                    plate: vehicle.plate.to_string(),
                });
            }
            by_plate.insert(vehicle.plate.clone(), vehicle);
        }
        Ok(Self { vehicles: by_plate })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Returns all vehicles sorted by plate.
    #[must_use]
    pub fn vehicles(&self) -> Vec<&Vehicle> {
        let mut all: Vec<&Vehicle> = self.vehicles.values().collect();
        all.sort_by(|a, b| a.plate.cmp(&b.plate));
        all
    }
}

impl VehicleRegistry for FleetRegistry {
    fn lookup(&self, plate: &str) -> Result<Vehicle, DomainError> {
        let not_found = || DomainError::VehicleNotFound {
            plate: plate.to_string(),
        };
        // An empty plate can never match
        let canonical: Plate = Plate::new(plate).map_err(|_| not_found())?;
        self.vehicles.get(&canonical).cloned().ok_or_else(not_found)
    }
}
