// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fleet configuration and startup errors.

use odotrack_domain::{DomainError, FleetRegistry, Plate, Vehicle};
use odotrack_persistence::PersistenceError;
use serde::Deserialize;
use std::path::Path;
use time::UtcOffset;
use tracing::info;

/// Fleet used when no fleet file is given.
pub const DEFAULT_FLEET: &str = r#"
[[vehicles]]
plate = "A 12345"
fleet = "North Fleet"
type = "Van"
driver = "Ali Hassan"
last_odometer = 25432

[[vehicles]]
plate = "B 67890"
fleet = "North"
type = "Truck"
last_odometer = 55500

[[vehicles]]
plate = "C 24680"
fleet = "South"
type = "Truck"
driver = "John Doe"
last_odometer = 88650
"#;

/// Errors that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to read fleet file '{path}': {source}")]
    FleetRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid fleet file: {0}")]
    FleetParse(#[from] toml::de::Error),
    #[error("Invalid fleet: {0}")]
    Fleet(#[from] DomainError),
    #[error("Invalid UTC offset of {hours} hours: {message}")]
    Offset { hours: i8, message: String },
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, Deserialize)]
struct FleetFile {
    #[serde(default)]
    vehicles: Vec<VehicleEntry>,
}

#[derive(Debug, Deserialize)]
struct VehicleEntry {
    plate: String,
    fleet: String,
    #[serde(rename = "type")]
    vehicle_type: String,
    #[serde(default)]
    driver: Option<String>,
    last_odometer: u32,
}

impl VehicleEntry {
    fn into_vehicle(self) -> Result<Vehicle, DomainError> {
        Ok(Vehicle::new(
            Plate::new(&self.plate)?,
            self.fleet,
            self.vehicle_type,
            self.driver,
            self.last_odometer,
        ))
    }
}

/// Parses a fleet from TOML text.
///
/// # Errors
///
/// Returns an error if the text is not a valid fleet file, a plate is blank,
/// or two vehicles share a plate.
pub fn parse_fleet(text: &str) -> Result<FleetRegistry, ServerError> {
    let file: FleetFile = toml::from_str(text)?;
    let vehicles: Vec<Vehicle> = file
        .vehicles
        .into_iter()
        .map(VehicleEntry::into_vehicle)
        .collect::<Result<_, _>>()?;
    FleetRegistry::new(vehicles).map_err(ServerError::from)
}

/// Loads the fleet from `path`, or the built-in fleet if no path is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_fleet(path: Option<&Path>) -> Result<FleetRegistry, ServerError> {
    let registry: FleetRegistry = match path {
        Some(path) => {
            let text: String =
                std::fs::read_to_string(path).map_err(|source| ServerError::FleetRead {
                    path: path.display().to_string(),
                    source,
                })?;
            info!(path = %path.display(), "Loading fleet file");
            parse_fleet(&text)?
        }
        None => {
            info!("No fleet file given, using the built-in fleet");
            parse_fleet(DEFAULT_FLEET)?
        }
    };
    info!(vehicles = registry.len(), "Fleet loaded");
    Ok(registry)
}

/// Converts a whole-hour offset into a `UtcOffset`.
///
/// # Errors
///
/// Returns `ServerError::Offset` if the offset is out of range.
pub fn utc_offset(hours: i8) -> Result<UtcOffset, ServerError> {
    UtcOffset::from_hms(hours, 0, 0).map_err(|e| ServerError::Offset {
        hours,
        message: e.to_string(),
    })
}
