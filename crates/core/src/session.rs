// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use odotrack_audit::Actor;
use odotrack_domain::Vehicle;

/// The driver and vehicle a submission is made under.
///
/// Passed explicitly by the caller for every submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Opaque driver identity from the authentication layer.
    pub driver_id: String,
    /// The vehicle bound to this session, if one has been identified.
    pub vehicle: Option<Vehicle>,
}

impl SessionContext {
    #[must_use]
    pub const fn new(driver_id: String, vehicle: Option<Vehicle>) -> Self {
        Self { driver_id, vehicle }
    }

    /// Returns the actor recorded in history for this driver.
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor::driver(&self.driver_id)
    }
}
