// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use crate::{Plate, Vehicle};

pub fn create_test_vehicle(last_odometer: u32) -> Vehicle {
    Vehicle::new(
        Plate::new("A 12345").unwrap(),
        String::from("North Fleet"),
        String::from("Van"),
        Some(String::from("Ali Hassan")),
        last_odometer,
    )
}
