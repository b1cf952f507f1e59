// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries over the `submissions` table.

pub mod submissions;

pub use submissions::{
    contains_id, find_by_id, latest_committed_odometer, list_all, list_partition,
    query_by_plate_and_date,
};
