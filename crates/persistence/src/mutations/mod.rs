// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations on the `submissions` table.
//!
//! Every public mutation either completes or leaves the table unchanged.

pub mod submissions;

pub use submissions::{append, promote, promote_all};
