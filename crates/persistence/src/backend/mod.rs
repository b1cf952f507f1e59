// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-specific database utilities.
//!
//! Only `SQLite` is supported. Anything that cannot be expressed in Diesel
//! DSL (PRAGMA statements, `last_insert_rowid()`) lives here; all submission
//! queries and mutations live in `queries/` and `mutations/`.

pub mod sqlite;
