// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Database module.
//!
//! This module contains the database implementation used by the Foodcart Node.
//!
//! ## Database implementations
//!
//! The following database implementations are available:
//!
//! * [Sqlite](sqlite/index.html)
//!

pub mod sqlite;

pub use sqlite::SqliteStore;
