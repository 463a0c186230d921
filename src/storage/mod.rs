// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage for accounts and settings in a single embedded redb
//! file (`qtmap.redb` under `DATA_DIR`).
//!
//! ## Storage Layout
//!
//! ```text
//! accounts: username   → StoredAccount (JSON)
//! settings: account id → SettingsDocument (JSON)
//! ```

pub mod database;
pub mod records;

pub use database::{InsertOutcome, Store, StoreError, StoreResult};
pub use records::{GeneralSettings, PastTrailSettings, SettingsDocument, StoredAccount};
