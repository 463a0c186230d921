// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! QT Map Server - accounts and map settings backend
//!
//! Registers accounts, exchanges credentials for 24 hour bearer tokens and
//! keeps one display settings document per account.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Credential checks, token issuance and the access gate
//! - `settings` - Settings validation, coercion and persistence
//! - `storage` - Embedded redb database

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod settings;
pub mod state;
pub mod storage;
