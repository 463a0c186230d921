// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-account map display settings.

pub mod service;
pub mod validation;

pub use service::SettingsService;
pub use validation::{parse_settings, SettingsUpdate};
