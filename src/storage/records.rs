// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Records persisted in the embedded database.
//!
//! Settings records serialize with the camelCase field names the map client
//! already speaks (`pastDataHours`, `pastTrail`, `updatedAt`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account row, keyed by username in the `accounts` table.
///
/// The password itself is never stored; see [`crate::auth::password`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredAccount {
    /// Account identifier (UUID v4)
    pub id: String,
    /// Unique, case-sensitive login name
    pub username: String,
    /// Base64 HMAC key for the password digest
    pub password_salt: String,
    /// Base64 HMAC-SHA256 of the password under `password_salt`
    pub password_digest: String,
    /// When the account was registered
    pub created_at: DateTime<Utc>,
}

/// General display preferences.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneralSettings {
    /// How many hours of past data to show.
    pub past_data_hours: u32,
    /// Data refresh interval.
    pub data_refresh: u32,
    /// UTC offset in hours, within [-12.0, 14.0].
    #[serde(rename = "timezone")]
    pub timezone_offset_hours: f64,
}

/// Past trail rendering preferences.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PastTrailSettings {
    /// Trail length in hours.
    pub hours: u32,
    /// Plot marker size (`Small`, `Medium`, `Large`, ...).
    pub plot_size: String,
}

/// The single settings document kept per account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDocument {
    /// Owning account id.
    #[serde(rename = "userId")]
    pub account_id: String,
    pub general: GeneralSettings,
    pub past_trail: PastTrailSettings,
    /// Refreshed on every save.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_document_uses_client_field_names() {
        let doc = SettingsDocument {
            account_id: "acc-1".to_string(),
            general: GeneralSettings {
                past_data_hours: 48,
                data_refresh: 10,
                timezone_offset_hours: 5.5,
            },
            past_trail: PastTrailSettings {
                hours: 12,
                plot_size: "Large".to_string(),
            },
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["userId"], "acc-1");
        assert_eq!(json["general"]["pastDataHours"], 48);
        assert_eq!(json["general"]["dataRefresh"], 10);
        assert_eq!(json["general"]["timezone"], 5.5);
        assert_eq!(json["pastTrail"]["hours"], 12);
        assert_eq!(json["pastTrail"]["plotSize"], "Large");
        assert!(json["updatedAt"].is_string());
    }
}
