// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Settings service: save (upsert) and fetch the per-account document.

use chrono::Utc;
use serde_json::Value;

use super::validation::{self, is_truthy};
use crate::error::ServiceError;
use crate::storage::{SettingsDocument, Store};

/// Validates settings payloads and keeps one document per account.
#[derive(Clone)]
pub struct SettingsService {
    store: Store,
}

/// Canonical account id (lowercase hyphenated UUID).
fn parse_account_id(raw: &str) -> Result<String, ServiceError> {
    uuid::Uuid::parse_str(raw.trim())
        .map(|id| id.to_string())
        .map_err(|_| ServiceError::InvalidInput("Invalid userId".to_string()))
}

impl SettingsService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Validate `raw` and replace the account's settings with it.
    ///
    /// Creates the document on first save. `updatedAt` is stamped on every
    /// call. The account itself is not looked up.
    pub async fn save_settings(
        &self,
        account_id: Option<&str>,
        raw: Option<&Value>,
    ) -> Result<SettingsDocument, ServiceError> {
        let (Some(account_id), Some(raw)) = (
            account_id.filter(|id| !id.is_empty()),
            raw.filter(|v| is_truthy(v)),
        ) else {
            return Err(ServiceError::InvalidInput(
                "UserId and settings are required".to_string(),
            ));
        };

        let account_id = parse_account_id(account_id)?;
        let update = validation::parse_settings(raw)?;

        let document = SettingsDocument {
            account_id,
            general: update.general,
            past_trail: update.past_trail,
            updated_at: Utc::now(),
        };

        tracing::debug!(
            account_id = %document.account_id,
            past_data_hours = document.general.past_data_hours,
            data_refresh = document.general.data_refresh,
            timezone = document.general.timezone_offset_hours,
            trail_hours = document.past_trail.hours,
            plot_size = %document.past_trail.plot_size,
            "Formatted settings"
        );

        let stored = self.store.upsert_settings(document).await?;
        tracing::info!(account_id = %stored.account_id, "Saved settings");
        Ok(stored)
    }

    /// Fetch the account's settings document.
    pub async fn get_settings(&self, account_id: &str) -> Result<SettingsDocument, ServiceError> {
        if account_id.is_empty() {
            return Err(ServiceError::InvalidInput("UserId is required".to_string()));
        }
        let account_id = parse_account_id(account_id)?;

        self.store
            .get_settings(&account_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Settings not found for this user".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    const ACCOUNT: &str = "0b3a2f4e-8c1d-4f5a-9b6e-2d7c8e9f0a1b";

    fn test_service() -> (SettingsService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(&dir.path().join("test.redb"), Duration::from_secs(5)).unwrap();
        (SettingsService::new(store), dir)
    }

    fn raw_settings(timezone: Value, trail_hours: Value) -> Value {
        json!({
            "general": { "pastDataHours": "48", "dataRefresh": "10", "timezone": timezone },
            "pastTrail": { "hours": trail_hours, "plotSize": "Large" }
        })
    }

    #[tokio::test]
    async fn get_before_save_is_not_found() {
        let (service, _dir) = test_service();
        let err = service.get_settings(ACCOUNT).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn save_then_get_returns_coerced_document() {
        let (service, _dir) = test_service();
        let raw = raw_settings(json!("5.5"), json!("12"));

        let saved = service.save_settings(Some(ACCOUNT), Some(&raw)).await.unwrap();
        let fetched = service.get_settings(ACCOUNT).await.unwrap();

        assert_eq!(fetched, saved);
        assert_eq!(fetched.account_id, ACCOUNT);
        assert_eq!(fetched.general.past_data_hours, 48);
        assert_eq!(fetched.general.data_refresh, 10);
        assert_eq!(fetched.general.timezone_offset_hours, 5.5);
        assert_eq!(fetched.past_trail.hours, 12);
        assert_eq!(fetched.past_trail.plot_size, "Large");
    }

    #[tokio::test]
    async fn second_save_overwrites_and_refreshes_updated_at() {
        let (service, _dir) = test_service();

        let first = service
            .save_settings(Some(ACCOUNT), Some(&raw_settings(json!(1), json!(12))))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = service
            .save_settings(Some(ACCOUNT), Some(&raw_settings(json!(-12.0), json!(36))))
            .await
            .unwrap();

        assert!(second.updated_at > first.updated_at);

        let fetched = service.get_settings(ACCOUNT).await.unwrap();
        assert_eq!(fetched.past_trail.hours, 36);
        assert_eq!(fetched.general.timezone_offset_hours, -12.0);
    }

    #[tokio::test]
    async fn account_id_is_canonicalized() {
        let (service, _dir) = test_service();
        let upper = ACCOUNT.to_uppercase();

        service
            .save_settings(Some(&upper), Some(&raw_settings(json!(0), json!(6))))
            .await
            .unwrap();

        let fetched = service.get_settings(ACCOUNT).await.unwrap();
        assert_eq!(fetched.account_id, ACCOUNT);
    }

    #[tokio::test]
    async fn out_of_range_timezone_is_not_stored() {
        let (service, _dir) = test_service();

        let err = service
            .save_settings(Some(ACCOUNT), Some(&raw_settings(json!(15.0), json!(6))))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::OutOfRange(_)));

        let err = service.get_settings(ACCOUNT).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn missing_account_or_settings_is_invalid_input() {
        let (service, _dir) = test_service();
        let raw = raw_settings(json!(0), json!(6));

        for (id, settings) in [
            (None, Some(&raw)),
            (Some(""), Some(&raw)),
            (Some(ACCOUNT), None),
            (Some(ACCOUNT), Some(&Value::Null)),
            (Some("not-a-uuid"), Some(&raw)),
        ] {
            let err = service.save_settings(id, settings).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidInput(_)));
        }

        for id in ["", "not-a-uuid"] {
            let err = service.get_settings(id).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidInput(_)));
        }
    }
}
