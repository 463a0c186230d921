// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use crate::auth::{CredentialService, TokenKeys};
use crate::settings::SettingsService;
use crate::storage::Store;

/// Shared handler state.
///
/// The credential service and the access gate get the same `TokenKeys`, so
/// every token the one issues the other accepts.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub tokens: TokenKeys,
    pub credentials: CredentialService,
    pub settings: SettingsService,
}

impl AppState {
    pub fn new(store: Store, tokens: TokenKeys) -> Self {
        Self {
            credentials: CredentialService::new(store.clone(), tokens.clone()),
            settings: SettingsService::new(store.clone()),
            store,
            tokens,
        }
    }
}
