// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded account and settings database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `accounts`: username → serialized StoredAccount
//! - `settings`: account id → serialized SettingsDocument
//!
//! redb calls block, so every public operation runs on tokio's blocking pool
//! and is bounded by the configured store timeout. A timeout or a panicked
//! task is reported as a [`StoreError`] like any other storage failure.
//!
//! A timed-out call never leaves a write behind: the blocking task and the
//! waiting caller race on a [`CommitGate`], and a write only commits if it
//! wins before the caller gives up.

use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};

use super::records::{SettingsDocument, StoredAccount};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary account table: username → serialized StoredAccount (JSON bytes).
///
/// Keying by username makes the table itself the uniqueness guard.
const ACCOUNTS: TableDefinition<&str, &[u8]> = TableDefinition::new("accounts");

/// Settings table: account id → serialized SettingsDocument (JSON bytes).
const SETTINGS: TableDefinition<&str, &[u8]> = TableDefinition::new("settings");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store call `{op}` timed out after {timeout:?}")]
    Timeout { op: &'static str, timeout: Duration },

    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Result of an insert-if-absent on the accounts table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

// =============================================================================
// Commit Gate
// =============================================================================

const PENDING: u8 = 0;
const COMMITTING: u8 = 1;
const ABANDONED: u8 = 2;

/// Decides, exactly once, whether a store call commits or times out.
#[derive(Clone)]
struct CommitGate {
    state: Arc<AtomicU8>,
    op: &'static str,
    timeout: Duration,
}

impl CommitGate {
    fn new(op: &'static str, timeout: Duration) -> Self {
        Self {
            state: Arc::new(AtomicU8::new(PENDING)),
            op,
            timeout,
        }
    }

    fn claim(&self, to: u8) -> bool {
        self.state
            .compare_exchange(PENDING, to, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Called by the waiting caller once the timeout fires. `false` means the
    /// write already started committing and its result must be awaited.
    fn abandon(&self) -> bool {
        self.claim(ABANDONED)
    }

    /// Commit `txn` unless the caller has already given up, in which case the
    /// transaction is aborted.
    fn commit(&self, txn: WriteTransaction) -> StoreResult<()> {
        if self.claim(COMMITTING) {
            txn.commit()?;
            Ok(())
        } else {
            txn.abort()?;
            Err(self.timed_out())
        }
    }

    fn timed_out(&self) -> StoreError {
        StoreError::Timeout {
            op: self.op,
            timeout: self.timeout,
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// Shared handle to the embedded database.
///
/// Cloning is cheap; all clones share one `redb::Database`.
#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
    timeout: Duration,
}

impl Store {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path, timeout: Duration) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ACCOUNTS)?;
            let _ = write_txn.open_table(SETTINGS)?;
        }
        write_txn.commit()?;

        Ok(Self {
            db: Arc::new(db),
            timeout,
        })
    }

    /// Run a blocking database closure on the blocking pool, bounded by the
    /// store timeout. Writes must commit through the gate they are handed.
    async fn run<T, F>(&self, op: &'static str, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Database, &CommitGate) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let gate = CommitGate::new(op, self.timeout);
        let task_gate = gate.clone();
        let mut task = tokio::task::spawn_blocking(move || f(&db, &task_gate));

        match tokio::time::timeout(self.timeout, &mut task).await {
            Ok(joined) => joined?,
            Err(_) if gate.abandon() => {
                tracing::warn!(
                    op,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Store call timed out"
                );
                Err(gate.timed_out())
            }
            // Commit already under way; its outcome stands
            Err(_) => task.await?,
        }
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Insert an account unless its username is already taken.
    ///
    /// The existence check and the insert share one write transaction, and
    /// redb serializes write transactions, so two concurrent registrations of
    /// the same username cannot both succeed.
    pub async fn insert_account_if_absent(
        &self,
        account: StoredAccount,
    ) -> StoreResult<InsertOutcome> {
        self.run("insert_account", move |db, gate| {
            let json = serde_json::to_vec(&account)?;

            let write_txn = db.begin_write()?;
            let outcome = {
                let mut table = write_txn.open_table(ACCOUNTS)?;
                let taken = table.get(account.username.as_str())?.is_some();
                if taken {
                    InsertOutcome::AlreadyExists
                } else {
                    table.insert(account.username.as_str(), json.as_slice())?;
                    InsertOutcome::Inserted
                }
            };

            match outcome {
                InsertOutcome::Inserted => gate.commit(write_txn)?,
                InsertOutcome::AlreadyExists => write_txn.abort()?,
            }
            Ok(outcome)
        })
        .await
    }

    /// Look up an account by exact username.
    pub async fn find_account(&self, username: &str) -> StoreResult<Option<StoredAccount>> {
        let username = username.to_owned();
        self.run("find_account", move |db, _| {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(ACCOUNTS)?;
            match table.get(username.as_str())? {
                Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
                None => Ok(None),
            }
        })
        .await
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Insert or replace the settings document of `document.account_id`.
    pub async fn upsert_settings(&self, document: SettingsDocument) -> StoreResult<SettingsDocument> {
        self.run("upsert_settings", move |db, gate| {
            let json = serde_json::to_vec(&document)?;

            let write_txn = db.begin_write()?;
            {
                let mut table = write_txn.open_table(SETTINGS)?;
                table.insert(document.account_id.as_str(), json.as_slice())?;
            }
            gate.commit(write_txn)?;
            Ok(document)
        })
        .await
    }

    /// Fetch the settings document of an account, if one was ever saved.
    pub async fn get_settings(&self, account_id: &str) -> StoreResult<Option<SettingsDocument>> {
        let account_id = account_id.to_owned();
        self.run("get_settings", move |db, _| {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(SETTINGS)?;
            match table.get(account_id.as_str())? {
                Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
                None => Ok(None),
            }
        })
        .await
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Open a read transaction on every table.
    pub async fn health_check(&self) -> StoreResult<()> {
        self.run("health_check", |db, _| {
            let read_txn = db.begin_read()?;
            let _ = read_txn.open_table(ACCOUNTS)?;
            let _ = read_txn.open_table(SETTINGS)?;
            Ok(())
        })
        .await
    }
}

// =============================================================================
// Tests
// =============================================================================
