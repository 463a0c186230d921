// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Credential checks, token issuance and the access gate.
//!
//! ## Auth Flow
//!
//! 1. Client registers with `POST /signup`
//! 2. Client logs in with `POST /validateUser` and receives an HS256 JWT
//!    carrying `userId` and `username`, valid for 24 hours
//! 3. Client sends `Authorization: Bearer <token>` on protected routes
//! 4. The gate verifies signature and expiry and hands the identity to the
//!    handler
//!
//! ## Security
//!
//! - The signing secret is injected at startup, never compiled in
//! - Passwords are stored as salted HMAC-SHA256 digests
//! - Tokens are not revocable; they expire 24 hours after issuance

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

pub use claims::{AccessClaims, AuthenticatedUser};
pub use error::{AuthError, InvalidReason};
pub use extractor::{authorize, Auth};
pub use service::{CredentialService, LoginGrant, RegisteredAccount};
pub use token::{IssuedToken, TokenKeys};
