// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Sumanize

//! # Session Authentication
//!
//! Cookie-based JWT sessions for the Sumanize API.
//!
//! ## Auth Flow
//!
//! 1. The identity provider confirms who the user is (external OAuth flow)
//! 2. Login issues a signed HS256 credential and records the session as
//!    live in the key-value session cache
//! 3. On every request the gate:
//!    - extracts the credential (session cookie, bearer header fallback)
//!    - verifies signature and expiration
//!    - confirms liveness against the cache (the revocation check)
//!    - slides the cache TTL forward
//!
//! ## Security
//!
//! - A valid signature alone never authenticates: the cache entry must
//!   exist, so logout and server-side revocation take effect immediately
//! - Cache outages fail closed
//! - All failure kinds collapse to one uniform `401` response

pub mod claims;
pub mod cookies;
pub mod error;
pub mod extractor;
pub mod gate;
pub mod middleware;
pub mod session;
pub mod token;

pub use claims::Identity;
pub use error::AuthError;
pub use extractor::{Auth, OptionalAuth};
pub use gate::{route_requires_auth, AuthGate, Verdict};
pub use session::{MemorySessionCache, SessionCache, SESSION_TTL};
pub use token::TokenCodec;
