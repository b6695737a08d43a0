// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! SNS Auth Server - token lifecycle and request identity resolution
//!
//! Issues HS256 access/refresh token pairs, keeps at most one active refresh
//! token per member in a TTL cache, and resolves every request to a member id
//! (or the anonymous sentinel) before business handlers run.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token codec, issuance, middleware and session lifecycle
//! - `members` - User store and credential verification collaborators
//! - `storage` - TTL cache backends and the refresh/session keyspaces

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod members;
pub mod models;
pub mod state;
pub mod storage;
pub mod telemetry;

#[cfg(test)]
mod testing;
