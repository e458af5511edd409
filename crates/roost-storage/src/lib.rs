// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Roost gateway.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, and typed CRUD
//! operations for the three durable tables: `config`, `temp_channels`, and
//! `preferences`. The durable store is the source of truth on restart; the
//! in-memory session store is rebuilt lazily from it.

pub mod controller;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use controller::ConfigController;
pub use database::Database;
pub use models::TempChannel;
