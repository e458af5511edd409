// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for the durable tables.

pub mod config;
pub mod preferences;
pub mod temp_channels;
