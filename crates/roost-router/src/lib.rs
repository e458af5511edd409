// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The router: turns inbound platform messages into command dispatches,
//! temp-channel kickoffs, and provider turns.
//!
//! Every failure is recovered here. Nothing in this crate propagates an
//! error to the platform event loop; the worst outcome of any inbound
//! message is a logged warning and at most one short user-visible notice.

pub mod allocator;
pub mod chunk;
pub mod classify;
pub mod commands;
pub mod providers;
pub mod router;

pub use providers::Providers;
pub use router::Router;
