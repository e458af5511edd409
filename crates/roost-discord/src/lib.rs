// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discord integration: the serenity-backed [`ChatPlatform`] and the gateway
//! event handler that feeds inbound messages to the router.
//!
//! [`ChatPlatform`]: roost_core::ChatPlatform

pub mod handler;
pub mod platform;

pub use handler::{gateway_intents, Handler};
pub use platform::SerenityPlatform;
