// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory conversation state for the Roost gateway.
//!
//! Ephemeral truth lives here; durable truth lives in `roost-storage`. A
//! restart loses live [`ConversationState`]s but not the temp-channel
//! bindings, and the router rebuilds state lazily on the next turn.

pub mod state;
pub mod store;

pub use state::{ConversationState, ProviderState};
pub use store::{SessionSnapshot, SessionStore};
