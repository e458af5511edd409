// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound message classification.
//!
//! The order is load-bearing: bot authors are dropped before anything else,
//! commands win over every channel role, and the entry channel wins over a
//! (misconfigured) binding on the same channel.

use roost_core::{ChannelId, Inbound};

use crate::commands::{self, Command};

/// What the router should do with one inbound message.
#[derive(Debug, PartialEq)]
pub enum MessageClass {
    /// Bot authors, untracked guild channels.
    Ignore,
    /// A registered command, runnable from any channel.
    Command(Command),
    /// A message in the entry channel: start a new chat.
    Kickoff,
    /// A message in a bound temp channel: relay a turn.
    ChannelTurn,
    /// A direct message: relay a turn on the per-user DM conversation.
    DirectTurn,
}

/// Classifies an inbound message. `is_bound_channel` reflects whether a
/// temp-channel binding exists for `msg.channel_id`.
pub fn classify(
    msg: &Inbound,
    entry_channel: Option<ChannelId>,
    is_bound_channel: bool,
) -> MessageClass {
    if msg.author_is_bot {
        return MessageClass::Ignore;
    }
    if let Some(cmd) = commands::parse(&msg.content) {
        return MessageClass::Command(cmd);
    }
    if msg.is_dm() {
        return MessageClass::DirectTurn;
    }
    if entry_channel == Some(msg.channel_id) {
        return MessageClass::Kickoff;
    }
    if is_bound_channel {
        return MessageClass::ChannelTurn;
    }
    MessageClass::Ignore
}
