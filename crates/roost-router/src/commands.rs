// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line parsing for the `!`/`.` chat commands.
//!
//! Only registered command names parse; anything else falls through to the
//! normal message flow, so the relay never swallows prose that merely starts
//! with a prefix character. Argument validation happens in the handlers,
//! which own the usage notices.

use roost_core::ChannelId;

/// Characters accepted as a command prefix.
pub const PREFIXES: [char; 2] = ['!', '.'];

/// A parsed command with raw, not-yet-validated arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Delete the author's temp channel and its state.
    EndChat,
    /// Clear the conversation history, keeping the binding.
    ResetChat,
    /// Choose the model for the author's next conversation.
    SetModel { id: Option<String> },
    /// List the models users can pick from.
    ListModels,
    /// Admin: move the kickoff channel.
    SetEntryChannel { arg: Option<String> },
    /// Admin: change the inactivity timeout in hours.
    SetTimeout { arg: Option<String> },
    /// Show command help.
    Help,
}

/// Parses `content` as a command. Returns `None` for ordinary messages and
/// for prefixed words that are not registered commands.
pub fn parse(content: &str) -> Option<Command> {
    let trimmed = content.trim();
    let rest = PREFIXES
        .iter()
        .find_map(|p| trimmed.strip_prefix(*p))?;

    let mut words = rest.split_whitespace();
    let name = words.next()?.to_ascii_lowercase();
    let arg = words.next().map(str::to_string);

    match name.as_str() {
        "endchat" => Some(Command::EndChat),
        "resetchat" => Some(Command::ResetChat),
        "setmodel" => Some(Command::SetModel { id: arg }),
        "listmodels" => Some(Command::ListModels),
        "setentrychannel" => Some(Command::SetEntryChannel { arg }),
        "settimeout" => Some(Command::SetTimeout { arg }),
        "help" => Some(Command::Help),
        _ => None,
    }
}

/// Parses a channel argument: a raw id or a `<#id>` mention.
pub fn parse_channel_arg(arg: &str) -> Option<ChannelId> {
    let raw = arg
        .strip_prefix("<#")
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(arg);
    raw.parse::<u64>().ok().map(ChannelId)
}
