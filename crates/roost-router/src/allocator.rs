// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temp-channel name derivation and creation.

use chrono::{DateTime, Utc};
use roost_core::{ChannelId, ChatPlatform, GatewayError, GuildId, UserId};
use tracing::debug;

/// Fixed prefix for every temp channel the gateway creates.
pub const NAME_PREFIX: &str = "chat-";

/// Longest derived stem, before the prefix and any collision suffix.
const MAX_STEM_CHARS: usize = 80;

/// Collision suffixes tried before falling back to the owner-id name.
const MAX_SUFFIX: u32 = 50;

/// Derives the base channel name from the owner's display name: keep
/// alphanumerics and spaces, lowercase, spaces to hyphens. Display names
/// with nothing usable fall back to the owner id.
pub fn derive_base_name(display_name: &str, owner: UserId) -> String {
    let stem: String = display_name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ')
        .collect::<String>()
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .take(MAX_STEM_CHARS)
        .collect();
    if stem.is_empty() {
        format!("{NAME_PREFIX}{owner}")
    } else {
        format!("{NAME_PREFIX}{stem}")
    }
}

/// Picks a name not present in `existing`: the base name, then `-1`..`-50`
/// suffixes, then an owner-id-plus-timestamp fallback. `None` means the
/// guild namespace is saturated beyond reason.
pub fn resolve_name(
    existing: &[String],
    display_name: &str,
    owner: UserId,
    now: DateTime<Utc>,
) -> Option<String> {
    let taken = |name: &str| existing.iter().any(|e| e == name);

    let base = derive_base_name(display_name, owner);
    if !taken(&base) {
        return Some(base);
    }
    for n in 1..=MAX_SUFFIX {
        let candidate = format!("{base}-{n}");
        if !taken(&candidate) {
            return Some(candidate);
        }
    }
    let fallback = format!("{NAME_PREFIX}{owner}-{}", now.format("%H%M%S"));
    (!taken(&fallback)).then_some(fallback)
}

/// Creates a private temp channel for `owner`, resolving name collisions
/// against the guild's current channel list.
pub async fn allocate(
    platform: &dyn ChatPlatform,
    guild: GuildId,
    owner: UserId,
    display_name: &str,
) -> Result<ChannelId, GatewayError> {
    let existing = platform.guild_channel_names(guild).await?;
    let name = resolve_name(&existing, display_name, owner, Utc::now())
        .ok_or_else(|| GatewayError::Transient("no available channel name".into()))?;
    debug!(guild = %guild, owner = %owner, name = %name, "allocating temp channel");
    platform.create_private_channel(guild, &name, owner).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: UserId = UserId(42);

    fn now() -> DateTime<Utc> {
        "2026-03-01T12:34:56Z".parse().unwrap()
    }

    #[test]
    fn name_keeps_alphanumerics_lowercases_and_hyphenates() {
        assert_eq!(derive_base_name("Alice Wonder", OWNER), "chat-alice-wonder");
        assert_eq!(derive_base_name("Bob!!! (him)", OWNER), "chat-bob-him");
    }

    #[test]
    fn unusable_display_name_falls_back_to_owner_id() {
        assert_eq!(derive_base_name("!!!", OWNER), "chat-42");
    }

    #[test]
    fn long_names_are_capped() {
        let name = derive_base_name(&"x".repeat(300), OWNER);
        assert_eq!(name.len(), NAME_PREFIX.len() + 80);
    }

    #[test]
    fn free_base_name_is_used_directly() {
        let existing = vec!["general".to_string()];
        assert_eq!(
            resolve_name(&existing, "Alice", OWNER, now()).unwrap(),
            "chat-alice"
        );
    }

    #[test]
    fn collisions_get_numeric_suffixes() {
        let existing = vec!["chat-alice".to_string(), "chat-alice-1".to_string()];
        assert_eq!(
            resolve_name(&existing, "Alice", OWNER, now()).unwrap(),
            "chat-alice-2"
        );
    }

    #[test]
    fn exhausted_suffixes_fall_back_to_owner_and_timestamp() {
        let mut existing = vec!["chat-alice".to_string()];
        for n in 1..=50 {
            existing.push(format!("chat-alice-{n}"));
        }
        assert_eq!(
            resolve_name(&existing, "Alice", OWNER, now()).unwrap(),
            "chat-42-123456"
        );
    }
}
