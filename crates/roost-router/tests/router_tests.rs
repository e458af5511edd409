// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end router scenarios against the in-memory platform, a real
//! SQLite file, and mocked provider endpoints.

use std::sync::Arc;
use std::time::Duration;

use roost_core::{ChannelId, ChatPlatform, ConversationId, GuildId, Inbound, MessageId, UserId};
use roost_gemini::GeminiClient;
use roost_models::{ModelCatalog, ModelId};
use roost_openrouter::OpenRouterClient;
use roost_router::{Providers, Router};
use roost_session::SessionStore;
use roost_storage::queries::{preferences, temp_channels};
use roost_storage::{ConfigController, Database};
use roost_test_utils::MockPlatform;
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GUILD: GuildId = GuildId(1);
const ENTRY: ChannelId = ChannelId(100);
const DM_CHANNEL: ChannelId = ChannelId(900);
const ALICE: UserId = UserId(7);
const MALLORY: UserId = UserId(8);

struct Harness {
    router: Router,
    platform: Arc<MockPlatform>,
    store: Arc<SessionStore>,
    config: Arc<ConfigController>,
    db: Database,
    catalog: ModelCatalog,
    _dir: tempfile::TempDir,
    _server: MockServer,
}

fn gemini_reply(text: &str) -> Mock {
    Mock::given(method("POST"))
        .and(path_regex(r"^/models/[^/]+:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        })))
}

fn gemini_safety_block() -> Mock {
    Mock::given(method("POST"))
        .and(path_regex(r"^/models/[^/]+:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
}

fn openrouter_reply(text: &str) -> Mock {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }]
        })))
}

async fn harness_with(mocks: Vec<Mock>) -> Harness {
    let server = MockServer::start().await;
    for mock in mocks {
        mock.mount(&server).await;
    }

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
    let config = Arc::new(
        ConfigController::load(db.clone(), Some(ENTRY), 6.0)
            .await
            .unwrap(),
    );
    let catalog =
        ModelCatalog::new("gemini:gemini-1.5-flash-latest", "deepseek/deepseek-chat").unwrap();

    let gemini = GeminiClient::new("test-key".into(), Duration::from_secs(5))
        .unwrap()
        .with_base_url(server.uri());
    let openrouter = OpenRouterClient::new("test-key", None, None, Duration::from_secs(5))
        .unwrap()
        .with_base_url(server.uri());
    let providers = Providers::new(Some(gemini), Some(openrouter));

    let platform = Arc::new(MockPlatform::new());
    platform.seed_channel(ENTRY, GUILD, "lobby");
    let store = Arc::new(SessionStore::new());
    let router = Router::new(
        platform.clone(),
        db.clone(),
        config.clone(),
        catalog.clone(),
        providers,
        store.clone(),
    );

    Harness {
        router,
        platform,
        store,
        config,
        db,
        catalog,
        _dir: dir,
        _server: server,
    }
}

async fn harness(reply: &str) -> Harness {
    harness_with(vec![gemini_reply(reply), openrouter_reply(reply)]).await
}

fn guild_msg(channel: ChannelId, author: UserId, content: &str) -> Inbound {
    Inbound {
        message_id: MessageId(11),
        channel_id: channel,
        guild_id: Some(GUILD),
        author_id: author,
        author_is_bot: false,
        author_name: "Alice Wonder".into(),
        content: content.into(),
    }
}

fn dm_msg(author: UserId, content: &str) -> Inbound {
    Inbound {
        message_id: MessageId(12),
        channel_id: DM_CHANNEL,
        guild_id: None,
        author_id: author,
        author_is_bot: false,
        author_name: "Alice Wonder".into(),
        content: content.into(),
    }
}

/// The single channel created so far.
fn created_channel(platform: &MockPlatform) -> ChannelId {
    let created = platform.created_channels();
    assert_eq!(created.len(), 1, "expected exactly one created channel");
    created[0].0
}

#[tokio::test]
async fn kickoff_creates_channel_binds_model_and_relays_first_turn() {
    let h = harness("hello back").await;
    h.router.handle_message(guild_msg(ENTRY, ALICE, "hello")).await;

    let created = h.platform.created_channels();
    assert_eq!(created.len(), 1);
    let (channel, info) = (&created[0].0, &created[0].1);
    assert_eq!(info.name, "chat-alice-wonder");
    assert_eq!(info.owner, Some(ALICE));

    let row = temp_channels::get(&h.db, &h.catalog, *channel)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.user_id, ALICE);
    assert_eq!(row.model.to_string(), "gemini:gemini-1.5-flash-latest");

    // Welcome embed, then the first reply in the new channel.
    assert_eq!(h.platform.embeds.lock().unwrap().len(), 1);
    assert_eq!(h.platform.messages_in(*channel), vec!["hello back"]);

    // The entry channel got a ready notice and lost the trigger message.
    assert!(h.platform.notices_in(ENTRY)[0].contains("ready"));
    assert!(
        h.platform
            .deleted_messages
            .lock()
            .unwrap()
            .iter()
            .any(|(c, _)| *c == ENTRY)
    );
}

#[tokio::test]
async fn second_kickoff_is_rejected_while_a_chat_is_open() {
    let h = harness("ok").await;
    h.router.handle_message(guild_msg(ENTRY, ALICE, "first")).await;
    h.router.handle_message(guild_msg(ENTRY, ALICE, "second")).await;

    assert_eq!(h.platform.created_channels().len(), 1);
    assert!(
        h.platform
            .notices_in(ENTRY)
            .iter()
            .any(|n| n.contains("already have an open chat"))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_kickoffs_create_only_one_channel() {
    let h = harness("ok").await;
    let router = Arc::new(h.router);

    let first = tokio::spawn({
        let router = router.clone();
        async move { router.handle_message(guild_msg(ENTRY, ALICE, "hello")).await }
    });
    let second = tokio::spawn({
        let router = router.clone();
        async move { router.handle_message(guild_msg(ENTRY, ALICE, "hello again")).await }
    });
    first.await.unwrap();
    second.await.unwrap();

    // A double-posted trigger must not allocate a second channel.
    assert_eq!(h.platform.created_channels().len(), 1);
    let channel = created_channel(&h.platform);
    assert!(
        temp_channels::get(&h.db, &h.catalog, channel)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn whitespace_kickoff_is_deleted_and_ignored() {
    let h = harness("ok").await;
    h.router.handle_message(guild_msg(ENTRY, ALICE, "   \n ")).await;

    assert!(h.platform.created_channels().is_empty());
    assert!(h.platform.notices_in(ENTRY).is_empty());
    assert!(!h.platform.deleted_messages.lock().unwrap().is_empty());
}

#[tokio::test]
async fn bot_messages_are_ignored() {
    let h = harness("ok").await;
    let mut msg = guild_msg(ENTRY, ALICE, "hello");
    msg.author_is_bot = true;
    h.router.handle_message(msg).await;
    assert!(h.platform.created_channels().is_empty());
}

#[tokio::test]
async fn turns_in_the_temp_channel_update_activity() {
    let h = harness("reply").await;
    h.router.handle_message(guild_msg(ENTRY, ALICE, "hello")).await;
    let channel = created_channel(&h.platform);
    let before = temp_channels::get(&h.db, &h.catalog, channel)
        .await
        .unwrap()
        .unwrap()
        .last_active;

    tokio::time::sleep(Duration::from_millis(20)).await;
    h.router.handle_message(guild_msg(channel, ALICE, "and again")).await;

    assert_eq!(h.platform.messages_in(channel).len(), 2);
    let after = temp_channels::get(&h.db, &h.catalog, channel)
        .await
        .unwrap()
        .unwrap()
        .last_active;
    assert!(after > before);
}

#[tokio::test]
async fn untracked_guild_channels_get_no_reply() {
    let h = harness("ok").await;
    h.platform.seed_channel(ChannelId(300), GUILD, "general");
    h.router
        .handle_message(guild_msg(ChannelId(300), ALICE, "hello"))
        .await;
    assert!(h.platform.messages_in(ChannelId(300)).is_empty());
}

#[tokio::test]
async fn setmodel_binds_the_next_kickoff() {
    let h = harness("ok").await;
    h.router
        .handle_message(guild_msg(ENTRY, ALICE, "!setmodel gemini:gemini-1.5-pro-latest"))
        .await;
    assert!(
        h.platform
            .notices_in(ENTRY)
            .iter()
            .any(|n| n.contains("gemini-1.5-pro-latest"))
    );

    h.router.handle_message(guild_msg(ENTRY, ALICE, "hello")).await;
    let channel = created_channel(&h.platform);
    let row = temp_channels::get(&h.db, &h.catalog, channel)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.model.to_string(), "gemini:gemini-1.5-pro-latest");
}

#[tokio::test]
async fn a_later_setmodel_replaces_the_earlier_choice() {
    let h = harness("ok").await;
    h.router
        .handle_message(guild_msg(ENTRY, ALICE, "!setmodel gemini:gemini-1.5-pro-latest"))
        .await;
    h.router
        .handle_message(guild_msg(ENTRY, ALICE, "!setmodel gemini:gemini-2.0-flash"))
        .await;
    h.router.handle_message(guild_msg(ENTRY, ALICE, "go")).await;

    let channel = created_channel(&h.platform);
    let row = temp_channels::get(&h.db, &h.catalog, channel)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.model.to_string(), "gemini:gemini-2.0-flash");
}

#[tokio::test]
async fn setmodel_rejects_an_unlisted_openrouter_model() {
    let h = harness("ok").await;
    h.router
        .handle_message(guild_msg(ENTRY, ALICE, "!setmodel openrouter:somebody/else"))
        .await;
    assert!(
        h.platform
            .notices_in(ENTRY)
            .iter()
            .any(|n| n.contains("deepseek/deepseek-chat"))
    );

    // The rejection left no preference behind: kickoff uses the default.
    h.router.handle_message(guild_msg(ENTRY, ALICE, "go")).await;
    let channel = created_channel(&h.platform);
    let row = temp_channels::get(&h.db, &h.catalog, channel)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.model.to_string(), "gemini:gemini-1.5-flash-latest");
}

#[tokio::test]
async fn setmodel_rejects_a_model_whose_provider_is_not_configured() {
    let h = harness("ok").await;
    // A deployment with no openrouter key.
    let gemini_only = Router::new(
        h.platform.clone(),
        h.db.clone(),
        h.config.clone(),
        h.catalog.clone(),
        Providers::new(
            Some(
                GeminiClient::new("test-key".into(), Duration::from_secs(5))
                    .unwrap()
                    .with_base_url(h._server.uri()),
            ),
            None,
        ),
        h.store.clone(),
    );

    gemini_only
        .handle_message(guild_msg(
            ENTRY,
            ALICE,
            "!setmodel openrouter:deepseek/deepseek-chat",
        ))
        .await;
    assert!(
        h.platform
            .notices_in(ENTRY)
            .iter()
            .any(|n| n.contains("no API key"))
    );

    // The rejection left nothing behind: the next kickoff uses the default.
    gemini_only.handle_message(guild_msg(ENTRY, ALICE, "go")).await;
    let channel = created_channel(&h.platform);
    let row = temp_channels::get(&h.db, &h.catalog, channel)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.model.to_string(), "gemini:gemini-1.5-flash-latest");
}

#[tokio::test]
async fn openrouter_chat_works_end_to_end() {
    let h = harness("routed reply").await;
    h.router
        .handle_message(guild_msg(
            ENTRY,
            ALICE,
            "!setmodel openrouter:deepseek/deepseek-chat",
        ))
        .await;
    h.router.handle_message(guild_msg(ENTRY, ALICE, "hello")).await;

    let channel = created_channel(&h.platform);
    let row = temp_channels::get(&h.db, &h.catalog, channel)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.model.to_string(), "openrouter:deepseek/deepseek-chat");
    assert_eq!(h.platform.messages_in(channel), vec!["routed reply"]);
}

#[tokio::test]
async fn safety_block_sends_a_notice_and_does_not_touch_activity() {
    let h = harness_with(vec![gemini_safety_block()]).await;
    h.router.handle_message(guild_msg(ENTRY, ALICE, "hello")).await;

    let channel = created_channel(&h.platform);
    // No model reply was delivered; one notice explains the block.
    assert!(h.platform.messages_in(channel).is_empty());
    let notices = h.platform.notices_in(channel);
    assert_eq!(notices.len(), 1);
    assert!(notices[0].contains("safety filters"));

    let before = temp_channels::get(&h.db, &h.catalog, channel)
        .await
        .unwrap()
        .unwrap()
        .last_active;
    tokio::time::sleep(Duration::from_millis(20)).await;
    h.router.handle_message(guild_msg(channel, ALICE, "again")).await;
    let after = temp_channels::get(&h.db, &h.catalog, channel)
        .await
        .unwrap()
        .unwrap()
        .last_active;
    assert_eq!(after, before);
}

#[tokio::test]
async fn provider_quota_error_becomes_one_notice() {
    let quota = Mock::given(method("POST"))
        .and(path_regex(r"^/models/[^/]+:generateContent$"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"));
    let h = harness_with(vec![quota]).await;
    h.router.handle_message(guild_msg(ENTRY, ALICE, "hello")).await;

    let channel = created_channel(&h.platform);
    assert!(h.platform.messages_in(channel).is_empty());
    let notices = h.platform.notices_in(channel);
    assert_eq!(notices.len(), 1);
    assert!(notices[0].contains("rate limit"));
}

#[tokio::test]
async fn long_replies_are_split_into_limit_sized_fragments() {
    let long = "word ".repeat(900);
    let h = harness(&long).await;
    h.router.handle_message(guild_msg(ENTRY, ALICE, "talk a lot")).await;

    let channel = created_channel(&h.platform);
    let fragments = h.platform.messages_in(channel);
    assert!(fragments.len() > 1);
    for f in &fragments {
        assert!(f.chars().count() <= 2000);
    }
    assert_eq!(fragments.concat(), long);
}

#[tokio::test]
async fn endchat_deletes_the_channel_and_frees_the_owner() {
    let h = harness("ok").await;
    h.router.handle_message(guild_msg(ENTRY, ALICE, "hello")).await;
    let channel = created_channel(&h.platform);

    h.router.handle_message(guild_msg(channel, ALICE, "!endchat")).await;

    assert!(h.platform.was_deleted(channel));
    assert!(
        temp_channels::get(&h.db, &h.catalog, channel)
            .await
            .unwrap()
            .is_none()
    );
    assert!(h.store.get(ConversationId::Channel(channel)).await.is_none());

    // The owner can start a new chat now.
    h.router.handle_message(guild_msg(ENTRY, ALICE, "round two")).await;
    assert_eq!(h.platform.created_channels().len(), 1);
}

#[tokio::test]
async fn endchat_by_a_non_owner_is_refused() {
    let h = harness("ok").await;
    h.router.handle_message(guild_msg(ENTRY, ALICE, "hello")).await;
    let channel = created_channel(&h.platform);

    h.router.handle_message(guild_msg(channel, MALLORY, "!endchat")).await;

    assert!(!h.platform.was_deleted(channel));
    assert!(
        h.platform
            .notices_in(channel)
            .iter()
            .any(|n| n.contains("owner"))
    );
}

#[tokio::test]
async fn resetchat_clears_history_but_keeps_the_binding() {
    let h = harness("ok").await;
    h.router.handle_message(guild_msg(ENTRY, ALICE, "hello")).await;
    let channel = created_channel(&h.platform);
    assert!(h.store.get(ConversationId::Channel(channel)).await.is_some());

    h.router.handle_message(guild_msg(channel, ALICE, "!resetchat")).await;

    assert!(h.store.get(ConversationId::Channel(channel)).await.is_none());
    assert!(
        temp_channels::get(&h.db, &h.catalog, channel)
            .await
            .unwrap()
            .is_some()
    );
    assert!(!h.platform.was_deleted(channel));
}

#[tokio::test]
async fn admin_commands_require_manage_guild() {
    let h = harness("ok").await;
    h.router
        .handle_message(guild_msg(ENTRY, ALICE, "!settimeout 2"))
        .await;
    assert!(
        h.platform
            .notices_in(ENTRY)
            .iter()
            .any(|n| n.contains("Manage Server"))
    );
    assert!((h.config.timeout_hours().await - 6.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn admin_can_change_timeout_within_bounds() {
    let h = harness("ok").await;
    h.platform.seed_admin(ALICE);

    h.router.handle_message(guild_msg(ENTRY, ALICE, "!settimeout 2")).await;
    assert!((h.config.timeout_hours().await - 2.0).abs() < f64::EPSILON);

    h.router
        .handle_message(guild_msg(ENTRY, ALICE, "!settimeout 9999"))
        .await;
    assert!((h.config.timeout_hours().await - 2.0).abs() < f64::EPSILON);
    assert!(
        h.platform
            .notices_in(ENTRY)
            .iter()
            .any(|n| n.contains("between 0.1 and 720"))
    );
}

#[tokio::test]
async fn admin_can_move_the_entry_channel() {
    let h = harness("ok").await;
    h.platform.seed_admin(ALICE);
    h.platform.seed_channel(ChannelId(200), GUILD, "new-lobby");

    h.router
        .handle_message(guild_msg(ChannelId(200), ALICE, "!setentrychannel"))
        .await;
    assert_eq!(h.config.entry_channel().await, Some(ChannelId(200)));

    // Kickoffs now happen in the new channel, not the old one.
    h.router.handle_message(guild_msg(ChannelId(200), ALICE, "hello")).await;
    assert_eq!(h.platform.created_channels().len(), 1);
}

#[tokio::test]
async fn direct_messages_get_replies_without_a_temp_channel() {
    let h = harness("dm reply").await;
    h.platform.seed_channel(DM_CHANNEL, GuildId(0), "dm-alice");

    h.router.handle_message(dm_msg(ALICE, "hello")).await;

    assert_eq!(h.platform.messages_in(DM_CHANNEL), vec!["dm reply"]);
    assert!(h.platform.created_channels().is_empty());
    assert!(h.store.get(ConversationId::Direct(ALICE)).await.is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_turns_converge_on_one_serialized_conversation() {
    let h = harness("reply").await;
    h.platform.seed_channel(DM_CHANNEL, GuildId(0), "dm-alice");
    let router = Arc::new(h.router);

    let first = tokio::spawn({
        let router = router.clone();
        async move { router.handle_message(dm_msg(ALICE, "one")).await }
    });
    let second = tokio::spawn({
        let router = router.clone();
        async move { router.handle_message(dm_msg(ALICE, "two")).await }
    });
    first.await.unwrap();
    second.await.unwrap();

    // Both replies landed and exactly one conversation is live.
    assert_eq!(h.platform.messages_in(DM_CHANNEL).len(), 2);
    assert!(h.store.get(ConversationId::Direct(ALICE)).await.is_some());

    // Serialization means whichever turn went second carried the first
    // exchange in its history: one request with 1 entry, one with 3.
    let requests = h._server.received_requests().await.unwrap();
    let mut turn_sizes: Vec<usize> = requests
        .iter()
        .map(|r| {
            let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
            body["contents"].as_array().unwrap().len()
        })
        .collect();
    turn_sizes.sort_unstable();
    assert_eq!(turn_sizes, vec![1, 3]);
}

#[tokio::test]
async fn dm_state_recreated_after_a_reap_keeps_the_stored_preference() {
    let h = harness("dm reply").await;
    h.platform.seed_channel(DM_CHANNEL, GuildId(0), "dm-alice");
    let pro = ModelId::parse("gemini:gemini-1.5-pro-latest").unwrap();
    preferences::set(&h.db, ALICE, &pro).await.unwrap();

    h.router.handle_message(dm_msg(ALICE, "hello")).await;
    // The reaper dropped the idle state out from under the router.
    h.store.drop_conversation(ConversationId::Direct(ALICE)).await;
    h.router.handle_message(dm_msg(ALICE, "back again")).await;

    let entry = h.store.get(ConversationId::Direct(ALICE)).await.unwrap();
    assert_eq!(entry.lock().await.model, pro);
}

#[tokio::test]
async fn setmodel_in_a_dm_rebinds_immediately() {
    let h = harness("dm reply").await;
    h.platform.seed_channel(DM_CHANNEL, GuildId(0), "dm-alice");
    h.router.handle_message(dm_msg(ALICE, "hello")).await;

    h.router
        .handle_message(dm_msg(ALICE, "!setmodel gemini:gemini-1.5-pro-latest"))
        .await;
    // The live conversation was dropped for the rebind.
    assert!(h.store.get(ConversationId::Direct(ALICE)).await.is_none());

    h.router.handle_message(dm_msg(ALICE, "fresh start")).await;
    let entry = h.store.get(ConversationId::Direct(ALICE)).await.unwrap();
    assert_eq!(
        entry.lock().await.model.to_string(),
        "gemini:gemini-1.5-pro-latest"
    );
}

#[tokio::test]
async fn channel_creation_failure_is_reported_in_the_entry_channel() {
    let h = harness("ok").await;
    h.platform.fail_channel_creation();

    h.router.handle_message(guild_msg(ENTRY, ALICE, "hello")).await;

    assert!(h.platform.created_channels().is_empty());
    assert!(
        h.platform
            .notices_in(ENTRY)
            .iter()
            .any(|n| n.contains("permission"))
    );
}

#[tokio::test]
async fn vanished_channel_is_purged_on_delivery_failure() {
    let h = harness("ok").await;
    h.router.handle_message(guild_msg(ENTRY, ALICE, "hello")).await;
    let channel = created_channel(&h.platform);

    // Simulate an out-of-band deletion the gateway has not heard about.
    h.platform.delete_channel(channel).await.unwrap();
    h.router.handle_message(guild_msg(channel, ALICE, "anyone?")).await;

    assert!(
        temp_channels::get(&h.db, &h.catalog, channel)
            .await
            .unwrap()
            .is_none()
    );
    assert!(h.store.get(ConversationId::Channel(channel)).await.is_none());

    // And the owner is free to start over.
    h.router.handle_message(guild_msg(ENTRY, ALICE, "retry")).await;
    assert_eq!(h.platform.created_channels().len(), 1);
}

#[tokio::test]
async fn bindings_survive_a_restart() {
    let h = harness("back again").await;
    h.router.handle_message(guild_msg(ENTRY, ALICE, "hello")).await;
    let channel = created_channel(&h.platform);

    // A new store simulates a process restart; the DB and platform persist.
    let restarted = Router::new(
        h.platform.clone(),
        h.db.clone(),
        h.config.clone(),
        h.catalog.clone(),
        Providers::new(
            Some(
                GeminiClient::new("test-key".into(), Duration::from_secs(5))
                    .unwrap()
                    .with_base_url(h._server.uri()),
            ),
            None,
        ),
        Arc::new(SessionStore::new()),
    );

    restarted
        .handle_message(guild_msg(channel, ALICE, "still there?"))
        .await;
    // The reply landed even though no in-memory state existed.
    assert_eq!(h.platform.messages_in(channel).len(), 2);

    // And the duplicate-kickoff guard still holds via the durable store.
    restarted.handle_message(guild_msg(ENTRY, ALICE, "another")).await;
    assert_eq!(h.platform.created_channels().len(), 1);
}
