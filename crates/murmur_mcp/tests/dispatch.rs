use std::sync::Arc;

use murmur_core::test_helpers::{
    FakePlatform, channel_of, guild, message, text_channel, thread, voice_channel,
};
use murmur_core::{ChannelKind, MurmurConfig};
use murmur_mcp::MurmurTools;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn makers() -> FakePlatform {
    let mut build = text_channel("4", "dev-tools", Some("Build"));
    build.threads = vec![
        thread("41", "4", "dev-x", 4),
        thread("42", "4", "y", 1),
        thread("43", "4", "z", 1),
        thread("44", "4", "w", 1),
    ];

    FakePlatform::new()
        .with_guild(guild("900", "Makers"))
        .with_channel(text_channel("1", "general", Some("Lobby")))
        .with_channel(channel_of(ChannelKind::News, "2", "updates", Some("Lobby")))
        .with_channel(text_channel("3", "announcements-archive", None))
        .with_channel(build)
        .with_channel(voice_channel("5", "standup", None))
        .with_messages(
            "1",
            vec![
                message("1", "ada", "shipping the new parser", &[("👍", 3), ("🔥", 2)]),
                message("2", "bob", "meh", &[]),
                message("3", "cy", "love it", &[("❤️", 1)]),
            ],
        )
        .with_pins("1", vec![message("9", "ada", "read the rules", &[])])
        .with_forbidden("66")
}

fn tools_for(platform: Arc<FakePlatform>, config: MurmurConfig) -> MurmurTools {
    MurmurTools::new(platform, Arc::new(config))
}

fn tools() -> MurmurTools {
    tools_for(Arc::new(makers()), MurmurConfig::default())
}

async fn call(tools: &MurmurTools, name: &str, args: Value) -> String {
    tools.dispatch(name, args).await.text().to_string()
}

#[tokio::test]
async fn test_unknown_tool_is_reported() {
    let outcome = tools().dispatch("send_message", json!({})).await;
    assert!(outcome.is_failure());
    assert_eq!(outcome.text(), "Error: Unknown tool: send_message");
}

#[tokio::test]
async fn test_read_messages_clamps_limit_and_keeps_order() {
    let platform = Arc::new(makers());
    let tools = tools_for(platform.clone(), MurmurConfig::default());

    let text = call(
        &tools,
        "read_messages_from_channel",
        json!({"channel_id": "1", "filter": {"limit": 900}}),
    )
    .await;

    assert_eq!(platform.history_limits(), vec![500]);
    assert!(text.starts_with("Retrieved 3 messages (filters: limit=500):\n\n"));
    let newest = text.find("cy (").unwrap();
    let oldest = text.find("ada (").unwrap();
    assert!(newest < oldest);
    assert!(text.contains("Reactions: 👍(3), 🔥(2)"));
}

#[tokio::test]
async fn test_read_messages_oldest_first() {
    let text = call(
        &tools(),
        "read_messages_from_channel",
        json!({"channel_id": "1", "filter": {"limit": "2", "oldest_first": true}}),
    )
    .await;

    assert!(text.starts_with("Retrieved 2 messages (filters: limit=2, oldest_first=true):"));
    assert!(text.find("ada (").unwrap() < text.find("bob (").unwrap());
    assert!(!text.contains("cy ("));
}

#[tokio::test]
async fn test_bad_filters_fail_before_fetching() {
    let platform = Arc::new(makers());
    let tools = tools_for(platform.clone(), MurmurConfig::default());

    let bad_time = call(
        &tools,
        "read_messages_from_channel",
        json!({"channel_id": "1", "filter": {"before": "yesterday"}}),
    )
    .await;
    assert_eq!(
        bad_time,
        "Error: Invalid 'before' timestamp format: 'yesterday'. Use ISO format: YYYY-MM-DDTHH:MM:SS.sssZ"
    );

    let bad_limit = call(
        &tools,
        "read_messages_from_channel",
        json!({"channel_id": "1", "filter": {"limit": 0}}),
    )
    .await;
    assert!(bad_limit.starts_with("Error: Invalid 'limit' filter"));

    assert!(platform.history_limits().is_empty());
}

#[tokio::test]
async fn test_malformed_arguments_are_caller_errors() {
    let text = call(&tools(), "read_messages_from_channel", json!({"filter": {}})).await;
    assert!(text.starts_with("Error: Invalid 'arguments' filter"));
}

#[tokio::test]
async fn test_missing_and_forbidden_channels() {
    let tools = tools();
    assert_eq!(
        call(&tools, "fetch_channel_details", json!({"channel_id": "77"})).await,
        "Error: Channel 77 not found"
    );
    assert_eq!(
        call(&tools, "get_pinned_messages", json!({"channel_id": "66"})).await,
        "Error: No permission to access Channel 66"
    );
}

#[tokio::test]
async fn test_pinned_messages() {
    let tools = tools();
    let text = call(&tools, "get_pinned_messages", json!({"channel_id": "1"})).await;
    assert!(text.starts_with("Found 1 pinned messages:\n\n📌 ada ("));
    assert!(text.contains("Reactions: No reactions"));

    let empty = call(&tools, "get_pinned_messages", json!({"channel_id": "3"})).await;
    assert_eq!(empty, "No pinned messages found in this channel");

    let voice = call(&tools, "get_pinned_messages", json!({"channel_id": "5"})).await;
    assert_eq!(
        voice,
        "Error: Channel type voice does not support pinned messages"
    );
}

#[tokio::test]
async fn test_thread_details_rejects_plain_channels() {
    let text = call(&tools(), "get_thread_details", json!({"thread_id": "1"})).await;
    assert_eq!(text, "Error: Channel 1 is not a thread");
}

#[tokio::test]
async fn test_thread_details_renders_analysis() {
    let text = call(
        &tools(),
        "get_thread_details",
        json!({"thread_id": "41", "recent_limit": 50}),
    )
    .await;
    assert!(text.starts_with("Thread Analysis: dev-x\nMessages: 4 | Members: 2\n"));
    assert!(text.contains("Owner: ada"));
}

#[tokio::test]
async fn test_hot_messages_ranked_by_reactions() {
    let text = call(
        &tools(),
        "get_messages_by_reactions",
        json!({"channel_id": "1"}),
    )
    .await;

    assert!(text.starts_with("Found 2 highly reacted messages in the last 3 messages:"));
    let ada = text.find("🔥 ada (").unwrap();
    let cy = text.find("🔥 cy (").unwrap();
    assert!(ada < cy);
    assert!(!text.contains("bob"));
}

#[tokio::test]
async fn test_workspace_structure_json() {
    let text = call(
        &tools(),
        "get_workspace_structure",
        json!({"guild_id": "900"}),
    )
    .await;
    let value: Value = serde_json::from_str(&text).unwrap();

    let structure = &value["workspace_structure"];
    assert_eq!(structure["guild_info"]["name"], "Makers");
    assert_eq!(structure["total_threads"], 4);
    assert_eq!(structure["total_channels"], 5);

    let groups = value["working_groups"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["channel_name"], "dev-tools");
    assert_eq!(groups[0]["type"], "working_group");
    assert_eq!(groups[0]["thread_count"], 4);
}

#[tokio::test]
async fn test_workspace_overview_text() {
    let text = call(
        &tools(),
        "get_workspace_structure",
        json!({"guild_id": "900", "overview": true}),
    )
    .await;
    assert!(text.starts_with("🏢 **Makers** Workspace Overview\n📊 5 channels, 4 threads"));
    assert!(text.contains("... and 1 more threads"));
    assert!(text.contains("👥 **#dev-tools** (Build)"));
}

#[tokio::test]
async fn test_guild_falls_back_to_configured_default() {
    let mut config = MurmurConfig::default();
    config.discord.default_guild_id = Some("900".to_string());
    let tools = tools_for(Arc::new(makers()), config);

    let text = call(&tools, "find_announcement_channels", json!({})).await;
    assert!(text.starts_with("Found 2 announcement channels in Makers:"));
    assert!(text.contains("📢 updates (ID: 2) - news"));
    assert!(text.contains("📢 announcements-archive (ID: 3) - text"));

    let without_default = call(&self::tools(), "list_channels", json!({})).await;
    assert!(without_default.starts_with("Error: Invalid 'guild_id' filter"));
}

#[tokio::test]
async fn test_server_and_channel_listings() {
    let tools = tools();

    let listing = call(&tools, "list_channels", json!({"guild_id": "900"})).await;
    assert!(listing.starts_with("5 channels in Makers (ID: 900):"));

    let server = call(&tools, "fetch_server_with_channels", json!({"guild_id": "900"})).await;
    let body = server.strip_prefix("Server: ").unwrap();
    let value: Value = serde_json::from_str(body).unwrap();
    assert_eq!(value["name"], "Makers");
    assert_eq!(value["channels"].as_array().unwrap().len(), 5);
    assert_eq!(value["channels"][3]["threads"].as_array().unwrap().len(), 4);

    let all = call(&tools, "get_all_channels_across_servers", Value::Null).await;
    let body = all.strip_prefix("Channels: ").unwrap();
    let value: Value = serde_json::from_str(body).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 5);

    let missing = call(&tools, "fetch_server_with_channels", json!({"guild_id": "1"})).await;
    assert_eq!(missing, "Error: Server 1 not found");
}
