//! Integration tests for the full transcript pipeline with real files

use chatwrap::core::output::{render_text, report_to_json, to_json};
use chatwrap::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::{TempDir, tempdir};

const CREW_CHAT: &str = "\
1/1/24, 09:00 - Messages and calls are end-to-end encrypted. No one outside of this chat can read them.
1/1/24, 09:01 - Alice added Bob
1/1/24, 09:02 - Alice: Good morning everyone 🌞
1/1/24, 09:03 - Bob: Morning! Anyone up for pizza tonight?
1/1/24, 21:15 - Alice: <Media omitted>
1/2/24, 21:20 - Bob: @15551234567 pizza at eight
pizza place on main street
1/2/24, 21:25 - Carol: This message was deleted
1/2/24, 21:30 - Alice pinned a message
1/3/24, 08:00 - Carol left";

fn fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

fn crew_report(config: &WrappedConfig) -> (ParsedChat, Report) {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = fixture(&dir, "WhatsApp Chat with Crew.txt", CREW_CHAT);
    let parser = TranscriptParser::with_config(config.clone());
    let (source, mut chat) = parser.parse(&path).unwrap();

    let stats = Statistics::aggregate(&mut chat.messages, &StopWords::english());
    let locale = Locale::english();
    let report = ReportBuilder::new(&stats, config, &locale)
        .with_group_name(source.group_name())
        .with_membership(chat.joined.len(), chat.left.len(), chat.pinned)
        .build();
    (chat, report)
}

fn values<'a>(report: &'a Report, title: &str) -> Vec<(&'a str, &'a str)> {
    report
        .section(title)
        .unwrap_or_else(|| panic!("missing section {title}"))
        .items
        .iter()
        .map(|item| (item.name.as_str(), item.value.as_str()))
        .collect()
}

// =========================================================================
// Parsing
// =========================================================================

#[test]
fn test_crew_chat_buckets() {
    let (chat, _) = crew_report(&WrappedConfig::default());

    assert_eq!(chat.dialect, Dialect::UsShortYear);
    assert_eq!(chat.messages.len(), 5);
    assert_eq!(chat.joined.count("Bob"), 1);
    assert_eq!(chat.left.count("Carol"), 1);
    assert_eq!(chat.pinned, 1);
    assert_eq!(chat.dropped, 1);
    assert_eq!(chat.unparsable, 0);
    assert_eq!(chat.scanned(), 9);
}

#[test]
fn test_continuation_lines_join_the_open_message() {
    let (chat, _) = crew_report(&WrappedConfig::default());
    let bob = &chat.messages[3];
    assert_eq!(bob.sender.as_deref(), Some("Bob"));
    assert_eq!(bob.text, "@15551234567 pizza at eight\npizza place on main street");
    assert_eq!((bob.month, bob.day, bob.hour, bob.minute), (1, 2, 21, 20));
}

#[test]
fn test_same_conversation_in_every_dialect() {
    let transcripts = [
        (
            Dialect::UsShortYear,
            "3/15/24, 10:00 - Alice: hello\n3/15/24, 22:30 - Bob: hi there\nsecond line",
        ),
        (
            Dialect::IsoBracketed,
            "[2024-03-15, 10:00:00 AM] Alice: hello\n[2024-03-15, 10:30:00 PM] Bob: hi there\nsecond line",
        ),
        (
            Dialect::DaySlash,
            "15/3/2024, 10:00 - Alice: hello\n15/3/2024, 22:30 - Bob: hi there\nsecond line",
        ),
        (
            Dialect::DayDot,
            "15.3.2024, 10:00 - Alice: hello\n15.3.2024, 22:30 - Bob: hi there\nsecond line",
        ),
    ];

    for (expected, text) in transcripts {
        let chat = TranscriptParser::new().parse_str(text);
        assert_eq!(chat.dialect, expected, "dialect of {text:?}");
        assert_eq!(chat.messages.len(), 2, "{expected}");

        let bob = &chat.messages[1];
        assert_eq!(bob.sender.as_deref(), Some("Bob"), "{expected}");
        assert_eq!(bob.text, "hi there\nsecond line", "{expected}");
        assert_eq!((bob.year, bob.month, bob.day), (2024, 3, 15), "{expected}");
        assert_eq!((bob.hour, bob.minute), (22, 30), "{expected}");
    }
}

#[test]
fn test_senderless_add_registers_the_new_member() {
    let chat = TranscriptParser::new().parse_str("1/5/24, 12:00 - Alice added Bob\n1/5/24, 12:01 - Bob: thanks!");
    assert_eq!(chat.joined.count("Bob"), 1);
    assert_eq!(chat.messages.len(), 1);
    assert_eq!(chat.messages[0].text, "thanks!");
}

#[test]
fn test_date_window_keeps_only_inside() {
    let config = WrappedConfig::new().with_date_range("2024-01-02", "2024-01-02").unwrap();
    let (chat, report) = crew_report(&config);

    assert_eq!(chat.messages.len(), 2);
    assert_eq!(chat.pinned, 1);
    assert_eq!(chat.joined.len(), 0);
    assert_eq!(chat.left.len(), 0);
    assert_eq!(chat.outside_window, 6);
    assert_eq!(report.metadata.start_date, chrono::NaiveDate::from_ymd_opt(2024, 1, 2));
    assert_eq!(report.metadata.end_date, chrono::NaiveDate::from_ymd_opt(2024, 1, 2));
}

// =========================================================================
// Statistics and report
// =========================================================================

#[test]
fn test_report_sections_in_order() {
    let (_, report) = crew_report(&WrappedConfig::default());
    let titles: Vec<&str> = report.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Top senders",
            "Top media senders",
            "Top question askers",
            "Top taggers",
            "Top taggees",
            "Message Stats",
            "Member Stats",
            "Most Active Hours",
            "Most Active Days",
            "Most Active Months",
            "Top Words",
            "Top Uncommon Words",
            "Word Stats",
            "Top Emoji Senders",
            "Top Emojis",
            "Emoji Stats",
        ]
    );
}

#[test]
fn test_report_values() {
    let (_, report) = crew_report(&WrappedConfig::default());

    assert_eq!(
        values(&report, "Top senders"),
        vec![("Alice", "2 messages"), ("Bob", "2 messages"), ("Carol", "1 message")]
    );
    assert_eq!(values(&report, "Top media senders")[0], ("Alice", "1 message with media"));
    assert_eq!(values(&report, "Top question askers").len(), 1);
    assert_eq!(values(&report, "Top question askers")[0].0, "Bob");
    assert_eq!(values(&report, "Top taggees")[0].0, "@15551234567");

    let message_stats = values(&report, "Message Stats");
    assert!(message_stats.contains(&("Total messages", "5")));
    assert!(message_stats.contains(&("Messages with media", "1")));
    assert!(message_stats.contains(&("Messages deleted", "1")));
    assert!(message_stats.contains(&("Daily average", "2.5")));
    assert!(message_stats.contains(&("Messages pinned", "1")));

    let member_stats = values(&report, "Member Stats");
    assert_eq!(
        member_stats,
        vec![("Message senders", "3"), ("Members joined", "1"), ("Members left", "1")]
    );

    assert_eq!(values(&report, "Top Words")[0], ("pizza", "3 times"));
    assert_eq!(values(&report, "Top Emojis"), vec![("🌞", "1 time")]);
    assert_eq!(values(&report, "Emoji Stats"), vec![("Number of unique emojis", "1")]);
}

#[test]
fn test_top_count_limits_every_list() {
    let config = WrappedConfig::new().with_top_count(1);
    let (_, report) = crew_report(&config);
    for section in report.sections.iter().filter(|s| s.is_ranked()) {
        assert!(section.items.len() <= 1, "{} has {} rows", section.title, section.items.len());
    }
    assert_eq!(values(&report, "Top senders"), vec![("Alice", "2 messages")]);
}

#[test]
fn test_banner_names_group_and_range() {
    let (_, report) = crew_report(&WrappedConfig::default());
    let text = render_text(&report);

    assert!(text.starts_with("╔"));
    assert!(text.contains("Welcome to Your"));
    assert!(text.contains("WhatsApp Group Wrapped 1/1/2024 - 1/2/2024"));
    assert!(text.contains("Crew"));
    assert!(text.contains("Top senders:\n1. Alice - 2 messages\n2. Bob - 2 messages\n"));
    assert!(text.contains("Message Stats:\nTotal messages: 5\n"));
}

#[test]
fn test_full_year_title() {
    let config = WrappedConfig::new().with_date_range("2024-01-01", "2024-12-31").unwrap();
    let (_, report) = crew_report(&config);
    assert!(render_text(&report).contains("WhatsApp Group Wrapped 2024"));
}

#[test]
fn test_report_json_shape() {
    let (_, report) = crew_report(&WrappedConfig::default());
    let json: serde_json::Value = serde_json::from_str(&report_to_json(&report).unwrap()).unwrap();

    assert_eq!(json["metadata"]["groupName"], "Crew");
    assert_eq!(json["metadata"]["startDate"], "2024-01-01");
    assert_eq!(json["metadata"]["endDate"], "2024-01-02");
    assert_eq!(json["metadata"]["language"]["code"], "en");
    assert_eq!(json["metadata"]["language"]["rtl"], false);

    let sections = json["sections"].as_array().unwrap();
    assert_eq!(sections[0]["title"], "Top senders");
    assert_eq!(sections[0]["isRanked"], true);
    assert_eq!(sections[0]["items"][0]["name"], "Alice");
    assert_eq!(sections[0]["items"][0]["value"], "2 messages");
    assert_eq!(sections[5]["isRanked"], false);
}

#[test]
fn test_message_dump_carries_enrichment() {
    let (chat, _) = crew_report(&WrappedConfig::default());
    let json: serde_json::Value = serde_json::from_str(&to_json(&chat.messages).unwrap()).unwrap();
    let rows = json.as_array().unwrap();

    assert_eq!(rows.len(), 5);
    assert_eq!(rows[1]["sender"], "Bob");
    assert_eq!(rows[1]["question"], true);
    assert_eq!(rows[2]["media"], true);
    assert_eq!(rows[3]["tags"][0], "@15551234567");
    assert_eq!(rows[4]["deleted"], true);
}

#[test]
fn test_tag_names_from_config() {
    let config = WrappedConfig::new().with_tag("@15551234567", "Dana");
    let (_, report) = crew_report(&config);
    assert_eq!(values(&report, "Top taggees")[0].0, "Dana");
}

// =========================================================================
// Inputs
// =========================================================================

#[test]
fn test_missing_input_is_an_input_error() {
    let err = TranscriptParser::new()
        .parse("/definitely/not/here.txt".as_ref())
        .unwrap_err();
    assert!(err.is_input());
}

#[test]
fn test_invalid_utf8_transcript_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.txt");
    fs::write(&path, [0x31, 0x2f, 0xff, 0xfe]).unwrap();
    assert!(TranscriptParser::new().parse(&path).is_err());
}

#[test]
fn test_config_file_round_trips_into_report() {
    let dir = tempdir().unwrap();
    let path = fixture(
        &dir,
        "wrapped.toml",
        "top_count = 2\nstart_date = \"2024-01-01\"\n\n[tag_to_name]\n\"@15551234567\" = \"Dana\"\n",
    );
    let config = WrappedConfig::load(&path).unwrap();
    let (_, report) = crew_report(&config);
    assert_eq!(values(&report, "Top senders").len(), 2);
    assert_eq!(values(&report, "Top taggees")[0].0, "Dana");
}
