//! CSV output writer.

use std::path::Path;

use crate::Message;
use crate::error::Result;

const HEADER: [&str; 13] = [
    "sender", "year", "month", "day", "hour", "minute", "timestamp", "text", "deleted", "media",
    "question", "tags", "emojis",
];

fn build_record(msg: &Message) -> [String; 13] {
    [
        msg.sender_name().to_string(),
        msg.year.to_string(),
        msg.month.to_string(),
        msg.day.to_string(),
        msg.hour.to_string(),
        msg.minute.to_string(),
        msg.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        msg.text.clone(),
        msg.deleted.to_string(),
        msg.media.to_string(),
        msg.question.to_string(),
        msg.tags.join(" "),
        msg.emojis.clone(),
    ]
}

fn write_records<W: std::io::Write>(messages: &[Message], writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b',').from_writer(writer);
    writer.write_record(HEADER)?;
    for msg in messages {
        writer.write_record(build_record(msg))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes messages to a CSV file.
///
/// # Format
/// - Delimiter: `,`
/// - Columns: the message fields, `tags` space-separated
/// - Values holding a comma, a quote or a line break are quoted
/// - Encoding: UTF-8
pub fn write_csv(messages: &[Message], output_path: &Path) -> Result<()> {
    let file = std::fs::File::create(output_path)?;
    write_records(messages, file)
}

/// Converts messages to a CSV string. Empty when there are no messages.
pub fn to_csv(messages: &[Message]) -> Result<String> {
    if messages.is_empty() {
        return Ok(String::new());
    }
    let mut buf = Vec::new();
    write_records(messages, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}
