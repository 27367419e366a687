//! JSON output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::Message;
use crate::core::report::Report;
use crate::error::Result;

/// Pretty-prints `value` with `indent`.
fn to_pretty<T: Serialize + ?Sized>(value: &T, indent: &[u8]) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent));
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

/// Converts messages to a JSON array, four-space indented.
///
/// # Format
/// ```json
/// [
///     {"sender": "Alice", "year": 2024, "month": 1, ..., "text": "Hello", "deleted": false, ...}
/// ]
/// ```
pub fn to_json(messages: &[Message]) -> Result<String> {
    to_pretty(messages, b"    ")
}

/// Writes messages to a JSON file as an array.
pub fn write_json(messages: &[Message], output_path: &Path) -> Result<()> {
    let json = to_json(messages)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts message bodies to a JSON array of strings.
pub fn to_texts_json(messages: &[Message]) -> Result<String> {
    let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
    to_pretty(&texts, b"    ")
}

/// Writes message bodies to a JSON file as an array of strings.
pub fn write_texts_json(messages: &[Message], output_path: &Path) -> Result<()> {
    let json = to_texts_json(messages)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts a report to its JSON document, two-space indented.
pub fn report_to_json(report: &Report) -> Result<String> {
    to_pretty(report, b"  ")
}
