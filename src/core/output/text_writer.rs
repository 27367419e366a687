//! Plain-text report renderer.
//!
//! Layout:
//!
//! ```text
//! ╔══════...══╗
//! ║  Welcome  ║
//! ╚══════...══╝
//!
//! Top senders:
//! 1. Alice - 12 messages
//! 2. Bob - 7 messages
//!
//! Message Stats:
//! Total messages: 19
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::core::report::{Layout, Report, ReportItem, Section};
use crate::error::Result;

fn render_item(out: &mut String, layout: Layout, rank: usize, item: &ReportItem) {
    let name = match &item.context {
        Some(context) => format!("{} ({context})", item.name),
        None => item.name.clone(),
    };
    let line = match layout {
        Layout::Ranked => format!("{rank}. {name} - {}\n", item.value),
        Layout::Buckets => format!("{name} - {}\n", item.value),
        Layout::Stats => format!("{name}: {}\n", item.value),
    };
    out.push_str(&line);
    if let Some(detail) = &item.detail {
        out.push_str(&format!("   {detail}\n"));
    }
}

fn render_section(out: &mut String, section: &Section) {
    out.push_str(&format!("{}:\n", section.title));
    for (i, item) in section.items.iter().enumerate() {
        render_item(out, section.layout, i + 1, item);
    }
    if !section.footer.is_empty() {
        out.push('\n');
        for item in &section.footer {
            out.push_str(&format!("{}: {}\n", item.name, item.value));
        }
    }
    out.push('\n');
}

/// Renders the banner followed by every section.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    for line in &report.banner {
        out.push_str(line);
        out.push('\n');
    }
    if !report.banner.is_empty() {
        out.push('\n');
    }
    for section in &report.sections {
        render_section(&mut out, section);
    }
    out
}

/// Writes the rendered report to a file.
pub fn write_text(report: &Report, output_path: &Path) -> Result<()> {
    let mut file = File::create(output_path)?;
    file.write_all(render_text(report).as_bytes())?;
    Ok(())
}
