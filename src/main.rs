//! # chatwrap CLI
//!
//! Command-line interface for the chatwrap library.

use std::fs;
use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use chatwrap::cli::Args;
use chatwrap::core::output::{write_json, write_text, write_texts_json};
use chatwrap::core::{Report, ReportBuilder, Statistics, StopWords, analyze_shared_contacts};
use chatwrap::format::{ReportFormat, render_report};
use chatwrap::parser::TranscriptParser;
use chatwrap::{ChatwrapError, Message};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ChatwrapError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();
    let config = args.to_config()?;
    let format: ReportFormat = args.format.into();

    // Status goes to stderr; stdout carries only the report
    eprintln!("🎁 chatwrap v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!("📂 Input:   {}", args.input.display());
    eprintln!("📄 Format:  {}", format);
    if let Some(start) = config.start_date {
        eprintln!("📅 Start:   {}", start);
    }
    if let Some(end) = config.end_date {
        eprintln!("📅 End:     {}", end);
    }
    eprintln!();

    let locale = config.load_locale()?;
    let stop_words = StopWords::load(config.stop_words.as_slice())?;

    eprintln!("⏳ Parsing...");
    let parse_start = Instant::now();
    let parser = TranscriptParser::with_config(config.clone());
    let (source, mut chat) = parser.parse(&args.input)?;
    eprintln!(
        "   Found {} messages in {} format ({:.2}s)",
        chat.messages.len(),
        chat.dialect,
        parse_start.elapsed().as_secs_f64()
    );
    if chat.unparsable > 0 {
        eprintln!("   ⚠️  {} lines could not be attributed to a message", chat.unparsable);
    }

    eprintln!("📊 Computing statistics...");
    let stats = Statistics::aggregate(&mut chat.messages, &stop_words);

    let cards = source.contact_cards();
    let contacts = analyze_shared_contacts(&cards, &chat.messages);
    if !cards.is_empty() {
        eprintln!("   {} contact cards, {} distinct numbers shared", cards.len(), contacts.len());
    }

    let report = ReportBuilder::new(&stats, &config, &locale)
        .with_group_name(source.group_name())
        .with_membership(chat.joined.len(), chat.left.len(), chat.pinned)
        .with_contacts(&contacts)
        .build();

    if let Some(dir) = &args.output_dir {
        eprintln!("💾 Writing {}...", dir.display());
        write_outputs(dir, &report, &chat.messages)?;
    }

    eprintln!("✅ Done in {:.2}s", total_start.elapsed().as_secs_f64());
    eprintln!();

    print!("{}", render_report(&report, format)?);
    if format == ReportFormat::Json {
        println!();
    }
    Ok(())
}

fn write_outputs(dir: &Path, report: &Report, messages: &[Message]) -> Result<(), ChatwrapError> {
    fs::create_dir_all(dir)?;
    write_text(report, &dir.join("results.txt"))?;
    write_json(messages, &dir.join("messages.json"))?;
    write_texts_json(messages, &dir.join("messages-text.json"))?;

    #[cfg(feature = "csv-output")]
    {
        if !messages.is_empty() {
            chatwrap::core::output::write_csv(messages, &dir.join("messages.csv"))?;
        }
    }
    Ok(())
}
