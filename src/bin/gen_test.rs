//! Synthetic transcript generator for stress testing chatwrap.
//!
//! Usage: cargo run --features gen-test --bin gen_test -- [messages] [output] [dialect]
//! Example: cargo run --features gen-test --bin gen_test -- 100000 heavy_test.txt iso
//!
//! Dialects: `us` (default), `iso`, `dayslash`, `daydot`.

use rand::Rng;
use rand::seq::SliceRandom;
use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};

const EMOJIS: &[&str] = &[
    "😀", "😂", "😍", "🤔", "😱", "🔥", "👍", "❤️", "🎉", "🙏", "🇮🇱", "🇺🇸", "👨‍👩‍👧‍👦", "🤷‍♀️",
    "☀️", "✨",
];

const SENDERS: &[&str] = &[
    "Alice",
    "Bob",
    "Carol Danvers",
    "Иван",
    "דנה",
    "محمد",
    "🔥FireUser🔥",
    "+1 555-123-4567",
];

const WORDS: &[&str] = &[
    "pizza", "tonight", "meeting", "the", "and", "hike", "beach", "train", "coffee", "deadline",
    "birthday", "shabbat", "football", "concert", "homework", "garden", "again", "maybe",
];

const TAGS: &[&str] = &["@15551234567", "@972501234567", "@447700900123"];

#[derive(Clone, Copy)]
enum Dialect {
    Us,
    Iso,
    DaySlash,
    DayDot,
}

impl Dialect {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "us" => Some(Dialect::Us),
            "iso" => Some(Dialect::Iso),
            "dayslash" => Some(Dialect::DaySlash),
            "daydot" => Some(Dialect::DayDot),
            _ => None,
        }
    }

    /// Full header for message `i`, one message per ~7 minutes through 2024.
    fn header(self, i: usize, sender: Option<&str>) -> String {
        let minutes = i * 7;
        let day_of_year = (minutes / (24 * 60)) % 360;
        let (month, day) = (day_of_year / 30 + 1, day_of_year % 30 + 1);
        let (hour, minute) = ((minutes / 60) % 24, minutes % 60);
        let (hour12, ampm) = match hour {
            0 => (12, "AM"),
            1..=11 => (hour, "AM"),
            12 => (12, "PM"),
            _ => (hour - 12, "PM"),
        };
        let who = sender.map(|s| format!("{s}: ")).unwrap_or_default();
        match self {
            Dialect::Us => format!("{month}/{day}/24, {hour:02}:{minute:02} - {who}"),
            Dialect::Iso => {
                let who = sender.map_or_else(|| "System: ".to_string(), |s| format!("{s}: "));
                format!("[2024-{month:02}-{day:02}, {hour12}:{minute:02}:00 {ampm}] {who}")
            }
            Dialect::DaySlash => format!("{day}/{month}/2024, {hour}:{minute:02} - {who}"),
            Dialect::DayDot => format!("{day}.{month}.2024, {hour}:{minute:02} - {who}"),
        }
    }
}

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let count: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(100_000);
    let output = args.get(2).map(|s| s.as_str()).unwrap_or("heavy_test.txt");
    let dialect_name = args.get(3).map(|s| s.as_str()).unwrap_or("us");
    let Some(dialect) = Dialect::parse(dialect_name) else {
        eprintln!("Unknown dialect: {}. Use 'us', 'iso', 'dayslash' or 'daydot'", dialect_name);
        std::process::exit(1);
    };

    println!("🧪 Transcript Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Messages: {}", count);
    println!("   Output:   {}", output);
    println!("   Dialect:  {}", dialect_name);
    println!();

    let file = File::create(output)?;
    let mut writer = BufWriter::with_capacity(1024 * 1024, file);
    let mut rng = rand::thread_rng();
    let start = std::time::Instant::now();
    let mut bytes_written: usize = 0;

    for i in 0..count {
        let line = generate_line(&mut rng, dialect, i);
        bytes_written += line.len();
        writer.write_all(line.as_bytes())?;

        // Occasionally insert garbage lines to test robustness
        if i % 1000 == 500 {
            let garbage = generate_garbage_line(&mut rng);
            bytes_written += garbage.len();
            writer.write_all(garbage.as_bytes())?;
        }

        if (i + 1) % 10000 == 0 {
            let elapsed = start.elapsed().as_secs_f64();
            eprint!(
                "\r   Generated {}/{} ({:.1} MB, {:.0} msg/s)",
                i + 1,
                count,
                bytes_written as f64 / 1_000_000.0,
                (i + 1) as f64 / elapsed
            );
        }
    }
    writer.flush()?;

    let elapsed = start.elapsed();
    println!("\n\n✅ Done!");
    println!("   Size: {:.2} MB", bytes_written as f64 / 1_000_000.0);
    println!("   Time: {:.2}s", elapsed.as_secs_f64());
    println!("   Speed: {:.0} msg/s", count as f64 / elapsed.as_secs_f64());
    Ok(())
}

fn pick<'a>(rng: &mut impl Rng, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn sentence(rng: &mut impl Rng, len: usize) -> String {
    (0..len).map(|_| pick(rng, WORDS)).collect::<Vec<_>>().join(" ")
}

fn generate_line(rng: &mut impl Rng, dialect: Dialect, index: usize) -> String {
    let sender = pick(rng, SENDERS);
    let body = match index % 25 {
        // Ordinary chatter
        0..=9 => {
            let len = rng.gen_range(1..12);
            sentence(rng, len)
        }

        // Questions
        10 => format!("{}?", sentence(rng, 4)),
        11 => format!("what about {}", sentence(rng, 2)),

        // Media and deletions
        12 => "<Media omitted>".to_string(),
        13 => "IMG-20240101-WA0001.jpg (file attached)".to_string(),
        14 => "This message was deleted".to_string(),
        15 => String::new(),

        // Tags and emojis
        16 => format!("{} {}", pick(rng, TAGS), sentence(rng, 3)),
        17 => (0..rng.gen_range(1..20)).map(|_| pick(rng, EMOJIS)).collect(),

        // Multi-line
        18 => format!("{}\n{}\n{}", sentence(rng, 3), sentence(rng, 2), sentence(rng, 5)),

        // Contact card reference
        19 => "Dana Cohen.vcf (file attached)".to_string(),

        // System notices
        20 => return format!("{}{} added {}\n", dialect.header(index, None), sender, pick(rng, SENDERS)),
        21 => return format!("{}{} left\n", dialect.header(index, None), sender),
        22 => return format!("{}{} changed the group description\n", dialect.header(index, None), sender),
        23 => return format!("{}Messages and calls are end-to-end encrypted.\n", dialect.header(index, None)),

        // Edited
        _ => format!("{} <This message was edited>", sentence(rng, 3)),
    };
    format!("{}{}\n", dialect.header(index, Some(sender)), body)
}

fn generate_garbage_line(rng: &mut impl Rng) -> String {
    match rng.gen_range(0..4) {
        0 => "\n".to_string(),
        1 => "   \n".to_string(),
        2 => "99/99/99, 99:99 - Nobody: impossible date\n".to_string(),
        _ => "Random garbage without timestamp\n".to_string(),
    }
}
