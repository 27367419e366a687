//! Shared contact cards.
//!
//! WhatsApp exports attach every shared contact as a `.vcf` file and leave
//! a reference such as `Dana Cohen.vcf (file attached)` in the message body.
//! [`analyze_shared_contacts`] joins the two: it counts, per phone number,
//! how often the card was shared by a retained message and under which
//! names.
//!
//! Generic card names (`contacts.vcf`, `3 contacts.vcf`, localized
//! equivalents) cannot be told apart across messages, so only their first
//! reference is counted.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::archive::ArchiveEntry;
use crate::core::tally::{OrderedMap, Tally};
use crate::message::Message;

/// One contact from a vCard block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    /// Digits and `+` only.
    pub phone: String,
    pub name: String,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("contact patterns are valid regexes")
}

static FULL_NAME: LazyLock<Regex> = LazyLock::new(|| compile(r"FN:(.*)"));
static TELEPHONE: LazyLock<Regex> = LazyLock::new(|| compile(r"TEL[^:]*:([+\d\s\-()]+)"));
static CARD_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)([\w\s.()&'-]+\.vcf)"));
static GENERIC_CARD: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)^(?:\d+\s+)?(?:contacts|contatti|אנשי קשר)\.vcf$"));

const CARD_START: &str = "BEGIN:VCARD";

/// Splits `text` into blocks that each start at `BEGIN:VCARD`.
fn card_blocks(text: &str) -> impl Iterator<Item = &str> {
    let mut starts: Vec<usize> = text.match_indices(CARD_START).map(|(i, _)| i).collect();
    if starts.first() != Some(&0) {
        starts.insert(0, 0);
    }
    let mut ends: Vec<usize> = starts[1..].to_vec();
    ends.push(text.len());
    starts
        .into_iter()
        .zip(ends)
        .map(move |(start, end)| &text[start..end])
        .filter(|block| !block.trim().is_empty())
}

fn parse_card(block: &str) -> Option<ContactRecord> {
    let name = FULL_NAME.captures(block)?.get(1)?.as_str().trim().to_string();
    let raw_phone = TELEPHONE.captures(block)?.get(1)?.as_str();
    let phone: String = raw_phone
        .chars()
        .filter(|c| !(c.is_whitespace() || matches!(c, '-' | '(' | ')')))
        .collect();
    (!name.is_empty() && !phone.is_empty()).then_some(ContactRecord { phone, name })
}

/// Parses every vCard in `text` that has both a name and a phone number.
///
/// ```
/// use chatwrap::core::contacts::parse_vcards;
///
/// let cards = parse_vcards("BEGIN:VCARD\nFN:Dana\nTEL;type=CELL:+1 (555) 123-4567\nEND:VCARD\n");
/// assert_eq!(cards[0].name, "Dana");
/// assert_eq!(cards[0].phone, "+15551234567");
/// ```
pub fn parse_vcards(text: &str) -> Vec<ContactRecord> {
    card_blocks(text).filter_map(parse_card).collect()
}

/// Share statistics for one phone number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhoneShareStat {
    pub count: u64,
    pub names: Tally<String>,
    /// Most frequent name; the earliest seen wins a tie.
    pub most_common_name: String,
}

impl PhoneShareStat {
    fn record(&mut self, name: &str) {
        self.count += 1;
        self.names.increment(name);

        let mut best = 0;
        for (candidate, &n) in self.names.iter() {
            if n > best {
                best = n;
                self.most_common_name.clone_from(candidate);
            }
        }
    }

    /// All names, most frequent first.
    pub fn aliases(&self) -> Vec<(&String, u64)> {
        self.names.sorted()
    }
}

/// Phone number to share statistics, in first-shared order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactShares {
    phones: OrderedMap<String, PhoneShareStat>,
}

impl ContactShares {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one share of `contact`.
    pub fn record(&mut self, contact: &ContactRecord) {
        self.phones.get_or_default(contact.phone.as_str()).record(&contact.name);
    }

    pub fn get(&self, phone: &str) -> Option<&PhoneShareStat> {
        self.phones.get(phone)
    }

    /// Number of distinct phone numbers.
    pub fn len(&self) -> usize {
        self.phones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PhoneShareStat)> {
        self.phones.iter()
    }

    /// The `n` most shared numbers.
    pub fn top(&self, n: usize) -> Vec<(&String, &PhoneShareStat)> {
        self.phones.ranked_by(n, |stat| stat.count)
    }

    /// Numbers shared more than once.
    pub fn shared_by_multiple(&self) -> usize {
        self.phones.values().filter(|stat| stat.count > 1).count()
    }

    /// Numbers shared under more than one name.
    pub fn with_different_names(&self) -> usize {
        self.phones.values().filter(|stat| stat.names.len() > 1).count()
    }
}

/// Card file names referenced by a message body, trimmed.
pub fn card_references(text: &str) -> impl Iterator<Item = &str> {
    CARD_REFERENCE.find_iter(text).map(|m| m.as_str().trim())
}

pub fn is_generic_card_name(filename: &str) -> bool {
    GENERIC_CARD.is_match(filename)
}

/// Counts contact shares referenced by `messages` among the `.vcf` archive
/// `entries`.
pub fn analyze_shared_contacts(entries: &[ArchiveEntry], messages: &[Message]) -> ContactShares {
    let by_name: HashMap<&str, &ArchiveEntry> =
        entries.iter().map(|entry| (entry.basename(), entry)).collect();
    let mut parsed: HashMap<&str, Vec<ContactRecord>> = HashMap::new();
    let mut generic_seen: HashMap<&str, u64> = HashMap::new();
    let mut shares = ContactShares::new();

    for message in messages {
        for reference in card_references(&message.text) {
            let Some((&filename, entry)) = by_name.get_key_value(reference) else {
                continue;
            };
            if is_generic_card_name(filename) {
                let seen = generic_seen.entry(filename).or_insert(0);
                *seen += 1;
                if *seen > 1 {
                    continue;
                }
            }
            let contacts = parsed
                .entry(filename)
                .or_insert_with(|| parse_vcards(&entry.text_lossy()));
            for contact in contacts.iter() {
                shares.record(contact);
            }
        }
    }

    tracing::debug!(cards = entries.len(), phones = shares.len(), "analyzed shared contacts");
    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn card(name: &str, phone: &str) -> String {
        format!("BEGIN:VCARD\r\nVERSION:3.0\r\nFN:{name}\r\nTEL;type=CELL;waid=1:{phone}\r\nEND:VCARD\r\n")
    }

    fn entry(filename: &str, body: &str) -> ArchiveEntry {
        ArchiveEntry {
            filename: filename.to_string(),
            content: body.as_bytes().to_vec(),
        }
    }

    fn msg(text: &str) -> Message {
        let ts = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
        Message::new(Some("Alice".into()), ts, text)
    }

    #[test]
    fn test_parse_multiple_cards() {
        let text = format!("{}{}", card("Dana", "+1 555-123-4567"), card("Noa", "+972 (50) 123 4567"));
        let cards = parse_vcards(&text);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].phone, "+15551234567");
        assert_eq!(cards[1].name, "Noa");
        assert_eq!(cards[1].phone, "+972501234567");
    }

    #[test]
    fn test_parse_skips_incomplete_cards() {
        let text = "BEGIN:VCARD\nFN:No Phone\nEND:VCARD\nBEGIN:VCARD\nTEL:+1555\nEND:VCARD\n";
        assert!(parse_vcards(text).is_empty());
        assert!(parse_vcards("").is_empty());
    }

    #[test]
    fn test_most_common_name_keeps_earliest_on_tie() {
        let mut stat = PhoneShareStat::default();
        stat.record("Dana");
        stat.record("Dana Cohen");
        assert_eq!(stat.most_common_name, "Dana");
        stat.record("Dana Cohen");
        assert_eq!(stat.most_common_name, "Dana Cohen");
        assert_eq!(stat.count, 3);
        assert_eq!(stat.aliases()[0].0, "Dana Cohen");
    }

    #[test]
    fn test_references() {
        let refs: Vec<&str> = card_references(" Dana Cohen.vcf (file attached)").collect();
        assert_eq!(refs, vec!["Dana Cohen.vcf"]);
        assert!(is_generic_card_name("3 contacts.vcf"));
        assert!(is_generic_card_name("Contacts.VCF"));
        assert!(is_generic_card_name("אנשי קשר.vcf"));
        assert!(!is_generic_card_name("Dana.vcf"));
    }

    #[test]
    fn test_analyze_counts_referenced_cards_only() {
        let entries = vec![
            entry("Dana.vcf", &card("Dana", "+15551234567")),
            entry("Unused.vcf", &card("Ghost", "+15550000000")),
        ];
        let messages = vec![
            msg("Dana.vcf (file attached)"),
            msg("Dana.vcf (file attached)"),
            msg("no cards here"),
        ];
        let shares = analyze_shared_contacts(&entries, &messages);
        assert_eq!(shares.len(), 1);
        assert_eq!(shares.get("+15551234567").unwrap().count, 2);
        assert!(shares.get("+15550000000").is_none());
        assert_eq!(shares.shared_by_multiple(), 1);
        assert_eq!(shares.with_different_names(), 0);
    }

    #[test]
    fn test_generic_name_counted_once() {
        let body = format!("{}{}", card("A", "+111"), card("B", "+222"));
        let entries = vec![entry("chat/2 contacts.vcf", &body)];
        let messages = vec![msg("2 contacts.vcf (file attached)"), msg("2 contacts.vcf (file attached)")];
        let shares = analyze_shared_contacts(&entries, &messages);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares.get("+111").unwrap().count, 1);
    }

    #[test]
    fn test_different_names_and_ranking() {
        let entries = vec![
            entry("Dana.vcf", &card("Dana", "+1555")),
            entry("Mom.vcf", &card("Mom", "+1555")),
            entry("Noa.vcf", &card("Noa", "+9725")),
        ];
        let messages = vec![msg("Noa.vcf (file attached)"), msg("Dana.vcf (file attached)"), msg("Mom.vcf (file attached)")];
        let shares = analyze_shared_contacts(&entries, &messages);
        assert_eq!(shares.with_different_names(), 1);
        let top = shares.top(1);
        assert_eq!(top[0].0, "+1555");
        assert_eq!(top[0].1.most_common_name, "Dana");
    }
}
