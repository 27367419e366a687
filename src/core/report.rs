//! The "wrapped" report: a banner plus titled sections of name/value rows.
//!
//! A [`Report`] is rendered as plain text by
//! [`render_text`](crate::core::output::text_writer::render_text) or
//! serialized as JSON:
//!
//! ```json
//! {
//!   "metadata": {"groupName": "...", "startDate": "2024-01-01", "endDate": "2024-12-31",
//!                "language": {"code": "en", "name": "English", "rtl": false}},
//!   "sections": [{"title": "Top senders", "icon": "📊", "isRanked": true,
//!                 "items": [{"name": "Alice", "value": "12 messages"}]}]
//! }
//! ```

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::config::WrappedConfig;
use crate::core::contacts::ContactShares;
use crate::core::stats::Statistics;
use crate::locale::Locale;

/// Minimum inner width of the banner box.
const BANNER_MIN_WIDTH: usize = 46;

/// How a section's rows are laid out in the text report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Numbered leaderboard.
    Ranked,
    /// Every bucket, `name - value`.
    Buckets,
    /// Headline figures, `name: value`.
    Stats,
}

fn serialize_is_ranked<S: Serializer>(layout: &Layout, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_bool(*layout == Layout::Ranked)
}

/// One row of a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportItem {
    pub name: String,
    pub value: String,
    /// Shown in parentheses after the name in the text report.
    #[serde(skip)]
    pub context: Option<String>,
    /// Indented line below the row in the text report.
    #[serde(skip)]
    pub detail: Option<String>,
}

impl ReportItem {
    pub fn new(name: impl Into<String>, value: impl ToString) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
            context: None,
            detail: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// A titled group of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub title: String,
    pub icon: String,
    #[serde(rename = "isRanked", serialize_with = "serialize_is_ranked")]
    pub layout: Layout,
    pub items: Vec<ReportItem>,
    /// Rows printed in the text report only.
    #[serde(skip)]
    pub footer: Vec<ReportItem>,
}

impl Section {
    pub fn new(title: impl Into<String>, icon: &str, layout: Layout) -> Self {
        Self {
            title: title.into(),
            icon: icon.to_string(),
            layout,
            items: Vec::new(),
            footer: Vec::new(),
        }
    }

    pub fn is_ranked(&self) -> bool {
        self.layout == Layout::Ranked
    }

    #[must_use]
    pub fn with_items(mut self, items: impl IntoIterator<Item = ReportItem>) -> Self {
        self.items.extend(items);
        self
    }

    #[must_use]
    pub fn with_footer(mut self, item: ReportItem) -> Self {
        self.footer.push(item);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
    pub rtl: bool,
}

impl From<&Locale> for LanguageInfo {
    fn from(locale: &Locale) -> Self {
        Self {
            code: locale.code().to_string(),
            name: locale.name().to_string(),
            rtl: locale.is_rtl(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub group_name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub language: LanguageInfo,
}

/// A complete report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub sections: Vec<Section>,
    /// Boxed greeting printed above the text report.
    #[serde(skip)]
    pub banner: Vec<String>,
}

impl Report {
    /// Looks up a section by title.
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }
}

static GROUP_NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    const PREFIXES: &[&str] = &[
        r"WhatsApp[_ ]Chat[_ ]with[_ ]",
        r"WhatsApp[_ ]Chat[_ ]-[_ ]",
        r"Chat[_ ]de[_ ]WhatsApp[_ ]con[_ ]",
        r"Чат[_ ]WhatsApp[_ ]с[_ ]",
        r"Chat[_ ]WhatsApp[_ ]con[_ ]",
        r"Conversa[_ ](?:no|do)[_ ]WhatsApp[_ ]com[_ ]",
        r"WhatsApp[_ ]Chat[_ ]mit[_ ]",
        r"Discussion[_ ]WhatsApp[_ ]avec[_ ]",
        r"\x{05e6}['׳]?\x{05d0}\x{05d8}[_ ]WhatsApp[_ ]\x{05e2}\x{05dd}[_ ]",
    ];
    PREFIXES
        .iter()
        .map(|prefix| {
            Regex::new(&format!(r"(?i){prefix}(.+?)(?:[_ ]\(\d+\))?\.(?:txt|zip)$"))
                .expect("group name patterns are valid regexes")
        })
        .collect()
});

/// Group name from an export file name such as
/// `WhatsApp Chat with Hiking Club.zip`. Empty when the name does not
/// follow a known pattern.
///
/// ```
/// use chatwrap::core::report::extract_group_name;
///
/// assert_eq!(extract_group_name("WhatsApp_Chat_with_Hiking_Club (2).zip"), "Hiking Club");
/// assert_eq!(extract_group_name("notes.txt"), "");
/// ```
pub fn extract_group_name(file_name: &str) -> String {
    let base = crate::archive::basename(file_name);
    GROUP_NAME_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(base))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().replace('_', " ").trim().to_string())
        .unwrap_or_default()
}

fn us_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Report title for the window: the year for a full calendar year,
/// otherwise the date range.
pub fn wrapped_title(start: NaiveDate, end: NaiveDate, locale: &Locale) -> String {
    let full_year = start.year() == end.year()
        && (start.month(), start.day()) == (1, 1)
        && (end.month(), end.day()) == (12, 31);
    if full_year {
        locale.t_with("titles.wrappedYear", &[("year", &start.year().to_string())])
    } else {
        locale.t_with(
            "titles.wrappedRange",
            &[("start", &us_date(start)), ("end", &us_date(end))],
        )
    }
}

fn centered(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let left = (width + len) / 2;
    format!("{text:>left$}").chars().chain(std::iter::repeat(' ')).take(width.max(len)).collect()
}

/// The boxed greeting.
pub fn banner(welcome: &str, title: &str, group_name: &str) -> Vec<String> {
    let width = 4 + [welcome, title, group_name]
        .iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0)
        .max(BANNER_MIN_WIDTH);

    let rule = "═".repeat(width);
    let blank = " ".repeat(width);
    let mut lines = vec![format!("╔{rule}╗"), format!("║{blank}║")];
    lines.push(format!("║{}║", centered(welcome, width)));
    lines.push(format!("║{}║", centered(title, width)));
    if !group_name.is_empty() {
        lines.push(format!("║{}║", centered(group_name, width)));
    }
    lines.push(format!("║{blank}║"));
    lines.push(format!("╚{rule}╝"));
    lines
}

/// Assembles a [`Report`] from computed statistics.
///
/// ```
/// use chatwrap::config::WrappedConfig;
/// use chatwrap::core::report::ReportBuilder;
/// use chatwrap::core::stats::Statistics;
/// use chatwrap::locale::Locale;
///
/// let stats = Statistics::default();
/// let config = WrappedConfig::default();
/// let locale = Locale::english();
/// let report = ReportBuilder::new(&stats, &config, &locale)
///     .with_group_name("Hiking Club")
///     .build();
/// assert_eq!(report.metadata.group_name, "Hiking Club");
/// assert!(report.section("Top senders").is_some());
/// ```
pub struct ReportBuilder<'a> {
    stats: &'a Statistics,
    config: &'a WrappedConfig,
    locale: &'a Locale,
    group_name: String,
    joined: usize,
    left: usize,
    pinned: u64,
    contacts: Option<&'a ContactShares>,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(stats: &'a Statistics, config: &'a WrappedConfig, locale: &'a Locale) -> Self {
        Self {
            stats,
            config,
            locale,
            group_name: String::new(),
            joined: 0,
            left: 0,
            pinned: 0,
            contacts: None,
        }
    }

    #[must_use]
    pub fn with_group_name(mut self, name: impl Into<String>) -> Self {
        self.group_name = name.into();
        self
    }

    /// Distinct members who joined and left, and the pinned-notice count.
    #[must_use]
    pub fn with_membership(mut self, joined: usize, left: usize, pinned: u64) -> Self {
        self.joined = joined;
        self.left = left;
        self.pinned = pinned;
        self
    }

    #[must_use]
    pub fn with_contacts(mut self, contacts: &'a ContactShares) -> Self {
        self.contacts = Some(contacts);
        self
    }

    fn units(&self, count: u64, unit: &str) -> String {
        format!("{count} {}", self.locale.pluralize(count, unit))
    }

    fn title(&self, key: &str) -> String {
        self.locale.t(&format!("sections.{key}"))
    }

    fn stat(&self, key: &str, value: impl ToString) -> ReportItem {
        ReportItem::new(self.locale.t(&format!("stats.{key}")), value)
    }

    pub fn build(self) -> Report {
        let window = self.stats.effective_window(self.config.window());
        let start = window.start.map(|t| t.date());
        let end = window.end.map(|t| t.date());

        let mut sections = vec![
            self.top_senders(),
            self.top_media_senders(),
            self.top_question_askers(),
            self.top_taggers(),
            self.top_taggees(),
            self.message_stats(),
            self.member_stats(),
            self.active_hours(),
            self.active_days(),
            self.active_months(),
            self.top_words(),
            self.top_uncommon_words(),
            self.word_stats(),
            self.top_emoji_senders(),
            self.top_emojis(),
            self.emoji_stats(),
        ];
        if let Some(contacts) = self.contacts.filter(|c| !c.is_empty()) {
            sections.push(self.top_contacts(contacts));
            sections.push(self.contact_stats(contacts));
        }

        let title = match (start, end) {
            (Some(start), Some(end)) => wrapped_title(start, end, self.locale),
            _ => self.locale.t_with("titles.wrappedYear", &[("year", "")]).trim_end().to_string(),
        };
        let banner = banner(&self.locale.t("messages.welcomeToYour"), &title, &self.group_name);

        Report {
            metadata: ReportMetadata {
                group_name: self.group_name,
                start_date: start,
                end_date: end,
                language: LanguageInfo::from(self.locale),
            },
            sections,
            banner,
        }
    }

    fn top_senders(&self) -> Section {
        let items = self
            .stats
            .sender_messages
            .top(self.config.top_count)
            .into_iter()
            .map(|(sender, n)| ReportItem::new(sender.as_str(), self.units(n, "message")));
        Section::new(self.title("topSenders"), "📊", Layout::Ranked).with_items(items)
    }

    fn top_media_senders(&self) -> Section {
        let items = self
            .stats
            .sender_media
            .top(self.config.top_count)
            .into_iter()
            .map(|(sender, n)| ReportItem::new(sender.as_str(), self.units(n, "messageWithMedia")));
        Section::new(self.title("topMediaSenders"), "📷", Layout::Ranked)
            .with_items(items)
            .with_footer(ReportItem::new(
                self.locale.t("messages.totalMessagesWithMedia"),
                self.stats.media_messages,
            ))
    }

    fn top_question_askers(&self) -> Section {
        let items = self
            .stats
            .top_question_askers(self.config.top_count)
            .into_iter()
            .map(|(sender, n)| {
                let value = format!("{} {}", self.units(n, "question"), self.locale.conjugate_verb(n, "asked"));
                ReportItem::new(sender.as_str(), value)
            });
        Section::new(self.title("topQuestionAskers"), "❓", Layout::Ranked).with_items(items)
    }

    fn top_taggers(&self) -> Section {
        let items = self
            .stats
            .sender_tags
            .top(self.config.top_count)
            .into_iter()
            .map(|(sender, n)| {
                let value = format!("{} {}", self.units(n, "tag"), self.locale.conjugate_verb(n, "sent"));
                ReportItem::new(sender.as_str(), value)
            });
        Section::new(self.title("topTaggers"), "🏷️", Layout::Ranked).with_items(items)
    }

    fn top_taggees(&self) -> Section {
        let items = self
            .stats
            .taggees
            .top(self.config.top_count)
            .into_iter()
            .map(|(tag, n)| {
                let value = format!("{} {}", self.locale.conjugate_verb(n, "tagged"), self.units(n, "time"));
                ReportItem::new(self.config.display_name(tag), value)
            });
        Section::new(self.title("topTaggees"), "👤", Layout::Ranked).with_items(items)
    }

    fn message_stats(&self) -> Section {
        let stats = self.stats;
        let mut items = vec![
            self.stat("totalMessages", stats.total_messages),
            self.stat("messagesWithMedia", stats.media_messages),
            self.stat("messagesDeleted", stats.deleted_messages),
            self.stat("dailyAverage", stats.daily_average(self.config.window())),
        ];
        if self.pinned > 0 {
            items.push(self.stat("messagesPinned", self.pinned));
        }
        Section::new(self.title("messageStats"), "📊", Layout::Stats)
            .with_items(items)
            .with_footer(self.stat("messagesDeletedByAdmin", stats.deleted_by_admin))
    }

    fn member_stats(&self) -> Section {
        let mut items = vec![
            self.stat("messageSenders", self.stats.sender_messages.len()),
            self.stat("membersJoined", self.joined),
        ];
        if self.left > 0 {
            items.push(self.stat("membersLeft", self.left));
        }
        Section::new(self.title("memberStats"), "👥", Layout::Stats).with_items(items)
    }

    fn active_hours(&self) -> Section {
        let items = self.stats.hours.top(self.config.top_count).into_iter().map(|(hour, n)| {
            let name = self.locale.t_with("formats.hourFormat", &[("hour", &hour.to_string())]);
            ReportItem::new(name, self.units(n, "message"))
        });
        Section::new(self.title("mostActiveHours"), "⏰", Layout::Buckets).with_items(items)
    }

    fn active_days(&self) -> Section {
        let items = self
            .stats
            .weekdays
            .sorted()
            .into_iter()
            .map(|(&day, n)| ReportItem::new(self.locale.day_name(day), self.units(n, "message")));
        Section::new(self.title("mostActiveDays"), "📅", Layout::Buckets).with_items(items)
    }

    fn active_months(&self) -> Section {
        let items = self
            .stats
            .months
            .sorted()
            .into_iter()
            .map(|(&month, n)| ReportItem::new(self.locale.month_name(month), self.units(n, "message")));
        Section::new(self.title("mostActiveMonths"), "📆", Layout::Buckets).with_items(items)
    }

    fn word_rows(&self, words: &crate::core::tally::Tally<String>) -> Vec<ReportItem> {
        words
            .top(self.config.top_count)
            .into_iter()
            .map(|(word, n)| ReportItem::new(word.as_str(), self.units(n, "time")))
            .collect()
    }

    fn top_words(&self) -> Section {
        Section::new(self.title("topWords"), "💬", Layout::Buckets)
            .with_items(self.word_rows(&self.stats.words))
    }

    fn top_uncommon_words(&self) -> Section {
        Section::new(self.title("topUncommonWords"), "✨", Layout::Buckets)
            .with_items(self.word_rows(&self.stats.uncommon_words))
    }

    fn word_stats(&self) -> Section {
        Section::new(self.title("wordStats"), "📝", Layout::Stats).with_items([
            self.stat("totalWordsent", self.stats.total_words),
            self.stat("wordsPerMessage", self.stats.words_per_message()),
        ])
    }

    fn top_emoji_senders(&self) -> Section {
        let items = self
            .stats
            .top_emoji_senders(self.config.top_count)
            .into_iter()
            .map(|(sender, emojis)| {
                let n = emojis.chars().count() as u64;
                ReportItem::new(sender.as_str(), self.units(n, "emoji"))
            });
        Section::new(self.title("topEmojiSenders"), "😀", Layout::Ranked).with_items(items)
    }

    fn top_emojis(&self) -> Section {
        let items = self
            .stats
            .emojis
            .top(self.config.top_count)
            .into_iter()
            .map(|(emoji, n)| ReportItem::new(emoji.as_str(), self.units(n, "time")));
        Section::new(self.title("topEmojis"), "🎉", Layout::Ranked).with_items(items)
    }

    fn emoji_stats(&self) -> Section {
        Section::new(self.title("emojiStats"), "🔢", Layout::Stats)
            .with_items([self.stat("numberOfUniqueEmojis", self.stats.unique_emojis())])
    }

    fn top_contacts(&self, contacts: &ContactShares) -> Section {
        let also_known_as = self.locale.t("messages.alsoKnownAs");
        let items = contacts.top(self.config.top_count).into_iter().map(|(phone, stat)| {
            let value = format!(
                "{} {}",
                self.locale.conjugate_verb(stat.count, "shared"),
                self.units(stat.count, "time")
            );
            let item = ReportItem::new(stat.most_common_name.as_str(), value).with_context(phone.as_str());
            if stat.names.len() > 1 {
                let names: Vec<String> = stat
                    .aliases()
                    .into_iter()
                    .map(|(name, n)| format!("{name} ({n})"))
                    .collect();
                item.with_detail(format!("{also_known_as}: {}", names.join(", ")))
            } else {
                item
            }
        });
        Section::new(self.title("topContactsShared"), "📞", Layout::Ranked).with_items(items)
    }

    fn contact_stats(&self, contacts: &ContactShares) -> Section {
        Section::new(self.title("contactStats"), "📇", Layout::Stats).with_items([
            self.stat("uniquePhoneNumbers", contacts.len()),
            self.stat("contactsSharedByMultiple", contacts.shared_by_multiple()),
            self.stat("contactsWithDifferentNames", contacts.with_different_names()),
        ])
    }
}
