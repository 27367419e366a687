//! Per-message text features: media placeholders, questions, tags, emojis
//! and word tokens.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Result;

/// Placeholders WhatsApp writes instead of an omitted attachment.
/// Matched case-insensitively anywhere in the body.
pub const MEDIA_MARKERS: &[&str] = &[
    // English
    "<media omitted>",
    "<image omitted>",
    "image omitted",
    "<video omitted>",
    "video omitted",
    "<document omitted>",
    "document omitted",
    "<audio omitted>",
    "audio omitted",
    "<GIF omitted>",
    "GIF omitted",
    "<sticker omitted>",
    "sticker omitted",
    // Spanish
    "<multimedia omitido>",
    "<Archivo omitido>",
    "<imagen omitida>",
    "imagen omitida",
    "<video omitido>",
    "video omitido",
    "<documento omitido>",
    "documento omitido",
    "<audio omitido>",
    "audio omitido",
    "<GIF omitido>",
    "GIF omitido",
    "<sticker omitido>",
    "sticker omitido",
    // Italian
    "<media omessi>",
    "<Media omesso>",
    "<immagine omessa>",
    "immagine omessa",
    "<video omesso>",
    "video omesso",
    "<documento omesso>",
    "documento omesso",
    "<audio omesso>",
    "audio omesso",
    "<GIF esclusa>",
    "GIF esclusa",
    "<sticker non incluso>",
    "sticker non incluso",
    // Hebrew
    "<המדיה לא נכללה>",
    "<מדיה הושמטה>",
    // German
    "<medien ausgeschlossen>",
    "<Medien weggelassen>",
    // French
    "<médias omis>",
    "<Fichier omis>",
    // Portuguese
    "<ficheiro não revelado>",
    "<Mídia omitida>",
    // Russian
    "<без медиафайлов>",
    "<Файл пропущен>",
    // Arabic
    "<تم استبعاد الوسائط>",
    // Chinese
    "<忽略多媒體檔>",
    "<省略多媒体文件>",
    // Japanese
    "<メディアなし>",
    "<メディアは含まれていません>",
    // Korean
    "<미디어 파일 제외됨>",
    "<미디어 파일을 생략한 대화내용>",
    // Dutch
    "<media weggelaten>",
    "<Media weggelaten>",
    // Polish
    "<pominięto multimedia>",
    "<pliki pominięto>",
    // Turkish
    "<medya dahil edilmedi>",
    "<Medya atlanmış>",
    // Hindi
    "<मीडिया के बिना>",
    // Bengali
    "<মিডিয়া বাদ দেওয়া হয়েছে>",
    // Indonesian
    "<media tidak disertakan>",
    // Vietnamese
    "<bỏ qua tệp phương tiện>",
    "<Bỏ qua Media>",
    // Thai
    "<ไฟล์สื่อถูกลบ>",
    "<สื่อถูกลบ>",
    // Swedish
    "<media utelämnat>",
    "<Media har utelämnats>",
    // Norwegian
    "<media utelatt>",
    "<Uten vedlegg>",
    // Danish
    "<medier udeladt>",
    "<Mediefil udeladt>",
    // Finnish
    "<media jätettiin pois>",
    "<Media jätetty pois>",
    // Czech
    "<média vynechány>",
    "< Média vynechána >",
    // Hungarian
    "<média elhagyva>",
    "<Hiányzó médiafájl>",
    // Romanian
    "<conținut media omis>",
    // Ukrainian
    "<медіа пропущено>",
    // Greek
    "<αρχείο παραλήφθηκε>",
    "<Εξαίρεση πολυμέσων>",
    // Bulgarian
    "<Без файл>",
    // Serbian
    "<медији су изостављени>",
    // Croatian
    "<medijski zapis izostavljen>",
    "<Medijski zapis izostavljen>",
    // Slovak
    "<Médiá vynechané>",
    // Slovenian
    "<datoteke izpuščene>",
    "<Medij izpuščen>",
    // Lithuanian
    "<medija praleista>",
    "<Praleistas medijos turinys>",
    // Latvian
    "<nav iekļauta multivide>",
    "<Bez multivides>",
    // Estonian
    "<meedia välja jäetud>",
    "<Meedia ära jäetud>",
    // Afrikaans
    "<media weggelaat>",
    // Swahili
    "<media hazijajumuishwa>",
    "<Media imerukwa>",
    // Tagalog
    "<ınalis ang media>",
    "<Walang kalakip na media>",
    // Malay
    "<media dikecualikan>",
    "<Media disingkirkan>",
    // Tamil
    "<கோப்புகள் விடப்பட்டன>",
    "< ஊடகங்கள் நீக்கப்பட்டது >",
    // Telugu
    "<మీడియా విస్మరించబడింది>",
    "<మాధ్యమం విస్మరించబడింది>",
    // Kannada
    "<ಮಾಧ್ಯಮ ಕೈಬಿಡಲಾಗಿದೆ>",
    // Malayalam
    "<മീഡിയ ഒഴിവാക്കി>",
    // Marathi
    "<मीडिया वगळण्यात आला>",
    "<मीडिया वगळले>",
    // Gujarati
    "<મિડિયા છોડી મૂકાયું>",
    "<મીડિયા અવગણવામાં આવ્યા>",
    // Punjabi
    "<ਮੀਡੀਆ ਛੱਡਿਆ>",
    "<ਮੀਡੀਆ ਛਡਿਆ ਗਿਆ>",
    // Urdu
    "<میڈیا چھوڑ دیا گیا>",
    "<میڈیا ہٹا دیا گیا>",
    // Persian
    "<رسانه حذف شد>",
    "< پيوست نما/آهنگ حذف شد >",
    // Azerbaijani
    "<media buraxıldı>",
    "<Media çıxarılmışdır>",
    // Kazakh
    "<файлдар қосылмаған>",
    "<Файл қосылған жоқ>",
    // Uzbek
    "<fayl o'tkazib yuborildi>",
    // Macedonian
    "<без фајлови>",
    "<Без фајл>",
    // Albanian
    "<media u hoq>",
    "<Media hequr>",
    // Catalan
    "<fitxers multimèdia omesos>",
    "<Mitjans omesos>",
    // Lao
    "<ບໍ່ລວມມີເດຍ>",
];

static MEDIA_MARKERS_LOWER: LazyLock<Vec<String>> =
    LazyLock::new(|| MEDIA_MARKERS.iter().map(|m| m.to_lowercase()).collect());

/// Phrases that mark a question anywhere in the body (case-sensitive).
pub const QUESTION_PHRASES: &[&str] = &[
    "anyone know",
    "any leads",
    "does anyone",
    "can I",
    "anyone have",
    "what is",
    "why is",
    "what does",
    "what was",
    "why was",
    "where is",
    "where was",
    "what are",
    "why are",
    "where are",
    "do you",
    "is it possible",
    "question:",
    "question is",
    "where would",
    "do any of you",
];

/// Words that open a question when followed by whitespace.
pub const QUESTION_OPENERS: &[&str] = &[
    "what", "why", "where", "when", "how", "who", "is", "are", "do", "does", "can", "will",
    "would", "should", "could", "did", "was", "were", "has", "have", "had", "poll:",
];

const BARE_INTERROGATIVES: &[&str] = &["who", "what", "where", "when", "why", "how"];

/// Edit markers appended to a message body after it was edited.
pub const EDITED_MARKERS: &[&str] = &[
    "<This message was edited>",
    "<Este mensaje fue editado>",
    "<Diese Nachricht wurde bearbeitet>",
    "<Ce message a été modifié>",
    "<Questo messaggio è stato modificato>",
    "<Esta mensagem foi editada>",
    "<Это сообщение изменено>",
    "<ההודעה נערכה>",
];

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("text feature patterns are valid regexes")
}

static TRAILING_QUESTION_MARK: LazyLock<Regex> = LazyLock::new(|| compile(r"\?\s*$"));

static QUESTION_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    let words: Vec<String> = QUESTION_OPENERS.iter().map(|w| regex::escape(w)).collect();
    compile(&format!(r"(?i)^(?:{})\s", words.join("|")))
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| compile(r"@(?:\d{10,}|\x{2068}[^\x{2069}]+\x{2069})"));

static EDITED_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    let markers: Vec<String> = EDITED_MARKERS.iter().map(|m| regex::escape(m)).collect();
    compile(&format!(r"\s+(?:{})", markers.join("|")))
});

/// Whether the body is an omitted-media placeholder.
pub fn is_media(text: &str) -> bool {
    let lower = text.to_lowercase();
    MEDIA_MARKERS_LOWER.iter().any(|marker| lower.contains(marker.as_str()))
}

/// Whether the body asks something.
///
/// ```
/// use chatwrap::core::text::is_question;
///
/// assert!(is_question("lunch?"));
/// assert!(is_question("How do I get there"));
/// assert!(is_question("does anyone have a charger"));
/// assert!(!is_question("I know how"));
/// ```
pub fn is_question(text: &str) -> bool {
    if TRAILING_QUESTION_MARK.is_match(text) {
        return true;
    }
    if QUESTION_PHRASES.iter().any(|phrase| text.contains(phrase)) {
        return true;
    }
    let trimmed = text.trim();
    if QUESTION_OPENER.is_match(trimmed) {
        return true;
    }
    let lower = trimmed.to_lowercase();
    BARE_INTERROGATIVES.contains(&lower.as_str())
}

/// Distinct `@` mentions in first-seen order.
pub fn extract_tags(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for m in TAG.find_iter(text) {
        if !tags.iter().any(|t| t == m.as_str()) {
            tags.push(m.as_str().to_string());
        }
    }
    tags
}

fn is_emoji_char(c: char) -> bool {
    matches!(
        u32::from(c),
        0x1F300..=0x1F64F | 0x1F680..=0x1F6FF | 0x2600..=0x26FF | 0x2700..=0x27BF | 0x1F1E6..=0x1F1FF
    )
}

/// Grapheme clusters that contain an emoji code point, in order.
pub fn emoji_clusters(text: &str) -> impl Iterator<Item = &str> {
    text.graphemes(true).filter(|g| g.chars().any(is_emoji_char))
}

/// All emoji clusters of `text` concatenated.
pub fn extract_emojis(text: &str) -> String {
    emoji_clusters(text).collect()
}

/// Removes "message was edited" markers.
pub fn strip_edited_markers(text: &str) -> std::borrow::Cow<'_, str> {
    EDITED_MARKER.replace_all(text, "")
}

fn is_word_char(c: char) -> bool {
    c.is_alphabetic() || c == '\''
}

/// Normalizes a whitespace-separated token into a countable word.
///
/// Returns `None` for tokens that are not made of letters and apostrophes
/// once surrounding punctuation is trimmed.
pub fn clean_word(token: &str) -> Option<String> {
    let lower = token.to_lowercase().replace('\u{2019}', "'");
    let word = lower.trim_matches(|c: char| !is_word_char(c));
    if word.is_empty() || word == "'" || !word.chars().all(is_word_char) {
        return None;
    }
    Some(word.to_string())
}

/// Words that do not count as "uncommon".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords {
    words: HashSet<String>,
}

const BUILTIN_EN: &str = include_str!("../../data/common-words-en.txt");

impl StopWords {
    /// An empty list: every word is uncommon.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The bundled English list.
    pub fn english() -> Self {
        Self::parse(BUILTIN_EN)
    }

    /// Parses one word per line. Blank lines and `#` comments are skipped.
    pub fn parse(source: &str) -> Self {
        let mut list = Self::empty();
        list.extend_from(source);
        list
    }

    /// Loads and merges the given files, or the bundled English list when
    /// `paths` is empty.
    pub fn load(paths: &[impl AsRef<Path>]) -> Result<Self> {
        if paths.is_empty() {
            return Ok(Self::english());
        }
        let mut list = Self::empty();
        for path in paths {
            list.extend_from(&fs::read_to_string(path.as_ref())?);
        }
        tracing::debug!(words = list.len(), files = paths.len(), "loaded stop words");
        Ok(list)
    }

    fn extend_from(&mut self, source: &str) {
        self.words.extend(
            source
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_lowercase),
        );
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
