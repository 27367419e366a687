//! System notice classification.
//!
//! Every finalized message inside the window gets exactly one
//! [`Disposition`]. The phrase sets live in one table keyed by
//! [`SystemEvent`]; each row is a list of [`LocalizedPattern`]s whose
//! templates may embed the message sender as `{sender}`.
//!
//! Events are tried in priority order: member joined, member left, pinned
//! notice, other system notice. A message matching none of them is kept.
//!
//! ```rust
//! use chatwrap::parsing::system::{Disposition, classify_text};
//!
//! assert_eq!(classify_text(None, "Alice added Bob"), Disposition::Joined("Bob".into()));
//! assert_eq!(classify_text(Some("Dana"), "Dana left"), Disposition::Left("Dana".into()));
//! assert_eq!(classify_text(Some("Dana"), "see you"), Disposition::Keep);
//! ```

use std::borrow::Cow;
use std::ops::Range;

use crate::message::Message;

/// Kinds of system notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemEvent {
    MemberJoined,
    MemberLeft,
    PinnedNotice,
    OtherSystem,
}

impl SystemEvent {
    /// Classification order.
    pub const PRIORITY: [SystemEvent; 4] = [
        SystemEvent::MemberJoined,
        SystemEvent::MemberLeft,
        SystemEvent::PinnedNotice,
        SystemEvent::OtherSystem,
    ];

    /// The phrase row for this event.
    pub fn patterns(self) -> &'static [LocalizedPattern] {
        match self {
            SystemEvent::MemberJoined => JOINED,
            SystemEvent::MemberLeft => LEFT,
            SystemEvent::PinnedNotice => PINNED,
            SystemEvent::OtherSystem => OTHER,
        }
    }

    /// Keywords that mark a senderless notice as this event. Earlier
    /// entries win, so longer forms precede their substrings.
    fn senderless_keywords(self) -> &'static [LocalizedPattern] {
        match self {
            SystemEvent::MemberJoined => JOIN_KEYWORDS,
            SystemEvent::MemberLeft => LEAVE_KEYWORDS,
            SystemEvent::PinnedNotice | SystemEvent::OtherSystem => &[],
        }
    }

    /// Removal keywords. These also occur in other notices ("removed the
    /// group description"), so they only apply when no other-system phrase
    /// matches.
    fn guarded_keywords(self) -> &'static [LocalizedPattern] {
        match self {
            SystemEvent::MemberLeft => REMOVAL_KEYWORDS,
            _ => &[],
        }
    }
}

/// One phrase in one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalizedPattern {
    /// BCP 47 language tag.
    pub locale: &'static str,
    pub template: &'static str,
}

const fn lp(locale: &'static str, template: &'static str) -> LocalizedPattern {
    LocalizedPattern { locale, template }
}

impl LocalizedPattern {
    /// Placeholder substituted with the sender.
    pub const SENDER: &'static str = "{sender}";

    pub fn embeds_sender(&self) -> bool {
        self.template.contains(Self::SENDER)
    }

    /// The literal phrase to search for. `None` when the template needs a
    /// sender and there is none.
    pub fn render(&self, sender: Option<&str>) -> Option<Cow<'static, str>> {
        if self.embeds_sender() {
            sender.map(|s| Cow::Owned(self.template.replace(Self::SENDER, s)))
        } else {
            Some(Cow::Borrowed(self.template))
        }
    }
}

const JOINED: &[LocalizedPattern] = &[
    lp("en", "added {sender}"),
    lp("en", "joined using this group's invite link"),
    lp("en", "{sender} was added"),
    lp("en", "joined using a group link"),
    lp("es", "añadió a {sender}"),
    lp("es", "se unió usando el enlace de invitación"),
    lp("de", "hat {sender} hinzugefügt"),
    lp("de", "ist über Gruppeneinladungslink beigetreten"),
    lp("fr", "a ajouté {sender}"),
    lp("fr", "a rejoint via le lien d'invitation"),
    lp("it", "ha aggiunto {sender}"),
    lp("it", "entrato tramite link di invito"),
    lp("pt", "adicionou {sender}"),
    lp("pt", "entrou usando o link de convite"),
    lp("ru", "добавил(а) {sender}"),
    lp("ru", "присоединился(лась) по ссылке"),
    lp("he", "צירף/ה את"),
    lp("he", "הצטרף/ה לקבוצה"),
    lp("he", "נוספ/ה"),
];

const LEFT: &[LocalizedPattern] = &[
    lp("en", "{sender} left"),
    lp("en", "{sender} was removed"),
    lp("es", "{sender} salió"),
    lp("es", "{sender} fue eliminado"),
    lp("de", "{sender} hat die Gruppe verlassen"),
    lp("de", "{sender} wurde entfernt"),
    lp("fr", "{sender} est parti"),
    lp("fr", "{sender} a été retiré"),
    lp("it", "{sender} è uscito"),
    lp("it", "{sender} è stato rimosso"),
    lp("pt", "{sender} saiu"),
    lp("pt", "{sender} foi removido"),
    lp("ru", "{sender} вышел(ла)"),
    lp("ru", "{sender} был(а) удален(а)"),
    lp("he", "הוסר/ה"),
    lp("he", "יצא/ה"),
];

const PINNED: &[LocalizedPattern] = &[
    lp("en", "pinned a message"),
    lp("es", "fijó un mensaje"),
    lp("de", "hat eine Nachricht angepinnt"),
    lp("fr", "a épinglé un message"),
    lp("it", "ha fissato un messaggio"),
    lp("pt", "fixou uma mensagem"),
    lp("ru", "закрепил(а) сообщение"),
    lp("he", "הודעה הוצמדה על ידי"),
];

const OTHER: &[LocalizedPattern] = &[
    lp("en", "Messages and calls are end-to-end encrypted"),
    lp("en", "changed this group's icon"),
    lp("en", "changed to +"),
    lp("en", "changed the subject from"),
    lp("en", "changed their phone number"),
    lp("en", "changed the group description"),
    lp("en", "changed this group's settings"),
    lp("en", "deleted this group's icon"),
    lp("en", "deleted this group's description"),
    lp("en", "removed the group description"),
    lp("en", "turned on admin approval"),
    lp("en", "{sender} created this group"),
    lp("en", "{sender} pinned a message"),
    lp("es", "Los mensajes y las llamadas están cifrados de extremo a extremo"),
    lp("es", "cambió el ícono del grupo"),
    lp("es", "cambió el asunto"),
    lp("es", "cambió la descripción del grupo"),
    lp("es", "eliminó el ícono del grupo"),
    lp("es", "creó el grupo"),
    lp("de", "Nachrichten und Anrufe sind Ende-zu-Ende-verschlüsselt"),
    lp("de", "hat das Gruppenbild geändert"),
    lp("de", "hat den Betreff geändert"),
    lp("de", "hat die Gruppenbeschreibung geändert"),
    lp("de", "hat die Gruppe erstellt"),
    lp("fr", "Les messages et les appels sont chiffrés de bout en bout"),
    lp("fr", "a changé l'icône du groupe"),
    lp("fr", "a changé le sujet"),
    lp("fr", "a changé la description du groupe"),
    lp("fr", "a créé le groupe"),
    lp("it", "I messaggi e le chiamate sono crittografati end-to-end"),
    lp("it", "ha cambiato l'immagine del gruppo"),
    lp("it", "ha cambiato l'oggetto"),
    lp("it", "ha cambiato la descrizione del gruppo"),
    lp("it", "ha creato il gruppo"),
    lp("pt", "As mensagens e as chamadas têm encriptação de ponta a ponta"),
    lp("pt", "alterou o ícone do grupo"),
    lp("pt", "alterou o assunto"),
    lp("pt", "alterou a descrição do grupo"),
    lp("pt", "criou o grupo"),
    lp("ru", "Сообщения и звонки защищены сквозным шифрованием"),
    lp("ru", "изменил(а) значок группы"),
    lp("ru", "изменил(а) название"),
    lp("ru", "изменил(а) описание группы"),
    lp("ru", "создал(а) группу"),
    lp("he", "הודעות ושיחות מוצפנות מקצה לקצה"),
    lp("he", "שינה/תה את תמונת הקבוצה"),
    lp("he", "שינה/תה את נושא הקבוצה"),
    lp("he", "שינה/תה את תיאור הקבוצה"),
    lp("he", "שינה/תה את הגדרות הקבוצה"),
    lp("he", "מחק/ה את תמונת הקבוצה"),
    lp("he", "מחק/ה את תיאור הקבוצה"),
    lp("he", "יצר/ה את הקבוצה"),
    lp("he", "תיאור הקבוצה השתנה"),
    lp("he", "החליף/ה את תמונת קבוצה"),
    lp("he", "הטיימר של ההודעות"),
    lp("he", "מצב הודעות זמניות"),
];

const JOIN_KEYWORDS: &[LocalizedPattern] = &[
    lp("en", "was added"),
    lp("en", "added"),
    lp("es", "añadió a"),
    lp("es", "añadió"),
    lp("de", "hinzugefügt"),
    lp("fr", "a ajouté"),
    lp("it", "ha aggiunto"),
    lp("pt", "adicionou"),
    lp("ru", "добавил(а)"),
    lp("he", "צירף/ה"),
];

const LEAVE_KEYWORDS: &[LocalizedPattern] = &[
    lp("en", "left"),
    lp("es", "salió"),
    lp("de", "hat die Gruppe verlassen"),
    lp("fr", "est parti"),
    lp("it", "è uscito"),
    lp("pt", "saiu"),
    lp("ru", "вышел(ла)"),
];

const REMOVAL_KEYWORDS: &[LocalizedPattern] = &[
    lp("en", "was removed"),
    lp("en", "removed"),
    lp("es", "fue eliminado"),
    lp("es", "eliminó a"),
    lp("de", "wurde entfernt"),
    lp("fr", "a été retiré"),
    lp("fr", "a retiré"),
    lp("it", "è stato rimosso"),
    lp("it", "ha rimosso"),
    lp("pt", "foi removido"),
    lp("pt", "removeu"),
    lp("ru", "был(а) удален(а)"),
    lp("ru", "удалил(а)"),
];

/// What happens to a message after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// An ordinary message, retained for statistics.
    Keep,
    /// A member joined; holds the member's name.
    Joined(String),
    /// A member left or was removed; holds the member's name.
    Left(String),
    /// A pinned-message notice.
    Pinned,
    /// Any other system notice. Discarded.
    Dropped,
}

impl Disposition {
    pub fn is_kept(&self) -> bool {
        matches!(self, Disposition::Keep)
    }
}

/// First phrase of `patterns` found in `text`, as a byte range.
fn find_phrase(
    patterns: &[LocalizedPattern],
    sender: Option<&str>,
    text: &str,
) -> Option<Range<usize>> {
    patterns.iter().find_map(|pattern| {
        let phrase = pattern.render(sender)?;
        text.find(phrase.as_ref()).map(|at| at..at + phrase.len())
    })
}

/// Whether any phrase of `event` occurs in `text`.
pub fn matches_event(event: SystemEvent, sender: Option<&str>, text: &str) -> bool {
    find_phrase(event.patterns(), sender, text).is_some()
}

/// The member a senderless notice is about: the text after the phrase,
/// else the text before it, else the whole text.
fn subject_around(text: &str, phrase: Range<usize>) -> String {
    let after = text[phrase.end..].trim();
    if !after.is_empty() {
        return after.to_string();
    }
    let before = text[..phrase.start].trim();
    if !before.is_empty() {
        return before.to_string();
    }
    text.trim().to_string()
}

fn member_subject(event: SystemEvent, sender: Option<&str>, text: &str) -> Option<String> {
    if let Some(range) = find_phrase(event.patterns(), sender, text) {
        return Some(match sender {
            Some(name) => name.to_string(),
            None => subject_around(text, range),
        });
    }
    if sender.is_some() {
        return None;
    }
    let range = find_phrase(event.senderless_keywords(), None, text).or_else(|| {
        if matches_event(SystemEvent::OtherSystem, None, text) {
            None
        } else {
            find_phrase(event.guarded_keywords(), None, text)
        }
    })?;
    Some(subject_around(text, range))
}

/// Classifies a message body with its (possibly absent) sender.
pub fn classify_text(sender: Option<&str>, text: &str) -> Disposition {
    if let Some(member) = member_subject(SystemEvent::MemberJoined, sender, text) {
        return Disposition::Joined(member);
    }
    if let Some(member) = member_subject(SystemEvent::MemberLeft, sender, text) {
        return Disposition::Left(member);
    }
    if matches_event(SystemEvent::PinnedNotice, sender, text) {
        return Disposition::Pinned;
    }
    if sender.is_none() || matches_event(SystemEvent::OtherSystem, sender, text) {
        return Disposition::Dropped;
    }
    Disposition::Keep
}

/// Classifies a finalized message.
pub fn classify(message: &Message) -> Disposition {
    classify_text(message.sender.as_deref(), &message.text)
}
