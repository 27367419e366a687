//! Deleted-message sentinels.

/// Who removed a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeletionKind {
    /// The author deleted it ("This message was deleted").
    ByUser,
    /// A group admin deleted it. The export leaves an empty body, which the
    /// scanner turns into the literal `null`.
    ByAdmin,
}

/// Body the scanner substitutes for an empty message.
pub const ADMIN_SENTINEL: &str = "null";

const USER_SENTINELS: &[&str] = &[
    "This message was deleted",
    "You deleted this message",
    "Este mensaje fue eliminado",
    "Eliminaste este mensaje",
    "Diese Nachricht wurde gelöscht",
    "Du hast diese Nachricht gelöscht",
    "Ce message a été supprimé",
    "Vous avez supprimé ce message",
    "Questo messaggio è stato eliminato",
    "Hai eliminato questo messaggio",
    "Esta mensagem foi apagada",
    "Você apagou esta mensagem",
    "Это сообщение удалено",
    "Вы удалили это сообщение",
    "הודעה זו נמחקה",
    "מחקת הודעה זו",
];

fn is_bidi_mark(c: char) -> bool {
    matches!(c, '\u{200E}' | '\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}')
}

/// Removes directional marks and surrounding whitespace.
pub fn strip_bidi(text: &str) -> String {
    text.chars().filter(|&c| !is_bidi_mark(c)).collect::<String>().trim().to_string()
}

/// Classifies `text` as a deletion sentinel.
pub fn deletion_kind(text: &str) -> Option<DeletionKind> {
    let bare = strip_bidi(text);
    if bare == ADMIN_SENTINEL {
        Some(DeletionKind::ByAdmin)
    } else if USER_SENTINELS.contains(&bare.as_str()) {
        Some(DeletionKind::ByUser)
    } else {
        None
    }
}

/// Either kind of deletion.
pub fn is_deleted(text: &str) -> bool {
    deletion_kind(text).is_some()
}
