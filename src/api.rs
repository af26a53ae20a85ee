use once_cell::sync::Lazy;

use crate::datetime::{self, DateTimeKind};
use crate::phone::{self, DigitGrammar, PhoneGrammar};
use crate::store::{RuleStore, DEFAULT_PACK};
use crate::text::{self, ScanText};
use crate::trigger::ScanFlags;

static DEFAULT_STORE: Lazy<RuleStore> =
    Lazy::new(|| RuleStore::from_pack_str(DEFAULT_PACK).unwrap());

/// What a recognized span is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    PhoneNumber,
    Date,
    Time,
    DateTime,
    TimePeriod,
    Week,
    Today,
}

impl From<DateTimeKind> for EntityKind {
    fn from(kind: DateTimeKind) -> Self {
        match kind {
            DateTimeKind::Date => EntityKind::Date,
            DateTimeKind::Time => EntityKind::Time,
            DateTimeKind::DateTime => EntityKind::DateTime,
            DateTimeKind::TimePeriod => EntityKind::TimePeriod,
            DateTimeKind::Week => EntityKind::Week,
            DateTimeKind::Today => EntityKind::Today,
        }
    }
}

/// A recognized entity in the input.
///
/// `begin`/`end` are character offsets into the original input, not byte
/// offsets; full-width normalization keeps the character count, so they
/// index the caller's text directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// What the span was recognized as.
    pub kind: EntityKind,
    /// Start character index of the span.
    pub begin: usize,
    /// End character index of the span (exclusive).
    pub end: usize,
    /// Slice of the original input the span covers.
    pub text: String,
}

/// Runs both recognizers over input text against one rule store.
///
/// The phone and date-time pipelines are independent; their outputs are
/// concatenated, phone spans first, each group ordered by `begin`. A caller
/// that wants one combined timeline sorts the result by `begin`.
pub struct Recognizer<'a> {
    store: &'a RuleStore,
    grammar: Box<dyn PhoneGrammar>,
}

impl<'a> Recognizer<'a> {
    /// Recognizer over `store` with the built-in [`DigitGrammar`].
    pub fn new(store: &'a RuleStore) -> Self {
        Recognizer {
            store,
            grammar: Box::new(DigitGrammar),
        }
    }

    /// Recognizer over `store` with a caller-supplied number grammar, for
    /// embedders that have a real numbering-plan library.
    pub fn with_grammar(store: &'a RuleStore, grammar: Box<dyn PhoneGrammar>) -> Self {
        Recognizer { store, grammar }
    }

    /// Recognizes every phone number and date-time expression in `input`.
    pub fn recognize(&self, input: &str) -> Vec<Entity> {
        if input.is_empty() {
            return Vec::new();
        }
        let flags = ScanFlags::scan(input);
        let original = ScanText::new(input);
        let scan = if flags.contains(ScanFlags::HAS_FULLWIDTH) {
            ScanText::from_string(text::normalize_width(input))
        } else {
            original.clone()
        };
        let mut entities = Vec::new();
        if flags.contains(ScanFlags::HAS_DIGITS) {
            for span in phone::recognize_phones(&scan, self.store, self.grammar.as_ref()) {
                entities.push(Entity {
                    kind: EntityKind::PhoneNumber,
                    begin: span.begin,
                    end: span.end,
                    text: original.slice(span.begin..span.end).to_owned(),
                });
            }
        }
        for span in datetime::recognize_datetimes(&scan, self.store) {
            entities.push(Entity {
                kind: span.kind.into(),
                begin: span.begin,
                end: span.end,
                text: original.slice(span.begin..span.end).to_owned(),
            });
        }
        entities
    }
}

impl Default for Recognizer<'static> {
    fn default() -> Self {
        Recognizer::new(&DEFAULT_STORE)
    }
}

/// Recognizes entities in `text` using the built-in rule pack.
///
/// # Example
/// ```
/// use tapspan::{recognize, EntityKind};
///
/// let entities = recognize("meet me today at 3pm");
/// assert_eq!(entities.len(), 1);
/// assert_eq!(entities[0].kind, EntityKind::DateTime);
/// ```
pub fn recognize(text: &str) -> Vec<Entity> {
    Recognizer::default().recognize(text)
}
