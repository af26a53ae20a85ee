extern crate self as tapspan;

#[macro_use]
mod macros;
mod api;
mod datetime;
mod pattern;
mod phone;
mod store;
mod text;
mod trigger;

pub use api::{recognize, Entity, EntityKind, Recognizer};
pub use datetime::{DateTimeKind, DateTimeSpan};
pub use phone::{DigitGrammar, ParsedNumber, PhoneGrammar, PhoneSpan};
pub use store::{PackError, RuleId, RuleStore, DEFAULT_PACK};
