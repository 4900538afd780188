//! Entity to model mappers
//!
//! Conversions between domain entities (moim-core) and database models.
//! Models with enum-typed columns convert via `TryFrom`, failing with an
//! internal error when a row carries an unknown enum string.

mod answer;
mod category;
mod chat_message;
mod gathering;
mod member;
mod question;
mod user;

use moim_core::DomainError;

/// Error for a corrupt enum column
pub(crate) fn bad_enum(column: &str, value: &str) -> DomainError {
    DomainError::InternalError(format!("unexpected {column} value: {value}"))
}
