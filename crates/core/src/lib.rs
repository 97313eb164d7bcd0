//! Deterministic core of the shelving intake agent.
//!
//! Holds the configuration schema, the typed entity state, and the pure
//! intake decisions (merge, sufficiency, next questions) that every chat turn
//! runs through. Nothing in this crate performs I/O except config loading.

pub mod config;
pub mod domain;
pub mod errors;
pub mod intake;
pub mod schema;

pub use domain::entities::{Color, EnclosureType, PostType, ShelfEntities, ShelfStyle};
pub use domain::session::{ConversationTurn, Session, SessionId, TurnRole};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use intake::{is_sufficient, merge, missing_required, next_questions, range_warnings};
pub use schema::{FieldDescriptor, FieldName, ValueType, GENERIC_FOLLOW_UP};
