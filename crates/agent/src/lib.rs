//! Conversational intake agent for wire shelving configurations.
//!
//! Each chat turn follows a constrained loop:
//! 1. **Oracle** (`llm`) - the language model answers the conversation so far
//! 2. **Parsing** (`response`, `fallback`) - structured payload first, free-text
//!    extraction when the payload is absent or malformed
//! 3. **Decisions** - merge, sufficiency and next questions from `shelfwise-core`
//! 4. **Persistence** (`session`) - entities and both turns are stored together
//!
//! # Key Types
//!
//! - `IntakeRuntime` - per-message orchestrator (see `runtime` module)
//! - `LlmClient` - pluggable language model trait
//! - `SessionStore` - keyed conversation state with explicit lifecycle
//!
//! # Safety Principle
//!
//! The model is strictly a translator. It never decides whether enough has been
//! collected or what to ask next; those are recomputed from the entity state on
//! every turn.

pub mod fallback;
pub mod llm;
pub mod prompt;
pub mod response;
pub mod runtime;
pub mod session;

pub use llm::{EchoLlmClient, LlmClient, ScriptedLlmClient, ScriptedReply};
pub use response::{parse, ExtractionSource, ParsedResponse, PayloadDecode};
pub use runtime::{IntakeError, IntakeRuntime, RuntimeSettings, TurnOutcome};
pub use session::{InMemorySessionStore, SessionStore, StoreError};
