//! Wire models and gateway seam for the remote conversational-AI service.
//!
//! This crate owns everything that faces the intent/entity management APIs:
//! - strict camelCase wire structs for intents and entity types
//! - translation helpers from the core's in-memory records
//! - the [`AgentGateway`] trait covering create, list, and delete against the
//!   agent, with a deterministic JSON-export implementation
//! - the [`CallBudget`] pacing counter for batched remote calls
//!
//! Actual transport, retries, and backoff belong to whichever gateway
//! implementation talks to the network; nothing here opens a connection.

pub mod entity_type;
pub mod gateway;
pub mod intent;

pub use entity_type::{EntityType, EntityValue, Kind};
pub use gateway::{AgentGateway, CallBudget, JsonExportGateway};
pub use intent::{Intent, Message, MessageText, Parameter, Part, PhraseType, TrainingPhrase};

/// Errors raised by gateway implementations.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("failed to serialise request payload: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to create export directory: {0}")]
    CreateDir(std::io::Error),
    #[error("failed to write request payload: {0}")]
    Write(std::io::Error),
    #[error("failed to enumerate export directory: {0}")]
    ReadDir(std::io::Error),
    #[error("failed to read request payload: {0}")]
    Read(std::io::Error),
    #[error("failed to parse request payload: {0}")]
    Deserialization(serde_json::Error),
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;
