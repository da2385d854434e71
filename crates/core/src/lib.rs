//! # convotrain core
//!
//! The phrase annotation engine for the convotrain training-data pipeline.
//!
//! This crate is pure, synchronous text processing:
//! - [`EntityDictionary`] - ordered entity/value/synonyms map, built once
//!   per run from raw rows and read-only afterwards
//! - [`annotate`] - rewrites a phrase as literal and entity-mention segments
//! - [`drop_empty_literals`] - strips zero-length literal segments
//! - [`assemble`] - packages an intent's annotated phrases, parameters, and
//!   responses into an [`IntentRecord`]
//!
//! **No I/O concerns**: CSV reading lives in `convotrain-ingest`, and the wire
//! models plus the remote-service gateway live in the `dialogflow` crate.
//!
//! The dictionary is never mutated after construction, so concurrent
//! [`annotate`] calls over a shared dictionary are safe; phrases are
//! independent of one another.

pub mod annotator;
pub mod dictionary;
pub mod intent;
pub mod segment;

pub use annotator::annotate;
pub use dictionary::{EntityDictionary, EntityEntry, ValueEntry};
pub use intent::{assemble, group_phrases, IntentRecord, Parameter};
pub use segment::{drop_empty_literals, AnnotatedPhrase, Segment};
