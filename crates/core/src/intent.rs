//! Intent grouping and assembly.
//!
//! Raw intent rows are grouped into ordered (intent, phrases) pairs, each
//! phrase is annotated against the shared entity dictionary, and the results
//! are packaged as [`IntentRecord`]s ready to hand to the intent-management
//! collaborator. Nothing here performs network or persistence side effects.

use convotrain_types::IntentName;

use crate::annotator::annotate;
use crate::dictionary::EntityDictionary;
use crate::segment::{drop_empty_literals, AnnotatedPhrase, Segment};

/// An entity type referenced by at least one phrase of an intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// The entity name without its marker prefix, e.g. `product`.
    pub display_name: String,
    /// Templated value reference, e.g. `$product`.
    pub value: String,
    /// The entity type marker, e.g. `@product`.
    pub entity_type_display_name: String,
}

/// One intent, fully annotated and ready for remote creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentRecord {
    /// The intent's display name.
    pub display_name: IntentName,
    /// Annotated training phrases, in input order.
    pub phrases: Vec<AnnotatedPhrase>,
    /// Entity types referenced across all phrases, deduplicated, first-seen
    /// order.
    pub parameters: Vec<Parameter>,
    /// Fulfilment texts. By convention the intent's own name doubles as its
    /// single response placeholder.
    pub responses: Vec<String>,
}

/// Groups raw intent rows into ordered (intent, phrases) pairs.
///
/// `intent_column` and `text_column` are the caller's column convention; rows
/// missing either column, or with a blank intent name, are skipped with a
/// warning. Intents appear in the order of their first row; phrases keep row
/// order within each intent.
pub fn group_phrases<R: AsRef<[String]>>(
    rows: &[R],
    intent_column: usize,
    text_column: usize,
) -> Vec<(IntentName, Vec<String>)> {
    let mut groups: Vec<(IntentName, Vec<String>)> = Vec::new();

    for (row_number, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        let (Some(raw_intent), Some(text)) = (row.get(intent_column), row.get(text_column)) else {
            tracing::warn!(row = row_number, "skipping intent row with missing columns");
            continue;
        };

        let intent = match IntentName::new(raw_intent) {
            Ok(intent) => intent,
            Err(_) => {
                tracing::warn!(row = row_number, "skipping intent row with blank intent name");
                continue;
            }
        };

        match groups.iter_mut().find(|(name, _)| *name == intent) {
            Some((_, phrases)) => phrases.push(text.clone()),
            None => groups.push((intent, vec![text.clone()])),
        }
    }

    groups
}

/// Annotates every phrase of one intent and assembles the record.
///
/// Each phrase is annotated against `dict` and then stripped of empty literal
/// segments. Parameters are collected from the entity mentions across all
/// phrases, one per distinct entity type, in first-seen order.
pub fn assemble(
    display_name: IntentName,
    phrases: &[String],
    dict: &EntityDictionary,
) -> IntentRecord {
    let phrases: Vec<AnnotatedPhrase> = phrases
        .iter()
        .map(|phrase| AnnotatedPhrase::from(drop_empty_literals(annotate(phrase, dict).into_segments())))
        .collect();

    let parameters = collect_parameters(&phrases);
    let responses = vec![display_name.to_string()];

    IntentRecord {
        display_name,
        phrases,
        parameters,
        responses,
    }
}

/// One [`Parameter`] per distinct entity type, in first-seen order.
fn collect_parameters(phrases: &[AnnotatedPhrase]) -> Vec<Parameter> {
    let mut parameters: Vec<Parameter> = Vec::new();

    for segment in phrases.iter().flat_map(|phrase| phrase.segments()) {
        let Segment::EntityRef {
            entity_type, alias, ..
        } = segment
        else {
            continue;
        };
        if parameters
            .iter()
            .any(|p| p.entity_type_display_name == *entity_type)
        {
            continue;
        }

        // The alias is the entity name minus exactly one marker, so it is
        // authoritative even for entity names that themselves start with `@`.
        parameters.push(Parameter {
            value: format!("${alias}"),
            display_name: alias.clone(),
            entity_type_display_name: entity_type.clone(),
        });
    }

    parameters
}
