//! Intent wire model and translation from core records.
//!
//! Responsibilities:
//! - Define the camelCase wire structs the intent-management API expects
//! - Translate an assembled [`IntentRecord`] into its wire form
//!
//! The wire shapes mirror the service's v2 intent resource: training phrases of
//! type `EXAMPLE` whose parts are either plain text or text tagged with an
//! entity type and alias.

use convotrain_core::{IntentRecord, Segment};
use serde::{Deserialize, Serialize};

/// One span of a training phrase on the wire.
///
/// Plain text parts carry only `text`; entity mentions additionally carry the
/// entity type marker and alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Part {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// The kind of a training phrase. Only example phrases are produced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhraseType {
    #[serde(rename = "EXAMPLE")]
    Example,
}

/// One training phrase: an ordered list of parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TrainingPhrase {
    #[serde(rename = "type")]
    pub phrase_type: PhraseType,
    pub parts: Vec<Part>,
}

/// A fulfilment text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Message {
    pub text: MessageText,
}

/// The text payload of a fulfilment message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageText {
    pub text: Vec<String>,
}

/// A named slot within the intent definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Parameter {
    pub value: String,
    pub display_name: String,
    pub entity_type_display_name: String,
}

/// The intent resource sent to the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Intent {
    pub display_name: String,
    pub training_phrases: Vec<TrainingPhrase>,
    pub messages: Vec<Message>,
    pub parameters: Vec<Parameter>,
}

impl Intent {
    /// Translates an assembled core record into the wire resource.
    pub fn from_record(record: &IntentRecord) -> Self {
        let training_phrases = record
            .phrases
            .iter()
            .map(|phrase| TrainingPhrase {
                phrase_type: PhraseType::Example,
                parts: phrase.segments().iter().map(part_from_segment).collect(),
            })
            .collect();

        let parameters = record
            .parameters
            .iter()
            .map(|parameter| Parameter {
                value: parameter.value.clone(),
                display_name: parameter.display_name.clone(),
                entity_type_display_name: parameter.entity_type_display_name.clone(),
            })
            .collect();

        Self {
            display_name: record.display_name.to_string(),
            training_phrases,
            messages: vec![Message {
                text: MessageText {
                    text: record.responses.clone(),
                },
            }],
            parameters,
        }
    }
}

fn part_from_segment(segment: &Segment) -> Part {
    match segment {
        Segment::Literal(text) => Part {
            text: text.clone(),
            entity_type: None,
            alias: None,
        },
        Segment::EntityRef {
            text,
            entity_type,
            alias,
        } => Part {
            text: text.clone(),
            entity_type: Some(entity_type.clone()),
            alias: Some(alias.clone()),
        },
    }
}
