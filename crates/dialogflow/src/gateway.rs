//! The gateway seam between the pipeline and the remote service.
//!
//! The pipeline hands finished resources to an [`AgentGateway`]; what happens
//! next (HTTP, batching, idempotency) is the gateway implementation's concern.
//! The implementation provided here, [`JsonExportGateway`], writes each request
//! payload to a numbered JSON file so runs are deterministic and inspectable:
//! the export directory stands in for the remote agent, listing reads back the
//! payloads written so far, and deletion writes a delete-request payload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::entity_type::EntityType;
use crate::intent::Intent;
use crate::{GatewayError, GatewayResult};

/// Receives finished resources destined for the remote agent and answers the
/// management operations the pipeline needs: create, list, and delete by
/// display name.
pub trait AgentGateway {
    /// Hands over one intent for creation under the given project.
    fn create_intent(&mut self, project_id: &str, intent: &Intent) -> GatewayResult<()>;

    /// Hands over one entity type (with its entities) for creation under the
    /// given project.
    fn create_entity_type(
        &mut self,
        project_id: &str,
        entity_type: &EntityType,
    ) -> GatewayResult<()>;

    /// Display names of the intents currently known to the agent.
    fn list_intents(&self, project_id: &str) -> GatewayResult<Vec<String>>;

    /// Display names of the entity types currently known to the agent.
    fn list_entity_types(&self, project_id: &str) -> GatewayResult<Vec<String>>;

    /// Requests deletion of one intent by display name.
    fn delete_intent(&mut self, project_id: &str, display_name: &str) -> GatewayResult<()>;

    /// Requests deletion of one entity type by display name.
    fn delete_entity_type(&mut self, project_id: &str, display_name: &str) -> GatewayResult<()>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateIntentRequest<'a> {
    parent: String,
    intent: &'a Intent,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateEntityTypeRequest<'a> {
    parent: String,
    entity_type: &'a EntityType,
}

#[derive(Serialize)]
struct DeleteRequest {
    name: String,
}

fn agent_path(project_id: &str) -> String {
    format!("projects/{project_id}/agent")
}

/// Writes one request payload file per call into an export directory.
///
/// Files are named `NNN-intent-<name>.json`, `NNN-entity-type-<name>.json`,
/// `NNN-delete-intent-<name>.json`, `NNN-delete-entity-type-<name>.json` with
/// a run-wide sequence number, so the export order matches the call order.
/// Display names are slugified for the file name only; the payload carries
/// them verbatim.
///
/// Listing reads the create payloads back from the directory in sequence
/// order, so a later run (or a delete pass) sees what an earlier run exported.
#[derive(Debug)]
pub struct JsonExportGateway {
    out_dir: PathBuf,
    sequence: u32,
}

impl JsonExportGateway {
    /// Creates the export directory (and parents) if needed. Picks up the
    /// sequence number after any payloads already present.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::CreateDir` if the directory cannot be created,
    /// or `GatewayError::ReadDir` if existing payloads cannot be enumerated.
    pub fn new(out_dir: impl Into<PathBuf>) -> GatewayResult<Self> {
        let out_dir = out_dir.into();
        std::fs::create_dir_all(&out_dir).map_err(GatewayError::CreateDir)?;
        let sequence = payload_files(&out_dir)?.len() as u32;
        Ok(Self { out_dir, sequence })
    }

    /// The directory payloads are written into.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    fn write_payload<T: Serialize>(
        &mut self,
        kind: &str,
        display_name: &str,
        payload: &T,
    ) -> GatewayResult<()> {
        self.sequence += 1;
        let file_name = format!(
            "{:03}-{kind}-{}.json",
            self.sequence,
            slugify(display_name)
        );
        let path = self.out_dir.join(&file_name);

        let json = serde_json::to_vec_pretty(payload).map_err(GatewayError::Serialization)?;
        std::fs::write(&path, json).map_err(GatewayError::Write)?;

        tracing::info!(file = %path.display(), "wrote request payload");
        Ok(())
    }

    /// Display names found under the given JSON pointer in the create
    /// payloads, in sequence order. Delete payloads carry no resource under
    /// these keys and are skipped naturally.
    fn exported_display_names(&self, resource_key: &str) -> GatewayResult<Vec<String>> {
        let mut names = Vec::new();
        for path in payload_files(&self.out_dir)? {
            let contents = std::fs::read_to_string(&path).map_err(GatewayError::Read)?;
            let json: serde_json::Value =
                serde_json::from_str(&contents).map_err(GatewayError::Deserialization)?;
            if let Some(name) = json[resource_key]["displayName"].as_str() {
                names.push(name.to_owned());
            }
        }
        Ok(names)
    }
}

impl AgentGateway for JsonExportGateway {
    fn create_intent(&mut self, project_id: &str, intent: &Intent) -> GatewayResult<()> {
        let request = CreateIntentRequest {
            parent: agent_path(project_id),
            intent,
        };
        self.write_payload("intent", &intent.display_name, &request)
    }

    fn create_entity_type(
        &mut self,
        project_id: &str,
        entity_type: &EntityType,
    ) -> GatewayResult<()> {
        let request = CreateEntityTypeRequest {
            parent: agent_path(project_id),
            entity_type,
        };
        self.write_payload("entity-type", &entity_type.display_name, &request)
    }

    fn list_intents(&self, _project_id: &str) -> GatewayResult<Vec<String>> {
        self.exported_display_names("intent")
    }

    fn list_entity_types(&self, _project_id: &str) -> GatewayResult<Vec<String>> {
        self.exported_display_names("entityType")
    }

    fn delete_intent(&mut self, project_id: &str, display_name: &str) -> GatewayResult<()> {
        let request = DeleteRequest {
            name: format!("{}/intents/{display_name}", agent_path(project_id)),
        };
        self.write_payload("delete-intent", display_name, &request)
    }

    fn delete_entity_type(&mut self, project_id: &str, display_name: &str) -> GatewayResult<()> {
        let request = DeleteRequest {
            name: format!("{}/entityTypes/{display_name}", agent_path(project_id)),
        };
        self.write_payload("delete-entity-type", display_name, &request)
    }
}

/// Payload files in the export directory, in sequence (file name) order.
fn payload_files(out_dir: &Path) -> GatewayResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(out_dir).map_err(GatewayError::ReadDir)? {
        let entry = entry.map_err(GatewayError::ReadDir)?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Reduces a display name to a file-name-safe slug.
fn slugify(display_name: &str) -> String {
    let mut slug: String = display_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    while slug.contains("--") {
        slug = slug.replace("--", "-");
    }
    slug.trim_matches('-').to_owned()
}

/// Pacing counter for batched remote calls.
///
/// The remote service throttles bursts, so after a batch of calls the caller
/// should pause before continuing. This type only counts; the caller decides
/// whether and how to sleep for the returned duration.
#[derive(Debug, Clone)]
pub struct CallBudget {
    per_batch: u32,
    made: u32,
}

impl CallBudget {
    /// Pause length suggested once a batch is exhausted.
    pub const PAUSE: Duration = Duration::from_secs(60);

    /// Calls allowed per batch before a pause is due.
    pub const DEFAULT_PER_BATCH: u32 = 59;

    pub fn new(per_batch: u32) -> Self {
        Self {
            per_batch,
            made: 0,
        }
    }

    /// Records one remote call. Returns the suggested pause when the batch is
    /// exhausted, resetting the counter for the next batch.
    pub fn record_call(&mut self) -> Option<Duration> {
        self.made += 1;
        if self.made > self.per_batch {
            self.made = 0;
            Some(Self::PAUSE)
        } else {
            None
        }
    }
}

impl Default for CallBudget {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PER_BATCH)
    }
}
