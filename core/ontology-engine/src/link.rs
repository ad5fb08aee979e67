use crate::{DataValidator, EngineError, EngineResult};
use ontology_model::SchemaLoader;
use ontology_storage::{InstanceStore, LinkStore, Page};
use ontology_types::{Fields, Record, RecordId, SOURCE_ID, TARGET_ID};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Which end of a link an instance sits on when walking it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalDirection {
    /// The instance is the source; returns targets.
    #[default]
    Outgoing,
    /// The instance is the target; returns sources.
    Incoming,
}

impl TraversalDirection {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Outgoing => "outgoing",
            Self::Incoming => "incoming",
        }
    }
}

impl FromStr for TraversalDirection {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "outgoing" => Ok(Self::Outgoing),
            "incoming" => Ok(Self::Incoming),
            other => Err(EngineError::BadRequest(format!(
                "invalid direction '{other}', expected 'outgoing' or 'incoming'"
            ))),
        }
    }
}

impl fmt::Display for TraversalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema-checked CRUD over links, plus traversal to connected instances.
///
/// Endpoint ids are opaque: nothing checks that they name existing instances.
#[derive(Clone)]
pub struct LinkService {
    loader: Arc<SchemaLoader>,
    links: Arc<LinkStore>,
    instances: Arc<InstanceStore>,
    validator: DataValidator,
}

impl LinkService {
    pub fn new(
        loader: Arc<SchemaLoader>,
        links: Arc<LinkStore>,
        instances: Arc<InstanceStore>,
        validator: DataValidator,
    ) -> Self {
        Self {
            loader,
            links,
            instances,
            validator,
        }
    }

    pub fn create(
        &self,
        link_type: &str,
        source_id: &str,
        target_id: &str,
        mut properties: Fields,
    ) -> EngineResult<RecordId> {
        self.validator
            .validate_link_data(link_type, source_id, target_id, &mut properties)?;
        Ok(self.links.create(link_type, source_id, target_id, properties)?)
    }

    pub fn get(&self, link_type: &str, id: &str) -> EngineResult<Record> {
        self.loader.get_link_type(link_type)?;
        Ok(self.links.get(link_type, id)?)
    }

    /// Merges `patch` into a stored link. A missing link is reported before
    /// the patch is validated.
    pub fn update(&self, link_type: &str, id: &str, patch: Fields) -> EngineResult<Record> {
        self.loader.get_link_type(link_type)?;
        self.links.get(link_type, id)?;
        self.validator.validate_link_patch(link_type, &patch)?;
        Ok(self.links.update(link_type, id, patch)?)
    }

    pub fn delete(&self, link_type: &str, id: &str) -> EngineResult<()> {
        self.loader.get_link_type(link_type)?;
        Ok(self.links.delete(link_type, id)?)
    }

    pub fn list(&self, link_type: &str, offset: usize, limit: usize) -> EngineResult<Page<Record>> {
        self.loader.get_link_type(link_type)?;
        Ok(self.links.list(link_type, offset, limit)?)
    }

    pub fn by_source(&self, link_type: &str, source_id: &str) -> EngineResult<Vec<Record>> {
        self.loader.get_link_type(link_type)?;
        Ok(self.links.get_by_source(link_type, source_id)?)
    }

    pub fn by_target(&self, link_type: &str, target_id: &str) -> EngineResult<Vec<Record>> {
        self.loader.get_link_type(link_type)?;
        Ok(self.links.get_by_target(link_type, target_id)?)
    }

    /// Instances reachable from `instance_id` over `link_type`.
    ///
    /// Outgoing applies when `object_type` is the link's source type and
    /// yields target instances; incoming applies when it is the target type
    /// and yields source instances. Any other combination is empty. Links
    /// whose far end cannot be read are skipped.
    pub fn connected_instances(
        &self,
        object_type: &str,
        link_type: &str,
        instance_id: &str,
        direction: TraversalDirection,
    ) -> EngineResult<Vec<Record>> {
        let definition = self.loader.get_link_type(link_type)?;

        let (links, far_key, far_type) = match direction {
            TraversalDirection::Outgoing if definition.source_type == object_type => (
                self.links.get_by_source(link_type, instance_id)?,
                TARGET_ID,
                &definition.target_type,
            ),
            TraversalDirection::Incoming if definition.target_type == object_type => (
                self.links.get_by_target(link_type, instance_id)?,
                SOURCE_ID,
                &definition.source_type,
            ),
            _ => return Ok(Vec::new()),
        };

        let mut connected = Vec::with_capacity(links.len());
        for link in &links {
            let Some(far_id) = link.get_str(far_key) else {
                continue;
            };
            match self.instances.get(far_type, far_id) {
                Ok(instance) => connected.push(instance),
                Err(e) if e.is_not_found() => {
                    debug!(link_type, far_id, "skipping dangling link endpoint");
                }
                Err(e) => {
                    warn!(link_type, far_id, error = %e, "skipping unreadable link endpoint");
                }
            }
        }
        Ok(connected)
    }
}
