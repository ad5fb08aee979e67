use crate::{DataValidator, EngineResult, InstanceService, LinkService, SchemaService};
use ontology_model::{Schema, SchemaLoader, SchemaParser};
use ontology_storage::{InstanceStore, LinkStore, PathResolver};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Where the engine reads its schema and keeps its records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub schema_path: PathBuf,
    pub data_root: PathBuf,
    /// Overrides the schema's namespace for the on-disk layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl EngineConfig {
    pub fn new(schema_path: impl Into<PathBuf>, data_root: impl Into<PathBuf>) -> Self {
        Self {
            schema_path: schema_path.into(),
            data_root: data_root.into(),
            namespace: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

/// The wired-up ontology store: one schema loader, one instance store, one
/// link store, and the services over them.
///
/// The namespace directory is fixed when the engine is built. Reloading a
/// schema that declares a different namespace does not move the stores.
pub struct OntologyEngine {
    namespace: String,
    declared_namespace: String,
    schema: SchemaService,
    instances: InstanceService,
    links: LinkService,
}

impl OntologyEngine {
    /// Loads the schema at `config.schema_path` and opens the stores.
    pub fn open(config: EngineConfig) -> EngineResult<Self> {
        let loader = Arc::new(SchemaLoader::new(SchemaParser::from_path(&config.schema_path)));
        loader.load()?;
        Self::with_loader(loader, &config.data_root, config.namespace.as_deref())
    }

    /// Builds an engine over an already loaded schema.
    pub fn with_loader(
        loader: Arc<SchemaLoader>,
        data_root: impl AsRef<Path>,
        namespace: Option<&str>,
    ) -> EngineResult<Self> {
        let schema = loader.snapshot()?;
        let namespace = namespace
            .filter(|ns| !ns.is_empty())
            .unwrap_or(&schema.namespace)
            .to_string();

        let paths = PathResolver::new(data_root.as_ref(), &namespace);
        let instances = Arc::new(InstanceStore::new(paths.clone()));
        let links = Arc::new(LinkStore::new(paths));
        let validator = DataValidator::new(loader.clone());

        info!(
            namespace = %namespace,
            data_root = %data_root.as_ref().display(),
            "ontology engine ready"
        );

        Ok(Self {
            namespace,
            declared_namespace: schema.namespace.clone(),
            schema: SchemaService::new(loader.clone()),
            instances: InstanceService::new(loader.clone(), instances.clone(), validator.clone()),
            links: LinkService::new(loader, links, instances, validator),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn schema(&self) -> &SchemaService {
        &self.schema
    }

    pub fn instances(&self) -> &InstanceService {
        &self.instances
    }

    pub fn links(&self) -> &LinkService {
        &self.links
    }

    /// Reloads the schema document; the previous schema stays active on failure.
    pub fn reload_schema(&self) -> EngineResult<Arc<Schema>> {
        let schema = self.schema.reload()?;
        if schema.namespace != self.declared_namespace {
            warn!(
                declared = %schema.namespace,
                previous = %self.declared_namespace,
                active = %self.namespace,
                "reloaded schema declares a different namespace; records stay in the active one"
            );
        }
        Ok(schema)
    }
}
