//! Configuration loading for declared resources
//!
//! A whole API can be described in one YAML document: each entry yields the
//! table schema for the store, the derived request shape, and the filter
//! specs for the route group.

use crate::core::field::FieldSpec;
use crate::core::shape::RequestShape;
use crate::core::store::{IdKind, TableSchema};
use crate::server::route_group::ResourceDef;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Declaration of one resource in configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceEntry {
    /// Resource name (singular)
    pub name: String,

    /// How the store assigns ids for this resource
    #[serde(default)]
    pub id_kind: IdKind,

    /// Storage field structure
    pub fields: Vec<FieldSpec>,

    /// Filterable fields; empty suppresses the filter endpoint
    #[serde(default)]
    pub filters: Vec<FieldSpec>,
}

impl ResourceEntry {
    /// The table schema the store needs for this resource
    pub fn table_schema(&self) -> TableSchema {
        TableSchema::new(self.name.clone(), self.id_kind, self.fields.clone())
    }

    /// Request shape derived from the storage fields
    pub fn request_shape(&self) -> RequestShape {
        RequestShape::new(self.fields.clone())
    }

    /// The resource declaration for the route-group binder
    pub fn resource_def(&self) -> ResourceDef {
        ResourceDef::new(self.name.clone(), self.request_shape())
            .with_filters(self.filters.clone())
    }
}

/// Complete configuration: the set of declared resources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesConfig {
    pub resources: Vec<ResourceEntry>,
}

impl ResourcesConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}
