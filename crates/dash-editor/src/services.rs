//! External data services consumed by the preview.
//!
//! Both calls are the engine's only suspension points: the host awaits them
//! and feeds the results back. Failures come back as [`ServiceError`].

use crate::error::ServiceError;
use async_trait::async_trait;
use dash_core::model::Template;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One attribute of an asset, with its current value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValue {
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Epoch milliseconds of the last update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl AttributeValue {
    /// An attribute carrying only its name.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// An asset as returned by the asset data service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub asset_type: String,
    #[serde(default)]
    pub attributes: HashMap<String, AttributeValue>,
}

/// Loads layout documents by id.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, document_id: &str) -> Result<Template, ServiceError>;
}

/// Resolves asset ids to asset records.
#[async_trait]
pub trait AssetService: Send + Sync {
    /// Fetch all assets with the given ids in one query. Unknown ids are
    /// simply absent from the result.
    async fn query_assets(&self, ids: &[String]) -> Result<Vec<AssetRecord>, ServiceError>;
}
