//! # Asset
//!
//! Catalog entry offered under contract definitions. Properties form an
//! open map; every property key is a queryable path.

use dc_01_query_engine::{FieldRegistry, FieldValue, Queryable};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use shared_types::{DataAddress, Timestamp};
use std::collections::BTreeMap;

/// Property key that aliases [`Asset::id`].
pub const ASSET_ID_PROPERTY: &str = "asset:prop:id";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub properties: BTreeMap<String, FieldValue>,
    #[serde(default)]
    pub data_address: Option<DataAddress>,
    #[serde(default)]
    pub created_at: Timestamp,
}

impl Asset {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            properties: BTreeMap::new(),
            data_address: None,
            created_at: 0,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_data_address(mut self, address: DataAddress) -> Self {
        self.data_address = Some(address);
        self
    }

    pub fn property(&self, key: &str) -> Option<&FieldValue> {
        self.properties.get(key)
    }
}

fn property(asset: &Asset, path: &str) -> Vec<FieldValue> {
    asset.properties.get(path).cloned().into_iter().collect()
}

lazy_static! {
    static ref ASSET_FIELDS: FieldRegistry<Asset> = FieldRegistry::<Asset>::new()
        .field("id", |a| vec![a.id.clone().into()])
        .field(ASSET_ID_PROPERTY, |a| vec![a.id.clone().into()])
        .field("createdAt", |a| vec![a.created_at.into()])
        .field("dataAddress.type", |a| {
            a.data_address.iter().map(|d| d.kind.clone().into()).collect()
        })
        .dynamic("", property);
}

impl Queryable for Asset {
    fn registry() -> &'static FieldRegistry<Self> {
        &ASSET_FIELDS
    }
}
