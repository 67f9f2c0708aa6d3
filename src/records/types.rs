//! Record types

use crate::error::{Error, Result};
use crate::types::JsonObject;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A Recharge list resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// `/subscriptions`
    Subscriptions,
    /// `/orders`
    Orders,
}

impl Resource {
    /// Path of the resource relative to the API base URL
    pub fn path(self) -> &'static str {
        match self {
            Resource::Subscriptions => "/subscriptions",
            Resource::Orders => "/orders",
        }
    }

    /// Key of the record array in a list response
    pub fn record_key(self) -> &'static str {
        match self {
            Resource::Subscriptions => "subscriptions",
            Resource::Orders => "orders",
        }
    }

    /// Singular name used in errors and logs
    pub fn record_type(self) -> &'static str {
        match self {
            Resource::Subscriptions => "subscription",
            Resource::Orders => "order",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.record_key())
    }
}

/// A raw record of one resource
pub trait Record: DeserializeOwned {
    /// Resource the record comes from
    const RESOURCE: Resource;

    /// Keys that did not map to a named field
    fn fields(&self) -> &JsonObject;

    /// Decode one raw JSON record
    ///
    /// Any shape problem is reported as `Error::SchemaMismatch` for `index`.
    fn from_value(index: usize, value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::SchemaMismatch {
                record_type: Self::RESOURCE.record_type(),
                index,
                message: format!("expected an object, got {}", crate::decode::json_kind(&value)),
            });
        }

        serde_json::from_value(value).map_err(|e| Error::SchemaMismatch {
            record_type: Self::RESOURCE.record_type(),
            index,
            message: e.to_string(),
        })
    }
}

/// A Recharge subscription
///
/// `None` on a nested field means the key was absent; a key sent as `null`
/// is kept as `Some(Value::Null)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,

    /// `{"ecommerce": "<shopify variant id>"}`
    #[serde(default, deserialize_with = "present")]
    pub external_variant_id: Option<Value>,

    /// `{"ecommerce": "<shopify product id>"}`
    #[serde(default, deserialize_with = "present")]
    pub external_product_id: Option<Value>,

    #[serde(flatten)]
    pub fields: JsonObject,
}

impl Record for Subscription {
    const RESOURCE: Resource = Resource::Subscriptions;

    fn fields(&self) -> &JsonObject {
        &self.fields
    }
}

/// A Recharge order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,

    #[serde(default, deserialize_with = "present")]
    pub customer: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    pub charge: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    pub external_order_id: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    pub external_order_name: Option<Value>,

    /// `None` when the key is absent; `null` decodes to an empty list
    #[serde(default, deserialize_with = "line_items")]
    pub line_items: Option<Vec<LineItem>>,

    #[serde(flatten)]
    pub fields: JsonObject,
}

impl Record for Order {
    const RESOURCE: Resource = Resource::Orders;

    fn fields(&self) -> &JsonObject {
        &self.fields
    }
}

/// One line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, deserialize_with = "present")]
    pub purchase_item_id: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    pub sku: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    pub quantity: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    pub title: Option<Value>,

    /// List of `{"name": .., "value": ..}` pairs
    #[serde(default, deserialize_with = "present")]
    pub properties: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    pub external_product_id: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    pub external_variant_id: Option<Value>,

    #[serde(flatten)]
    pub fields: JsonObject,
}

/// Keep a present `null` distinct from an absent key
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn line_items<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<LineItem>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Option::<Vec<LineItem>>::deserialize(deserializer)?;
    Ok(Some(items.unwrap_or_default()))
}
