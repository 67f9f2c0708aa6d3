//! Subscription flattener
//!
//! One row per subscription. The Shopify variant and product ids nested under
//! `external_variant_id.ecommerce` / `external_product_id.ecommerce` become
//! `Int64` columns, `price` becomes `Float64`, and a fixed set of low-value
//! fields is dropped.

use super::columns::{BuiltRow, ColumnSpec, ColumnType, RowBuilder, RowContext, TableSchema};
use super::{flatten_records, RecordLayout};
use crate::error::Result;
use crate::output::Table;
use crate::records::Subscription;
use crate::types::RowErrorPolicy;
use serde_json::Value;

/// Fields present on the wire but left out of the table
pub const SUBSCRIPTION_DROPPED_COLUMNS: &[&str] = &[
    "address_id",
    "analytics_data",
    "cancellation_reason",
    "cancellation_reason_comments",
    "cancelled_at",
    "has_queued_charges",
    "is_prepaid",
    "is_swappable",
    "max_retries_reached",
    "order_day_of_month",
    "order_day_of_week",
    "presentment_currency",
    "sku_override",
];

const PASSTHROUGH: &[&str] = &[
    "customer_id",
    "charge_interval_frequency",
    "created_at",
    "expire_after_specific_number_of_charges",
    "is_skippable",
    "next_charge_scheduled_at",
    "order_interval_frequency",
    "order_interval_unit",
    "price",
    "product_title",
    "properties",
    "quantity",
    "sku",
    "status",
    "updated_at",
    "variant_title",
];

const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("id", ColumnType::Int64),
    ColumnSpec::new("customer_id", ColumnType::Int64),
    ColumnSpec::new("status", ColumnType::Utf8),
    ColumnSpec::new("product_title", ColumnType::Utf8),
    ColumnSpec::new("variant_title", ColumnType::Utf8),
    ColumnSpec::new("sku", ColumnType::Utf8),
    ColumnSpec::new("price", ColumnType::Float64),
    ColumnSpec::new("quantity", ColumnType::Int64),
    ColumnSpec::new("external_product_id_processed", ColumnType::Int64),
    ColumnSpec::new("external_variant_id_processed", ColumnType::Int64),
    ColumnSpec::new("charge_interval_frequency", ColumnType::Int64),
    ColumnSpec::new("order_interval_frequency", ColumnType::Int64),
    ColumnSpec::new("order_interval_unit", ColumnType::Utf8),
    ColumnSpec::new("expire_after_specific_number_of_charges", ColumnType::Int64),
    ColumnSpec::new("is_skippable", ColumnType::Boolean),
    ColumnSpec::new("next_charge_scheduled_at", ColumnType::Utf8),
    ColumnSpec::new("properties", ColumnType::Properties),
    ColumnSpec::new("created_at", ColumnType::Utf8),
    ColumnSpec::new("updated_at", ColumnType::Utf8),
];

/// Declared schema of the subscription table
pub fn subscription_schema() -> TableSchema {
    TableSchema::new(COLUMNS)
}

/// Flatten raw subscription records into a table
pub fn flatten_subscriptions(records: &[Value], policy: RowErrorPolicy) -> Result<Table> {
    let layout = RecordLayout {
        passthrough: PASSTHROUGH,
        dropped: SUBSCRIPTION_DROPPED_COLUMNS,
    };
    flatten_records(records, &subscription_schema(), &layout, policy, subscription_row)
}

fn subscription_row(
    sub: &Subscription,
    ctx: RowContext,
    schema: &TableSchema,
) -> Result<Vec<BuiltRow>> {
    let mut row = RowBuilder::new(schema, ctx);
    row.set("id", &Value::from(sub.id))?;

    let variant = ctx.project(
        "external_variant_id",
        sub.external_variant_id.as_ref(),
        &["ecommerce"],
    )?;
    row.set("external_variant_id_processed", &variant)?;

    let product = ctx.project(
        "external_product_id",
        sub.external_product_id.as_ref(),
        &["ecommerce"],
    )?;
    row.set("external_product_id_processed", &product)?;

    for column in PASSTHROUGH {
        row.copy_from(&sub.fields, column)?;
    }

    Ok(vec![row.finish()])
}
