//! Order flattener
//!
//! One row per (order, line item). Customer, order and charge identifiers are
//! projected onto every row of the order; the nested containers themselves
//! are dropped. An order with no line items produces no rows.

use super::columns::{BuiltRow, ColumnSpec, ColumnType, RowBuilder, RowContext, TableSchema};
use super::{flatten_records, RecordLayout};
use crate::error::Result;
use crate::output::Table;
use crate::records::{LineItem, Order};
use crate::types::RowErrorPolicy;
use serde_json::Value;

/// Fields present on the wire but left out of the table
pub const ORDER_DROPPED_COLUMNS: &[&str] = &[
    "billing_address",
    "currency",
    "total_weight_grams",
    "shipping_address",
    "shipping_lines",
    "client_details",
    "customer",
    "tax_lines",
    "line_items",
    "is_prepaid",
    "external_order_number",
    "external_order_name",
    "external_order_id",
    "external_cart_token",
    "charge",
];

const PASSTHROUGH: &[&str] = &[
    "address_id",
    "created_at",
    "discounts",
    "error",
    "note",
    "order_attributes",
    "processed_at",
    "scheduled_at",
    "status",
    "subtotal_price",
    "tags",
    "taxable",
    "total_discounts",
    "total_duties",
    "total_line_items_price",
    "total_price",
    "total_refunds",
    "total_tax",
    "type",
    "updated_at",
];

const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("id", ColumnType::Int64),
    ColumnSpec::new("address_id", ColumnType::Int64),
    ColumnSpec::new("status", ColumnType::Utf8),
    ColumnSpec::new("type", ColumnType::Utf8),
    ColumnSpec::new("recharge_customer_id", ColumnType::Int64),
    ColumnSpec::new("shopify_customer_id", ColumnType::Int64),
    ColumnSpec::new("customer_email", ColumnType::Utf8),
    ColumnSpec::new("shopify_order_id", ColumnType::Int64),
    ColumnSpec::new("shopify_order_name", ColumnType::Utf8),
    ColumnSpec::new("charge_id", ColumnType::Int64),
    ColumnSpec::new("subscription_id", ColumnType::Int64),
    ColumnSpec::new("shopify_product_id", ColumnType::Int64),
    ColumnSpec::new("shopify_variant_id", ColumnType::Int64),
    ColumnSpec::new("sku", ColumnType::Utf8),
    ColumnSpec::new("qty", ColumnType::Int64),
    ColumnSpec::new("product_title", ColumnType::Utf8),
    ColumnSpec::new("line_item_properties", ColumnType::Properties),
    ColumnSpec::new("subtotal_price", ColumnType::Float64),
    ColumnSpec::new("total_discounts", ColumnType::Float64),
    ColumnSpec::new("total_duties", ColumnType::Float64),
    ColumnSpec::new("total_line_items_price", ColumnType::Float64),
    ColumnSpec::new("total_price", ColumnType::Float64),
    ColumnSpec::new("total_refunds", ColumnType::Float64),
    ColumnSpec::new("total_tax", ColumnType::Float64),
    ColumnSpec::new("taxable", ColumnType::Boolean),
    ColumnSpec::new("discounts", ColumnType::Json),
    ColumnSpec::new("order_attributes", ColumnType::Json),
    ColumnSpec::new("note", ColumnType::Utf8),
    ColumnSpec::new("tags", ColumnType::Utf8),
    ColumnSpec::new("error", ColumnType::Utf8),
    ColumnSpec::new("scheduled_at", ColumnType::Utf8),
    ColumnSpec::new("processed_at", ColumnType::Utf8),
    ColumnSpec::new("created_at", ColumnType::Utf8),
    ColumnSpec::new("updated_at", ColumnType::Utf8),
];

/// Declared schema of the order table
pub fn order_schema() -> TableSchema {
    TableSchema::new(COLUMNS)
}

/// Flatten raw order records into a table, one row per line item
pub fn flatten_orders(records: &[Value], policy: RowErrorPolicy) -> Result<Table> {
    let layout = RecordLayout {
        passthrough: PASSTHROUGH,
        dropped: ORDER_DROPPED_COLUMNS,
    };
    flatten_records(records, &order_schema(), &layout, policy, order_rows)
}

/// Order-level values shared by every line item row
struct OrderProjection {
    recharge_customer_id: Value,
    shopify_customer_id: Value,
    customer_email: Value,
    shopify_order_name: Value,
    shopify_order_id: Value,
    charge_id: Value,
}

impl OrderProjection {
    fn project(order: &Order, ctx: RowContext) -> Result<Self> {
        let customer = order.customer.as_ref();
        Ok(Self {
            recharge_customer_id: ctx.project("customer", customer, &["id"])?,
            shopify_customer_id: ctx.project(
                "customer",
                customer,
                &["external_customer_id", "ecommerce"],
            )?,
            customer_email: ctx.project("customer", customer, &["email"])?,
            shopify_order_name: ctx.project(
                "external_order_name",
                order.external_order_name.as_ref(),
                &["ecommerce"],
            )?,
            shopify_order_id: ctx.project(
                "external_order_id",
                order.external_order_id.as_ref(),
                &["ecommerce"],
            )?,
            charge_id: ctx.project("charge", order.charge.as_ref(), &["id"])?,
        })
    }
}

fn order_rows(order: &Order, ctx: RowContext, schema: &TableSchema) -> Result<Vec<BuiltRow>> {
    let line_items = order
        .line_items
        .as_ref()
        .ok_or_else(|| ctx.missing("line_items"))?;
    if line_items.is_empty() {
        return Ok(Vec::new());
    }

    let shared = OrderProjection::project(order, ctx)?;
    line_items
        .iter()
        .map(|item| line_item_row(order, item, &shared, ctx, schema))
        .collect()
}

fn line_item_row(
    order: &Order,
    item: &LineItem,
    shared: &OrderProjection,
    ctx: RowContext,
    schema: &TableSchema,
) -> Result<BuiltRow> {
    let mut row = RowBuilder::new(schema, ctx);
    row.set("id", &Value::from(order.id))?;
    for column in PASSTHROUGH {
        row.copy_from(&order.fields, column)?;
    }

    row.set("recharge_customer_id", &shared.recharge_customer_id)?;
    row.set("shopify_customer_id", &shared.shopify_customer_id)?;
    row.set("customer_email", &shared.customer_email)?;
    row.set("shopify_order_name", &shared.shopify_order_name)?;
    row.set("shopify_order_id", &shared.shopify_order_id)?;
    row.set("charge_id", &shared.charge_id)?;

    let product = ctx.project(
        "line_items.external_product_id",
        item.external_product_id.as_ref(),
        &["ecommerce"],
    )?;
    row.set("shopify_product_id", &product)?;

    let variant = ctx.project(
        "line_items.external_variant_id",
        item.external_variant_id.as_ref(),
        &["ecommerce"],
    )?;
    row.set("shopify_variant_id", &variant)?;

    let subscription_id =
        ctx.project("line_items.purchase_item_id", item.purchase_item_id.as_ref(), &[])?;
    row.set("subscription_id", &subscription_id)?;

    let properties = ctx.project("line_items.properties", item.properties.as_ref(), &[])?;
    row.set("line_item_properties", &properties)?;

    row.set("sku", &ctx.project("line_items.sku", item.sku.as_ref(), &[])?)?;
    row.set("qty", &ctx.project("line_items.quantity", item.quantity.as_ref(), &[])?)?;
    row.set(
        "product_title",
        &ctx.project("line_items.title", item.title.as_ref(), &[])?,
    )?;

    Ok(row.finish())
}
