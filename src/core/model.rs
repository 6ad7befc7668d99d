use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A row type that can be read from one of the input CSV datasets.
///
/// `REQUIRED_COLUMNS` is checked against the file header before any row is
/// deserialized, so a missing column fails the whole read up front instead
/// of surfacing as a per-row deserialization error.
pub trait TableRecord: DeserializeOwned {
    const REQUIRED_COLUMNS: &'static [&'static str];
}

/// One row of the orders dataset. Timestamp columns stay textual here;
/// parsing happens in the transform, where failures become nulls.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub customer_id: String,
    pub order_status: String,
    pub order_purchase_timestamp: Option<String>,
    pub order_approved_at: Option<String>,
    pub order_delivered_carrier_date: Option<String>,
    pub order_delivered_customer_date: Option<String>,
    pub order_estimated_delivery_date: Option<String>,
}

impl TableRecord for Order {
    const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "order_id",
        "customer_id",
        "order_status",
        "order_purchase_timestamp",
        "order_approved_at",
        "order_delivered_carrier_date",
        "order_delivered_customer_date",
        "order_estimated_delivery_date",
    ];
}

/// One line item of an order. An order may have several of these.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItem {
    pub order_id: String,
    pub order_item_id: i64,
    pub price: f64,
    pub freight_value: f64,
}

impl TableRecord for OrderItem {
    const REQUIRED_COLUMNS: &'static [&'static str] =
        &["order_id", "order_item_id", "price", "freight_value"];
}

#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub customer_city: String,
    pub customer_state: String,
}

impl TableRecord for Customer {
    const REQUIRED_COLUMNS: &'static [&'static str] =
        &["customer_id", "customer_city", "customer_state"];
}

/// Per-order rollup of line items.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ItemsAggregate {
    pub total_items: i64,
    pub total_value: f64,
    pub total_freight: f64,
}

/// Output row: the full orders row with parsed timestamps plus the derived
/// delivery metrics, item aggregates, and customer location. Field order
/// here is the column order of both sinks.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedOrder {
    pub order_id: String,
    pub customer_id: String,
    pub order_status: String,
    #[serde(with = "timestamp")]
    pub order_purchase_timestamp: Option<NaiveDateTime>,
    #[serde(with = "timestamp")]
    pub order_approved_at: Option<NaiveDateTime>,
    #[serde(with = "timestamp")]
    pub order_delivered_carrier_date: Option<NaiveDateTime>,
    #[serde(with = "timestamp")]
    pub order_delivered_customer_date: Option<NaiveDateTime>,
    #[serde(with = "timestamp")]
    pub order_estimated_delivery_date: Option<NaiveDateTime>,
    pub delivery_time_days: Option<i64>,
    pub delivery_delay_days: Option<i64>,
    pub total_items: Option<i64>,
    pub total_value: Option<f64>,
    pub total_freight: Option<f64>,
    pub customer_city: Option<String>,
    pub customer_state: Option<String>,
}

impl EnrichedOrder {
    pub const COLUMNS: &'static [&'static str] = &[
        "order_id",
        "customer_id",
        "order_status",
        "order_purchase_timestamp",
        "order_approved_at",
        "order_delivered_carrier_date",
        "order_delivered_customer_date",
        "order_estimated_delivery_date",
        "delivery_time_days",
        "delivery_delay_days",
        "total_items",
        "total_value",
        "total_freight",
        "customer_city",
        "customer_state",
    ];
}

/// Serde helper for optional timestamps: `%Y-%m-%d %H:%M:%S`, empty when
/// null, matching the source dataset's own format.
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::Serializer;

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }
}
