use crate::core::{Customer, EnrichedOrder, ItemsAggregate, Order, OrderItem};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;

const SECONDS_PER_DAY: i64 = 86_400;

/// Enrich the orders table with delivery metrics, per-order item totals, and
/// customer location. Pure and total: schema problems are caught at the
/// source boundary, unparseable timestamps become nulls here. Output rows
/// are one-to-one with `orders`, in the same order.
pub fn transform_orders(
    orders: Vec<Order>,
    items: Vec<OrderItem>,
    customers: Vec<Customer>,
) -> Vec<EnrichedOrder> {
    let items_by_order = aggregate_items(&items);

    let customers_by_id: HashMap<&str, &Customer> = customers
        .iter()
        .map(|c| (c.customer_id.as_str(), c))
        .collect();

    orders
        .into_iter()
        .map(|order| {
            let purchase = parse_timestamp(order.order_purchase_timestamp.as_deref());
            let approved = parse_timestamp(order.order_approved_at.as_deref());
            let carrier = parse_timestamp(order.order_delivered_carrier_date.as_deref());
            let delivered = parse_timestamp(order.order_delivered_customer_date.as_deref());
            let estimated = parse_timestamp(order.order_estimated_delivery_date.as_deref());

            let aggregate = items_by_order.get(order.order_id.as_str());
            let customer = customers_by_id.get(order.customer_id.as_str());

            EnrichedOrder {
                delivery_time_days: whole_days_between(purchase, delivered),
                delivery_delay_days: whole_days_between(estimated, delivered),
                total_items: aggregate.map(|a| a.total_items),
                total_value: aggregate.map(|a| a.total_value),
                total_freight: aggregate.map(|a| a.total_freight),
                customer_city: customer.map(|c| c.customer_city.clone()),
                customer_state: customer.map(|c| c.customer_state.clone()),
                order_id: order.order_id,
                customer_id: order.customer_id,
                order_status: order.order_status,
                order_purchase_timestamp: purchase,
                order_approved_at: approved,
                order_delivered_carrier_date: carrier,
                order_delivered_customer_date: delivered,
                order_estimated_delivery_date: estimated,
            }
        })
        .collect()
}

/// Group line items by order id. Orders without items are absent from the
/// map, so they join to nulls rather than zeros.
fn aggregate_items(items: &[OrderItem]) -> HashMap<&str, ItemsAggregate> {
    let mut grouped: HashMap<&str, ItemsAggregate> = HashMap::new();
    for item in items {
        let entry = grouped.entry(item.order_id.as_str()).or_default();
        entry.total_items += 1;
        entry.total_value += item.price;
        entry.total_freight += item.freight_value;
    }
    grouped
}

/// Parse one timestamp cell. Accepts `%Y-%m-%d %H:%M:%S`, the `T`-separated
/// variant, and a bare date (taken as midnight). Anything else is null.
pub fn parse_timestamp(value: Option<&str>) -> Option<NaiveDateTime> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_hms_opt(0, 0, 0).unwrap())
        })
}

/// Whole-day difference `end - start`, floored toward negative infinity, so
/// a delivery 1.5 days early counts as -2 late days. Null if either end is
/// missing.
fn whole_days_between(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Option<i64> {
    let elapsed = end? - start?;
    Some(elapsed.num_seconds().div_euclid(SECONDS_PER_DAY))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, customer: &str, purchase: &str, delivered: &str, estimated: &str) -> Order {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Order {
            order_id: id.to_string(),
            customer_id: customer.to_string(),
            order_status: "delivered".to_string(),
            order_purchase_timestamp: opt(purchase),
            order_approved_at: None,
            order_delivered_carrier_date: None,
            order_delivered_customer_date: opt(delivered),
            order_estimated_delivery_date: opt(estimated),
        }
    }

    fn item(order_id: &str, seq: i64, price: f64, freight: f64) -> OrderItem {
        OrderItem {
            order_id: order_id.to_string(),
            order_item_id: seq,
            price,
            freight_value: freight,
        }
    }

    fn customer(id: &str, city: &str, state: &str) -> Customer {
        Customer {
            customer_id: id.to_string(),
            customer_city: city.to_string(),
            customer_state: state.to_string(),
        }
    }

    #[test]
    fn enriches_a_delivered_order() {
        let orders = vec![order("1", "c1", "2023-01-01", "2023-01-05", "2023-01-03")];
        let items = vec![item("1", 1, 10.0, 2.0), item("1", 2, 5.0, 1.0)];
        let customers = vec![customer("c1", "SP", "SP")];

        let out = transform_orders(orders, items, customers);

        assert_eq!(out.len(), 1);
        let row = &out[0];
        assert_eq!(row.delivery_time_days, Some(4));
        assert_eq!(row.delivery_delay_days, Some(2));
        assert_eq!(row.total_items, Some(2));
        assert_eq!(row.total_value, Some(15.0));
        assert_eq!(row.total_freight, Some(3.0));
        assert_eq!(row.customer_city.as_deref(), Some("SP"));
        assert_eq!(row.customer_state.as_deref(), Some("SP"));
    }

    #[test]
    fn keeps_every_order_row_in_order() {
        let orders = vec![
            order("b", "c1", "2023-01-01", "", ""),
            order("a", "c2", "", "", ""),
            order("c", "c3", "2023-02-01", "2023-02-02", "2023-02-10"),
        ];
        let items = vec![item("c", 1, 1.0, 0.5)];

        let out = transform_orders(orders, items, vec![customer("c3", "recife", "PE")]);

        let ids: Vec<&str> = out.iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn missing_purchase_timestamp_yields_null_delivery_time() {
        let orders = vec![order("1", "c1", "not a date", "2023-01-05", "2023-01-03")];

        let out = transform_orders(orders, vec![], vec![]);

        assert_eq!(out[0].order_purchase_timestamp, None);
        assert_eq!(out[0].delivery_time_days, None);
        assert_eq!(out[0].delivery_delay_days, Some(2));
    }

    #[test]
    fn order_without_items_gets_null_aggregates() {
        let orders = vec![order("1", "c1", "2023-01-01", "2023-01-02", "2023-01-02")];

        let out = transform_orders(orders, vec![item("other", 1, 9.0, 1.0)], vec![]);

        assert_eq!(out[0].total_items, None);
        assert_eq!(out[0].total_value, None);
        assert_eq!(out[0].total_freight, None);
    }

    #[test]
    fn unknown_customer_gets_null_location() {
        let orders = vec![order("1", "ghost", "2023-01-01", "", "")];

        let out = transform_orders(orders, vec![], vec![customer("c1", "SP", "SP")]);

        assert_eq!(out[0].customer_city, None);
        assert_eq!(out[0].customer_state, None);
    }

    #[test]
    fn early_delivery_floors_toward_negative_infinity() {
        // Delivered 1.5 days before the estimate: -1.5 floors to -2.
        let orders = vec![order(
            "1",
            "c1",
            "2023-01-01 00:00:00",
            "2023-01-02 00:00:00",
            "2023-01-03 12:00:00",
        )];

        let out = transform_orders(orders, vec![], vec![]);

        assert_eq!(out[0].delivery_delay_days, Some(-2));
        assert_eq!(out[0].delivery_time_days, Some(1));
    }

    #[test]
    fn sub_day_delivery_truncates_to_zero() {
        let orders = vec![order(
            "1",
            "c1",
            "2023-01-01 08:00:00",
            "2023-01-01 20:00:00",
            "",
        )];

        let out = transform_orders(orders, vec![], vec![]);

        assert_eq!(out[0].delivery_time_days, Some(0));
    }

    #[test]
    fn parses_common_timestamp_shapes() {
        let midnight = NaiveDate::from_ymd_opt(2023, 5, 4)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        assert_eq!(parse_timestamp(Some("2023-05-04")), Some(midnight));
        assert_eq!(
            parse_timestamp(Some("2023-05-04 00:00:00")),
            Some(midnight)
        );
        assert_eq!(
            parse_timestamp(Some("2023-05-04T00:00:00")),
            Some(midnight)
        );
        assert_eq!(parse_timestamp(Some("")), None);
        assert_eq!(parse_timestamp(Some("04/05/2023")), None);
        assert_eq!(parse_timestamp(None), None);
    }
}
