//! Tests for endpoint URL builders

use super::*;
use pretty_assertions::assert_eq;
use test_case::test_case;

const BASE: &str = "https://api.rechargeapps.com";

#[test_case(SubscriptionQuery::All, "https://api.rechargeapps.com/subscriptions?limit=250" ; "all")]
#[test_case(SubscriptionQuery::Active, "https://api.rechargeapps.com/subscriptions?limit=250&status=active" ; "active")]
#[test_case(
    SubscriptionQuery::cancelled("", ""),
    "https://api.rechargeapps.com/subscriptions?limit=250&status=cancelled" ;
    "cancelled without dates"
)]
#[test_case(
    SubscriptionQuery::cancelled("2024-01-01", ""),
    "https://api.rechargeapps.com/subscriptions?limit=250&status=cancelled" ;
    "cancelled with only start date"
)]
#[test_case(
    SubscriptionQuery::cancelled("", "2024-02-01"),
    "https://api.rechargeapps.com/subscriptions?limit=250&status=cancelled" ;
    "cancelled with only end date"
)]
#[test_case(
    SubscriptionQuery::cancelled("2024-01-01", "2024-02-01"),
    "https://api.rechargeapps.com/subscriptions?limit=250&status=cancelled&created_at_min=2024-01-01&created_at_max=2024-02-01" ;
    "cancelled with date window"
)]
fn test_subscription_urls(query: SubscriptionQuery, expected: &str) {
    assert_eq!(query.url(BASE), expected);
}

#[test]
fn test_cancelled_empty_dates_are_unset() {
    assert_eq!(
        SubscriptionQuery::cancelled("", ""),
        SubscriptionQuery::Cancelled {
            start_date: None,
            end_date: None,
        }
    );
}

#[test]
fn test_order_urls() {
    assert_eq!(
        OrderQuery::All.url(BASE),
        "https://api.rechargeapps.com/orders?limit=250"
    );
    assert_eq!(
        OrderQuery::ByIds(vec!["11".to_string(), "12".to_string(), "13".to_string()]).url(BASE),
        "https://api.rechargeapps.com/orders?limit=250&status=success&ids=11,12,13"
    );
}

#[test]
fn test_resource_base_trims_trailing_slash() {
    assert_eq!(
        resource_base("http://127.0.0.1:8080/", Resource::Orders),
        "http://127.0.0.1:8080/orders"
    );
    assert_eq!(
        resource_base(BASE, Resource::Subscriptions),
        "https://api.rechargeapps.com/subscriptions"
    );
}
