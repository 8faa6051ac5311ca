//! Search Query Tests
//!
//! Request bodies produced by the query builder and decoding of the
//! search responses.

use crate::common::{shared_deal_model, SearchTransport};
use hubsync::{Error, Filter, Page, Query, SortDirection};
use serde_json::json;

fn deal_query(transport: std::sync::Arc<SearchTransport>) -> Query<crate::common::Deal> {
    Query::new("crm/v3/objects/deals/search", transport, shared_deal_model())
}

#[test]
fn single_group_is_sent_flat() {
    let transport = SearchTransport::with_pages([json!({"results": []})]);
    deal_query(transport.clone())
        .filter([
            Filter::equals("dealstage", "closedwon"),
            Filter::greater_equal("amount", 1000),
        ])
        .properties(["dealname", "amount"])
        .sort("amount", SortDirection::Descending)
        .execute(Some(&Page::new(0, 25)))
        .unwrap();

    assert_eq!(
        transport.bodies()[0],
        json!({
            "filters": [
                {"propertyName": "dealstage", "operator": "EQ", "value": "closedwon"},
                {"propertyName": "amount", "operator": "GTE", "value": 1000}
            ],
            "sorts": [{"propertyName": "amount", "direction": "DESCENDING"}],
            "properties": ["dealname", "amount"],
            "limit": 25
        })
    );
}

#[test]
fn several_groups_are_alternatives() {
    let transport = SearchTransport::with_pages([json!({"results": []})]);
    deal_query(transport.clone())
        .filter([Filter::has_property("hubspot_owner_id")])
        .filter([
            Filter::not_contains_token("dealname", "test"),
            Filter::less("amount", 10),
        ])
        .execute(Some(&Page::at(40)))
        .unwrap();

    assert_eq!(
        transport.bodies()[0],
        json!({
            "filterGroups": [
                {"filters": [{"propertyName": "hubspot_owner_id", "operator": "HAS_PROPERTY"}]},
                {"filters": [
                    {"propertyName": "dealname", "operator": "NOT_CONTAINS_TOKEN", "value": "test"},
                    {"propertyName": "amount", "operator": "LT", "value": 10}
                ]}
            ],
            "after": "40"
        })
    );
}

#[test]
fn empty_query_posts_empty_object() {
    let transport = SearchTransport::with_pages(Vec::<serde_json::Value>::new());
    let page = deal_query(transport.clone()).execute(None).unwrap();

    assert_eq!(transport.bodies()[0], json!({}));
    assert!(page.data.is_empty());
    assert!(!page.has_more);
}

#[test]
fn malformed_results_are_shape_errors() {
    let transport = SearchTransport::with_pages([
        json!({"results": {"id": "1"}}),
        json!({"results": [17]}),
        json!({"results": [], "paging": {"next": {"after": "soon"}}}),
    ]);
    let query = deal_query(transport);

    for _ in 0..3 {
        assert!(matches!(query.execute(None), Err(Error::Shape(_))));
    }
}
