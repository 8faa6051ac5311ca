//! Paging Tests
//!
//! `find_in_pages` walking synthetic endpoints and real search responses.

use crate::common::{shared_deal_model, SearchTransport};
use hubsync::{find_in_pages, Error, Page, PageResponse, Query};
use serde_json::json;

/// Endpoint serving `pages` pages of `per_page` numbers each
fn numbered_pages(
    pages: i64,
    per_page: i64,
    calls: &mut Vec<Option<Page>>,
) -> impl FnMut(Option<&Page>) -> hubsync::Result<PageResponse<i64>> + '_ {
    move |page| {
        calls.push(page.copied());
        let index = page.map(|p| p.offset).unwrap_or(0);
        Ok(PageResponse {
            data: (0..per_page).map(|i| index * per_page + i).collect(),
            offset: index + 1,
            has_more: index + 1 < pages,
        })
    }
}

#[test]
fn stops_at_first_match() {
    let mut calls = Vec::new();
    let found = find_in_pages(numbered_pages(10, 5, &mut calls), |n| Ok(*n == 12)).unwrap();

    assert_eq!(found, Some(12));
    assert_eq!(calls, vec![None, Some(Page::at(1)), Some(Page::at(2))]);
}

#[test]
fn exhausts_without_match() {
    let mut calls = Vec::new();
    let found = find_in_pages(numbered_pages(4, 3, &mut calls), |n| Ok(*n < 0)).unwrap();

    assert_eq!(found, None);
    assert_eq!(calls.len(), 4);
}

#[test]
fn predicate_error_aborts_walk() {
    let mut calls = Vec::new();
    let result = find_in_pages(numbered_pages(10, 5, &mut calls), |n| {
        if *n == 7 {
            Err(Error::shape("predicate gave up"))
        } else {
            Ok(false)
        }
    });

    assert!(matches!(result, Err(Error::Shape(_))));
    assert_eq!(calls.len(), 2);
}

#[test]
fn walks_search_cursor() {
    let transport = SearchTransport::with_pages([
        json!({
            "results": [{"id": "1", "properties": {"dealname": "first"}}],
            "paging": {"next": {"after": "10"}}
        }),
        json!({
            "results": [{"id": "2", "properties": {"dealname": "second"}}],
            "paging": {"next": {"after": "20"}}
        }),
        json!({
            "results": [{"id": "3", "properties": {"dealname": "target"}}]
        }),
    ]);
    let query = Query::new(
        "crm/v3/objects/deals/search",
        transport.clone(),
        shared_deal_model(),
    );

    let found = find_in_pages(|page| query.execute(page), |d| Ok(d.name == "target")).unwrap();
    assert_eq!(found.map(|d| d.id), Some(3));

    let bodies = transport.bodies();
    assert_eq!(bodies.len(), 3);
    assert!(bodies[0].get("after").is_none());
    assert_eq!(bodies[1]["after"], json!("10"));
    assert_eq!(bodies[2]["after"], json!("20"));
}
