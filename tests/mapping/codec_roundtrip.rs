//! Codec Round Trips
//!
//! Entities written through `properties_array` and read back through
//! `deserialize` come back unchanged, for every supported field kind.

use crate::common::{deal_model, init_tracing, v1_response, Deal};
use chrono::{DateTime, Utc};
use hubsync::{codec, AssociationKind, JsonValue, ResponseLayout};
use proptest::prelude::*;
use serde_json::json;

fn arb_deal() -> impl Strategy<Value = Deal> {
    (
        0i64..1_000_000_000,
        "[a-zA-Z0-9 ]{0,24}",
        "[a-z]{0,12}",
        -1.0e9f64..1.0e9,
        any::<i32>(),
        any::<u8>(),
        any::<bool>(),
        -2_208_988_800_000i64..4_000_000_000_000,
        proptest::option::of(any::<i64>()),
        proptest::collection::vec("[a-z]{1,8}", 0..4),
    )
        .prop_map(
            |(id, name, stage, amount, seats, priority, closed, millis, owner, tags)| Deal {
                id,
                name,
                stage,
                amount,
                seats,
                priority,
                closed,
                close_date: DateTime::from_timestamp_millis(millis).unwrap_or_default(),
                owner,
                tags,
                ..Default::default()
            },
        )
}

proptest! {
    #[test]
    fn exported_fields_survive_round_trip(deal in arb_deal()) {
        let model = deal_model();
        let properties = codec::properties_array(&model, &deal, "name");
        let response = v1_response("dealId", deal.id, &properties);

        let decoded: Deal = codec::deserialize(&model, &response, &ResponseLayout::DEAL);
        prop_assert_eq!(decoded, deal);
    }

    #[test]
    fn zero_fields_are_never_written(deal in arb_deal()) {
        let model = deal_model();
        let names: Vec<String> = codec::serialize(&model, &deal)
            .into_iter()
            .map(|p| p.name)
            .collect();

        prop_assert_eq!(names.contains(&"dealname".to_string()), !deal.name.is_empty());
        prop_assert_eq!(names.contains(&"seats".to_string()), deal.seats != 0);
        prop_assert_eq!(names.contains(&"is_closed".to_string()), deal.closed);
        prop_assert_eq!(names.contains(&"hubspot_owner_id".to_string()), deal.owner.is_some());
        prop_assert_eq!(names.contains(&"tags".to_string()), !deal.tags.is_empty());
        // role and noexport fields stay out of the bag
        prop_assert!(!names.iter().any(|n| n == "id" || n == "deleted" || n == "internal_note"));
    }
}

#[test]
fn time_is_written_as_millisecond_string() {
    init_tracing();
    let model = deal_model();
    let deal = Deal {
        close_date: DateTime::from_timestamp_millis(1_409_443_200_000).unwrap(),
        ..Default::default()
    };

    let properties = codec::serialize(&model, &deal);
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].name, "closedate");
    assert_eq!(properties[0].value, json!("1409443200000"));
}

#[test]
fn associations_round_trip() {
    let model = deal_model();
    let deal = Deal {
        contacts: vec![27136, 4],
        companies: vec![8954037],
        ..Default::default()
    };

    let request = codec::associations_request(&model, &deal);
    assert_eq!(request["associatedVids"], json!([27136, 4]));
    assert_eq!(request["associatedCompanyIds"], json!([8954037]));

    let mut response = serde_json::Map::new();
    response.insert("dealId".into(), json!(1));
    response.insert("associations".into(), JsonValue::Object(request));
    let decoded: Deal = codec::deserialize(&model, &response, &ResponseLayout::DEAL);

    assert_eq!(decoded.id, 1);
    assert_eq!(
        model.associations_of(&decoded, AssociationKind::Contacts),
        Some(vec![27136, 4])
    );
    assert_eq!(decoded.companies, vec![8954037]);
}

#[test]
fn loose_values_are_coerced() {
    init_tracing();
    let model = deal_model();
    let response = json!({
        "dealId": "151088",
        "isDeleted": "true",
        "properties": {
            "amount": {"value": "60000.50"},
            "seats": {"value": "12"},
            "is_closed": {"value": "false"},
            "closedate": {"value": "2020-03-23T11:03:59.695Z"},
            "hubspot_owner_id": {"value": "77"},
            "priority": {"value": "300"},
            "internal_note": {"value": "read, never written"}
        }
    });

    let deal: Deal = codec::deserialize(
        &model,
        response.as_object().unwrap(),
        &ResponseLayout::DEAL,
    );

    assert_eq!(deal.id, 151088);
    assert!(deal.deleted);
    assert_eq!(deal.amount, 60000.5);
    assert_eq!(deal.seats, 12);
    assert!(!deal.closed);
    assert_eq!(deal.close_date.timestamp_millis(), 1_584_961_439_695);
    assert_eq!(deal.owner, Some(77));
    // out of range for u8
    assert_eq!(deal.priority, 0);
    assert_eq!(deal.internal, "read, never written");
}

#[test]
fn flat_search_objects_decode() {
    let model = deal_model();
    let response = json!({
        "id": "1775411525",
        "archived": false,
        "properties": {
            "amount": "142.00",
            "closedate": "2020-03-23T11:03:59.695Z",
            "dealname": "vertical GmbH (Lukass Maceks)",
            "dealstage": "closedwon"
        }
    });

    let deal: Deal = codec::deserialize(
        &model,
        response.as_object().unwrap(),
        &ResponseLayout::OBJECT,
    );

    assert_eq!(deal.id, 1775411525);
    assert_eq!(deal.name, "vertical GmbH (Lukass Maceks)");
    assert_eq!(deal.stage, "closedwon");
    assert_eq!(deal.amount, 142.0);
    assert_eq!(deal.close_date, "2020-03-23T11:03:59.695Z".parse::<DateTime<Utc>>().unwrap());
}
