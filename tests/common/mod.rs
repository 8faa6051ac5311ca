//! Shared fixtures for the mapping integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use hubsync::{JsonObject, JsonValue, Model, Parameter, Result, Transport};
use parking_lot::Mutex;

/// Route test logs through the test writer; safe to call from every test
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("hubsync=trace")
        .try_init();
}

/// Entity covering every supported field kind
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Deal {
    pub id: i64,
    pub deleted: bool,
    pub contacts: Vec<i64>,
    pub companies: Vec<i64>,
    pub name: String,
    pub stage: String,
    pub amount: f64,
    pub seats: i32,
    pub priority: u8,
    pub closed: bool,
    pub close_date: DateTime<Utc>,
    pub owner: Option<i64>,
    pub tags: Vec<String>,
    pub internal: String,
}

pub fn deal_model() -> Model<Deal> {
    Model::<Deal>::builder()
        .field("ID", "id", |d| &d.id, |d| &mut d.id)
        .field("Deleted", "deleted", |d| &d.deleted, |d| &mut d.deleted)
        .contacts("Contacts", |d| &d.contacts, |d| &mut d.contacts)
        .companies("Companies", |d| &d.companies, |d| &mut d.companies)
        .field("Name", "name=dealname", |d| &d.name, |d| &mut d.name)
        .field("Stage", "name=dealstage", |d| &d.stage, |d| &mut d.stage)
        .field("Amount", "", |d| &d.amount, |d| &mut d.amount)
        .field("Seats", "", |d| &d.seats, |d| &mut d.seats)
        .field("Priority", "", |d| &d.priority, |d| &mut d.priority)
        .field("Closed", "name=is_closed", |d| &d.closed, |d| &mut d.closed)
        .field("CloseDate", "name=closedate", |d| &d.close_date, |d| &mut d.close_date)
        .field("Owner", "name=hubspot_owner_id", |d| &d.owner, |d| &mut d.owner)
        .field("Tags", "", |d| &d.tags, |d| &mut d.tags)
        .field("Internal", "name=internal_note,noexport", |d| &d.internal, |d| &mut d.internal)
        .build()
        .expect("deal model")
}

pub fn shared_deal_model() -> Arc<Model<Deal>> {
    Arc::new(deal_model())
}

/// Wrap a serialized property array into a v1 response object
pub fn v1_response(id_key: &str, id: i64, properties: &JsonValue) -> JsonObject {
    let mut wrapped = serde_json::Map::new();
    for entry in properties.as_array().expect("properties array") {
        let name = entry["name"].as_str().expect("property name").to_string();
        wrapped.insert(name, serde_json::json!({ "value": entry["value"].clone() }));
    }

    let mut response = JsonObject::new();
    response.insert(id_key.to_string(), JsonValue::from(id));
    response.insert("properties".to_string(), JsonValue::Object(wrapped));
    response
}

/// Transport answering searches from a queue of canned pages
#[derive(Default)]
pub struct SearchTransport {
    pages: Mutex<VecDeque<JsonObject>>,
    bodies: Mutex<Vec<JsonValue>>,
}

impl SearchTransport {
    pub fn with_pages(pages: impl IntoIterator<Item = JsonValue>) -> Arc<Self> {
        let transport = SearchTransport::default();
        for page in pages {
            if let JsonValue::Object(page) = page {
                transport.pages.lock().push_back(page);
            }
        }
        Arc::new(transport)
    }

    pub fn bodies(&self) -> Vec<JsonValue> {
        self.bodies.lock().clone()
    }
}

impl Transport for SearchTransport {
    fn get(&self, _: &str, _: &[Parameter]) -> Result<Option<JsonObject>> {
        Ok(None)
    }

    fn post(&self, _: &str, body: &JsonValue, _: &[Parameter]) -> Result<Option<JsonObject>> {
        self.bodies.lock().push(body.clone());
        Ok(self.pages.lock().pop_front())
    }

    fn put(&self, _: &str, _: &JsonValue, _: &[Parameter]) -> Result<Option<JsonObject>> {
        Ok(None)
    }

    fn delete(&self, _: &str) -> Result<()> {
        Ok(())
    }
}
