//! Property codec: entities to and from HubSpot property bags
//!
//! Write side: exportable, non-zero fields become an ordered list of
//! `{name, value}` pairs. Read side: a response object is decoded into a
//! fresh zero-valued entity; every value passes through coercion, so wire
//! values that do not fit a field leave it at its zero value.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, trace};

use crate::model::{AssociationKind, Model, Property, PropertyRole};
use crate::transport::JsonObject;

/// One entry of a write property bag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValue {
    /// HubSpot property name
    pub name: String,
    /// Wire value
    pub value: JsonValue,
}

/// Where a response family keeps the top-level fields the codec reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseLayout {
    /// Key holding the entity id
    pub id_key: &'static str,
    /// Key holding the deleted flag
    pub deleted_key: &'static str,
    /// `properties` maps names straight to values instead of `{value, ...}`
    pub flat_properties: bool,
}

impl ResponseLayout {
    /// contacts v1
    pub const CONTACT: ResponseLayout = ResponseLayout {
        id_key: "vid",
        deleted_key: "deleted",
        flat_properties: false,
    };

    /// companies v2
    pub const COMPANY: ResponseLayout = ResponseLayout {
        id_key: "companyId",
        deleted_key: "isDeleted",
        flat_properties: false,
    };

    /// deals v1
    pub const DEAL: ResponseLayout = ResponseLayout {
        id_key: "dealId",
        deleted_key: "isDeleted",
        flat_properties: false,
    };

    /// crm-objects v1 (tickets)
    pub const TICKET: ResponseLayout = ResponseLayout {
        id_key: "objectId",
        deleted_key: "isDeleted",
        flat_properties: false,
    };

    /// crm v3 objects, as returned by search
    pub const OBJECT: ResponseLayout = ResponseLayout {
        id_key: "id",
        deleted_key: "archived",
        flat_properties: true,
    };
}

// ============================================================================
// Serialize
// ============================================================================

/// Serialize the exportable, non-zero fields of an entity in schema order
pub fn serialize<E: 'static>(model: &Model<E>, entity: &E) -> Vec<PropertyValue> {
    model
        .entries()
        .iter()
        .filter(|p| p.descriptor.exportable)
        .filter(|p| !p.access.is_zero(entity))
        .map(|p| PropertyValue {
            name: p.descriptor.wire_name.clone(),
            value: p.access.to_wire(entity),
        })
        .collect()
}

/// Serialized properties as the JSON array endpoints expect.
///
/// `name_key` is the key carrying the property name: `"property"` for
/// contacts v1, `"name"` everywhere else.
pub fn properties_array<E: 'static>(model: &Model<E>, entity: &E, name_key: &str) -> JsonValue {
    JsonValue::Array(
        serialize(model, entity)
            .into_iter()
            .map(|p| {
                let mut entry = JsonObject::new();
                entry.insert(name_key.to_string(), JsonValue::String(p.name));
                entry.insert("value".to_string(), p.value);
                JsonValue::Object(entry)
            })
            .collect(),
    )
}

/// Request body `{"properties": [...]}` for create/update calls
pub fn properties_request<E: 'static>(model: &Model<E>, entity: &E, name_key: &str) -> JsonObject {
    let mut request = JsonObject::new();
    request.insert(
        "properties".to_string(),
        properties_array(model, entity, name_key),
    );
    request
}

/// Association payload `{"associatedCompanyIds": [...], "associatedVids": [...]}`.
///
/// Only roles present on the model are included.
pub fn associations_request<E: 'static>(model: &Model<E>, entity: &E) -> JsonObject {
    let mut associations = JsonObject::new();
    for kind in AssociationKind::ALL {
        if let Some(ids) = model.associations_of(entity, kind) {
            associations.insert(kind.wire_key().to_string(), json!(ids));
        }
    }
    associations
}

// ============================================================================
// Deserialize
// ============================================================================

/// Decode a response object into a new entity.
///
/// Never fails: missing keys leave fields at zero and a malformed
/// `properties` member yields an entity with only the top-level fields set.
pub fn deserialize<E: Default + 'static>(
    model: &Model<E>,
    response: &JsonObject,
    layout: &ResponseLayout,
) -> E {
    let mut entity = E::default();

    let top_level = [
        (PropertyRole::Identifier, layout.id_key),
        (PropertyRole::Deleted, layout.deleted_key),
    ];
    for (role, key) in top_level {
        if let (Some(property), Some(value)) = (model.role_entry(role), response.get(key)) {
            assign(property, &mut entity, key, value);
        }
    }

    if model.has_associations() {
        if let Some(associations) = response.get("associations").and_then(JsonValue::as_object) {
            for kind in AssociationKind::ALL {
                let role = PropertyRole::Associations(kind);
                if let (Some(property), Some(value)) =
                    (model.role_entry(role), associations.get(kind.wire_key()))
                {
                    assign(property, &mut entity, kind.wire_key(), value);
                }
            }
        }
    }

    let properties = match response.get("properties") {
        Some(JsonValue::Object(properties)) => properties,
        None => return entity,
        Some(other) => {
            debug!(
                target: "hubsync::codec",
                entity = model.entity_name(),
                found = json_type(other),
                "Ignoring malformed properties member"
            );
            return entity;
        }
    };

    for property in model.entries() {
        let wire_name = property.descriptor.wire_name.as_str();
        let value = match properties.get(wire_name) {
            Some(value) if layout.flat_properties => value,
            Some(JsonValue::Object(wrapped)) => match wrapped.get("value") {
                Some(value) => value,
                None => continue,
            },
            _ => continue,
        };
        assign(property, &mut entity, wire_name, value);
    }

    entity
}

fn assign<E>(property: &Property<E>, entity: &mut E, key: &str, value: &JsonValue) {
    if !property.access.assign(entity, value) {
        trace!(
            target: "hubsync::codec",
            field = %property.descriptor.field,
            key,
            found = json_type(value),
            "Unsupported wire value left field at zero"
        );
    }
}

fn json_type(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
