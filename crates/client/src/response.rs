//! Helpers shared by the resource APIs for reading list and entity responses

use hubsync_core::{
    coerce, codec, Error, JsonObject, JsonValue, Model, Page, PageResponse, Parameter,
    ResponseLayout, Result,
};
use tracing::warn;

/// Response keys of one list endpoint family
#[derive(Debug, Clone, Copy)]
pub(crate) struct ListKeys {
    pub has_more: &'static str,
    pub offset: &'static str,
    pub items: &'static str,
}

/// Entity responses must carry a body; an empty answer means nothing was found
pub(crate) fn require(response: Option<JsonObject>, what: impl FnOnce() -> String) -> Result<JsonObject> {
    response.ok_or_else(|| Error::NotFound(what()))
}

pub(crate) fn has_more(response: &JsonObject, key: &str) -> bool {
    response
        .get(key)
        .map(|v| coerce::<bool>(v).value_or_default())
        .unwrap_or(false)
}

pub(crate) fn int_of(value: Option<&JsonValue>) -> i64 {
    value
        .map(|v| coerce::<i64>(v).value_or_default())
        .unwrap_or(0)
}

/// Decode every object element of an item array.
///
/// List endpoints are read leniently: a missing array yields no data and
/// non-object elements are skipped.
pub(crate) fn decode_items<E: Default + 'static>(
    model: &Model<E>,
    items: Option<&JsonValue>,
    layout: &ResponseLayout,
    resource: &'static str,
) -> Vec<E> {
    let items = match items {
        Some(JsonValue::Array(items)) => items,
        Some(other) if !other.is_null() => {
            warn!(target: "hubsync::client", resource, "List items are not an array, ignoring");
            return Vec::new();
        }
        _ => return Vec::new(),
    };

    items
        .iter()
        .filter_map(|item| match item {
            JsonValue::Object(object) => Some(codec::deserialize(model, object, layout)),
            _ => {
                warn!(target: "hubsync::client", resource, "Skipping non-object list element");
                None
            }
        })
        .collect()
}

/// Decode a list page with a flat offset
pub(crate) fn decode_page<E: Default + 'static>(
    model: &Model<E>,
    response: Option<JsonObject>,
    keys: ListKeys,
    layout: &ResponseLayout,
    resource: &'static str,
) -> PageResponse<E> {
    let Some(response) = response else {
        return PageResponse::empty();
    };

    let more = has_more(&response, keys.has_more);
    PageResponse {
        data: decode_items(model, response.get(keys.items), layout, resource),
        offset: if more { int_of(response.get(keys.offset)) } else { 0 },
        has_more: more,
    }
}

/// Paging parameters; zero values are left to the endpoint's defaults
pub(crate) fn page_params(page: Option<&Page>, count_key: &str, offset_key: &str) -> Vec<Parameter> {
    let mut params = Vec::new();
    if let Some(page) = page {
        if page.count > 0 {
            params.push(Parameter::new(count_key, page.count));
        }
        if page.offset > 0 {
            params.push(Parameter::new(offset_key, page.offset));
        }
    }
    params
}

/// Repeated property parameters (`property=a&property=b`)
pub(crate) fn property_params(key: &str, props: &[&str]) -> Vec<Parameter> {
    props.iter().map(|p| Parameter::new(key, p)).collect()
}

/// Percent-encode a caller value placed in a URL path segment.
///
/// Unreserved characters and `@` pass through; every other byte becomes `%XX`.
pub(crate) fn path_segment(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'@' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
