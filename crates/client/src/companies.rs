//! Companies API (companies v2, batch v1, search v3)

use std::sync::Arc;

use hubsync_core::{
    codec, coerce, Error, JsonObject, JsonValue, Model, Page, PageResponse, Query, QuotaGate,
    ResponseLayout, Result, Transport,
};
use serde_json::json;

use crate::response::{self, ListKeys};

const PAGED_KEYS: ListKeys = ListKeys {
    has_more: "has-more",
    offset: "offset",
    items: "companies",
};

const RECENT_KEYS: ListKeys = ListKeys {
    has_more: "hasMore",
    offset: "offset",
    items: "results",
};

/// Access to HubSpot companies mapped onto `E`
pub struct Companies<E> {
    transport: Arc<dyn Transport>,
    model: Arc<Model<E>>,
    quota: Arc<QuotaGate>,
}

impl<E: Default + 'static> Companies<E> {
    /// Companies API for the entity described by `model`
    pub fn new(transport: Arc<dyn Transport>, model: Arc<Model<E>>, quota: Arc<QuotaGate>) -> Self {
        Companies {
            transport,
            model,
            quota,
        }
    }

    /// Schema used to map companies
    pub fn model(&self) -> &Model<E> {
        &self.model
    }

    fn to_entity(&self, response: Option<JsonObject>) -> E {
        response
            .map(|r| codec::deserialize(&self.model, &r, &ResponseLayout::COMPANY))
            .unwrap_or_default()
    }

    fn body(&self, company: &E) -> JsonValue {
        codec::properties_request(&self.model, company, "name").into()
    }

    /// Create a company and return it as stored
    pub fn create(&self, company: &E) -> Result<E> {
        let response = self
            .transport
            .post("companies/v2/companies", &self.body(company), &[])?;
        Ok(self.to_entity(response))
    }

    /// Replace the properties of company `id`
    pub fn update(&self, id: i64, company: &E) -> Result<E> {
        let response = self.transport.put(
            &format!("companies/v2/companies/{}", id),
            &self.body(company),
            &[],
        )?;
        Ok(self.to_entity(response))
    }

    /// Update several companies in one asynchronous call.
    ///
    /// Each company is addressed by its `id` field.
    pub fn batch_update(&self, companies: &[E]) -> Result<()> {
        let request = batch_request(&self.model, companies)?;
        self.transport
            .post("companies/v1/batch-async/update", &request, &[])?;
        Ok(())
    }

    /// One page of all companies, with the given properties
    pub fn list(&self, page: Option<&Page>, props: &[&str]) -> Result<PageResponse<E>> {
        let mut params = response::page_params(page, "limit", "offset");
        params.extend(response::property_params("properties", props));

        let result = self.transport.get("companies/v2/companies/paged", &params)?;
        Ok(self.decode(result, PAGED_KEYS))
    }

    /// Companies ordered by last modification
    pub fn recently_modified(&self, page: Option<&Page>) -> Result<PageResponse<E>> {
        let params = response::page_params(page, "count", "offset");
        let result = self
            .transport
            .get("companies/v2/companies/recent/modified", &params)?;
        Ok(self.decode(result, RECENT_KEYS))
    }

    /// Companies ordered by creation
    pub fn recently_created(&self, page: Option<&Page>) -> Result<PageResponse<E>> {
        let params = response::page_params(page, "count", "offset");
        let result = self
            .transport
            .get("companies/v2/companies/recent/created", &params)?;
        Ok(self.decode(result, RECENT_KEYS))
    }

    /// Companies whose domain matches `domain`.
    ///
    /// The offset of this endpoint is the company id to continue after.
    pub fn search_by_domain(
        &self,
        domain: &str,
        page: Option<&Page>,
        props: &[&str],
    ) -> Result<PageResponse<E>> {
        let mut request = JsonObject::new();
        if let Some(page) = page {
            if page.count > 0 {
                request.insert("limit".into(), json!(page.count));
            }
            if page.offset > 0 {
                request.insert(
                    "offset".into(),
                    json!({"isPrimary": true, "companyId": page.offset}),
                );
            }
        }
        if !props.is_empty() {
            request.insert("properties".into(), json!(props));
        }

        let result = self.transport.post(
            &format!(
                "companies/v2/domains/{}/companies",
                response::path_segment(domain)
            ),
            &JsonValue::Object(request),
            &[],
        )?;
        let Some(result) = result else {
            return Ok(PageResponse::empty());
        };

        let has_more = response::has_more(&result, "hasMore");
        let offset = if has_more {
            response::int_of(result.get("offset").and_then(|o| o.get("companyId")))
        } else {
            0
        };

        Ok(PageResponse {
            data: response::decode_items(
                &self.model,
                result.get("results"),
                &ResponseLayout::COMPANY,
                "companies",
            ),
            offset,
            has_more,
        })
    }

    /// Delete company `id`
    pub fn delete(&self, id: i64) -> Result<()> {
        self.transport
            .delete(&format!("companies/v2/companies/{}", id))
    }

    /// Company `id`; `Error::NotFound` when HubSpot returns nothing
    pub fn get(&self, id: i64) -> Result<E> {
        let found = self
            .transport
            .get(&format!("companies/v2/companies/{}", id), &[])?;
        let found = response::require(found, || format!("company {}", id))?;
        Ok(codec::deserialize(&self.model, &found, &ResponseLayout::COMPANY))
    }

    /// Search query on `crm/v3/objects/companies/search`
    pub fn query(&self) -> Query<E> {
        Query::new(
            "crm/v3/objects/companies/search",
            Arc::clone(&self.transport),
            Arc::clone(&self.model),
        )
        .with_quota(Arc::clone(&self.quota))
    }

    fn decode(&self, result: Option<JsonObject>, keys: ListKeys) -> PageResponse<E> {
        response::decode_page(
            &self.model,
            result,
            keys,
            &ResponseLayout::COMPANY,
            "companies",
        )
    }
}

/// Body of a batch update: `[{"objectId": id, "properties": [...]}, ...]`.
///
/// Shared by companies and deals.
pub(crate) fn batch_request<E: 'static>(model: &Model<E>, entities: &[E]) -> Result<JsonValue> {
    if model.identifier().is_none() {
        return Err(Error::config(
            model.entity_name(),
            "batch updates need a field tagged 'id'",
        ));
    }

    let items = entities
        .iter()
        .map(|entity| {
            let mut item = codec::properties_request(model, entity, "name");
            let id = model
                .id_of(entity)
                .map(|v| coerce::<i64>(&v).value_or_default())
                .unwrap_or_default();
            item.insert("objectId".into(), json!(id));
            JsonValue::Object(item)
        })
        .collect();
    Ok(JsonValue::Array(items))
}
