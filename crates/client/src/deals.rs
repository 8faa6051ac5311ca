//! Deals API (deals v1, search v3)

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hubsync_core::{
    codec, JsonObject, JsonValue, Model, Page, PageResponse, Parameter, Query, QuotaGate,
    ResponseLayout, Result, Transport,
};

use crate::companies::batch_request;
use crate::response::{self, ListKeys};

const LIST_KEYS: ListKeys = ListKeys {
    has_more: "hasMore",
    offset: "offset",
    items: "deals",
};

/// Access to HubSpot deals mapped onto `E`
pub struct Deals<E> {
    transport: Arc<dyn Transport>,
    model: Arc<Model<E>>,
    quota: Arc<QuotaGate>,
}

impl<E: Default + 'static> Deals<E> {
    /// Deals API for the entity described by `model`
    pub fn new(transport: Arc<dyn Transport>, model: Arc<Model<E>>, quota: Arc<QuotaGate>) -> Self {
        Deals {
            transport,
            model,
            quota,
        }
    }

    /// Schema used to map deals
    pub fn model(&self) -> &Model<E> {
        &self.model
    }

    fn to_entity(&self, response: Option<JsonObject>) -> E {
        response
            .map(|r| codec::deserialize(&self.model, &r, &ResponseLayout::DEAL))
            .unwrap_or_default()
    }

    /// Create a deal together with its linked contacts and companies
    pub fn create(&self, deal: &E) -> Result<E> {
        let mut request = JsonObject::new();
        if self.model.has_associations() {
            request.insert(
                "associations".into(),
                JsonValue::Object(codec::associations_request(&self.model, deal)),
            );
        }
        request.insert(
            "properties".into(),
            codec::properties_array(&self.model, deal, "name"),
        );

        let response = self
            .transport
            .post("deals/v1/deal", &JsonValue::Object(request), &[])?;
        Ok(self.to_entity(response))
    }

    /// Update the properties of deal `id`
    pub fn update(&self, id: i64, deal: &E) -> Result<E> {
        let request = codec::properties_request(&self.model, deal, "name");
        let response = self.transport.post(
            &format!("deals/v1/deal/{}", id),
            &JsonValue::Object(request),
            &[],
        )?;
        Ok(self.to_entity(response))
    }

    /// Update several deals in one asynchronous call, addressed by their `id` field
    pub fn update_bulk(&self, deals: &[E]) -> Result<()> {
        let request = batch_request(&self.model, deals)?;
        self.transport
            .post("deals/v1/batch-async/update", &request, &[])?;
        Ok(())
    }

    /// One page of all deals
    pub fn list(
        &self,
        page: Option<&Page>,
        include_associations: bool,
        props: &[&str],
    ) -> Result<PageResponse<E>> {
        let mut params = response::page_params(page, "limit", "offset");
        if include_associations {
            params.push(Parameter::new("includeAssociations", true));
        }
        params.extend(response::property_params("properties", props));

        let result = self.transport.get("deals/v1/deal/paged", &params)?;
        Ok(self.decode(result))
    }

    /// Deals modified after `since` (or recently, when `None`)
    pub fn recently_modified(
        &self,
        page: Option<&Page>,
        since: Option<DateTime<Utc>>,
        include_associations: bool,
    ) -> Result<PageResponse<E>> {
        self.recent("deals/v1/deal/recent/modified", page, since, include_associations)
    }

    /// Deals created after `since` (or recently, when `None`)
    pub fn recently_created(
        &self,
        page: Option<&Page>,
        since: Option<DateTime<Utc>>,
        include_associations: bool,
    ) -> Result<PageResponse<E>> {
        self.recent("deals/v1/deal/recent/created", page, since, include_associations)
    }

    fn recent(
        &self,
        path: &str,
        page: Option<&Page>,
        since: Option<DateTime<Utc>>,
        include_associations: bool,
    ) -> Result<PageResponse<E>> {
        let mut params = response::page_params(page, "count", "offset");
        if let Some(since) = since {
            params.push(Parameter::new("since", since.timestamp_millis()));
        }
        if include_associations {
            params.push(Parameter::new("includeAssociations", true));
        }

        let result = self.transport.get(path, &params)?;
        Ok(self.decode(result))
    }

    /// Delete deal `id`
    pub fn delete(&self, id: i64) -> Result<()> {
        self.transport.delete(&format!("deals/v1/deal/{}", id))
    }

    /// Deal `id`; `Error::NotFound` when HubSpot returns nothing
    pub fn get(&self, id: i64) -> Result<E> {
        let found = self.transport.get(&format!("deals/v1/deal/{}", id), &[])?;
        let found = response::require(found, || format!("deal {}", id))?;
        Ok(codec::deserialize(&self.model, &found, &ResponseLayout::DEAL))
    }

    /// Search query on `crm/v3/objects/deals/search`
    pub fn query(&self) -> Query<E> {
        Query::new(
            "crm/v3/objects/deals/search",
            Arc::clone(&self.transport),
            Arc::clone(&self.model),
        )
        .with_quota(Arc::clone(&self.quota))
    }

    fn decode(&self, result: Option<JsonObject>) -> PageResponse<E> {
        response::decode_page(&self.model, result, LIST_KEYS, &ResponseLayout::DEAL, "deals")
    }
}
