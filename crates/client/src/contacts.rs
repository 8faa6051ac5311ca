//! Contacts API (contacts v1, search v3)

use std::sync::Arc;

use hubsync_core::{
    codec, find_in_pages, JsonObject, JsonValue, Model, Page, PageResponse, Query, QuotaGate,
    ResponseLayout, Result, Transport,
};

use crate::response::{self, ListKeys};

const LIST_KEYS: ListKeys = ListKeys {
    has_more: "has-more",
    offset: "vid-offset",
    items: "contacts",
};

/// Access to HubSpot contacts mapped onto `E`
pub struct Contacts<E> {
    transport: Arc<dyn Transport>,
    model: Arc<Model<E>>,
    quota: Arc<QuotaGate>,
}

impl<E: Default + 'static> Contacts<E> {
    /// Contacts API for the entity described by `model`
    pub fn new(transport: Arc<dyn Transport>, model: Arc<Model<E>>, quota: Arc<QuotaGate>) -> Self {
        Contacts {
            transport,
            model,
            quota,
        }
    }

    /// Schema used to map contacts
    pub fn model(&self) -> &Model<E> {
        &self.model
    }

    fn to_entity(&self, response: Option<JsonObject>) -> E {
        response
            .map(|r| codec::deserialize(&self.model, &r, &ResponseLayout::CONTACT))
            .unwrap_or_default()
    }

    fn body(&self, contact: &E) -> JsonValue {
        codec::properties_request(&self.model, contact, "property").into()
    }

    /// Create a contact, or update the one already registered for `email`
    pub fn create_or_update(&self, email: &str, contact: &E) -> Result<E> {
        let response = self.transport.post(
            &format!(
                "contacts/v1/contact/createOrUpdate/email/{}",
                response::path_segment(email)
            ),
            &self.body(contact),
            &[],
        )?;
        Ok(self.to_entity(response))
    }

    /// Update the properties of contact `id`
    pub fn update(&self, id: i64, contact: &E) -> Result<()> {
        self.transport.post(
            &format!("contacts/v1/contact/vid/{}/profile", id),
            &self.body(contact),
            &[],
        )?;
        Ok(())
    }

    /// Delete contact `id`
    pub fn delete(&self, id: i64) -> Result<()> {
        self.transport
            .delete(&format!("contacts/v1/contact/vid/{}", id))
    }

    /// # Errors
    ///
    /// Returns [`hubsync_core::Error::NotFound`] when HubSpot answers without content.
    pub fn get_by_id(&self, id: i64) -> Result<E> {
        let found = self
            .transport
            .get(&format!("contacts/v1/contact/vid/{}/profile", id), &[])?;
        let found = response::require(found, || format!("contact {}", id))?;
        Ok(codec::deserialize(&self.model, &found, &ResponseLayout::CONTACT))
    }

    /// Contact with `email`; `Error::NotFound` when HubSpot returns nothing
    pub fn get_by_email(&self, email: &str) -> Result<E> {
        let path = format!(
            "contacts/v1/contact/email/{}/profile",
            response::path_segment(email)
        );
        let found = self.transport.get(&path, &[])?;
        let found = response::require(found, || format!("contact {}", email))?;
        Ok(codec::deserialize(&self.model, &found, &ResponseLayout::CONTACT))
    }

    /// One page of all contacts, with the given properties
    pub fn list_page(&self, page: Option<&Page>, props: &[&str]) -> Result<PageResponse<E>> {
        let mut params = response::page_params(page, "count", "vidOffset");
        params.extend(response::property_params("property", props));

        let result = self
            .transport
            .get("contacts/v1/lists/all/contacts/all", &params)?;
        Ok(response::decode_page(
            &self.model,
            result,
            LIST_KEYS,
            &ResponseLayout::CONTACT,
            "contacts",
        ))
    }

    /// Walk all contacts until `predicate` matches
    pub fn find(&self, props: &[&str], mut predicate: impl FnMut(&E) -> bool) -> Result<Option<E>> {
        find_in_pages(|page| self.list_page(page, props), |c| Ok(predicate(c)))
    }

    /// Search query on `crm/v3/objects/contacts/search`
    pub fn query(&self) -> Query<E> {
        Query::new(
            "crm/v3/objects/contacts/search",
            Arc::clone(&self.transport),
            Arc::clone(&self.model),
        )
        .with_quota(Arc::clone(&self.quota))
    }
}
