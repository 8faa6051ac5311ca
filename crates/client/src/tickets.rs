//! Tickets API (crm-objects v1, search v3)

use std::sync::Arc;

use hubsync_core::{codec, JsonValue, Model, Query, QuotaGate, ResponseLayout, Result, Transport};

use crate::response;

/// Access to HubSpot tickets mapped onto `E`
pub struct Tickets<E> {
    transport: Arc<dyn Transport>,
    model: Arc<Model<E>>,
    quota: Arc<QuotaGate>,
}

impl<E: Default + 'static> Tickets<E> {
    /// Tickets API for the entity described by `model`
    pub fn new(transport: Arc<dyn Transport>, model: Arc<Model<E>>, quota: Arc<QuotaGate>) -> Self {
        Tickets {
            transport,
            model,
            quota,
        }
    }

    /// Create a ticket and return it as stored
    pub fn create(&self, ticket: &E) -> Result<E> {
        let request = codec::properties_request(&self.model, ticket, "name");
        let response = self.transport.post(
            "crm-objects/v1/objects/tickets",
            &JsonValue::Object(request),
            &[],
        )?;
        Ok(response
            .map(|r| codec::deserialize(&self.model, &r, &ResponseLayout::TICKET))
            .unwrap_or_default())
    }

    /// Ticket `id`; `Error::NotFound` when HubSpot returns nothing
    pub fn get(&self, id: i64) -> Result<E> {
        let found = self
            .transport
            .get(&format!("crm-objects/v1/objects/tickets/{}", id), &[])?;
        let found = response::require(found, || format!("ticket {}", id))?;
        Ok(codec::deserialize(&self.model, &found, &ResponseLayout::TICKET))
    }

    /// Search query on `crm/v3/objects/tickets/search`
    pub fn query(&self) -> Query<E> {
        Query::new(
            "crm/v3/objects/tickets/search",
            Arc::clone(&self.transport),
            Arc::clone(&self.model),
        )
        .with_quota(Arc::clone(&self.quota))
    }
}
