//! Entry point bundling the transport and the quota gate

use std::sync::Arc;
use std::time::Duration;

use hubsync_core::{Model, QuotaGate, Transport, DEFAULT_QUOTA_INTERVAL};
#[cfg(feature = "http")]
use tracing::info;

use crate::associations::Associations;
use crate::companies::Companies;
use crate::contacts::Contacts;
use crate::deals::Deals;
use crate::tickets::Tickets;

#[cfg(feature = "http")]
use crate::{config::ClientConfig, http::HttpTransport};

/// Access to all HubSpot resource APIs.
///
/// Resource APIs created from one `HubSpot` share its transport and its
/// quota gate, so search calls stay spaced across all of them.
#[derive(Clone)]
pub struct HubSpot {
    transport: Arc<dyn Transport>,
    quota: Arc<QuotaGate>,
}

impl HubSpot {
    /// Client over `transport` with the default quota interval
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_quota_interval(transport, DEFAULT_QUOTA_INTERVAL)
    }

    /// Client over `transport` spacing searches by `interval`
    pub fn with_quota_interval(transport: Arc<dyn Transport>, interval: Duration) -> Self {
        HubSpot {
            transport,
            quota: Arc::new(QuotaGate::new(interval)),
        }
    }

    /// Connect over HTTP using `config`
    #[cfg(feature = "http")]
    pub fn from_config(config: &ClientConfig) -> hubsync_core::Result<Self> {
        let transport = HttpTransport::new(config)?;
        info!(
            target: "hubsync::client",
            address = %transport.address(),
            quota_interval_ms = config.quota_interval_ms,
            "HubSpot client ready"
        );
        Ok(Self::with_quota_interval(
            Arc::new(transport),
            config.quota_interval(),
        ))
    }

    /// Shared transport
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Quota gate shared by all searches of this client
    pub fn quota(&self) -> &Arc<QuotaGate> {
        &self.quota
    }

    /// Contacts API mapping through `model`
    pub fn contacts<E: Default + 'static>(&self, model: Arc<Model<E>>) -> Contacts<E> {
        Contacts::new(Arc::clone(&self.transport), model, Arc::clone(&self.quota))
    }

    /// Companies API mapping through `model`
    pub fn companies<E: Default + 'static>(&self, model: Arc<Model<E>>) -> Companies<E> {
        Companies::new(Arc::clone(&self.transport), model, Arc::clone(&self.quota))
    }

    /// Deals API mapping through `model`
    pub fn deals<E: Default + 'static>(&self, model: Arc<Model<E>>) -> Deals<E> {
        Deals::new(Arc::clone(&self.transport), model, Arc::clone(&self.quota))
    }

    /// Tickets API mapping through `model`
    pub fn tickets<E: Default + 'static>(&self, model: Arc<Model<E>>) -> Tickets<E> {
        Tickets::new(Arc::clone(&self.transport), model, Arc::clone(&self.quota))
    }

    /// Associations API
    pub fn associations(&self) -> Associations {
        Associations::new(Arc::clone(&self.transport))
    }
}
