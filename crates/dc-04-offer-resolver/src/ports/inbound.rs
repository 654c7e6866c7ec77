//! # Inbound Ports

use crate::domain::{Dataset, OfferRequest, ResolveError};
use async_trait::async_trait;

/// Catalog API used by request handlers.
#[async_trait]
pub trait OfferResolverApi: Send + Sync {
    /// Datasets in the request's global window, flattened across every
    /// definition visible to the agent.
    async fn query_datasets(&self, request: &OfferRequest) -> Result<Vec<Dataset>, ResolveError>;
}
