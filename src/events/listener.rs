use async_trait::async_trait;

use super::PortalEvent;

/// Trait for handling portal events asynchronously.
///
/// Implement this to hook audit sinks, alerting, or metrics into the
/// authentication flow.
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    /// Called for every dispatched event. Filter by matching on the
    /// event variant to handle specific events.
    async fn handle(&self, event: &PortalEvent);
}
