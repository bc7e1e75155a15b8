use async_trait::async_trait;

/// Network reachability probe.
///
/// An unreachable network is not an error; it selects the offline queue.
#[async_trait]
pub trait ReachabilityProbe: Send + Sync + 'static {
    async fn is_connected(&self) -> bool;
}
