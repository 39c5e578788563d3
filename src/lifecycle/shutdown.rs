//! Shutdown coordination for the service.

use tokio_util::sync::CancellationToken;

/// Coordinator for graceful shutdown.
///
/// Clones share one cancellation token. Long-running tasks and outbound
/// proxy calls hold a child of it and stop once it fires.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    token: CancellationToken,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Token cancelled when shutdown is triggered.
    pub fn token(&self) -> CancellationToken {
        self.token.child_token()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        self.token.cancel();
    }

    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait until shutdown is triggered.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_clones_and_tokens() {
        let shutdown = Shutdown::new();
        let clone = shutdown.clone();
        let token = shutdown.token();

        assert!(!clone.is_triggered());
        shutdown.trigger();

        tokio::time::timeout(Duration::from_secs(1), clone.cancelled())
            .await
            .unwrap();
        assert!(token.is_cancelled());
    }
}
