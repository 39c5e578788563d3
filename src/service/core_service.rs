//! Core string operations.

use async_trait::async_trait;

use crate::service::{ServiceError, StringService};

/// The undecorated service. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCore;

impl StringCore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StringService for StringCore {
    async fn uppercase(&self, s: &str) -> Result<String, ServiceError> {
        Ok(s.to_uppercase())
    }

    async fn count(&self, s: &str) -> usize {
        s.len()
    }
}
