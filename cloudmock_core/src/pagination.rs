use crate::error::{BackendError, Result};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// Maximum number of items returned by a single listing call.
pub const PAGE_SIZE: usize = 500;

/// One page of a listing result, plus the token to fetch the next page
/// if more items remain.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

/// Continuation-token store shared by listing operations.
///
/// Tokens are random UUIDs and single use: presenting a token removes it,
/// so replaying a token fails even if the remainder was never exhausted.
pub struct Paginator<T> {
    remainders: HashMap<String, Vec<T>>,
}

impl<T> Paginator<T> {
    pub fn new() -> Self {
        Self {
            remainders: HashMap::new(),
        }
    }

    /// Slices off the first page of `items`. When more than `PAGE_SIZE`
    /// items remain, the rest is parked under a fresh token.
    pub fn paginate(&mut self, mut items: Vec<T>) -> Page<T> {
        if items.len() > PAGE_SIZE {
            let rest = items.split_off(PAGE_SIZE);
            let token = Uuid::new_v4().to_string();
            debug!(token = %token, remaining = rest.len(), "parked listing remainder");
            self.remainders.insert(token.clone(), rest);
            Page {
                items,
                next_token: Some(token),
            }
        } else {
            Page {
                items,
                next_token: None,
            }
        }
    }

    /// Continues a listing from a previously issued token. The token is
    /// invalidated before the remainder is sliced again.
    pub fn resume(&mut self, token: &str) -> Result<Page<T>> {
        let rest = self
            .remainders
            .remove(token)
            .ok_or(BackendError::InvalidToken)?;
        Ok(self.paginate(rest))
    }

    pub fn pending_tokens(&self) -> usize {
        self.remainders.len()
    }
}

impl<T> Default for Paginator<T> {
    fn default() -> Self {
        Self::new()
    }
}
