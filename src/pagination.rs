use std::collections::HashSet;
use std::future::Future;

use tracing::warn;

use crate::error::ProviderError;

/// One page of a provider listing and the token for the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_token: Option<String>) -> Self {
        Page {
            items,
            next_token: next_token.filter(|token| !token.is_empty()),
        }
    }
}

/// Drains every page of a listing.
///
/// A failure on the first page is returned as an error. A failure on a later
/// page ends the listing with the items gathered so far. A token the
/// provider has already handed out ends the listing too.
pub async fn paginate<T, F, Fut>(operation: &'static str, mut fetch: F) -> Result<Vec<T>, ProviderError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, ProviderError>>,
{
    let mut items = Vec::new();
    let mut token: Option<String> = None;
    let mut seen_tokens: HashSet<String> = HashSet::new();
    let mut pages = 0usize;
    loop {
        match fetch(token.take()).await {
            Ok(page) => {
                pages += 1;
                items.extend(page.items);
                match page.next_token {
                    Some(next) if !seen_tokens.insert(next.clone()) => {
                        warn!(operation, pages, token = %next, "provider repeated a page token, stopping");
                        return Ok(items);
                    }
                    Some(next) => token = Some(next),
                    None => return Ok(items),
                }
            }
            Err(error) if pages == 0 => return Err(error),
            Err(error) => {
                warn!(
                    operation,
                    pages,
                    collected = items.len(),
                    error = %error,
                    "page fetch failed, keeping the pages already collected"
                );
                return Ok(items);
            }
        }
    }
}

/// Like [`paginate`], but a failure on the first page yields an empty listing.
pub async fn paginate_or_empty<T, F, Fut>(operation: &'static str, fetch: F) -> Vec<T>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, ProviderError>>,
{
    match paginate(operation, fetch).await {
        Ok(items) => items,
        Err(error) => {
            warn!(operation, error = %error, "listing failed");
            Vec::new()
        }
    }
}
