//! Pluggable document retrieval.
//!
//! The engine never fetches anything itself; callers hand it a source that
//! knows how to turn a location (URL, path, key) into bytes.

use std::future::Future;
use std::pin::Pin;

use crate::models::types::Result;

/// Fetch a raw schedule document
pub trait DocumentSource: Send + Sync {
    fn fetch<'a>(
        &'a self,
        location: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>>;
}
