//! Document retrieval over HTTP or from the local filesystem.

use std::future::Future;
use std::pin::Pin;

use reqwest::header::{CACHE_CONTROL, HeaderValue};
use tracing::{debug, info};
use tramline_transit::{
    DayType, DocumentSource, ScheduleDocument, StationNormalizer, TransitError,
    models::Result as TransitResult,
};

use crate::error::LoadFailure;

/// Fetches documents with `reqwest`, bypassing intermediate caches
#[derive(Clone, Debug, Default)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl DocumentSource for HttpSource {
    fn fetch<'a>(
        &'a self,
        location: &'a str,
    ) -> Pin<Box<dyn Future<Output = TransitResult<Vec<u8>>> + Send + 'a>> {
        Box::pin(async move {
            let response = self
                .client
                .get(location)
                .header(CACHE_CONTROL, HeaderValue::from_static("no-store"))
                .send()
                .await
                .map_err(|e| TransitError::FetchFailed(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(TransitError::FetchFailed(format!("{status} {location}")));
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| TransitError::FetchFailed(e.to_string()))?;
            Ok(body.to_vec())
        })
    }
}

/// Reads documents from disk
#[derive(Clone, Copy, Debug, Default)]
pub struct FileSource;

impl DocumentSource for FileSource {
    fn fetch<'a>(
        &'a self,
        location: &'a str,
    ) -> Pin<Box<dyn Future<Output = TransitResult<Vec<u8>>> + Send + 'a>> {
        Box::pin(async move {
            tokio::fs::read(location)
                .await
                .map_err(|e| TransitError::FetchFailed(format!("{e}: {location}")))
        })
    }
}

/// Picks HTTP for `http://` and `https://` locations, the filesystem otherwise
#[derive(Clone, Debug, Default)]
pub struct AnySource {
    http: HttpSource,
    file: FileSource,
}

impl DocumentSource for AnySource {
    fn fetch<'a>(
        &'a self,
        location: &'a str,
    ) -> Pin<Box<dyn Future<Output = TransitResult<Vec<u8>>> + Send + 'a>> {
        if location.starts_with("http://") || location.starts_with("https://") {
            self.http.fetch(location)
        } else {
            self.file.fetch(location)
        }
    }
}

/// Fetch, decode and normalize one day type's document.
///
/// Nothing is retried; the first failure is returned to the caller.
pub async fn load_document(
    source: &dyn DocumentSource,
    location: &str,
    day_type: DayType,
    normalizer: &StationNormalizer,
) -> Result<ScheduleDocument, LoadFailure> {
    debug!(%day_type, location, "fetching schedule document");

    let bytes = source
        .fetch(location)
        .await
        .map_err(|e| LoadFailure::new(day_type, location, &e))?;

    let document = ScheduleDocument::from_json(&bytes, day_type, normalizer)
        .map_err(|e| LoadFailure::new(day_type, location, &e))?;

    info!(
        %day_type,
        location,
        trips = document.trips().len(),
        excluded = document.excluded().len(),
        "schedule document decoded"
    );
    Ok(document)
}
