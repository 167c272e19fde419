use super::{AuthInterceptor, ClientConfig, Session};
use crate::{
    error::{Error, Result},
    laterality::Laterality,
    reading::{Reading, ReadingMetadata},
    sample::Sample,
    source::ReadingSource,
};
use log::{debug, info, warn};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

const READING_PATH: &str = "reading";
const PATIENT_PATH: &str = "patient";
const READING_DATA_PATH: &str = "reading-data";
const EXPORT_METADATA_PATH: &str = "export-metadata";

/// HTTP client for the readings catalog, sample and export-metadata endpoints.
///
/// Endpoints, relative to `ClientConfig::base_url`:
/// - `GET reading` - all readings
/// - `GET reading/{id}` - one reading
/// - `GET reading/patient/{patient_num}` - readings of a patient
/// - `GET reading-data/{reading_id}/{laterality}` - sample rows
/// - `GET export-metadata/{reading_id}/{patient_num}` - export metadata
#[derive(Debug, Clone)]
pub struct LimbRescueClient {
    http: Client,
    config: ClientConfig,
    interceptor: AuthInterceptor,
}

impl LimbRescueClient {
    pub fn new(config: ClientConfig, session: Option<Session>) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::fetch_failed("http client", e))?;
        match &session {
            Some(s) => info!("Sending authenticated requests as {}", s.username),
            None => debug!("No session; requests are sent without credentials"),
        }
        let interceptor = AuthInterceptor::new(config.allow_origin.clone(), session);
        Ok(Self {
            http,
            config,
            interceptor,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build an endpoint URL, percent-encoding each path segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let base = &self.config.base_url;
        let mut url = Url::parse(base).map_err(|e| Error::fetch_failed(base.as_str(), e))?;
        url.path_segments_mut()
            .map_err(|_| Error::fetch_failed(base.as_str(), "base url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET a JSON document with retry and exponential backoff.
    ///
    /// Returns `Ok(None)` on 404, which is not retried.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>> {
        let max_tries = self.config.max_tries.max(1);
        let mut sleep_millis: u64 = 1000;
        let mut last_failure = String::new();
        debug!(
            "GET {} ({})",
            url,
            if self.interceptor.is_session_active() {
                "authenticated"
            } else {
                "anonymous"
            }
        );

        for attempt in 1..=max_tries {
            let request = self.interceptor.intercept(self.http.get(url.clone()));
            match request.send().await {
                Ok(response) if response.status() == StatusCode::NOT_FOUND => {
                    debug!("{} answered 404", url);
                    return Ok(None);
                }
                Ok(response) if !response.status().is_success() => {
                    last_failure = format!("status {}", response.status());
                    warn!(
                        "Attempt {}/{}: Bad response status for {}: {}",
                        attempt,
                        max_tries,
                        url,
                        response.status()
                    );
                }
                Ok(response) => match response.text().await {
                    Ok(body) => return Ok(Some(serde_json::from_str(&body)?)),
                    Err(e) => {
                        last_failure = e.to_string();
                        warn!(
                            "Attempt {}/{}: Failed to read response body for {}: {}",
                            attempt, max_tries, url, e
                        );
                    }
                },
                Err(e) => {
                    last_failure = e.to_string();
                    warn!(
                        "Attempt {}/{}: Request failed for {}: {}",
                        attempt, max_tries, url, e
                    );
                }
            }

            if attempt < max_tries {
                info!(
                    "Sleeping for {} milliseconds before retry for {}",
                    sleep_millis, url
                );
                tokio::time::sleep(Duration::from_millis(sleep_millis)).await;
                sleep_millis *= 2;
            }
        }

        Err(Error::fetch_failed(url.as_str(), last_failure))
    }

    async fn get_required<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let target = url.to_string();
        self.get_json(url)
            .await?
            .ok_or_else(|| Error::fetch_failed(target, "status 404 Not Found"))
    }
}

impl ReadingSource for LimbRescueClient {
    async fn list_readings(&self) -> Result<Vec<Reading>> {
        self.get_required(self.endpoint(&[READING_PATH])?).await
    }

    async fn get_reading(&self, id: i64) -> Result<Reading> {
        let url = self.endpoint(&[READING_PATH, &id.to_string()])?;
        self.get_json(url).await?.ok_or(Error::ReadingNotFound(id))
    }

    async fn readings_of_patient(&self, patient_num: &str) -> Result<Vec<Reading>> {
        let url = self.endpoint(&[READING_PATH, PATIENT_PATH, patient_num])?;
        self.get_required(url).await
    }

    async fn get_samples(&self, reading_id: i64, laterality: Laterality) -> Result<Vec<Sample>> {
        let url = self.endpoint(&[
            READING_DATA_PATH,
            &reading_id.to_string(),
            laterality.as_str(),
        ])?;
        let samples: Vec<Sample> = self.get_required(url).await?;
        debug!(
            "Fetched {} sample rows for reading {} ({})",
            samples.len(),
            reading_id,
            laterality
        );
        Ok(samples)
    }

    async fn get_metadata(
        &self,
        reading_id: i64,
        patient_num: &str,
    ) -> Result<Vec<ReadingMetadata>> {
        let url = self.endpoint(&[EXPORT_METADATA_PATH, &reading_id.to_string(), patient_num])?;
        self.get_required(url).await
    }
}
