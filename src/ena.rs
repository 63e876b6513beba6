use std::fs::File;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::domain::Accession;
use crate::error::FetchError;

/// One outbound GET per accession, body written to `destination`.
pub trait EnaClient: Send + Sync {
    fn download_sequence(
        &self,
        accession: &Accession,
        destination: &Path,
    ) -> Result<(), FetchError>;
}

/// Client for the EBI ENA browser API. Sequences are served as FASTA at
/// `/{accession}.{version}?download=true`; accessions without a version
/// suffix are pinned to `.1`, already-versioned ones are requested as given.
#[derive(Clone)]
pub struct EnaHttpClient {
    client: Client,
    base_url: String,
}

impl EnaHttpClient {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url("https://www.ebi.ac.uk/ena/browser/api/fasta".to_string())
    }

    pub fn with_base_url(base_url: String) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("ena-fetch/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| FetchError::EnaHttp(err.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|err| FetchError::EnaHttp(err.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn sequence_url(&self, accession: &Accession) -> String {
        if accession.has_version_suffix() {
            format!("{}/{}", self.base_url, accession)
        } else {
            format!("{}/{}.1", self.base_url, accession)
        }
    }
}

impl EnaClient for EnaHttpClient {
    fn download_sequence(
        &self,
        accession: &Accession,
        destination: &Path,
    ) -> Result<(), FetchError> {
        let url = self.sequence_url(accession);
        let mut response = self
            .client
            .get(&url)
            .query(&[("download", "true")])
            .send()
            .map_err(|err| FetchError::EnaHttp(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "ENA request failed".to_string());
            return Err(FetchError::EnaStatus { status, message });
        }

        let mut file =
            File::create(destination).map_err(|err| FetchError::Filesystem(err.to_string()))?;
        std::io::copy(&mut response, &mut file)
            .map_err(|err| FetchError::Filesystem(err.to_string()))?;
        Ok(())
    }
}
