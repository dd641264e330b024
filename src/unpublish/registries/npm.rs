//! npm registry API implementation

use reqwest::header::{RETRY_AFTER, WWW_AUTHENTICATE};
use reqwest::{RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

use crate::unpublish::error::RegistryError;
use crate::unpublish::packument::Packument;
use crate::unpublish::registry::RegistryClient;
use crate::unpublish::spec::escape_name;

/// Default base URL for npm registry
pub const DEFAULT_BASE_URL: &str = "https://registry.npmjs.org";

/// Header carrying the one-time password
const OTP_HEADER: &str = "npm-otp";

/// Registry implementation for npm registry API
#[derive(Clone)]
pub struct NpmRegistry {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl NpmRegistry {
    /// Creates a new NpmRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("npm-unpublish/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Authenticate every request with a bearer token
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn revision_url(&self, path: &str, rev: &str) -> String {
        format!("{}/-rev/{}", self.url(path), rev)
    }

    fn authorize(&self, request: RequestBuilder, otp: Option<String>) -> RequestBuilder {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        match otp {
            Some(otp) => request.header(OTP_HEADER, otp),
            None => request,
        }
    }

    /// Map a non-success response onto a [`RegistryError`]
    async fn check(response: Response, subject: &str) -> Result<Response, RegistryError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::NOT_FOUND => Err(RegistryError::NotFound(subject.to_string())),
            StatusCode::CONFLICT => Err(RegistryError::Conflict(subject.to_string())),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after_secs = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok());
                Err(RegistryError::RateLimited { retry_after_secs })
            }
            StatusCode::UNAUTHORIZED => {
                let wants_otp_header = response
                    .headers()
                    .get(WWW_AUTHENTICATE)
                    .and_then(|v| v.to_str().ok())
                    .is_some_and(|v| v.to_ascii_lowercase().contains("otp"));
                let body = response.text().await.unwrap_or_default();

                if wants_otp_header || body.to_ascii_lowercase().contains("one-time pass") {
                    debug!("registry requested a one-time password for {}", subject);
                    Err(RegistryError::OtpRequired)
                } else {
                    warn!("npm registry returned status {}: {}", status, subject);
                    Err(RegistryError::InvalidResponse(format!(
                        "Unexpected status: {} {}",
                        status, body
                    )))
                }
            }
            _ => {
                warn!("npm registry returned status {}: {}", status, subject);
                Err(RegistryError::InvalidResponse(format!(
                    "Unexpected status: {}",
                    status
                )))
            }
        }
    }
}

impl Default for NpmRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl RegistryClient for NpmRegistry {
    async fn fetch_packument(&self, package_name: &str) -> Result<Packument, RegistryError> {
        let url = format!("{}?write=true", self.url(&escape_name(package_name)));
        debug!("GET {}", url);

        let response = self.authorize(self.client.get(&url), None).send().await?;
        let response = Self::check(response, package_name).await?;

        response.json().await.map_err(|e| {
            warn!("Failed to parse npm registry response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })
    }

    async fn delete_package(
        &self,
        package_name: &str,
        rev: &str,
        otp: Option<String>,
    ) -> Result<(), RegistryError> {
        let url = self.revision_url(&escape_name(package_name), rev);
        debug!("DELETE {}", url);

        let response = self.authorize(self.client.delete(&url), otp).send().await?;
        Self::check(response, package_name).await?;
        Ok(())
    }

    async fn put_packument(
        &self,
        package_name: &str,
        rev: &str,
        packument: &Packument,
        otp: Option<String>,
    ) -> Result<(), RegistryError> {
        let url = self.revision_url(&escape_name(package_name), rev);
        debug!("PUT {}", url);

        let response = self
            .authorize(self.client.put(&url), otp)
            .json(packument)
            .send()
            .await?;
        Self::check(response, package_name).await?;
        Ok(())
    }

    async fn delete_tarball(
        &self,
        tarball_path: &str,
        rev: &str,
        otp: Option<String>,
    ) -> Result<(), RegistryError> {
        let url = self.revision_url(tarball_path, rev);
        debug!("DELETE {}", url);

        let response = self.authorize(self.client.delete(&url), otp).send().await?;
        Self::check(response, tarball_path).await?;
        Ok(())
    }
}
