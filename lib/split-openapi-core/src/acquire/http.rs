use std::error::Error as _;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, warn};
use url::Url;

use super::{RawSpec, SpecSource};
use crate::SplitError;
use crate::config::SpecFormat;

/// Default HTTP request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetches the specification with a single HTTP GET.
///
/// TLS certificates are validated unless [`with_verify_tls(false)`](Self::with_verify_tls)
/// is called. Disabling validation accepts any certificate and is logged as a warning
/// every time a request is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSource {
    url: Url,
    verify_tls: bool,
    timeout: Duration,
}

impl HttpSource {
    /// A source fetching `url`, validating certificates, with the default timeout.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            verify_tls: true,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Enables or disables TLS certificate validation.
    #[must_use]
    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn client(&self) -> Result<reqwest::Client, SplitError> {
        let mut builder = reqwest::Client::builder().timeout(self.timeout);
        if !self.verify_tls {
            warn!(url = %self.url, "TLS certificate verification is disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }
        builder.build().map_err(|err| self.network_error(&err))
    }

    fn network_error(&self, error: &reqwest::Error) -> SplitError {
        let reason = if error.is_timeout() {
            format!("request timed out after {:?}", self.timeout)
        } else {
            error_chain(error)
        };
        SplitError::Network {
            url: self.url.to_string(),
            status: error.status().map(|status| status.as_u16()),
            reason,
        }
    }
}

impl SpecSource for HttpSource {
    async fn acquire(&self) -> Result<RawSpec, SplitError> {
        info!(url = %self.url, "downloading specification");
        let client = self.client()?;

        let response = client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|err| self.network_error(&err))?;

        let status = response.status();
        debug!(%status, "...receiving");
        if !status.is_success() {
            return Err(SplitError::Network {
                url: self.url.to_string(),
                status: Some(status.as_u16()),
                reason: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_owned(),
            });
        }

        let format_hint = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(SpecFormat::from_content_type);

        let content = response
            .text()
            .await
            .map_err(|err| self.network_error(&err))?;

        Ok(RawSpec::new(content).with_format_hint(format_hint))
    }
}

// reqwest's own message rarely names the root cause
fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_validate_certificates_by_default() {
        let url = Url::parse("https://localhost:5001/swagger/v1/swagger.json").expect("valid url");
        let source = HttpSource::new(url);

        assert!(source.verify_tls);
        assert_eq!(source.timeout, Duration::from_secs(30));
    }

    #[test]
    fn should_build_insecure_client() {
        let url = Url::parse("https://localhost:5001/swagger/v1/swagger.json").expect("valid url");
        let source = HttpSource::new(url).with_verify_tls(false);

        assert!(source.client().is_ok());
    }
}
