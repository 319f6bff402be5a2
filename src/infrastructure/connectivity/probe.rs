use crate::application::ports::ReachabilityProbe;
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::time::Duration;

/// Treats any HTTP response from `url` as reachable.
pub struct HttpReachabilityProbe {
    url: String,
    http: reqwest::Client,
}

impl HttpReachabilityProbe {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::ConfigurationError(err.to_string()))?;
        Ok(Self {
            url: url.trim().to_string(),
            http,
        })
    }
}

#[async_trait]
impl ReachabilityProbe for HttpReachabilityProbe {
    async fn is_reachable(&self) -> bool {
        match self.http.head(&self.url).send().await {
            Ok(response) => {
                tracing::trace!(
                    target: "sync::connectivity",
                    status = %response.status(),
                    "reachability probe answered"
                );
                true
            }
            Err(err) => {
                tracing::debug!(
                    target: "sync::connectivity",
                    error = %err,
                    "reachability probe failed"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::HEAD;
    use httpmock::MockServer;

    #[tokio::test]
    async fn any_status_counts_as_reachable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(HEAD).path("/api");
                then.status(404);
            })
            .await;

        let probe = HttpReachabilityProbe::new(&server.url("/api"), Duration::from_secs(2)).unwrap();
        assert!(probe.is_reachable().await);
    }

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        let probe =
            HttpReachabilityProbe::new("http://127.0.0.1:9/api", Duration::from_secs(2)).unwrap();
        assert!(!probe.is_reachable().await);
    }
}
