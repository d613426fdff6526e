//! HTTP metrics-ingestion sink
//!
//! Posts each sample as a single-datum "put metric data" document.

use super::{async_trait, Ack, EmitError, MetricsSink};
use crate::models::{Dimension, UtilizationSample};
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default namespace metrics are published under
pub const DEFAULT_NAMESPACE: &str = "FinOps/Demo";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Header some ingestion APIs use to return a request id
const REQUEST_ID_HEADER: &str = "x-amzn-requestid";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutMetricDataRequest {
    pub namespace: String,
    pub metric_data: Vec<MetricDatum>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDatum {
    pub metric_name: String,
    pub value: f64,
    pub unit: String,
    /// RFC 3339, UTC
    pub timestamp: String,
    pub dimensions: Vec<WireDimension>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireDimension {
    pub name: String,
    pub value: String,
}

impl From<&Dimension> for WireDimension {
    fn from(d: &Dimension) -> Self {
        Self {
            name: d.name.clone(),
            value: d.value.clone(),
        }
    }
}

impl PutMetricDataRequest {
    pub fn from_sample(namespace: &str, sample: &UtilizationSample) -> Self {
        Self {
            namespace: namespace.to_string(),
            metric_data: vec![MetricDatum {
                metric_name: sample.metric_name.clone(),
                value: f64::from(sample.value),
                unit: sample.unit.clone(),
                timestamp: sample
                    .timestamp
                    .with_timezone(&Utc)
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
                dimensions: sample.dimensions.iter().map(WireDimension::from).collect(),
            }],
        }
    }
}

/// Sink that POSTs samples to a metrics-ingestion endpoint
pub struct HttpMetricsSink {
    client: Client,
    endpoint: Url,
    namespace: String,
}

impl HttpMetricsSink {
    /// Create a new sink for the given endpoint
    pub fn new(endpoint: &str, namespace: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        let endpoint = Url::parse(endpoint).context("Invalid metrics endpoint URL")?;

        Ok(Self {
            client,
            endpoint,
            namespace: namespace.into(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[async_trait]
impl MetricsSink for HttpMetricsSink {
    async fn emit(&self, sample: &UtilizationSample) -> Result<Ack, EmitError> {
        let body = serde_json::to_vec(&PutMetricDataRequest::from_sample(
            &self.namespace,
            sample,
        ))?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| EmitError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmitError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        debug!(
            endpoint = %self.endpoint,
            value = sample.value,
            request_id = ?request_id,
            "Sample accepted by metrics backend"
        );

        Ok(Ack { request_id })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, FixedClock};
    use crate::models::Dimensions;

    fn sample(value: u32) -> UtilizationSample {
        UtilizationSample {
            metric_name: "SimulatedCPULoad".to_string(),
            timestamp: FixedClock::at_hour(10).now(),
            value,
            unit: "Percent".to_string(),
            dimensions: Dimensions::demo_defaults(),
        }
    }

    #[test]
    fn test_request_shape() {
        let request = PutMetricDataRequest::from_sample(DEFAULT_NAMESPACE, &sample(42));
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["Namespace"], "FinOps/Demo");
        let datum = &json["MetricData"][0];
        assert_eq!(datum["MetricName"], "SimulatedCPULoad");
        assert_eq!(datum["Value"], 42.0);
        assert_eq!(datum["Unit"], "Percent");
        assert_eq!(datum["Timestamp"], "2024-03-04T10:30:00Z");
        assert_eq!(datum["Dimensions"][0]["Name"], "InstanceType");
        assert_eq!(datum["Dimensions"][1]["Value"], "FreeTierDemo");
    }

    #[test]
    fn test_rejects_invalid_endpoint() {
        assert!(HttpMetricsSink::new("not a url", DEFAULT_NAMESPACE).is_err());
    }

    #[tokio::test]
    async fn test_emit_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/metrics")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"Namespace":"FinOps/Demo"}"#.to_string(),
            ))
            .with_status(200)
            .with_header("x-amzn-RequestId", "req-123")
            .create_async()
            .await;

        let sink =
            HttpMetricsSink::new(&format!("{}/metrics", server.url()), DEFAULT_NAMESPACE).unwrap();
        let ack = sink.emit(&sample(50)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(ack.request_id.as_deref(), Some("req-123"));
    }

    #[tokio::test]
    async fn test_emit_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(403)
            .with_body("missing credentials")
            .create_async()
            .await;

        let sink = HttpMetricsSink::new(&server.url(), DEFAULT_NAMESPACE).unwrap();
        let err = sink.emit(&sample(50)).await.unwrap_err();

        match err {
            EmitError::Rejected { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "missing credentials");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_emit_transport_error() {
        // Nothing listens on port 9 locally
        let sink = HttpMetricsSink::new("http://127.0.0.1:9/", DEFAULT_NAMESPACE).unwrap();
        let err = sink.emit(&sample(50)).await.unwrap_err();

        assert!(matches!(err, EmitError::Transport(_)));
    }
}
