//! Bridge daemon HTTP client.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use session_core::ConnectOptions;
use tracing::{debug, info};

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::types::OpenedSession;

/// JSON-RPC 2.0 request structure.
#[derive(Debug, Serialize)]
struct RpcRequest<'a, T: Serialize> {
    jsonrpc: &'static str,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<T>,
    id: u64,
}

/// JSON-RPC 2.0 response structure.
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[serde(default)]
    result: Option<Value>,
    error: Option<RpcError>,
    #[allow(dead_code)]
    id: u64,
}

/// JSON-RPC 2.0 error.
#[derive(Debug, Deserialize)]
struct RpcError {
    code: i32,
    message: String,
}

/// Client for communicating with the bridge daemon.
#[derive(Clone)]
pub struct BridgeClient {
    http: Client,
    config: BridgeConfig,
    request_id: Arc<AtomicU64>,
    healthy: Arc<AtomicBool>,
}

impl BridgeClient {
    /// Build a client without contacting the bridge.
    ///
    /// Fails with [`BridgeError::Config`] unless the base URL is an
    /// `http` or `https` URL.
    pub fn new(config: BridgeConfig) -> Result<Self, BridgeError> {
        let url = reqwest::Url::parse(&config.base_url).map_err(|e| {
            BridgeError::Config(format!("invalid bridge URL {:?}: {}", config.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(BridgeError::Config(format!(
                "bridge URL must use http or https: {:?}",
                config.base_url
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(BridgeError::Http)?;

        Ok(Self {
            http,
            config,
            request_id: Arc::new(AtomicU64::new(1)),
            healthy: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Build a client and verify the bridge is reachable.
    pub async fn connect(config: BridgeConfig) -> Result<Self, BridgeError> {
        let client = Self::new(config)?;
        client.ensure_healthy().await?;
        info!("Connected to bridge at {}", client.config.base_url);
        Ok(client)
    }

    /// Whether the last health check passed.
    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    /// Perform a health check against the bridge.
    pub async fn health_check(&self) -> Result<bool, BridgeError> {
        let url = self.config.check_url();
        debug!("Health check: {}", url);

        match self.http.get(&url).send().await {
            Ok(resp) => {
                let ok = resp.status().is_success();
                self.healthy.store(ok, Ordering::SeqCst);
                Ok(ok)
            }
            Err(e) => {
                self.healthy.store(false, Ordering::SeqCst);
                Err(BridgeError::Http(e))
            }
        }
    }

    /// Health check that fails unless the bridge answers OK.
    pub async fn ensure_healthy(&self) -> Result<(), BridgeError> {
        if self.health_check().await? {
            Ok(())
        } else {
            Err(BridgeError::HealthCheckFailed)
        }
    }

    /// Ask the bridge to open a game session.
    pub async fn open_session(&self, options: &ConnectOptions) -> Result<OpenedSession, BridgeError> {
        self.rpc_call("connect", Some(options)).await
    }

    /// Get the configuration.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Make a JSON-RPC call to the bridge.
    ///
    /// A missing or `null` result deserializes as JSON `null`, so unit and
    /// `Option` return types work for calls that return nothing.
    pub async fn rpc_call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<P>,
    ) -> Result<R, BridgeError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let url = self.config.rpc_url();

        let request = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };

        debug!("RPC call: {} (id={})", method, id);

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(BridgeError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BridgeError::Connection(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let rpc_response: RpcResponse = response.json().await.map_err(BridgeError::Http)?;
        decode_response(method, rpc_response)
    }
}

fn decode_response<R: DeserializeOwned>(
    method: &str,
    response: RpcResponse,
) -> Result<R, BridgeError> {
    if let Some(error) = response.error {
        return Err(BridgeError::Rpc {
            method: method.to_string(),
            code: error.code,
            message: error.message,
        });
    }
    Ok(serde_json::from_value(response.result.unwrap_or(Value::Null))?)
}

impl std::fmt::Debug for BridgeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeClient")
            .field("config", &self.config)
            .field("healthy", &self.is_healthy())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use session_core::{Block, BlockPos};

    fn response(json: &str) -> RpcResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_new_accepts_http_urls() {
        assert!(BridgeClient::new(BridgeConfig::new("http://localhost:3000")).is_ok());
        assert!(BridgeClient::new(BridgeConfig::new("https://bridge.example.net/")).is_ok());
    }

    #[test]
    fn test_new_rejects_bad_urls() {
        for url in ["localhost:3000", "ftp://localhost:3000", "not a url", ""] {
            match BridgeClient::new(BridgeConfig::new(url)) {
                Err(BridgeError::Config(_)) => {}
                other => panic!("Expected Config error for {:?}, got {:?}", url, other),
            }
        }
    }

    #[test]
    fn test_null_result_as_unit() {
        let resp = response(r#"{"jsonrpc": "2.0", "result": null, "id": 1}"#);
        let () = decode_response("chat", resp).unwrap();
    }

    #[test]
    fn test_missing_result_as_none() {
        let resp = response(r#"{"jsonrpc": "2.0", "id": 2}"#);
        let block: Option<Block> = decode_response("blockAt", resp).unwrap();
        assert!(block.is_none());
    }

    #[test]
    fn test_result_payload() {
        let resp = response(
            r#"{"jsonrpc": "2.0", "result": {"name": "lever", "position": {"x": 1, "y": 2, "z": 3}}, "id": 3}"#,
        );
        let block: Option<Block> = decode_response("blockAt", resp).unwrap();
        assert_eq!(block.unwrap().name, "lever");
    }

    #[test]
    fn test_decode_block_area() {
        let resp = response(
            r#"{"jsonrpc": "2.0", "result": [
                {"name": "air", "position": {"x": 0, "y": 64, "z": 0}},
                {"name": "lever", "position": {"x": 0, "y": 64, "z": 1}}
            ], "id": 4}"#,
        );
        let blocks: Option<Vec<Block>> = decode_response("blocksIn", resp).unwrap();
        let blocks = blocks.unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].position, BlockPos::new(0, 64, 1));

        let empty = response(r#"{"jsonrpc": "2.0", "id": 5}"#);
        let blocks: Option<Vec<Block>> = decode_response("blocksIn", empty).unwrap();
        assert!(blocks.is_none());
    }

    #[test]
    fn test_error_response() {
        let resp = response(
            r#"{"jsonrpc": "2.0", "error": {"code": -32601, "message": "no such method"}, "id": 4}"#,
        );
        let err = decode_response::<()>("fly", resp).unwrap_err();
        match err {
            BridgeError::Rpc { method, code, .. } => {
                assert_eq!(method, "fly");
                assert_eq!(code, -32601);
            }
            other => panic!("Expected Rpc error, got {:?}", other),
        }
    }
}
