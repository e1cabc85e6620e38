use crate::domain::model::ApplyResponse;
use crate::domain::ports::RemoteTaxApplier;
use crate::utils::error::{Result, Rg5329Error};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub const CALL_KW_PATH: &str = "/web/dataset/call_kw";
pub const DEFAULT_MODEL: &str = "sale.order";
pub const DEFAULT_METHOD: &str = "apply_rg5329_via_js";

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<ApplyResponse>,
    #[serde(default)]
    error: Option<RpcFault>,
}

#[derive(Debug, Deserialize)]
struct RpcFault {
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<RpcFaultData>,
}

#[derive(Debug, Deserialize)]
struct RpcFaultData {
    #[serde(default)]
    message: Option<String>,
}

/// Calls the order model's apply method through the ERP's JSON-RPC endpoint.
pub struct JsonRpcApplier {
    client: Client,
    url: String,
    model: String,
    method: String,
    session_id: Option<String>,
}

impl JsonRpcApplier {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: format!("{}{}", endpoint.trim_end_matches('/'), CALL_KW_PATH),
            model: DEFAULT_MODEL.to_string(),
            method: DEFAULT_METHOD.to_string(),
            session_id: None,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_session(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl RemoteTaxApplier for JsonRpcApplier {
    async fn apply(&self, order_id: u64) -> Result<ApplyResponse> {
        let body = json!({
            "jsonrpc": "2.0",
            "method": "call",
            "params": {
                "model": self.model,
                "method": self.method,
                "args": [order_id],
                "kwargs": {}
            }
        });

        tracing::debug!("POST {} {}.{}({})", self.url, self.model, self.method, order_id);

        let mut request = self
            .client
            .post(&self.url)
            .header("X-Requested-With", "XMLHttpRequest")
            .json(&body);
        if let Some(session) = &self.session_id {
            request = request.header("Cookie", format!("session_id={}", session));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Rg5329Error::RpcError {
                message: format!("HTTP {}", status),
            });
        }

        let envelope: RpcEnvelope = response.json().await?;
        if let Some(fault) = envelope.error {
            let detail = fault.data.and_then(|d| d.message).unwrap_or_default();
            let message = if detail.is_empty() {
                fault.message
            } else {
                format!("{}: {}", fault.message, detail)
            };
            return Err(Rg5329Error::RpcError { message });
        }

        envelope.result.ok_or_else(|| Rg5329Error::RpcError {
            message: "response has neither result nor error".to_string(),
        })
    }
}
