use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

pub const PAYLOAD_VERSION: u32 = 1;
pub const APP_ID_HEADER: &str = "privy-app-id";

/// The request an authorization signature commits to.
///
/// Built fresh for every signing request and never mutated afterwards. The
/// verifier reconstructs the same structure from the request it receives,
/// canonicalizes it, and checks the signature against those bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigningPayload {
    pub version: u32,
    pub method: String,
    pub url: String,
    pub body: Value,
    pub headers: BTreeMap<String, String>,
}

impl SigningPayload {
    pub fn new<B: Serialize>(method: impl Into<String>, url: impl Into<String>, body: &B) -> Result<Self> {
        let body = serde_json::to_value(body).map_err(|e| Error::Encoding(e.to_string()))?;
        Ok(Self {
            version: PAYLOAD_VERSION,
            method: method.into(),
            url: url.into(),
            body,
            headers: BTreeMap::new(),
        })
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Payload for `POST {api_base}/v1/wallets/{wallet_id}/rpc`.
    pub fn rpc(api_base: &str, wallet_id: &str, app_id: &str, body: &RpcRequestBody) -> Result<Self> {
        Ok(Self::new("POST", rpc_url(api_base, wallet_id), body)?.with_header(APP_ID_HEADER, app_id))
    }
}

pub fn rpc_url(api_base: &str, wallet_id: &str) -> String {
    format!("{}/v1/wallets/{wallet_id}/rpc", api_base.trim_end_matches('/'))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequestBody {
    pub method: String,
    pub caip2: String,
    pub chain_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sponsor: Option<bool>,
    pub params: RpcParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcParams {
    pub transaction: TransactionRequest,
}

/// Transaction fields as the wallet API takes them.
///
/// `value` is a decimal or hex string: wei amounts routinely exceed the range
/// a JSON number can carry exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl RpcRequestBody {
    pub fn send_transaction(caip2: impl Into<String>, transaction: TransactionRequest) -> Self {
        Self {
            method: "eth_sendTransaction".to_string(),
            caip2: caip2.into(),
            chain_type: "ethereum".to_string(),
            sponsor: None,
            params: RpcParams { transaction },
        }
    }

    pub fn sponsored(mut self, sponsor: bool) -> Self {
        self.sponsor = Some(sponsor);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::canonicalize_serialize;

    fn transaction() -> TransactionRequest {
        TransactionRequest {
            to: "0xabc".to_string(),
            data: Some("0x".to_string()),
            value: Some("0".to_string()),
        }
    }

    #[test]
    fn rpc_payload_shape() {
        let body = RpcRequestBody::send_transaction("eip155:84532", transaction()).sponsored(true);
        let payload = SigningPayload::rpc("https://api.example.com/", "w1", "app123", &body).unwrap();

        assert_eq!(payload.version, 1);
        assert_eq!(payload.method, "POST");
        assert_eq!(payload.url, "https://api.example.com/v1/wallets/w1/rpc");
        assert_eq!(payload.headers.get(APP_ID_HEADER).map(String::as_str), Some("app123"));
        assert_eq!(payload.body["params"]["transaction"]["to"], "0xabc");
        assert_eq!(payload.body["sponsor"], true);
    }

    #[test]
    fn absent_fields_are_omitted() {
        let body = RpcRequestBody::send_transaction(
            "eip155:1",
            TransactionRequest { to: "0xabc".to_string(), data: None, value: None },
        );
        let bytes = canonicalize_serialize(&body).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"caip2":"eip155:1","chain_type":"ethereum","method":"eth_sendTransaction","params":{"transaction":{"to":"0xabc"}}}"#
        );
    }

    #[test]
    fn body_deserializes_from_wire_json() {
        let body: RpcRequestBody = serde_json::from_str(
            r#"{"method":"eth_sendTransaction","caip2":"eip155:84532","chain_type":"ethereum",
                "params":{"transaction":{"to":"0xabc","value":"10"}}}"#,
        )
        .unwrap();
        assert_eq!(body.sponsor, None);
        assert_eq!(body.params.transaction.value.as_deref(), Some("10"));
        assert_eq!(body.params.transaction.data, None);
    }
}
