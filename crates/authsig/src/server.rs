use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AuthSigServerError;
use crate::keys::AuthorizationKey;
use crate::payload::{RpcRequestBody, SigningPayload};
use crate::signing::{AuthorizationSigner, P256Signer, SIGNATURE_HEADER, SignatureFormat, authorize};
use crate::store::AuthorizationStore;

type HandlerResult<T> = std::result::Result<T, AuthSigServerError>;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Sent as `privy-app-id` and covered by every signature.
    pub app_id: String,
    pub api_base_url: String,
    /// What the signing backend natively emits.
    pub signature_format: SignatureFormat,
    pub key_ttl: Duration,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AuthorizationStore>,
    pub config: Arc<ServerConfig>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(|| async move { (StatusCode::OK, "Ok").into_response() }))
        .route(
            "/wallets/{wallet_id}/authorization-key",
            post(register_key).delete(revoke_key),
        )
        .route("/wallets/{wallet_id}/authorize", post(authorize_request))
        .with_state(state)
}

pub async fn run(host: &str, port: u16, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("binding {host}:{port}"))?;
    tracing::info!(address = %listener.local_addr()?, "authorization signer listening");

    axum::serve(listener, router(state))
        .await
        .context("serving authorization signer")?;

    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct RegisterKeyRequest {
    /// PEM (PKCS8 or SEC1) or a `wallet-auth:` token.
    pub private_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterKeyResponse {
    pub wallet_id: String,
    /// Hex of the compressed public key.
    pub public_key: String,
    pub public_key_pem: String,
    pub expires_in_secs: u64,
}

/// The request to forward to the wallet API, signature attached.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthorizedRequest {
    pub url: String,
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
    pub signature: String,
}

async fn register_key(
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
    Json(request): Json<RegisterKeyRequest>,
) -> HandlerResult<(StatusCode, Json<RegisterKeyResponse>)> {
    let key = AuthorizationKey::parse(&request.private_key).inspect_err(|error| {
        tracing::warn!(%wallet_id, %error, "rejected authorization key");
    })?;

    let response = RegisterKeyResponse {
        wallet_id: wallet_id.clone(),
        public_key: hex::encode(key.public_key_bytes()),
        public_key_pem: key.public_key_pem()?,
        expires_in_secs: state.config.key_ttl.as_secs(),
    };
    state.store.insert(&wallet_id, key, state.config.key_ttl);
    tracing::info!(%wallet_id, public_key = %response.public_key, "registered authorization key");

    Ok((StatusCode::CREATED, Json(response)))
}

async fn revoke_key(
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
) -> HandlerResult<StatusCode> {
    if !state.store.remove(&wallet_id) {
        return Err(AuthSigServerError::UnknownWallet(wallet_id));
    }
    tracing::info!(%wallet_id, "revoked authorization key");
    Ok(StatusCode::NO_CONTENT)
}

async fn authorize_request(
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
    Json(body): Json<RpcRequestBody>,
) -> HandlerResult<Json<AuthorizedRequest>> {
    let key = state
        .store
        .get(&wallet_id)
        .ok_or_else(|| AuthSigServerError::UnknownWallet(wallet_id.clone()))?;

    let config = &state.config;
    let payload = SigningPayload::rpc(&config.api_base_url, &wallet_id, &config.app_id, &body)?;
    let signer = P256Signer::new(&key, config.signature_format);
    let signature = authorize(&payload, &signer).inspect_err(|error| {
        tracing::warn!(%wallet_id, %error, "failed to authorize request");
    })?;
    tracing::info!(
        %wallet_id,
        method = %body.method,
        caip2 = %body.caip2,
        algorithm = signer.algorithm(),
        "authorized wallet request"
    );

    let mut headers = payload.headers;
    headers.insert(SIGNATURE_HEADER.to_string(), signature.encoded.clone());

    Ok(Json(AuthorizedRequest {
        url: payload.url,
        method: payload.method,
        headers,
        body: payload.body,
        signature: signature.encoded,
    }))
}
