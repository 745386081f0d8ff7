use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use wallet_authsig::{AppState, MemoryAuthorizationStore, ServerConfig, SignatureFormat, run};

#[derive(Debug, Clone, ValueEnum)]
enum SignatureBackend {
    /// Backend emits raw r || s
    P1363,
    /// Backend emits ASN.1 DER
    Der,
}

impl From<SignatureBackend> for SignatureFormat {
    fn from(backend: SignatureBackend) -> Self {
        match backend {
            SignatureBackend::P1363 => SignatureFormat::P1363,
            SignatureBackend::Der => SignatureFormat::Der,
        }
    }
}

#[derive(Parser)]
struct Args {
    #[clap(long, default_value = "127.0.0.1")]
    host: String,
    #[clap(long, default_value = "3000")]
    port: u16,
    #[clap(long, env = "PRIVY_APP_ID")]
    app_id: String,
    #[clap(long, env = "PRIVY_API_BASE_URL", default_value = "https://api.privy.io")]
    api_base_url: String,
    #[clap(long, env = "SIGNATURE_BACKEND", default_value = "p1363")]
    signature_backend: SignatureBackend,
    /// How long a registered authorization key stays usable
    #[clap(long, env = "AUTH_KEY_TTL_SECS", default_value = "900")]
    key_ttl_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let state = AppState {
        store: Arc::new(MemoryAuthorizationStore::new()),
        config: Arc::new(ServerConfig {
            app_id: args.app_id,
            api_base_url: args.api_base_url,
            signature_format: args.signature_backend.into(),
            key_ttl: Duration::from_secs(args.key_ttl_secs),
        }),
    };

    run(&args.host, args.port, state).await
}
