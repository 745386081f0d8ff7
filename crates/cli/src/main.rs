use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use wallet_authsig::keys::{self, PemEncoding};
use wallet_authsig::signing::{der_to_p1363, p1363_to_der};
use wallet_authsig::{
    AuthorizationKey, AuthorizationSigner, CanonicalJsonEncoder, P256Signer, SignatureFormat,
    SigningPayload, authorize,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KeyEncoding {
    Pkcs8,
    Sec1,
}

impl From<KeyEncoding> for PemEncoding {
    fn from(encoding: KeyEncoding) -> Self {
        match encoding {
            KeyEncoding::Pkcs8 => PemEncoding::Pkcs8,
            KeyEncoding::Sec1 => PemEncoding::Sec1,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TargetFormat {
    Der,
    P1363,
}

#[derive(Parser)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a P-256 authorization key pair; the private key is shown once
    Keygen {
        #[clap(long, env = "AUTH_KEY_ENCODING", default_value = "pkcs8")]
        encoding: KeyEncoding,
    },
    /// Rebuild the PEM document behind a `wallet-auth:` token
    ToPem { token: String },
    /// Print the canonical form and SHA-256 digest of a JSON payload
    Canonicalize { payload: PathBuf },
    /// Sign a payload file ({version, method, url, body, headers}) and print the base64 DER signature
    Sign {
        payload: PathBuf,
        /// PEM file holding the private key; alternatively set AUTH_PRIVATE_KEY
        #[clap(long, conflicts_with = "private_key")]
        key_file: Option<PathBuf>,
        /// PEM text or `wallet-auth:` token
        #[clap(long, env = "AUTH_PRIVATE_KEY", hide_env_values = true)]
        private_key: Option<String>,
    },
    /// Convert a hex signature between P1363 and DER
    Convert {
        #[clap(long)]
        to: TargetFormat,
        signature: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Keygen { encoding } => {
            let pair = keys::generate(encoding.into())?;
            println!("{}", serde_json::to_string_pretty(&pair)?);
        }
        Command::ToPem { token } => {
            print!("{}", keys::to_pem(&token)?);
        }
        Command::Canonicalize { payload } => {
            let value = read_json(&payload)?;
            let encoder = CanonicalJsonEncoder;
            let encoded = encoder.encode(&value)?;
            eprintln!("encoder: {}", encoder.name());
            println!("{}", String::from_utf8_lossy(&encoded.data));
            println!("sha256: {}", hex::encode(&encoded.digest));
        }
        Command::Sign { payload, key_file, private_key } => {
            let key_text = match (key_file, private_key) {
                (Some(path), _) => fs::read_to_string(&path)
                    .with_context(|| format!("reading key file {}", path.display()))?,
                (None, Some(text)) => text,
                (None, None) => bail!("pass --key-file or set AUTH_PRIVATE_KEY"),
            };
            let key = AuthorizationKey::parse(&key_text)?;
            let payload: SigningPayload = serde_json::from_value(read_json(&payload)?)
                .context("payload must have version, method, url, body and headers")?;

            let signer = P256Signer::new(&key, SignatureFormat::P1363);
            let signed = authorize(&payload, &signer)?;
            eprintln!("public key: {}", hex::encode(signer.public_key_bytes()));
            println!("{}", signed.encoded);
        }
        Command::Convert { to, signature } => {
            let bytes = hex::decode(signature.trim().trim_start_matches("0x"))
                .context("signature must be hex")?;
            let converted = match to {
                TargetFormat::Der => p1363_to_der(&bytes)?,
                TargetFormat::P1363 => der_to_p1363(&bytes)?.to_vec(),
            };
            println!("{}", hex::encode(converted));
        }
    }

    Ok(())
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {} as JSON", path.display()))
}
