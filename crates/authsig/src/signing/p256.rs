use p256::ecdsa::{Signature, SigningKey, VerifyingKey, signature::Signer};

use super::signer::{AuthorizationSigner, RawSignature, SignatureFormat};
use crate::error::{Error, Result};
use crate::keys::AuthorizationKey;

/// ECDSA signer on P-256 with a SHA-256 digest.
///
/// Nonces follow RFC 6979 here, but callers must only rely on a signature
/// being valid, never on two signatures being equal. `format` selects what
/// this backend hands out natively, so the rest of the pipeline is exercised
/// against either encoding.
pub struct P256Signer {
    signing_key: SigningKey,
    format: SignatureFormat,
}

impl P256Signer {
    pub fn new(key: &AuthorizationKey, format: SignatureFormat) -> Self {
        Self {
            signing_key: key.signing_key(),
            format,
        }
    }

    /// Created from a seed string: the SHA-256 hash of the seed
    /// becomes the 32-byte private key.
    pub fn from_seed(seed: &str) -> Result<Self> {
        Ok(Self::new(&AuthorizationKey::from_seed(seed)?, SignatureFormat::default()))
    }

    pub fn with_format(mut self, format: SignatureFormat) -> Self {
        self.format = format;
        self
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }
}

impl AuthorizationSigner for P256Signer {
    fn sign(&self, data: &[u8]) -> Result<RawSignature> {
        let signature: Signature = self
            .signing_key
            .try_sign(data)
            .map_err(|e| Error::Signing(format!("p256 sign failed: {e}")))?;

        let bytes = match self.format {
            SignatureFormat::P1363 => signature.to_bytes().to_vec(),
            SignatureFormat::Der => signature.to_der().as_bytes().to_vec(),
        };
        Ok(RawSignature { format: self.format, bytes })
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        self.signing_key
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }

    fn algorithm(&self) -> &str {
        "p256-ecdsa-sha256"
    }
}
