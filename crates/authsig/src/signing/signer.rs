use super::der::SignatureComponents;
use crate::error::Result;

/// Encoding a signing backend natively produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureFormat {
    /// Raw `r || s`, 64 bytes.
    #[default]
    P1363,
    /// ASN.1 `SEQUENCE { INTEGER r, INTEGER s }`.
    Der,
}

/// A signature as it came out of a backend, tagged with its encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSignature {
    pub format: SignatureFormat,
    pub bytes: Vec<u8>,
}

impl RawSignature {
    pub fn components(&self) -> Result<SignatureComponents> {
        match self.format {
            SignatureFormat::P1363 => SignatureComponents::from_p1363(&self.bytes),
            SignatureFormat::Der => SignatureComponents::from_der(&self.bytes),
        }
    }

    /// DER output is always re-encoded through the strict parser, whatever
    /// the backend produced.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        Ok(self.components()?.to_der())
    }

    pub fn to_p1363(&self) -> Result<[u8; 64]> {
        Ok(self.components()?.to_p1363())
    }
}

/// Trait for signing canonical payload bytes.
///
/// Implementations are sync: signing is CPU-bound.
/// For async backends (e.g. KMS), use `spawn_blocking`.
pub trait AuthorizationSigner: Send + Sync {
    /// Sign canonical bytes. The digest is computed by the signer.
    fn sign(&self, data: &[u8]) -> Result<RawSignature>;

    /// Compressed public key bytes (33 bytes for P-256).
    fn public_key_bytes(&self) -> Vec<u8>;

    /// Algorithm identifier string (e.g. "p256-ecdsa-sha256").
    fn algorithm(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::signing::der::p1363_to_der;

    #[test]
    fn p1363_and_der_agree() {
        let mut raw = [0x42u8; 64];
        raw[32] = 0x90;
        let p1363 = RawSignature { format: SignatureFormat::P1363, bytes: raw.to_vec() };
        let der = RawSignature { format: SignatureFormat::Der, bytes: p1363_to_der(&raw).unwrap() };

        assert_eq!(p1363.to_der().unwrap(), der.bytes);
        assert_eq!(der.to_p1363().unwrap(), raw);
        assert_eq!(p1363.components().unwrap(), der.components().unwrap());
    }

    #[test]
    fn mislabelled_bytes_are_rejected() {
        let der_as_p1363 = RawSignature {
            format: SignatureFormat::P1363,
            bytes: p1363_to_der(&[0x11; 64]).unwrap(),
        };
        assert!(matches!(der_as_p1363.to_der(), Err(Error::InvalidSignatureLength(_))));

        let p1363_as_der = RawSignature { format: SignatureFormat::Der, bytes: vec![0x11; 64] };
        assert!(matches!(p1363_as_der.to_p1363(), Err(Error::InvalidSignatureLength(_))));
    }
}
