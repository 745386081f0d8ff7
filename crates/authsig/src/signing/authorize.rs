use base64::{Engine as _, engine::general_purpose::STANDARD};
use p256::ecdsa::{Signature, VerifyingKey, signature::Verifier};

use super::signer::{AuthorizationSigner, RawSignature, SignatureFormat};
use crate::encoding::canonicalize_serialize;
use crate::error::{Error, Result};
use crate::payload::SigningPayload;

/// Header carrying the base64 DER signature on the outgoing request.
pub const SIGNATURE_HEADER: &str = "privy-authorization-signature";

#[derive(Debug, Clone)]
pub struct AuthorizationSignature {
    /// The exact bytes that were signed.
    pub canonical: Vec<u8>,
    pub der: Vec<u8>,
    /// Base64 of `der`, the value sent to the verifier.
    pub encoded: String,
}

/// Canonicalizes the payload, signs it, and normalizes the result to DER.
///
/// Fails before producing anything if any stage fails; a present but invalid
/// signature is never returned.
pub fn authorize(payload: &SigningPayload, signer: &dyn AuthorizationSigner) -> Result<AuthorizationSignature> {
    let canonical = canonicalize_serialize(payload)?;
    let der = signer.sign(&canonical)?.to_der()?;
    let encoded = STANDARD.encode(&der);
    Ok(AuthorizationSignature { canonical, der, encoded })
}

/// Verifier side: re-canonicalizes the payload and checks a base64 DER
/// signature against it.
///
/// A signature that cannot be decoded is an error; a well-formed signature
/// that does not match yields `Ok(false)`.
pub fn verify_authorization(key: &VerifyingKey, payload: &SigningPayload, encoded: &str) -> Result<bool> {
    let der = STANDARD
        .decode(encoded.trim())
        .map_err(|e| Error::InvalidSignatureLength(format!("signature is not valid base64: {e}")))?;
    let raw = RawSignature { format: SignatureFormat::Der, bytes: der };
    let signature = Signature::from_slice(&raw.to_p1363()?)
        .map_err(|e| Error::InvalidSignatureLength(format!("signature scalars out of range: {e}")))?;

    let canonical = canonicalize_serialize(payload)?;
    Ok(key.verify(&canonical, &signature).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{RpcRequestBody, TransactionRequest};
    use crate::signing::{P256Signer, SignatureFormat};

    fn payload(value: &str) -> SigningPayload {
        let body = RpcRequestBody::send_transaction(
            "eip155:84532",
            TransactionRequest {
                to: "0xabc".to_string(),
                data: Some("0x".to_string()),
                value: Some(value.to_string()),
            },
        );
        SigningPayload::rpc("https://api.example.com", "w1", "app123", &body).unwrap()
    }

    #[test]
    fn signature_verifies_against_payload() {
        let signer = P256Signer::from_seed("authorize").unwrap();
        let signed = authorize(&payload("1000"), &signer).unwrap();
        assert_eq!(STANDARD.decode(&signed.encoded).unwrap(), signed.der);
        assert!(verify_authorization(signer.verifying_key(), &payload("1000"), &signed.encoded).unwrap());
    }

    #[test]
    fn changed_payload_fails_verification() {
        let signer = P256Signer::from_seed("authorize").unwrap();
        let signed = authorize(&payload("1000"), &signer).unwrap();
        assert!(!verify_authorization(signer.verifying_key(), &payload("1001"), &signed.encoded).unwrap());
    }

    #[test]
    fn other_key_fails_verification() {
        let signer = P256Signer::from_seed("authorize").unwrap();
        let other = P256Signer::from_seed("someone-else").unwrap();
        let signed = authorize(&payload("1000"), &signer).unwrap();
        assert!(!verify_authorization(other.verifying_key(), &payload("1000"), &signed.encoded).unwrap());
    }

    #[test]
    fn der_backend_produces_verifiable_output() {
        let signer = P256Signer::from_seed("der-backend").unwrap().with_format(SignatureFormat::Der);
        let signed = authorize(&payload("7"), &signer).unwrap();
        assert!(verify_authorization(signer.verifying_key(), &payload("7"), &signed.encoded).unwrap());
    }

    #[test]
    fn malformed_signatures_are_errors() {
        let signer = P256Signer::from_seed("authorize").unwrap();
        let key = signer.verifying_key();
        assert!(matches!(
            verify_authorization(key, &payload("1"), "%%%"),
            Err(Error::InvalidSignatureLength(_))
        ));
        let p1363 = STANDARD.encode([0x11u8; 64]);
        assert!(matches!(
            verify_authorization(key, &payload("1"), &p1363),
            Err(Error::InvalidSignatureLength(_))
        ));
    }
}
