mod authorize;
mod der;
mod p256;
mod signer;

pub use authorize::{AuthorizationSignature, SIGNATURE_HEADER, authorize, verify_authorization};
pub use der::{P1363_LEN, SCALAR_LEN, SignatureComponents, der_to_p1363, p1363_to_der};
pub use self::p256::P256Signer;
pub use signer::{AuthorizationSigner, RawSignature, SignatureFormat};
