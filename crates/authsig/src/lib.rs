pub mod encoding;
pub mod error;
pub mod keys;
pub mod payload;
pub mod server;
pub mod signing;
pub mod store;

pub use encoding::{CanonicalJsonEncoder, canonicalize, canonicalize_serialize};
pub use error::{AuthSigServerError, Error, Result};
pub use keys::{AuthorizationKey, GeneratedKeyPair, PemEncoding};
pub use payload::{RpcRequestBody, SigningPayload, TransactionRequest};
pub use server::{AppState, ServerConfig, router, run};
pub use signing::{AuthorizationSigner, P256Signer, SignatureFormat, authorize, verify_authorization};
pub use store::{AuthorizationStore, MemoryAuthorizationStore};
