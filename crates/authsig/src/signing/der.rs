use crate::error::{Error, Result};

const SEQUENCE_TAG: u8 = 0x30;
const INTEGER_TAG: u8 = 0x02;

/// Width of a P-256 scalar.
pub const SCALAR_LEN: usize = 32;
/// Width of an IEEE P1363 (`r || s`) P-256 signature.
pub const P1363_LEN: usize = 2 * SCALAR_LEN;

/// The `(r, s)` pair of an ECDSA P-256 signature, big-endian and
/// left-padded to 32 bytes each.
///
/// DER lengths are always emitted in short form: a P-256 INTEGER is at most
/// 33 bytes and the SEQUENCE at most 70, well under 128.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureComponents {
    pub r: [u8; SCALAR_LEN],
    pub s: [u8; SCALAR_LEN],
}

impl SignatureComponents {
    pub fn from_p1363(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != P1363_LEN {
            return Err(Error::InvalidSignatureLength(format!(
                "P1363 signature must be {P1363_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let mut r = [0u8; SCALAR_LEN];
        let mut s = [0u8; SCALAR_LEN];
        r.copy_from_slice(&bytes[..SCALAR_LEN]);
        s.copy_from_slice(&bytes[SCALAR_LEN..]);
        Ok(Self { r, s })
    }

    pub fn to_p1363(&self) -> [u8; P1363_LEN] {
        let mut out = [0u8; P1363_LEN];
        out[..SCALAR_LEN].copy_from_slice(&self.r);
        out[SCALAR_LEN..].copy_from_slice(&self.s);
        out
    }

    /// `SEQUENCE { INTEGER r, INTEGER s }`
    pub fn to_der(&self) -> Vec<u8> {
        let r = der_integer(&self.r);
        let s = der_integer(&self.s);
        let body_len = 2 + r.len() + 2 + s.len();
        debug_assert!(r.len() <= SCALAR_LEN + 1 && s.len() <= SCALAR_LEN + 1);
        debug_assert!(body_len < 0x80, "DER length must fit the short form");

        let mut der = Vec::with_capacity(2 + body_len);
        der.push(SEQUENCE_TAG);
        der.push(body_len as u8);
        der.push(INTEGER_TAG);
        der.push(r.len() as u8);
        der.extend_from_slice(&r);
        der.push(INTEGER_TAG);
        der.push(s.len() as u8);
        der.extend_from_slice(&s);
        der
    }

    /// Strict parse: anything but a minimally encoded two-INTEGER SEQUENCE
    /// with short-form lengths is rejected.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let [tag, len, body @ ..] = der else {
            return Err(malformed("truncated SEQUENCE header"));
        };
        if *tag != SEQUENCE_TAG {
            return Err(malformed(format!("expected SEQUENCE tag 0x30, got {tag:#04x}")));
        }
        if *len & 0x80 != 0 {
            return Err(malformed("long-form SEQUENCE length"));
        }
        if *len as usize != body.len() {
            return Err(malformed(format!(
                "SEQUENCE length {len} does not match {} content bytes",
                body.len()
            )));
        }

        let (r, rest) = read_integer(body, "r")?;
        let (s, rest) = read_integer(rest, "s")?;
        if !rest.is_empty() {
            return Err(malformed(format!("{} trailing bytes after s", rest.len())));
        }
        Ok(Self { r, s })
    }
}

/// Converts a raw `r || s` signature into DER.
pub fn p1363_to_der(signature: &[u8]) -> Result<Vec<u8>> {
    Ok(SignatureComponents::from_p1363(signature)?.to_der())
}

/// Converts a DER signature into raw `r || s`.
pub fn der_to_p1363(signature: &[u8]) -> Result<[u8; P1363_LEN]> {
    Ok(SignatureComponents::from_der(signature)?.to_p1363())
}

/// Minimal non-negative big-endian encoding of an unsigned scalar.
fn der_integer(scalar: &[u8; SCALAR_LEN]) -> Vec<u8> {
    let first = scalar
        .iter()
        .position(|&byte| byte != 0)
        .unwrap_or(SCALAR_LEN - 1);
    let magnitude = &scalar[first..];

    let mut out = Vec::with_capacity(magnitude.len() + 1);
    // DER INTEGERs are two's complement; keep the value positive.
    if magnitude[0] & 0x80 != 0 {
        out.push(0x00);
    }
    out.extend_from_slice(magnitude);
    out
}

fn read_integer<'a>(input: &'a [u8], name: &str) -> Result<([u8; SCALAR_LEN], &'a [u8])> {
    let [tag, len, rest @ ..] = input else {
        return Err(malformed(format!("truncated INTEGER {name}")));
    };
    if *tag != INTEGER_TAG {
        return Err(malformed(format!("expected INTEGER tag for {name}, got {tag:#04x}")));
    }
    if *len & 0x80 != 0 {
        return Err(malformed(format!("long-form length for {name}")));
    }
    let len = *len as usize;
    if len == 0 {
        return Err(malformed(format!("empty INTEGER {name}")));
    }
    if rest.len() < len {
        return Err(malformed(format!("INTEGER {name} runs past the end of the SEQUENCE")));
    }

    let (value, rest) = rest.split_at(len);
    if value[0] & 0x80 != 0 {
        return Err(malformed(format!("negative INTEGER {name}")));
    }
    let magnitude = if value.len() > 1 && value[0] == 0x00 {
        if value[1] & 0x80 == 0 {
            return Err(malformed(format!("non-minimal INTEGER {name}")));
        }
        &value[1..]
    } else {
        value
    };
    if magnitude.len() > SCALAR_LEN {
        return Err(malformed(format!(
            "INTEGER {name} is {} bytes, wider than a P-256 scalar",
            magnitude.len()
        )));
    }

    let mut scalar = [0u8; SCALAR_LEN];
    scalar[SCALAR_LEN - magnitude.len()..].copy_from_slice(magnitude);
    Ok((scalar, rest))
}

fn malformed(reason: impl Into<String>) -> Error {
    Error::InvalidSignatureLength(format!("malformed DER signature: {}", reason.into()))
}
