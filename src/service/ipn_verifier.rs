use hmac::{Hmac, Mac};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

pub const SIGNATURE_HEADER: &str = "HMAC";

/// Authenticates IPN bodies against the shared IPN secret.
///
/// The MAC is computed over the body bytes exactly as received. Parsing and
/// re-serialising first would change the bytes and fail valid notifications.
#[derive(Clone)]
pub struct IpnVerifier {
    secret: String,
}

impl IpnVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Hex HMAC-SHA512 of `raw_body`, lowercase.
    pub fn sign(&self, raw_body: &[u8]) -> String {
        match HmacSha512::new_from_slice(self.secret.as_bytes()) {
            Ok(mut mac) => {
                mac.update(raw_body);
                hex::encode(mac.finalize().into_bytes())
            }
            Err(_) => String::new(),
        }
    }

    /// True only when `provided_signature` is the hex MAC of `raw_body`.
    /// Hex case is ignored; the MAC itself is compared in constant time.
    pub fn verify(&self, raw_body: &[u8], provided_signature: &str) -> bool {
        if self.secret.is_empty() || raw_body.is_empty() {
            return false;
        }
        let Ok(provided) = hex::decode(provided_signature.trim()) else {
            return false;
        };

        let Ok(mut mac) = HmacSha512::new_from_slice(self.secret.as_bytes()) else {
            return false;
        };
        mac.update(raw_body);
        mac.verify_slice(&provided).is_ok()
    }
}
