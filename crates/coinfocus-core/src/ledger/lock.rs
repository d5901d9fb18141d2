//! Parent PIN gate for approving earned coins.
//!
//! Only an HMAC-SHA256 of the PIN, keyed with a random salt, is stored.

use hmac::{Hmac, Mac};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::prompt::PinCode;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentLock {
    #[serde(default)]
    salt: Option<String>,
    #[serde(default)]
    digest: Option<String>,
}

impl ParentLock {
    pub fn is_set(&self) -> bool {
        self.digest.is_some()
    }

    /// Replace the PIN with a fresh salt.
    pub fn set_pin(&mut self, pin: &PinCode) {
        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt = hex::encode(salt);
        self.digest =
            Self::mac(&salt, pin.as_str()).map(|m| hex::encode(m.finalize().into_bytes()));
        self.salt = self.digest.as_ref().map(|_| salt);
    }

    /// False when no PIN is set or `input` does not match. The digest
    /// comparison is constant-time.
    pub fn verify(&self, input: &str) -> bool {
        let (Some(salt), Some(digest)) = (&self.salt, &self.digest) else {
            return false;
        };
        let Ok(expected) = hex::decode(digest) else {
            return false;
        };
        Self::mac(salt, input.trim()).is_some_and(|m| m.verify_slice(&expected).is_ok())
    }

    pub fn clear(&mut self) {
        self.salt = None;
        self.digest = None;
    }

    fn mac(salt: &str, pin: &str) -> Option<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(salt.as_bytes()).ok()?;
        mac.update(pin.as_bytes());
        Some(mac)
    }
}
