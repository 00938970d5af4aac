use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::category::CertificateCategory;
use crate::fields::Identity;

type HmacSha256 = Hmac<Sha256>;

/// Bytes of the HMAC kept in the tag. 16 bytes keeps the QR symbol small.
const TAG_LEN: usize = 16;

/// Secret used to tag QR payloads so a verifier can detect edited records.
#[derive(Clone)]
pub struct IntegrityKey(Vec<u8>);

impl IntegrityKey {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self(secret.as_ref().to_vec())
    }

    /// Hex tag over the certificate's identity, bound to its ID and category.
    pub fn tag(&self, id: &str, category: CertificateCategory, identity: &Identity) -> String {
        let mac = self.mac_for(id, category, identity);
        hex::encode(&mac.finalize().into_bytes()[..TAG_LEN])
    }

    /// Constant-time check of a hex `tag` produced by [`tag`](Self::tag).
    pub fn check(
        &self,
        id: &str,
        category: CertificateCategory,
        identity: &Identity,
        tag: &str,
    ) -> bool {
        match hex::decode(tag) {
            Ok(given) if given.len() == TAG_LEN => self
                .mac_for(id, category, identity)
                .verify_truncated_left(&given)
                .is_ok(),
            _ => false,
        }
    }

    fn mac_for(&self, id: &str, category: CertificateCategory, identity: &Identity) -> HmacSha256 {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.0)
            .expect("HMAC accepts keys of any length");
        for part in [
            id,
            category.prefix(),
            identity.full_name.as_str(),
            identity.date_of_birth.as_str(),
        ] {
            mac.update(part.as_bytes());
            mac.update(b"\n");
        }
        mac
    }
}

/// Compare two secrets without an early exit. Both sides are hashed first so
/// the running time does not depend on where they differ or on their lengths.
pub fn secrets_match(given: &str, expected: &str) -> bool {
    let given = Sha256::digest(given.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    let mut diff: u8 = 0;
    for (a, b) in given.iter().zip(expected.iter()) {
        diff |= a ^ b;
    }
    diff == 0
}

impl std::fmt::Debug for IntegrityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("IntegrityKey(..)")
    }
}
