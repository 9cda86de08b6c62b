//! Signing identities resolved from Stellar secret seeds.
//!
//! A seed is the StrKey `S...` encoding of a 32-byte ed25519 secret. Decoding
//! (base32, version byte, CRC16 checksum) is delegated to `stellar-strkey`.

use std::fmt;

use ed25519_dalek::{Signer, SigningKey};

use crate::error::{IssueError, IssueResult};
use crate::ledger::types::AccountId;

/// A key able to sign for one account.
///
/// `Debug` shows the address only; the secret never leaves this type.
#[derive(Clone)]
pub struct SigningIdentity {
    signing_key: SigningKey,
    account: AccountId,
}

impl SigningIdentity {
    /// Build an identity from a raw 32-byte ed25519 secret.
    pub fn from_secret_bytes(secret: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&secret);
        let account = AccountId::from_bytes(signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            account,
        }
    }

    /// Public account of this identity.
    pub fn account_id(&self) -> AccountId {
        self.account
    }

    /// StrKey `G...` address.
    pub fn address(&self) -> String {
        self.account.address()
    }

    /// Sign arbitrary bytes.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Re-encode the secret as an `S...` seed.
    pub fn secret_seed(&self) -> String {
        stellar_strkey::ed25519::PrivateKey(self.signing_key.to_bytes()).to_string()
    }
}

impl fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

/// Resolve a secret seed into a signing identity.
///
/// `role` names the seed in the error (e.g. "issuer"); the seed text itself is
/// never echoed back.
pub fn resolve_seed(seed: &str, role: &str) -> IssueResult<SigningIdentity> {
    let secret = stellar_strkey::ed25519::PrivateKey::from_string(seed.trim())
        .map_err(|_| IssueError::InvalidSeedFormat(role.to_string()))?;
    Ok(SigningIdentity::from_secret_bytes(secret.0))
}

/// Resolve every receiver seed, in order. The first malformed seed rejects
/// the whole list.
pub fn resolve_receivers<S: AsRef<str>>(seeds: &[S]) -> IssueResult<Vec<SigningIdentity>> {
    seeds
        .iter()
        .enumerate()
        .map(|(i, seed)| resolve_seed(seed.as_ref(), &format!("receiver #{}", i + 1)))
        .collect()
}

/// Split a comma-separated receiver list, dropping empty entries.
pub fn split_receiver_list(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
