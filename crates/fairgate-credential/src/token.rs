// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential token serialization.
//!
//! A token is `base64url(JSON claims)`, optionally followed by
//! `.base64url(HMAC-SHA256(payload))` when a signing key is configured.
//! The token is self-contained: a scanner recovers the claims from the
//! token alone, with no lookup against this system.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use fairgate_core::FairgateError;

type HmacSha256 = Hmac<Sha256>;

/// The fields bound into a credential token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialClaims {
    pub email: String,
    pub booth: String,
    pub bazaar: String,
    pub issued_at: DateTime<Utc>,
}

/// Serializes claims into a token string, signing when a key is provided.
pub fn seal(claims: &CredentialClaims, signing_key: Option<&[u8]>) -> Result<String, FairgateError> {
    let json = serde_json::to_vec(claims).map_err(|e| FairgateError::Encoding {
        message: format!("failed to serialize credential claims: {e}"),
        source: Some(Box::new(e)),
    })?;
    let payload = URL_SAFE_NO_PAD.encode(json);

    match signing_key {
        Some(key) => {
            let tag = sign(payload.as_bytes(), key)?;
            Ok(format!("{payload}.{tag}"))
        }
        None => Ok(payload),
    }
}

/// Parses a token back into claims, verifying the signature when a key is
/// provided. A keyed parse of an unsigned token fails: the scanner was told
/// to expect issuer-verified credentials.
pub fn open(token: &str, signing_key: Option<&[u8]>) -> Result<CredentialClaims, FairgateError> {
    let (payload, tag) = match token.split_once('.') {
        Some((p, t)) => (p, Some(t)),
        None => (token, None),
    };

    if let Some(key) = signing_key {
        let Some(tag) = tag else {
            return Err(FairgateError::Encoding {
                message: "credential token is unsigned but a signing key is configured".into(),
                source: None,
            });
        };
        verify(payload.as_bytes(), tag, key)?;
    }

    let json = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| FairgateError::Encoding {
            message: format!("credential token is not valid base64url: {e}"),
            source: Some(Box::new(e)),
        })?;

    serde_json::from_slice(&json).map_err(|e| FairgateError::Encoding {
        message: format!("credential token payload is not valid claims JSON: {e}"),
        source: Some(Box::new(e)),
    })
}

fn sign(payload: &[u8], key: &[u8]) -> Result<String, FairgateError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| FairgateError::Encoding {
        message: format!("invalid signing key: {e}"),
        source: None,
    })?;
    mac.update(payload);
    Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
}

fn verify(payload: &[u8], tag: &str, key: &[u8]) -> Result<(), FairgateError> {
    let tag_bytes = URL_SAFE_NO_PAD
        .decode(tag)
        .map_err(|e| FairgateError::Encoding {
            message: format!("credential signature is not valid base64url: {e}"),
            source: Some(Box::new(e)),
        })?;
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| FairgateError::Encoding {
        message: format!("invalid signing key: {e}"),
        source: None,
    })?;
    mac.update(payload);
    mac.verify_slice(&tag_bytes)
        .map_err(|_| FairgateError::Encoding {
            message: "credential signature verification failed".into(),
            source: None,
        })
}
