// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Self-contained check-in credentials for the Fairgate dispatcher.
//!
//! A credential binds an attendee to an event/booth context as a single
//! opaque token, rendered as a scannable QR code embedded inline as image
//! data. Verifiers recover the bound fields from the token alone; when a
//! signing key is configured the token additionally carries an HMAC-SHA256
//! signature so a scanner can check issuer authenticity, not just parse.

pub mod qr;
pub mod token;

use chrono::Utc;
use tracing::debug;

use fairgate_core::FairgateError;

pub use token::CredentialClaims;

/// A minted credential: the opaque token and its visual encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Self-contained token embedding `{email, booth, bazaar, issued_at}`.
    pub token: String,
    /// `data:image/svg+xml;base64,...` URI for inline embedding.
    pub qr_data_uri: String,
}

/// Mints credentials. Pure aside from wall-clock time.
#[derive(Debug, Clone, Default)]
pub struct CredentialEncoder {
    signing_key: Option<Vec<u8>>,
}

impl CredentialEncoder {
    /// Creates an encoder producing unsigned tokens.
    pub fn new() -> Self {
        Self { signing_key: None }
    }

    /// Creates an encoder that signs tokens with the given key.
    pub fn with_signing_key(key: impl Into<Vec<u8>>) -> Self {
        Self {
            signing_key: Some(key.into()),
        }
    }

    /// Mints a credential binding the attendee to the event context.
    ///
    /// The caller validates its inputs; this only rejects what serialization
    /// or QR rendering itself cannot represent.
    pub fn encode(
        &self,
        email: &str,
        booth: &str,
        bazaar: &str,
    ) -> Result<Credential, FairgateError> {
        let claims = CredentialClaims {
            email: email.to_string(),
            booth: booth.to_string(),
            bazaar: bazaar.to_string(),
            issued_at: Utc::now(),
        };

        let token = token::seal(&claims, self.signing_key.as_deref())?;
        let qr_data_uri = qr::render_data_uri(&token)?;
        debug!(email, booth, signed = self.signing_key.is_some(), "credential minted");

        Ok(Credential { token, qr_data_uri })
    }

    /// Parses a token back into its claims, verifying the signature when
    /// this encoder holds a key.
    pub fn decode(&self, token: &str) -> Result<CredentialClaims, FairgateError> {
        token::open(token, self.signing_key.as_deref())
    }
}
