use crate::{email::*, id::*, time::*};

/// Authenticator assurance level of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Assurance {
    /// Password only.
    #[default]
    SingleFactor,
    /// A second factor has been verified.
    MultiFactor,
}

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token  : String,
    pub refresh_token : Option<String>,
    pub user_id       : Id,
    pub email         : EmailAddress,
    pub expires_at    : Timestamp,
    pub assurance     : Assurance,
}

impl Session {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }
}

/// A second factor registered for the current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MfaEnrollment {
    pub factor_id: Id,
    /// `otpauth://` URI to be shown as QR code.
    pub totp_uri: String,
    pub secret: String,
}
