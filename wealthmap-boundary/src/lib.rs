//! Rows of the backend tables and payloads of the hosted auth service,
//! exactly as they travel over the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[cfg(feature = "entity-conversions")]
mod conv;

#[cfg(feature = "entity-conversions")]
pub use conv::Error as ConversionError;

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, Copy, PartialEq))]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct PropertyRow {
    pub id                  : String,
    pub address             : String,
    pub coordinates         : Coordinates,
    pub size_sqft           : Option<f64>,
    pub value_usd           : Option<f64>,
    pub owner_name          : Option<String>,
    pub zip_code            : String,
    pub wealth_estimate_usd : Option<f64>,
    pub wealth_confidence   : Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at          : OffsetDateTime,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct BookmarkRow {
    pub id          : String,
    pub user_id     : String,
    pub property_id : String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at  : OffsetDateTime,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, Copy, PartialEq))]
pub struct NotificationPrefs {
    pub sms: bool,
    pub email: bool,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct UserRow {
    pub id                 : String,
    pub email              : String,
    pub company_id         : Option<String>,
    pub notification_prefs : Option<NotificationPrefs>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at         : OffsetDateTime,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct PermissionRow {
    pub id         : String,
    pub user_id    : String,
    pub role       : String,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at : OffsetDateTime,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, Copy, PartialEq))]
pub struct DataAccess {
    pub zillow: bool,
    pub reportall: bool,
    #[serde(rename = "wealthEngine", alias = "wealth_engine")]
    pub wealth_engine: bool,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct CompanyRow {
    pub id          : String,
    pub name        : String,
    pub logo_url    : Option<String>,
    pub data_access : Option<DataAccess>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at  : OffsetDateTime,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct InviteRow {
    pub id         : String,
    pub email      : String,
    pub role       : String,
    pub company_id : String,
    pub invited_by : String,
    pub status     : String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at : OffsetDateTime,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct ActivityRow {
    pub id        : String,
    pub user_id   : String,
    pub action    : String,
    #[serde(default)]
    pub details   : BTreeMap<String, String>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp : OffsetDateTime,
}

/// Error body of the REST and auth endpoints.
///
/// Both services use different field names for the same thing.
#[derive(Serialize, Deserialize, Default)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl ErrorBody {
    pub fn text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.msg.as_deref())
            .or(self.error_description.as_deref())
            .or(self.error.as_deref())
    }
}

/// PostgREST sends string codes, the auth service numeric ones.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
#[serde(untagged)]
pub enum ErrorCode {
    Text(String),
    Number(u16),
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone))]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct TokenResponse {
    pub access_token  : String,
    pub refresh_token : Option<String>,
    /// Seconds
    pub expires_in    : i64,
    pub user          : AuthUser,
}

/// Depending on the confirmation settings of the auth service a sign up
/// either returns a complete session or only the created user.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
#[serde(untagged)]
pub enum SignUpResponse {
    Session(TokenResponse),
    User(AuthUser),
}

impl SignUpResponse {
    pub fn user_id(&self) -> &str {
        match self {
            Self::Session(token) => &token.user.id,
            Self::User(user) => &user.id,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone))]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone))]
pub struct MfaEnrollRequest {
    pub factor_type: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct Totp {
    pub qr_code: Option<String>,
    pub secret: String,
    pub uri: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct MfaEnrollResponse {
    pub id: String,
    pub totp: Totp,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct MfaChallengeResponse {
    pub id: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone))]
pub struct MfaVerifyRequest {
    pub challenge_id: String,
    pub code: String,
}
