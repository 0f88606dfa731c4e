use std::convert::TryFrom;

use thiserror::Error;
use wealthmap_entities as e;

use super::*;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("invalid coordinates {lat},{lng}")]
    Coordinates { lat: f64, lng: f64 },
    #[error("invalid value {value} in column '{column}'")]
    Number { column: &'static str, value: f64 },
    #[error("invalid email address '{0}'")]
    Email(String),
    #[error("unknown role '{0}'")]
    Role(String),
    #[error("unknown invite status '{0}'")]
    InviteStatus(String),
    #[error("unknown activity type '{0}'")]
    ActivityType(String),
    #[error("invalid URL '{0}'")]
    Url(String),
}

type Result<T> = std::result::Result<T, Error>;

/// Numeric columns are delivered as JSON numbers of arbitrary precision
/// and kept as they are, fractions included.
fn non_negative(column: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(Error::Number { column, value })
    }
}

fn email(s: String) -> Result<e::email::EmailAddress> {
    s.parse().map_err(|_| Error::Email(s))
}

fn role(s: String) -> Result<e::user::Role> {
    s.parse().map_err(|_| Error::Role(s))
}

impl TryFrom<PropertyRow> for e::property::Property {
    type Error = Error;
    fn try_from(from: PropertyRow) -> Result<Self> {
        let PropertyRow {
            id,
            address,
            coordinates: Coordinates { lat, lng },
            size_sqft,
            value_usd,
            owner_name,
            zip_code,
            wealth_estimate_usd,
            wealth_confidence,
            created_at,
        } = from;
        let pos = e::geo::MapPoint::try_from_lat_lng_deg(lat, lng)
            .ok_or(Error::Coordinates { lat, lng })?;
        let size_sqft = size_sqft
            .map(|v| non_negative("size_sqft", v))
            .transpose()?;
        let value_usd = value_usd
            .map(|v| non_negative("value_usd", v))
            .transpose()?;
        // A confidence without an estimate has nothing to qualify.
        let wealth_estimate = wealth_estimate_usd
            .map(|usd| {
                Ok(e::property::WealthEstimate {
                    usd: non_negative("wealth_estimate_usd", usd)?,
                    confidence: wealth_confidence,
                })
            })
            .transpose()?;
        Ok(Self {
            id: id.into(),
            address,
            pos,
            size_sqft,
            value_usd,
            owner_name,
            zip_code,
            wealth_estimate,
            created_at: created_at.into(),
        })
    }
}

impl From<e::property::Property> for PropertyRow {
    fn from(from: e::property::Property) -> Self {
        let e::property::Property {
            id,
            address,
            pos,
            size_sqft,
            value_usd,
            owner_name,
            zip_code,
            wealth_estimate,
            created_at,
        } = from;
        let (lat, lng) = pos.to_lat_lng_deg();
        Self {
            id: id.into(),
            address,
            coordinates: Coordinates { lat, lng },
            size_sqft,
            value_usd,
            owner_name,
            zip_code,
            wealth_estimate_usd: wealth_estimate.map(|w| w.usd),
            wealth_confidence: wealth_estimate.and_then(|w| w.confidence),
            created_at: created_at.into(),
        }
    }
}

impl From<e::bookmark::Bookmark> for BookmarkRow {
    fn from(from: e::bookmark::Bookmark) -> Self {
        let e::bookmark::Bookmark {
            id,
            user_id,
            property_id,
            created_at,
        } = from;
        Self {
            id: id.into(),
            user_id: user_id.into(),
            property_id: property_id.into(),
            created_at: created_at.into(),
        }
    }
}

impl From<BookmarkRow> for e::bookmark::Bookmark {
    fn from(from: BookmarkRow) -> Self {
        let BookmarkRow {
            id,
            user_id,
            property_id,
            created_at,
        } = from;
        Self {
            id: id.into(),
            user_id: user_id.into(),
            property_id: property_id.into(),
            created_at: created_at.into(),
        }
    }
}

impl From<e::user::NotificationPrefs> for NotificationPrefs {
    fn from(from: e::user::NotificationPrefs) -> Self {
        let e::user::NotificationPrefs { sms, email } = from;
        Self { sms, email }
    }
}

impl From<NotificationPrefs> for e::user::NotificationPrefs {
    fn from(from: NotificationPrefs) -> Self {
        let NotificationPrefs { sms, email } = from;
        Self { sms, email }
    }
}

impl From<e::user::User> for UserRow {
    fn from(from: e::user::User) -> Self {
        let e::user::User {
            id,
            email,
            company_id,
            notification_prefs,
            created_at,
        } = from;
        Self {
            id: id.into(),
            email: email.into_string(),
            company_id: company_id.map(Into::into),
            notification_prefs: Some(notification_prefs.into()),
            created_at: created_at.into(),
        }
    }
}

impl TryFrom<UserRow> for e::user::User {
    type Error = Error;
    fn try_from(from: UserRow) -> Result<Self> {
        let UserRow {
            id,
            email: address,
            company_id,
            notification_prefs,
            created_at,
        } = from;
        Ok(Self {
            id: id.into(),
            email: email(address)?,
            company_id: company_id.map(Into::into),
            notification_prefs: notification_prefs.map(Into::into).unwrap_or_default(),
            created_at: created_at.into(),
        })
    }
}

impl From<e::user::Permission> for PermissionRow {
    fn from(from: e::user::Permission) -> Self {
        let e::user::Permission {
            id,
            user_id,
            role,
            updated_at,
        } = from;
        Self {
            id: id.into(),
            user_id: user_id.into(),
            role: role.as_ref().to_owned(),
            updated_at: updated_at.into(),
        }
    }
}

impl TryFrom<PermissionRow> for e::user::Permission {
    type Error = Error;
    fn try_from(from: PermissionRow) -> Result<Self> {
        let PermissionRow {
            id,
            user_id,
            role: role_name,
            updated_at,
        } = from;
        Ok(Self {
            id: id.into(),
            user_id: user_id.into(),
            role: role(role_name)?,
            updated_at: updated_at.into(),
        })
    }
}

impl From<e::company::DataAccess> for DataAccess {
    fn from(from: e::company::DataAccess) -> Self {
        let e::company::DataAccess {
            zillow,
            reportall,
            wealth_engine,
        } = from;
        Self {
            zillow,
            reportall,
            wealth_engine,
        }
    }
}

impl From<DataAccess> for e::company::DataAccess {
    fn from(from: DataAccess) -> Self {
        let DataAccess {
            zillow,
            reportall,
            wealth_engine,
        } = from;
        Self {
            zillow,
            reportall,
            wealth_engine,
        }
    }
}

impl From<e::company::Company> for CompanyRow {
    fn from(from: e::company::Company) -> Self {
        let e::company::Company {
            id,
            name,
            logo_url,
            data_access,
            created_at,
        } = from;
        Self {
            id: id.into(),
            name,
            logo_url: logo_url.map(String::from),
            data_access: Some(data_access.into()),
            created_at: created_at.into(),
        }
    }
}

impl TryFrom<CompanyRow> for e::company::Company {
    type Error = Error;
    fn try_from(from: CompanyRow) -> Result<Self> {
        let CompanyRow {
            id,
            name,
            logo_url,
            data_access,
            created_at,
        } = from;
        // Older rows store an empty string instead of null.
        let logo_url = logo_url
            .filter(|url| !url.trim().is_empty())
            .map(|url| url.parse().map_err(|_| Error::Url(url)))
            .transpose()?;
        Ok(Self {
            id: id.into(),
            name,
            logo_url,
            data_access: data_access.map(Into::into).unwrap_or_default(),
            created_at: created_at.into(),
        })
    }
}

impl From<e::invite::EmployeeInvite> for InviteRow {
    fn from(from: e::invite::EmployeeInvite) -> Self {
        let e::invite::EmployeeInvite {
            id,
            email,
            role,
            company_id,
            invited_by,
            status,
            created_at,
        } = from;
        Self {
            id: id.into(),
            email: email.into_string(),
            role: role.as_ref().to_owned(),
            company_id: company_id.into(),
            invited_by: invited_by.into(),
            status: status.as_ref().to_owned(),
            created_at: created_at.into(),
        }
    }
}

impl TryFrom<InviteRow> for e::invite::EmployeeInvite {
    type Error = Error;
    fn try_from(from: InviteRow) -> Result<Self> {
        let InviteRow {
            id,
            email: address,
            role: role_name,
            company_id,
            invited_by,
            status,
            created_at,
        } = from;
        Ok(Self {
            id: id.into(),
            email: email(address)?,
            role: role(role_name)?,
            company_id: company_id.into(),
            invited_by: invited_by.into(),
            status: status.parse().map_err(|_| Error::InviteStatus(status))?,
            created_at: created_at.into(),
        })
    }
}

impl From<e::activity::Activity> for ActivityRow {
    fn from(from: e::activity::Activity) -> Self {
        let e::activity::Activity {
            id,
            user_id,
            action,
            details,
            at,
        } = from;
        Self {
            id: id.into(),
            user_id: user_id.into(),
            action: action.as_ref().to_owned(),
            details,
            timestamp: at.into(),
        }
    }
}

impl TryFrom<ActivityRow> for e::activity::Activity {
    type Error = Error;
    fn try_from(from: ActivityRow) -> Result<Self> {
        let ActivityRow {
            id,
            user_id,
            action,
            details,
            timestamp,
        } = from;
        Ok(Self {
            id: id.into(),
            user_id: user_id.into(),
            action: action.parse().map_err(|_| Error::ActivityType(action))?,
            details,
            at: timestamp.into(),
        })
    }
}

impl TokenResponse {
    /// Builds a session that expires `expires_in` seconds after `now`.
    pub fn into_session(
        self,
        now: e::time::Timestamp,
        assurance: e::session::Assurance,
    ) -> Result<e::session::Session> {
        let TokenResponse {
            access_token,
            refresh_token,
            expires_in,
            user: AuthUser { id, email: address },
        } = self;
        Ok(e::session::Session {
            access_token,
            refresh_token,
            user_id: id.into(),
            email: email(address.unwrap_or_default())?,
            expires_at: e::time::Timestamp::from_millis(
                now.as_millis().saturating_add(expires_in.saturating_mul(1000)),
            ),
            assurance,
        })
    }
}

impl From<MfaEnrollResponse> for e::session::MfaEnrollment {
    fn from(from: MfaEnrollResponse) -> Self {
        let MfaEnrollResponse {
            id,
            totp: Totp { secret, uri, .. },
        } = from;
        Self {
            factor_id: id.into(),
            totp_uri: uri,
            secret,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn property_row() -> PropertyRow {
        PropertyRow {
            id: "2".into(),
            address: "456 Market St, San Francisco, CA 94105".into(),
            coordinates: Coordinates {
                lat: 37.7895,
                lng: -122.3999,
            },
            size_sqft: Some(1800.0),
            value_usd: Some(1_300_000.0),
            owner_name: Some("Jane Smith Trust".into()),
            zip_code: "94105".into(),
            wealth_estimate_usd: Some(4_200_000.0),
            wealth_confidence: Some(0.75),
            created_at: datetime!(2025-01-15 10:30 UTC),
        }
    }

    #[test]
    fn property_from_row() {
        let p = e::property::Property::try_from(property_row()).unwrap();
        assert_eq!(Some(1800.0), p.size_sqft);
        assert_eq!(Some(1_300_000.0), p.value_usd);
        assert_eq!(
            Some(75),
            p.wealth_estimate.and_then(|w| w.confidence_percent())
        );
        assert_eq!((37.7895, -122.3999), p.pos.to_lat_lng_deg());
        assert_eq!(property_row(), PropertyRow::from(p));
    }

    #[test]
    fn reject_invalid_property_rows() {
        let mut row = property_row();
        row.coordinates.lat = 91.0;
        assert!(matches!(
            e::property::Property::try_from(row),
            Err(Error::Coordinates { .. })
        ));
        let mut row = property_row();
        row.value_usd = Some(-1.0);
        assert_eq!(
            Err(Error::Number {
                column: "value_usd",
                value: -1.0
            }),
            e::property::Property::try_from(row).map(|_| ())
        );
    }

    #[test]
    fn wealth_estimate_without_confidence() {
        let mut row = property_row();
        row.wealth_confidence = None;
        let p = e::property::Property::try_from(row.clone()).unwrap();
        let estimate = p.wealth_estimate.unwrap();
        assert_eq!(4_200_000.0, estimate.usd);
        assert_eq!(None, estimate.confidence);
        assert_eq!(row, PropertyRow::from(p));
    }

    #[test]
    fn confidence_without_estimate_is_dropped() {
        let mut row = property_row();
        row.wealth_estimate_usd = None;
        let p = e::property::Property::try_from(row).unwrap();
        assert!(p.wealth_estimate.is_none());
    }

    #[test]
    fn fractional_numbers_are_kept() {
        let mut row = property_row();
        row.value_usd = Some(999_999.6);
        row.size_sqft = Some(1799.5);
        let p = e::property::Property::try_from(row.clone()).unwrap();
        assert_eq!(Some(999_999.6), p.value_usd);
        assert_eq!(Some(1799.5), p.size_sqft);
        assert_eq!(row, PropertyRow::from(p));
    }

    #[test]
    fn company_with_empty_logo_and_missing_access() {
        let row = CompanyRow {
            id: "acme".into(),
            name: "Acme".into(),
            logo_url: Some(String::new()),
            data_access: None,
            created_at: datetime!(2025-01-15 10:30 UTC),
        };
        let company = e::company::Company::try_from(row).unwrap();
        assert_eq!(None, company.logo_url);
        assert_eq!(e::company::DataAccess::default(), company.data_access);
    }

    #[test]
    fn permission_roles() {
        let row = PermissionRow {
            id: "p".into(),
            user_id: "u".into(),
            role: "admin".into(),
            updated_at: datetime!(2025-01-15 10:30 UTC),
        };
        let permission = e::user::Permission::try_from(row).unwrap();
        assert_eq!(e::user::Role::Admin, permission.role);
        assert_eq!("admin", PermissionRow::from(permission).role);
    }

    #[test]
    fn session_expiry() {
        let token = TokenResponse {
            access_token: "a".into(),
            refresh_token: Some("r".into()),
            expires_in: 3600,
            user: AuthUser {
                id: "u".into(),
                email: Some("u@example.com".into()),
            },
        };
        let now = e::time::Timestamp::from_millis(1_000);
        let session = token
            .into_session(now, e::session::Assurance::SingleFactor)
            .unwrap();
        assert_eq!(3_601_000, session.expires_at.as_millis());
    }
}
