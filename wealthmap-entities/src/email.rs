use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};
use thiserror::Error;

/// The login name of an account.
///
/// Only the bare mailbox is kept, a display name in the input is dropped.
/// Comparison ignores ASCII case like the identity backend does.
#[derive(Debug, Clone)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub const fn new_unchecked(address: String) -> Self {
        Self(address)
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part after the last `@`.
    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(_, domain)| domain)
    }

    pub fn normalized(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl PartialEq for EmailAddress {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for EmailAddress {}

impl Hash for EmailAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
    }
}

impl Ord for EmailAddress {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.0.bytes().map(|b| b.to_ascii_lowercase());
        let rhs = other.0.bytes().map(|b| b.to_ascii_lowercase());
        lhs.cmp(rhs)
    }
}

impl PartialOrd for EmailAddress {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EmailAddressParseError {
    #[error("Invalid e-mail address")]
    Malformed,
    #[error("Expected exactly one e-mail address")]
    NotSingle,
    #[error("The e-mail address lacks a local part or a domain")]
    Incomplete,
}

impl FromStr for EmailAddress {
    type Err = EmailAddressParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let list = mailparse::addrparse(s.trim()).map_err(|_| EmailAddressParseError::Malformed)?;
        let addr = list
            .extract_single_info()
            .ok_or(EmailAddressParseError::NotSingle)?
            .addr;
        match addr.rsplit_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(Self(addr)),
            _ => Err(EmailAddressParseError::Incomplete),
        }
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_is_dropped() {
        let email: EmailAddress = r#""Jane Admin" <jane@acme.test>"#.parse().unwrap();
        assert_eq!("jane@acme.test", email.as_str());
        assert_eq!("jane@acme.test", email.to_string());
        assert_eq!("acme.test", email.domain());
    }

    #[test]
    fn compare_ignoring_case() {
        let a: EmailAddress = "Jane@Acme.test".parse().unwrap();
        let b: EmailAddress = " jane@acme.TEST ".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(std::cmp::Ordering::Equal, a.cmp(&b));
        assert_eq!("Jane@Acme.test", a.as_str());
        assert_eq!("jane@acme.test", a.normalized());
        let set: std::collections::HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(1, set.len());
    }

    #[test]
    fn reject_garbage() {
        assert!("not an address".parse::<EmailAddress>().is_err());
        assert!("".parse::<EmailAddress>().is_err());
        assert_eq!(
            Err(EmailAddressParseError::NotSingle),
            "a@acme.test, b@acme.test".parse::<EmailAddress>()
        );
    }
}
