use super::prelude::*;
use crate::gateways::identity::IdentityGateway;

pub fn enroll_second_factor<I>(identity: &I) -> Result<MfaEnrollment>
where
    I: IdentityGateway + ?Sized,
{
    Ok(identity.enroll_second_factor()?)
}

/// Challenges an enrolled factor and verifies the one-time code.
pub fn verify_second_factor<I>(identity: &I, factor_id: &str, code: &str) -> Result<Session>
where
    I: IdentityGateway + ?Sized,
{
    let code = code.trim();
    if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::SecondFactor);
    }
    let challenge_id = identity.challenge_second_factor(factor_id)?;
    let session = identity.verify_second_factor(factor_id, challenge_id.as_str(), code)?;
    log::info!("Second factor verified for user {}", session.user_id);
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::{super::tests::*, *};

    fn signed_in() -> MockIdentity {
        let identity = MockIdentity::with_account("a@example.com", "secret1", "a");
        identity
            .sign_in(&"a@example.com".parse().unwrap(), "secret1")
            .unwrap();
        identity
    }

    #[test]
    fn enroll_and_verify() {
        let identity = signed_in();
        let enrollment = enroll_second_factor(&identity).unwrap();
        assert!(enrollment.totp_uri.starts_with("otpauth://"));
        let session =
            verify_second_factor(&identity, enrollment.factor_id.as_str(), VALID_OTP).unwrap();
        assert_eq!(Assurance::MultiFactor, session.assurance);
    }

    #[test]
    fn reject_malformed_and_wrong_codes() {
        let identity = signed_in();
        let enrollment = enroll_second_factor(&identity).unwrap();
        let factor_id = enrollment.factor_id.as_str();
        for code in ["12345", "abcdef", "654321"] {
            assert!(matches!(
                verify_second_factor(&identity, factor_id, code),
                Err(Error::SecondFactor)
            ));
        }
        assert_eq!(
            Assurance::SingleFactor,
            identity.current_session().unwrap().assurance
        );
    }

    #[test]
    fn enrollment_requires_session() {
        assert!(matches!(
            enroll_second_factor(&MockIdentity::default()),
            Err(Error::NotSignedIn)
        ));
    }
}
