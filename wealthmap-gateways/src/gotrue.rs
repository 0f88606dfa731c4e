use reqwest::Method;
use wealthmap_boundary as json;
use wealthmap_core::{
    entities::*,
    gateways::identity::{self, IdentityGateway},
};

use crate::{backend::BackendClient, error::Error};

const TOKEN: &str = "auth/v1/token?grant_type=password";
const SIGNUP: &str = "auth/v1/signup";
const LOGOUT: &str = "auth/v1/logout";
const FACTORS: &str = "auth/v1/factors";

fn credentials(email: &EmailAddress, password: &str) -> json::Credentials {
    json::Credentials {
        email: email.as_str().to_owned(),
        password: password.to_owned(),
    }
}

impl BackendClient {
    fn post_auth<B, T>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        B: serde::Serialize,
        T: serde::de::DeserializeOwned,
    {
        let response = self.request(Method::POST, path).json(body).send()?;
        Ok(Self::check(response)?.json()?)
    }

    fn store_session(
        &self,
        token: json::TokenResponse,
        assurance: Assurance,
    ) -> identity::Result<Session> {
        let session = token
            .into_session(Timestamp::now(), assurance)
            .map_err(Error::from)?;
        self.set_session(Some(session.clone()));
        Ok(session)
    }
}

impl IdentityGateway for BackendClient {
    fn current_session(&self) -> Option<Session> {
        self.session()
    }

    fn sign_in(&self, email: &EmailAddress, password: &str) -> identity::Result<Session> {
        let token: json::TokenResponse = self.post_auth(TOKEN, &credentials(email, password))?;
        self.store_session(token, Assurance::SingleFactor)
    }

    fn sign_up(&self, email: &EmailAddress, password: &str) -> identity::Result<Id> {
        let response: json::SignUpResponse =
            self.post_auth(SIGNUP, &credentials(email, password))?;
        log::info!("Signed up {email} as {}", response.user_id());
        Ok(response.user_id().into())
    }

    fn sign_out(&self) -> identity::Result<()> {
        if self.session().is_none() {
            return Err(identity::Error::NotSignedIn);
        }
        let result = self
            .request(Method::POST, LOGOUT)
            .send()
            .map_err(Error::from)
            .and_then(Self::check);
        // The local session ends even if the server could not be reached.
        self.set_session(None);
        result?;
        Ok(())
    }

    fn enroll_second_factor(&self) -> identity::Result<MfaEnrollment> {
        if self.session().is_none() {
            return Err(identity::Error::NotSignedIn);
        }
        let request = json::MfaEnrollRequest {
            factor_type: "totp".into(),
        };
        let response: json::MfaEnrollResponse = self.post_auth(FACTORS, &request)?;
        Ok(response.into())
    }

    fn challenge_second_factor(&self, factor_id: &str) -> identity::Result<Id> {
        if self.session().is_none() {
            return Err(identity::Error::NotSignedIn);
        }
        let path = format!("{FACTORS}/{factor_id}/challenge");
        let response: json::MfaChallengeResponse = self
            .post_auth(&path, &serde_json::json!({}))
            .map_err(second_factor_error)?;
        Ok(response.id.into())
    }

    fn verify_second_factor(
        &self,
        factor_id: &str,
        challenge_id: &str,
        code: &str,
    ) -> identity::Result<Session> {
        if self.session().is_none() {
            return Err(identity::Error::NotSignedIn);
        }
        let path = format!("{FACTORS}/{factor_id}/verify");
        let request = json::MfaVerifyRequest {
            challenge_id: challenge_id.to_owned(),
            code: code.to_owned(),
        };
        let token: json::TokenResponse = self
            .post_auth(&path, &request)
            .map_err(second_factor_error)?;
        self.store_session(token, Assurance::MultiFactor)
    }
}

fn second_factor_error(err: Error) -> identity::Error {
    match err {
        Error::Api {
            status: 400 | 404 | 422,
            ..
        } => identity::Error::SecondFactor,
        err => err.into(),
    }
}
