use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{ProfileResponse, SigninRequest, SigninResponse, SignupRequest, SignupResponse},
        password::{burn_verification_blocking, hash_password_blocking, verify_password_blocking},
    },
    error::AuthError,
    state::AppState,
    store::{bounded, NewUser, StoreError},
};

pub const USER_CREATED: &str = "user created";
pub const USER_SIGNED_IN: &str = "signed in";
pub const RECORD_FETCHED: &str = "record fetched";

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Emails are compared case-insensitively: trimmed and lowercased before any store access.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_signup(req: &SignupRequest, min_password_len: usize) -> Result<(), AuthError> {
    if req.name.trim().is_empty() {
        return Err(AuthError::Validation("name must not be empty".into()));
    }
    if !is_valid_email(&req.email) {
        return Err(AuthError::Validation("invalid email".into()));
    }
    if req.password.chars().count() < min_password_len.max(1) {
        return Err(AuthError::Validation(format!(
            "password must be at least {} characters",
            min_password_len.max(1)
        )));
    }
    Ok(())
}

pub async fn signup(state: &AppState, mut req: SignupRequest) -> Result<SignupResponse, AuthError> {
    req.email = normalize_email(&req.email);
    req.name = req.name.trim().to_string();
    validate_signup(&req, state.config.password_min_len)?;

    let limit = state.config.store_timeout();

    match bounded(limit, state.store.find_by_email(&req.email)).await {
        Ok(None) => {}
        Ok(Some(_)) => {
            warn!(email = %req.email, "email already registered");
            return Err(AuthError::DuplicateEmail(req.email));
        }
        Err(e) => {
            error!(error = %e, email = %req.email, "signup lookup failed");
            return Err(e.into());
        }
    }

    let password_hash = hash_password_blocking(req.password).await.map_err(|e| {
        error!(error = %e, "hash_password failed");
        AuthError::Validation("password could not be processed".into())
    })?;

    let new_user = NewUser {
        name: req.name,
        email: req.email,
        password_hash,
    };

    // A unique violation from the store is the authoritative duplicate signal.
    let user = match bounded(limit, state.store.insert(new_user)).await {
        Ok(u) => u,
        Err(StoreError::DuplicateEmail(email)) => {
            warn!(email = %email, "email claimed by a concurrent signup");
            return Err(AuthError::DuplicateEmail(email));
        }
        Err(StoreError::Mapping(cause)) => {
            error!(error = %cause, "could not map created user row");
            return Err(AuthError::Internal(cause));
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(e.into());
        }
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(SignupResponse {
        message: USER_CREATED.into(),
    })
}

pub async fn signin(state: &AppState, req: SigninRequest) -> Result<SigninResponse, AuthError> {
    let email = normalize_email(&req.email);
    let limit = state.config.store_timeout();

    let user = match bounded(limit, state.store.find_by_email(&email)).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %email, "signin unknown email");
            burn_verification_blocking(req.password).await;
            return Err(AuthError::InvalidCredentials);
        }
        Err(e) => {
            error!(error = %e, email = %email, "signin lookup failed");
            burn_verification_blocking(req.password).await;
            return Err(AuthError::InvalidCredentials);
        }
    };

    match verify_password_blocking(req.password, user.password_hash.clone()).await {
        Ok(true) => {}
        Ok(false) => {
            warn!(email = %email, user_id = %user.id, "signin invalid password");
            return Err(AuthError::InvalidCredentials);
        }
        Err(e) => {
            error!(error = %e, user_id = %user.id, "stored hash unreadable");
            return Err(AuthError::InvalidCredentials);
        }
    }

    let token = state.tokens.issue(user.id).map_err(|e| {
        error!(error = %e, user_id = %user.id, "token issue failed");
        AuthError::Token(e)
    })?;

    info!(user_id = %user.id, "user signed in");
    Ok(SigninResponse {
        message: USER_SIGNED_IN.into(),
        token,
    })
}

pub async fn profile(state: &AppState, user_id: Uuid) -> Result<ProfileResponse, AuthError> {
    let limit = state.config.store_timeout();

    let user = match bounded(limit, state.store.find_by_id(user_id)).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(user_id = %user_id, "profile for unknown user");
            return Err(AuthError::UserNotFound);
        }
        Err(e) => {
            error!(error = %e, user_id = %user_id, "profile lookup failed");
            return Err(AuthError::UserNotFound);
        }
    };

    Ok(ProfileResponse {
        message: RECORD_FETCHED.into(),
        user: user.into(),
    })
}
