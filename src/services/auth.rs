//! Email/password accounts and login sessions.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use regex::Regex;
use thiserror::Error;

use crate::config::Settings;
use crate::models::{
    ActivityAction, NewActivity, Profile, ProfileInput, Role, Session, SessionUser, User,
};
use crate::repository::util::is_unique_violation;
use crate::repository::{ActivityRepository, AuthRepository, DbContext, DbError, ProfileRepository};

pub const ALREADY_REGISTERED: &str = "This email is already registered. Please sign in instead.";

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    AlreadyRegistered(&'static str),

    /// Deliberately the same for unknown email and wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{message}")]
    Invalid { field: &'static str, message: String },

    #[error("User not found")]
    UserNotFound,

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .unwrap_or_else(|e| panic!("email pattern: {e}"))
    })
}

fn invalid(field: &'static str, message: &str) -> AuthError {
    AuthError::Invalid {
        field,
        message: message.to_string(),
    }
}

/// Sign-up fields after validation and normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSignUp {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_number: String,
    pub alternative_contact_number: Option<String>,
    pub password: String,
}

/// Check the sign-up form and normalize its fields.
pub fn validate_sign_up(input: &ProfileInput) -> Result<ValidSignUp, AuthError> {
    let first_name = input.first_name.trim();
    if first_name.is_empty() {
        return Err(invalid("first_name", "First name is required"));
    }
    if first_name.chars().count() > 50 {
        return Err(invalid("first_name", "First name must be less than 50 characters"));
    }

    let last_name = input.last_name.trim();
    if last_name.is_empty() {
        return Err(invalid("last_name", "Last name is required"));
    }
    if last_name.chars().count() > 50 {
        return Err(invalid("last_name", "Last name must be less than 50 characters"));
    }

    let email = input.email.trim().to_lowercase();
    if !email_regex().is_match(&email) {
        return Err(invalid("email", "Invalid email address"));
    }
    if email.len() > 255 {
        return Err(invalid("email", "Email must be less than 255 characters"));
    }

    let contact_number = input.contact_number.trim();
    let contact_len = contact_number.chars().count();
    if contact_len < 10 {
        return Err(invalid("contact_number", "Contact number must be at least 10 digits"));
    }
    if contact_len > 15 {
        return Err(invalid(
            "contact_number",
            "Contact number must be less than 15 digits",
        ));
    }

    let alternative_contact_number = input
        .alternative_contact_number
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if alternative_contact_number.is_some_and(|s| s.chars().count() > 15) {
        return Err(invalid(
            "alternative_contact_number",
            "Alternative contact number must be less than 15 digits",
        ));
    }

    let password_len = input.password.chars().count();
    if password_len < 8 {
        return Err(invalid("password", "Password must be at least 8 characters"));
    }
    if password_len > 100 {
        return Err(invalid("password", "Password must be less than 100 characters"));
    }
    if input.password != input.confirm_password {
        return Err(invalid("confirm_password", "Passwords don't match"));
    }

    Ok(ValidSignUp {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email,
        contact_number: contact_number.to_string(),
        alternative_contact_number: alternative_contact_number.map(str::to_string),
        password: input.password.clone(),
    })
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Request metadata recorded alongside login activity.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub browser_info: Option<String>,
}

/// Local stand-in for a hosted auth provider.
#[derive(Clone)]
pub struct AuthService {
    auth: AuthRepository,
    profiles: ProfileRepository,
    activities: ActivityRepository,
    session_ttl: Duration,
    admin_emails: Vec<String>,
}

impl AuthService {
    pub fn new(db: &DbContext, settings: &Settings) -> Self {
        Self {
            auth: db.auth(),
            profiles: db.profiles(),
            activities: db.activities(),
            session_ttl: Duration::hours(i64::try_from(settings.session_ttl_hours).unwrap_or(168)),
            admin_emails: settings.admin_emails.clone(),
        }
    }

    /// Register an account and its profile. Does not sign in.
    pub async fn sign_up(&self, input: &ProfileInput) -> Result<User, AuthError> {
        let valid = validate_sign_up(input)?;

        if self.auth.get_user_by_email(&valid.email).await?.is_some() {
            return Err(AuthError::AlreadyRegistered(ALREADY_REGISTERED));
        }

        let role = if self.admin_emails.iter().any(|e| *e == valid.email) {
            Role::Admin
        } else {
            Role::Client
        };
        let now = Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: valid.email.clone(),
            password_hash: hash_password(&valid.password)?,
            role,
            created_at: now,
        };

        if let Err(e) = self.auth.create_user(&user).await {
            return Err(if is_unique_violation(&e) {
                AuthError::AlreadyRegistered(ALREADY_REGISTERED)
            } else {
                e.into()
            });
        }

        let profile = Profile {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            first_name: valid.first_name,
            last_name: valid.last_name,
            email: valid.email,
            contact_number: valid.contact_number,
            alternative_contact_number: valid.alternative_contact_number,
            created_at: now,
        };
        self.profiles.insert(&profile).await?;

        tracing::info!("Registered {} as {}", user.email, user.role.as_str());
        Ok(user)
    }

    /// Check credentials and open a session.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        client: ClientInfo,
    ) -> Result<SessionUser, AuthError> {
        let user = self
            .auth
            .get_user_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash) {
            tracing::warn!("Failed sign-in for {}", user.email);
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now();
        let session = Session {
            token: uuid::Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            created_at: now,
            expires_at: now + self.session_ttl,
        };
        self.auth.create_session(&session).await?;

        let entry = NewActivity::new(
            Some(user.id.clone()),
            user.email.clone(),
            ActivityAction::Login,
            "User logged in",
        )
        .with_client(client.ip_address, client.browser_info);
        if let Err(e) = self.activities.log(&entry).await {
            tracing::warn!("Failed to record login activity: {}", e);
        }

        let display_name = self.display_name(&user).await?;
        Ok(SessionUser {
            user_id: user.id,
            email: user.email,
            role: user.role,
            display_name,
            token: session.token,
        })
    }

    /// End a session. Unknown tokens are ignored.
    pub async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        self.auth.delete_session(token).await?;
        Ok(())
    }

    /// Resolve a session token. Expired or unknown tokens yield `None`.
    pub async fn current_session(&self, token: &str) -> Result<Option<SessionUser>, AuthError> {
        let Some(session) = self.auth.get_session(token).await? else {
            return Ok(None);
        };
        if session.is_expired(Utc::now()) {
            self.auth.delete_session(token).await?;
            return Ok(None);
        }
        let Some(user) = self.auth.get_user(&session.user_id).await? else {
            return Ok(None);
        };

        let display_name = self.display_name(&user).await?;
        Ok(Some(SessionUser {
            user_id: user.id,
            email: user.email,
            role: user.role,
            display_name,
            token: session.token,
        }))
    }

    /// Grant the admin role. Returns false for an unknown email.
    pub async fn promote(&self, email: &str) -> Result<bool, AuthError> {
        Ok(self.auth.set_role(email, Role::Admin).await?)
    }

    /// Remove a client's profile, sessions and account.
    ///
    /// Documents and blobs are left in place.
    pub async fn delete_account(&self, user_id: &str) -> Result<(), AuthError> {
        let had_profile = self.profiles.delete_by_user(user_id).await?;
        self.auth.delete_sessions_for_user(user_id).await?;
        let had_user = self.auth.delete_user(user_id).await?;
        if !had_profile && !had_user {
            return Err(AuthError::UserNotFound);
        }
        tracing::info!("Deleted account {}", user_id);
        Ok(())
    }

    async fn display_name(&self, user: &User) -> Result<String, AuthError> {
        Ok(self
            .profiles
            .get_by_user(&user.id)
            .await?
            .map(|p| p.full_name())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| user.email.clone()))
    }
}
