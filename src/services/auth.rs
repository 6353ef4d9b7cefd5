use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::RngCore;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Role, User};

const TOKEN_BYTES: usize = 32;

/// Accounts plus the opaque bearer tokens that name them. A token stays
/// valid until it is explicitly invalidated; one user may hold several
/// live tokens at once (one per session).
pub struct AuthService {
    users: DashMap<Uuid, User>,
    users_by_email: DashMap<String, Uuid>,
    tokens: DashMap<String, Uuid>,
    bcrypt_cost: u32,
    admin_email: Option<String>,
}

impl AuthService {
    pub fn new(bcrypt_cost: u32, admin_email: Option<String>) -> Self {
        AuthService {
            users: DashMap::new(),
            users_by_email: DashMap::new(),
            tokens: DashMap::new(),
            bcrypt_cost,
            admin_email: admin_email.map(|e| e.trim().to_lowercase()),
        }
    }

    /// Create an account and log it in. The email is claimed through the
    /// index entry, so two concurrent registrations of the same address
    /// cannot both succeed.
    pub fn register(&self, email: &str, password: &str) -> Result<(User, String), ApiError> {
        let email = normalize_email(email);
        let password_hash = bcrypt::hash(password, self.bcrypt_cost)?;

        let id = Uuid::new_v4();
        match self.users_by_email.entry(email.clone()) {
            Entry::Occupied(_) => {
                return Err(ApiError::Conflict("email already registered".to_string()));
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let role = match &self.admin_email {
            Some(admin) if *admin == email => Role::Admin,
            _ => Role::Guest,
        };
        let user = User {
            id,
            email,
            password_hash,
            role,
            created_at: Utc::now(),
        };
        self.users.insert(id, user.clone());
        info!(user_id = %id, role = ?role, "user registered");

        let token = self.issue_token(id);
        Ok((user, token))
    }

    /// Unknown email and wrong password fail identically.
    pub fn login(&self, email: &str, password: &str) -> Result<(User, String), ApiError> {
        let email = normalize_email(email);
        let user = self
            .users_by_email
            .get(&email)
            .and_then(|id| self.users.get(&id))
            .map(|u| u.clone())
            .ok_or(ApiError::Unauthenticated)?;

        if !bcrypt::verify(password, &user.password_hash)? {
            return Err(ApiError::Unauthenticated);
        }

        let token = self.issue_token(user.id);
        Ok((user, token))
    }

    /// Fresh unguessable token for the user. Prior tokens stay valid.
    pub fn issue_token(&self, user_id: Uuid) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = URL_SAFE_NO_PAD.encode(bytes);
        self.tokens.insert(token.clone(), user_id);
        token
    }

    /// Map a presented token back to its user.
    pub fn resolve(&self, token: &str) -> Result<User, ApiError> {
        self.tokens
            .get(token)
            .and_then(|id| self.users.get(&id))
            .map(|u| u.clone())
            .ok_or(ApiError::Unauthenticated)
    }

    /// Logout. Invalidating a token that is already gone is a no-op.
    pub fn invalidate(&self, token: &str) {
        self.tokens.remove(token);
    }

    pub fn user(&self, id: Uuid) -> Result<User, ApiError> {
        self.users
            .get(&id)
            .map(|u| u.clone())
            .ok_or(ApiError::NotFound("user"))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
