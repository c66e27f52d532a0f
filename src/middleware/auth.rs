use axum::{extract::FromRequestParts, http::header};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    dto::auth::Claims,
    entity::{
        grounds::Model as GroundModel,
        users::{Entity as Users, Role},
    },
    error::{AppError, AppResult},
    state::{AppState, TokenSettings},
};

/// Caller resolved from the bearer token and the stored user record.
///
/// The token only names the user; role and profile come from the database on
/// every request so role changes take effect immediately.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
    pub name: String,
    pub email: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Reject the caller unless its role is one of `allowed`.
pub fn authorize(user: &AuthUser, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        return Ok(());
    }
    Err(AppError::forbidden(format!(
        "Role {} is not authorized to access this route",
        user.role.as_str()
    )))
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    authorize(user, &[Role::Admin])
}

/// Admins manage every ground; a ground manager only the grounds it owns.
pub fn ensure_ground_access(user: &AuthUser, ground: &GroundModel) -> Result<(), AppError> {
    match user.role {
        Role::Admin => Ok(()),
        Role::GroundManager if ground.manager_id == user.user_id => Ok(()),
        Role::GroundManager => Err(AppError::forbidden(
            "Not authorized to manage this ground",
        )),
        _ => Err(AppError::forbidden("Not authorized")),
    }
}

pub fn issue_token(settings: &TokenSettings, user_id: Uuid) -> AppResult<String> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::hours(settings.ttl_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn decode_token(settings: &TokenSettings, token: &str) -> AppResult<Uuid> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Not authorized, token failed".into()))?;

    Uuid::parse_str(&decoded.claims.sub)
        .map_err(|_| AppError::Unauthorized("Not authorized, token failed".into()))
}

fn bearer_token(parts: &axum::http::request::Parts) -> AppResult<&str> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Not authorized, no token".into()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?;
    Ok(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let user_id = decode_token(&state.tokens, token)?;

        let user = Users::find_by_id(user_id)
            .one(&state.orm)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Not authorized, user not found".into()))?;

        Ok(AuthUser {
            user_id: user.id,
            role: user.role,
            name: user.name,
            email: user.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn caller(role: Role) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            role,
            name: "Caller".into(),
            email: "caller@example.com".into(),
        }
    }

    fn ground_managed_by(manager_id: Uuid) -> GroundModel {
        let now = Utc::now().into();
        GroundModel {
            id: Uuid::new_v4(),
            name: "Riverside Turf".into(),
            location: "North Bank".into(),
            price_per_slot: 1500,
            available_slots: vec!["09:00-10:00".into()],
            manager_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn settings() -> TokenSettings {
        TokenSettings {
            secret: "test-secret".into(),
            ttl_hours: 1,
        }
    }

    #[test]
    fn authorize_accepts_only_listed_roles() {
        let allowed = [Role::PaymentManager, Role::Admin];
        assert!(authorize(&caller(Role::Admin), &allowed).is_ok());
        assert!(authorize(&caller(Role::PaymentManager), &allowed).is_ok());
        assert!(matches!(
            authorize(&caller(Role::User), &allowed),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            authorize(&caller(Role::GroundManager), &allowed),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn ground_access_requires_ownership_unless_admin() {
        let owner = caller(Role::GroundManager);
        let ground = ground_managed_by(owner.user_id);

        assert!(ensure_ground_access(&owner, &ground).is_ok());
        assert!(ensure_ground_access(&caller(Role::Admin), &ground).is_ok());
        assert!(matches!(
            ensure_ground_access(&caller(Role::GroundManager), &ground),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            ensure_ground_access(&caller(Role::User), &ground),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn token_round_trips_user_id() {
        let id = Uuid::new_v4();
        let token = issue_token(&settings(), id).unwrap();
        assert_eq!(decode_token(&settings(), &token).unwrap(), id);
    }

    #[test]
    fn token_signed_with_other_secret_is_unauthorized() {
        let token = issue_token(&settings(), Uuid::new_v4()).unwrap();
        let other = TokenSettings {
            secret: "other".into(),
            ttl_hours: 1,
        };
        assert!(matches!(
            decode_token(&other, &token),
            Err(AppError::Unauthorized(_))
        ));
    }
}
