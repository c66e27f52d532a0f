use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::auth::{AuthResponse, LoginRequest, RegisterRequest},
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Role},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, issue_token},
    models::User,
    response::ApiResponse,
    state::AppState,
    validation::{normalize_email, normalize_phone, validate_name, validate_password},
};

const EMAIL_TAKEN: &str = "User already exists with this email";
const BAD_CREDENTIALS: &str = "Invalid email or password";

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<AuthResponse>> {
    let RegisterRequest {
        name,
        email,
        phone,
        password,
        confirm_password,
    } = payload;

    if name.trim().is_empty()
        || email.trim().is_empty()
        || phone.trim().is_empty()
        || password.is_empty()
    {
        return Err(AppError::BadRequest(
            "Name, email, phone, and password are required".into(),
        ));
    }
    if confirm_password.is_empty() {
        return Err(AppError::BadRequest("Please confirm your password".into()));
    }
    if password != confirm_password {
        return Err(AppError::BadRequest("Passwords do not match".into()));
    }

    let name = validate_name(&name)?;
    let email = normalize_email(&email)?;
    let phone = normalize_phone(&phone)?;
    validate_password(&password)?;

    let exists = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::Conflict(EMAIL_TAKEN.into()));
    }

    let password_hash = hash_password(&password)?;

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(email),
        phone: Set(phone),
        password_hash: Set(password_hash),
        role: Set(Role::User),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(|err| AppError::conflict_on_unique(err, EMAIL_TAKEN))?;

    let token = issue_token(&state.tokens, user.id)?;

    audit::record(
        state,
        user.id,
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;
    tracing::info!(user_id = %user.id, "user registered");

    Ok(ApiResponse::success(
        "User created",
        AuthResponse {
            user: user.into(),
            token,
        },
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<AuthResponse>> {
    let LoginRequest { email, password } = payload;
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".into(),
        ));
    }

    let user = Users::find()
        .filter(UserCol::Email.eq(email.trim().to_lowercase()))
        .one(&state.orm)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::Unauthorized(BAD_CREDENTIALS.into())),
    };

    if !verify_password(&password, &user.password_hash)? {
        return Err(AppError::Unauthorized(BAD_CREDENTIALS.into()));
    }

    let token = issue_token(&state.tokens, user.id)?;

    audit::record(
        state,
        user.id,
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Logged in",
        AuthResponse {
            user: user.into(),
            token,
        },
    ))
}

pub async fn current_user(state: &AppState, caller: &AuthUser) -> AppResult<ApiResponse<User>> {
    let user = Users::find_by_id(caller.user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(ApiResponse::success("Current user", User::from(user)))
}
