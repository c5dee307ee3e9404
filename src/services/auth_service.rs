use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{ColumnTrait, Condition, Set};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    audit,
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    entity::users::{ActiveModel as UserActive, Column as UserCol},
    error::{AppError, AppResult},
    middleware::{
        auth::{AuthUser, SESSION_USER_KEY},
        session::set_cart_count,
    },
    models::{Role, User},
    repository::UnitOfWork,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Bearer tokens stay valid this long.
pub const TOKEN_TTL_HOURS: i64 = 24;

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

/// Creates an account.
///
/// Anonymous callers always get a Customer account and are signed in.
/// Staff may pick any role and stay signed in as themselves.
pub async fn register_user(
    state: &AppState,
    actor: Option<&AuthUser>,
    session: &Session,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let RegisterRequest {
        email,
        password,
        name,
        phone_number,
        street_address,
        city,
        state: region,
        postal_code,
        role,
    } = payload;

    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".into()));
    }
    if password.len() < 6 {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters".into(),
        ));
    }
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }

    let role = match role.as_deref().map(str::parse::<Role>) {
        None => Role::Customer,
        Some(Err(msg)) => return Err(AppError::BadRequest(msg)),
        Some(Ok(Role::Customer)) => Role::Customer,
        Some(Ok(role)) => match actor {
            Some(actor) if actor.role.is_staff() => role,
            Some(_) => return Err(AppError::Forbidden),
            None => return Err(AppError::Unauthorized),
        },
    };

    let uow = UnitOfWork::begin(&state.orm).await?;
    let users = uow.users();
    if users
        .get(Condition::all().add(UserCol::Email.eq(email.as_str())))
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("Email is already taken".to_string()));
    }

    let created = users
        .add(UserActive {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            password_hash: Set(hash_password(&password)?),
            name: Set(name.trim().to_string()),
            phone_number: Set(phone_number),
            street_address: Set(street_address),
            city: Set(city),
            state: Set(region),
            postal_code: Set(postal_code),
            role: Set(role.to_string()),
            created_at: Set(Utc::now().into()),
        })
        .await?;
    audit::record(
        &uow,
        actor.map_or(created.id, |a| a.user_id),
        "user_register",
        "users",
        serde_json::json!({ "user_id": created.id, "role": created.role }),
    )
    .await;
    uow.commit().await?;
    tracing::info!(user_id = %created.id, role = %role, "user registered");

    if actor.is_none() {
        sign_in(
            session,
            AuthUser {
                user_id: created.id,
                email: created.email.clone(),
                role,
            },
            0,
        )
        .await?;
    }

    Ok(ApiResponse::success(
        "User created",
        User::from(created),
        Some(Meta::empty()),
    ))
}

pub async fn login_user(
    state: &AppState,
    session: &Session,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let email = email.trim().to_lowercase();

    let uow = UnitOfWork::begin(&state.orm).await?;
    let Some(user) = uow
        .users()
        .get(Condition::all().add(UserCol::Email.eq(email.as_str())))
        .await?
    else {
        return Err(AppError::BadRequest("Invalid email or password".into()));
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest("Invalid email or password".into()));
    }

    let role = user
        .role
        .parse::<Role>()
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
    let cart_lines = uow.shopping_carts().line_count(user.id).await?;
    audit::record(
        &uow,
        user.id,
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;
    uow.commit().await?;

    let auth_user = AuthUser {
        user_id: user.id,
        email: user.email,
        role,
    };
    let token = issue_token(&state.config.jwt_secret, &auth_user)?;
    sign_in(session, auth_user, cart_lines).await?;

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token: format!("Bearer {token}"),
            role: role.to_string(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn logout_user(session: &Session) -> AppResult<ApiResponse<()>> {
    session.flush().await?;
    Ok(ApiResponse::success("Logged out", (), Some(Meta::empty())))
}

pub fn issue_token(secret: &str, user: &AuthUser) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(TOKEN_TTL_HOURS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.user_id.to_string(),
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

async fn sign_in(session: &Session, user: AuthUser, cart_lines: u64) -> AppResult<()> {
    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, user).await?;
    set_cart_count(session, cart_lines).await
}
