use actix_web::{web, HttpResponse};
use bcrypt;
use serde::Deserialize;
use serde_json::json;
use sqlx::{Row, SqlitePool};
use tracing::error;
use uuid::Uuid;

use crate::models::{NewUser, RegisterRequest, SignupRequest, User, UserResponse};
use crate::state::AppState;

/// Signup entry point: first/last name required.
pub async fn signup(data: web::Json<SignupRequest>, state: web::Data<AppState>) -> HttpResponse {
    match data.into_inner().validate() {
        Ok(new_user) => create_user(new_user, &state.pool).await,
        Err(errors) => HttpResponse::BadRequest().json(json!({
            "error": "validation failed",
            "details": errors
        })),
    }
}

/// Registration entry point: credentials only.
pub async fn register(data: web::Json<RegisterRequest>, state: web::Data<AppState>) -> HttpResponse {
    match data.into_inner().validate() {
        Ok(new_user) => create_user(new_user, &state.pool).await,
        Err(errors) => HttpResponse::BadRequest().json(json!({
            "error": "validation failed",
            "details": errors
        })),
    }
}

async fn create_user(new_user: NewUser, pool: &SqlitePool) -> HttpResponse {
    // check existing user
    if let Ok(existing) = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(1) FROM users WHERE email = ?"
    )
    .bind(&new_user.email)
    .fetch_one(pool)
    .await
    {
        if existing > 0 {
            return HttpResponse::BadRequest().json(json!({
                "error": "User already exists"
            }));
        }
    }

    let hashed_password = match bcrypt::hash(&new_user.password, bcrypt::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(e) => {
            error!("password hashing failed: {e}");
            return HttpResponse::InternalServerError().json(json!({
                "error": "Password hashing failed"
            }));
        }
    };

    let user = User {
        id: Uuid::new_v4().to_string(),
        email: new_user.email,
        username: new_user.username,
        password: hashed_password,
        first_name: new_user.first_name,
        last_name: new_user.last_name,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    if let Err(e) = sqlx::query(
        "INSERT INTO users (id, email, username, password, first_name, last_name, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)"
    )
    .bind(&user.id)
    .bind(&user.email)
    .bind(&user.username)
    .bind(&user.password)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.created_at)
    .execute(pool)
    .await
    {
        error!("failed to create user: {e}");
        return HttpResponse::InternalServerError().json(json!({"error": "Failed to create user"}));
    }

    HttpResponse::Created().json(json!({
        "message": "User registered successfully",
        "user": UserResponse::from_user(&user)
    }))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(data: web::Json<LoginRequest>, state: web::Data<AppState>) -> HttpResponse {
    let login_req = data.into_inner();
    let pool = &state.pool;

    let row = sqlx::query(
        "SELECT id, email, username, password, first_name, last_name, created_at FROM users WHERE email = ? LIMIT 1"
    )
    .bind(&login_req.email)
    .fetch_optional(pool)
    .await;

    let row = match row {
        Ok(Some(r)) => r,
        _ => {
            return HttpResponse::Unauthorized().json(json!({
                "error": "Invalid credentials"
            }));
        }
    };

    let user = User {
        id: row.get::<String, _>("id"),
        email: row.get::<String, _>("email"),
        username: row.get::<String, _>("username"),
        password: row.get::<String, _>("password"),
        first_name: row.try_get::<Option<String>, _>("first_name").unwrap_or(None),
        last_name: row.try_get::<Option<String>, _>("last_name").unwrap_or(None),
        created_at: row.get::<String, _>("created_at"),
    };

    let is_valid = match bcrypt::verify(&login_req.password, &user.password) {
        Ok(valid) => valid,
        Err(_) => false,
    };

    if !is_valid {
        return HttpResponse::Unauthorized().json(json!({
            "error": "Invalid credentials"
        }));
    }

    // create session token
    let token = Uuid::new_v4().to_string();
    let created_at = chrono::Utc::now().to_rfc3339();
    let expires_at = chrono::Utc::now() + chrono::Duration::days(30);

    if let Err(e) = sqlx::query(
        "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)"
    )
    .bind(&token)
    .bind(&user.id)
    .bind(&created_at)
    .bind(expires_at.to_rfc3339())
    .execute(pool)
    .await
    {
        error!("failed to store session: {e}");
        return HttpResponse::InternalServerError().json(json!({"error": "Failed to create session"}));
    }

    HttpResponse::Ok().json(json!({
        "message": "Login successful",
        "user": UserResponse::from_user(&user),
        "token": token
    }))
}
