use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use mongodb::bson::doc;
use mongodb::Client;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::middleware::auth::{decode_token, jwt_secret, Claims, ADMIN_COOKIE};
use crate::models::admin::AdminUser;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

/*
    POST /api/auth/login
*/
pub async fn login(data: web::Data<Arc<Client>>, input: web::Json<LoginRequest>) -> impl Responder {
    let client = data.into_inner();
    let LoginRequest { email, password } = input.into_inner();

    let (email, password) = match (email, password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => {
            return HttpResponse::BadRequest()
                .json(json!({ "error": "Email and password are required" }))
        }
    };

    let collection: mongodb::Collection<AdminUser> =
        client.database("Account").collection("AdminUsers");

    match collection.find_one(doc! { "email": &email }).await {
        Ok(Some(admin)) => {
            if bcrypt::verify(&password, &admin.password_hash).unwrap_or(false) {
                match generate_token(&email) {
                    Ok(token) => HttpResponse::Ok()
                        .cookie(admin_cookie(token, CookieDuration::seconds(86400)))
                        .json(json!({ "success": true })),
                    Err(err) => {
                        eprintln!("Token generation failed: {:?}", err);
                        HttpResponse::InternalServerError().body("Token generation failed")
                    }
                }
            } else {
                HttpResponse::Unauthorized().json(json!({ "error": "Invalid credentials" }))
            }
        }
        Ok(None) => HttpResponse::Unauthorized().json(json!({ "error": "Invalid credentials" })),
        Err(err) => {
            eprintln!("Database error: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to process login")
        }
    }
}

/*
    POST /api/auth/logout
*/
pub async fn logout() -> impl Responder {
    HttpResponse::Ok()
        .cookie(admin_cookie(String::new(), CookieDuration::ZERO))
        .json(json!({ "success": true }))
}

/*
    GET /api/auth/status

    Public on purpose: the login modal polls it to decide what to render.
*/
pub async fn status(req: HttpRequest) -> impl Responder {
    match req.cookie(ADMIN_COOKIE) {
        Some(cookie) => match decode_token(cookie.value()) {
            Ok(claims) => HttpResponse::Ok().json(json!({
                "authenticated": true,
                "user": claims,
            })),
            Err(err) => HttpResponse::Ok().json(json!({
                "authenticated": false,
                "message": format!("Invalid token: {}", err),
            })),
        },
        None => HttpResponse::Ok().json(json!({
            "authenticated": false,
            "message": "No token found",
        })),
    }
}

#[derive(Debug, Deserialize)]
pub struct SetupAdminRequest {
    email: String,
    password: String,
}

/*
    POST /api/setup-admin

    Upserts the shared dashboard credential. Debug builds only.
*/
pub async fn setup_admin(
    data: web::Data<Arc<Client>>,
    input: web::Json<SetupAdminRequest>,
) -> impl Responder {
    if !cfg!(debug_assertions) {
        return HttpResponse::NotFound().finish();
    }

    let client = data.into_inner();
    let doc = input.into_inner();

    if !is_valid_email(&doc.email) {
        return HttpResponse::BadRequest().body("Invalid email address");
    }

    let hashed = match bcrypt::hash(&doc.password, bcrypt::DEFAULT_COST) {
        Ok(hashed) => hashed,
        Err(err) => {
            eprintln!("Failed to hash password: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to hash password");
        }
    };

    let collection: mongodb::Collection<AdminUser> =
        client.database("Account").collection("AdminUsers");

    let update = doc! {
        "$set": {
            "password_hash": &hashed,
            "updated_at": Utc::now().to_string(),
        },
        "$setOnInsert": {
            "created_at": Utc::now().to_string(),
        },
    };

    match collection
        .update_one(doc! { "email": &doc.email }, update)
        .upsert(true)
        .await
    {
        Ok(_) => HttpResponse::Ok().json(json!({
            "success": true,
            "user": doc.email,
        })),
        Err(err) => {
            eprintln!("Failed to upsert admin user: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to create admin user")
        }
    }
}

fn admin_cookie(token: String, max_age: CookieDuration) -> Cookie<'static> {
    Cookie::build(ADMIN_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(!cfg!(debug_assertions))
        .max_age(max_age)
        .finish()
}

fn is_valid_email(email: &str) -> bool {
    let re = regex::Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*$",
    );
    return re.unwrap().is_match(email);
}

fn generate_token(email: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let secret = jwt_secret();
    let now = Utc::now();

    let claims = Claims {
        sub: email.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(24)).timestamp() as usize,
    };

    let header = Header::new(Algorithm::HS256);
    encode(&header, &claims, &EncodingKey::from_secret(secret.as_ref()))
}
