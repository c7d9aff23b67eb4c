use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{middleware::Logger, web, App, HttpResponse, Responder};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::sync::Arc;

use corrida_admin_api::db::mongo::create_mongo_client;
use corrida_admin_api::middleware::auth::{jwt_secret, AdminAuthMiddleware, Claims};
use corrida_admin_api::routes;

pub struct TestApp {
    pub client: Arc<mongodb::Client>,
}

impl TestApp {
    pub async fn new() -> Self {
        let mongo_uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let client = create_mongo_client(&mongo_uri).await;

        Self { client }
    }

    /// The real auth routes and middleware with mock data handlers behind
    /// them, so the auth surface is exercised without a seeded database.
    pub fn create_app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.client.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .route("/health", web::get().to(health_check))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/auth")
                            .route("/login", web::post().to(routes::auth::login))
                            .route("/logout", web::post().to(routes::auth::logout))
                            .route("/status", web::get().to(routes::auth::status)),
                    )
                    .service(
                        web::scope("")
                            .wrap(AdminAuthMiddleware)
                            .route("/trips", web::get().to(get_trips))
                            .route("/trips/{id}", web::get().to(get_trip_by_id))
                            .route("/clients", web::get().to(get_clients))
                            .route("/stats", web::get().to(get_stats))
                            .route("/configs", web::get().to(get_configs))
                            .route("/logs", web::get().to(get_logs))
                            .route("/opt-outs", web::get().to(get_opt_outs)),
                    ),
            )
    }
}

// Mock handler functions for testing
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"status": "ok"}))
}

async fn get_trips() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"rows": [], "total": 0}))
}

async fn get_trip_by_id() -> impl Responder {
    HttpResponse::NotFound().json(serde_json::json!({"error": "Trip not found"}))
}

async fn get_clients() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!([]))
}

async fn get_stats() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "totalTrips": 0,
        "totalUsers": 0,
        "lastTripAt": null,
        "isUniqueTrips": false
    }))
}

async fn get_configs() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!([]))
}

async fn get_logs() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "logs": [],
        "userNameByUserId": {},
        "userPhoneByUserId": {},
        "tripCountByUserId": {}
    }))
}

async fn get_opt_outs() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!([]))
}

pub fn get_test_email() -> String {
    "admin@example.com".to_string()
}

/// Token signed the same way the login route signs it.
pub fn make_admin_token(valid_for_hours: i64) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: get_test_email(),
        iat: (now - Duration::hours(1)).timestamp() as usize,
        exp: (now + Duration::hours(valid_for_hours)).timestamp() as usize,
    };

    let header = Header::new(Algorithm::HS256);
    encode(
        &header,
        &claims,
        &EncodingKey::from_secret(jwt_secret().as_ref()),
    )
    .expect("failed to sign test token")
}

pub async fn cleanup_test_data(client: &mongodb::Client) {
    let db = client.database("Account");

    let collection = db.collection::<mongodb::bson::Document>("AdminUsers");
    let _ = collection
        .delete_many(mongodb::bson::doc! {
            "email": { "$regex": "test.*@example.com" }
        })
        .await;
}
