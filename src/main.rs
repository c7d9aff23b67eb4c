use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

mod db;
mod middleware;
mod models;
mod routes;
mod services;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    println!("Logger initialized");

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);
    println!("Attempting to bind to {}:{}", host, port);

    let mongo_uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    println!("Got MongoDB URI, attempting connection...");
    let client = db::mongo::create_mongo_client(&mongo_uri).await;
    println!("MongoDB connection established");

    let allowed_origin = std::env::var("ALLOWED_ORIGIN").ok();

    println!("Starting HTTP server...");

    HttpServer::new(move || {
        // The dashboard sends the admin cookie cross-origin, so credentials
        // must be allowed for the configured origin.
        let cors = match &allowed_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allowed_methods(vec!["GET", "POST"])
                .allow_any_header()
                .supports_credentials()
                .max_age(3600),
            None => Cors::permissive(),
        };

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(client.clone()))
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api")
                    // Public routes
                    .service(
                        web::scope("/auth")
                            .route("/login", web::post().to(routes::auth::login))
                            .route("/logout", web::post().to(routes::auth::logout))
                            .route("/status", web::get().to(routes::auth::status)),
                    )
                    .route("/setup-admin", web::post().to(routes::auth::setup_admin))
                    // Protected routes
                    .service(
                        web::scope("")
                            .wrap(middleware::auth::AdminAuthMiddleware)
                            .route("/trips", web::get().to(routes::trips::get_trips))
                            .route("/trips/{id}", web::get().to(routes::trips::get_trip_by_id))
                            .route("/clients", web::get().to(routes::clients::get_clients))
                            .route("/stats", web::get().to(routes::stats::get_stats))
                            .route("/configs", web::get().to(routes::configs::get_configs))
                            .route("/logs", web::get().to(routes::logs::get_logs))
                            .route(
                                "/opt-outs",
                                web::get().to(routes::opt_outs::get_opt_outs),
                            ),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
