use actix_web::{App, HttpServer, middleware, web};

use rams::auth::{self, rate_limit::RateLimiter};
use rams::config::Config;
use rams::db;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    if let Some(parent) = std::path::Path::new(&config.database_path).parent() {
        std::fs::create_dir_all(parent).expect("Failed to create data directory");
    }
    std::fs::create_dir_all(&config.upload_dir).expect("Failed to create upload directory");

    let pool = db::init_pool(&config.database_path);
    db::run_migrations(&pool);

    let admin_password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    db::seed_admin(&pool, &admin_password);

    let limiter = web::Data::new(RateLimiter::new());
    let bind_addr = config.bind_addr.clone();

    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(limiter.clone())
            // Public routes
            .route("/login", web::post().to(rams::handlers::auth_handlers::login))
            // Protected routes
            .service(
                web::scope("")
                    .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                    .configure(rams::protected_routes),
            )
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound()
                    .json(serde_json::json!({ "error": "Not found" }))
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
