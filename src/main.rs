#[macro_use]
extern crate diesel;

mod admin;
mod auth;
mod bed;
mod config;
mod database;
mod hospital;
mod limiter;
mod models;
mod opd;
mod protocol;
mod schema;
#[cfg(test)]
mod test_utils;
mod utils;

use actix_cors::Cors;
use actix_web::{get, middleware::Logger, web, App, HttpResponse, HttpServer};
use diesel::{r2d2::ConnectionManager, SqliteConnection};

use crate::{auth::TokenKeys, config::Config, limiter::RateLimiter, protocol::MessageResponse};

type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

/// Routes and extractor settings shared by the server and the tests.
pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(protocol::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(protocol::query_error_handler))
        .service(welcome)
        // patients and staff
        .service(web::scope("/opd").configure(opd::config))
        .service(web::scope("/bed").configure(bed::config))
        // staff
        .service(web::scope("/admin").configure(admin::config))
        .configure(hospital::config);
}

#[get("/")]
async fn welcome() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse::new(
        "Welcome to the QuickCare Backend Service",
    ))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let pool = web::Data::new(database::build_pool(&config.database_url)?);
    let keys = web::Data::new(TokenKeys::new(&config.jwt_secret, config.token_ttl_hours));
    // one limiter for all workers
    let limiter = web::Data::new(RateLimiter::new(
        config.hospital_create_limit,
        config.hospital_create_window,
    ));

    let bind = config.bind_address.clone();
    let config = web::Data::new(config);
    log::info!("QuickCare backend listening on {}", bind);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .app_data(pool.clone())
            .app_data(config.clone())
            .app_data(keys.clone())
            .app_data(limiter.clone())
            .configure(app_config)
    })
    .bind(bind.as_str())?
    .run()
    .await?;

    Ok(())
}
