use dotenvy::dotenv;
use order_pricing_service::config::Config;
use order_pricing_service::{build_server, create_pool, postgres_order_service, run_migrations};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(std::io::Error::other)?;

    let pool = create_pool(&config.database_url, &config.pool).map_err(std::io::Error::other)?;
    run_migrations(&pool).map_err(std::io::Error::other)?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(postgres_order_service(pool), &config.host, config.port)?.await
}
