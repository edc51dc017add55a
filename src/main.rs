use std::env;

use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;

use adlocal_campaigns::config::ServerConfig;
use adlocal_campaigns::db::establish_connection_pool;
use adlocal_campaigns::gateway::rest::RestDirectDebitGateway;
use adlocal_campaigns::repository::DieselRepository;
use adlocal_campaigns::routes::eligibility::check_eligibility;
use adlocal_campaigns::routes::payments::{complete_payment, reconcile_payment, setup_payment};
use adlocal_campaigns::routes::quotes::{price_quote, save_quote, show_booking};
use adlocal_campaigns::routes::webhooks::gateway_webhook;
use adlocal_campaigns::services::eligibility::{
    EligibilityGuard, HttpIpResolver, RestPromoEligibilityApi,
};

fn required_env(name: &str) -> String {
    match env::var(name) {
        Ok(value) => value,
        Err(_) => {
            log::error!("{name} environment variable not set");
            std::process::exit(1);
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let database_url = env::var("DATABASE_URL").unwrap_or("app.db".to_string());
    let port = env::var("PORT").unwrap_or("8080".to_string());
    let port = port.parse::<u16>().unwrap_or(8080);
    let address = env::var("ADDRESS").unwrap_or("127.0.0.1".to_string());

    let secret = env::var("SECRET_KEY");
    let secret_key = match &secret {
        Ok(key) => Key::from(key.as_bytes()),
        Err(_) => Key::generate(),
    };

    let gateway_base_url = required_env("GATEWAY_BASE_URL");
    let gateway_access_token = required_env("GATEWAY_ACCESS_TOKEN");
    let webhook_secret = required_env("GATEWAY_WEBHOOK_SECRET");
    let return_base_url = required_env("RETURN_BASE_URL");
    let ip_lookup_url = env::var("IP_LOOKUP_URL").unwrap_or("https://api.ipify.org".to_string());
    let eligibility_url = required_env("ELIGIBILITY_SERVICE_URL");

    let config = ServerConfig {
        webhook_secret,
        return_base_url,
    };

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let gateway = match RestDirectDebitGateway::new(gateway_base_url, gateway_access_token) {
        Ok(gateway) => gateway,
        Err(e) => {
            log::error!("Failed to build gateway client: {e}");
            std::process::exit(1);
        }
    };
    let gateway = web::Data::new(gateway);

    let guard = match (
        HttpIpResolver::new(ip_lookup_url),
        RestPromoEligibilityApi::new(eligibility_url),
    ) {
        (Ok(ip_resolver), Ok(api)) => EligibilityGuard::new(ip_resolver, api),
        (Err(e), _) | (_, Err(e)) => {
            log::error!("Failed to build eligibility clients: {e}");
            std::process::exit(1);
        }
    };
    let guard = web::Data::new(guard);

    HttpServer::new(move || {
        App::new()
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(gateway_webhook)
            .service(price_quote)
            .service(save_quote)
            .service(show_booking)
            .service(check_eligibility)
            .service(setup_payment)
            .service(complete_payment)
            .service(reconcile_payment)
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(gateway.clone())
            .app_data(guard.clone())
    })
    .bind((address, port))?
    .run()
    .await
}
