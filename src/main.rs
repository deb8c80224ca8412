use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use tracing::info;

use slotwatch::AppState;
use slotwatch::config::Config;
use slotwatch::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();
    dotenv().ok();

    let config = Config::from_env();
    let state = web::Data::new(
        AppState::new(&config).expect("Failed to open the backing store"),
    );

    // The service's own surface: log every broadcast as it goes out.
    let mut rx = state.bus.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => info!("event: {json}"),
                Err(e) => info!("event (unencodable): {e}"),
            }
        }
    });

    info!("Listening on {}", config.bind_addr);

    let app_state = state.clone();
    HttpServer::new(move || App::new().app_data(app_state.clone()).configure(routes::init))
        .bind(config.bind_addr.as_str())?
        .run()
        .await
}
