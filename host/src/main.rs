mod config;
mod spa;

use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;
use std::thread;
use std::time::Duration;

use crate::config::HostConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = HostConfig::from_env();
    let url = config.url();

    if config.open_browser {
        let url = url.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            if let Err(err) = webbrowser::open(&url) {
                log::warn!("could not open the browser: {err}");
            }
        });
    }

    info!("Serving the marchés dashboard at {}", url);

    HttpServer::new(|| App::new().default_service(web::route().to(spa::serve_embedded)))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
