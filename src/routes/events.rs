//! Server-Sent Events bridge between the bus and any open UI surface.

use actix_web::{HttpResponse, Responder, get, post, web};
use futures::stream;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use crate::AppState;
use crate::bus::Event;
use crate::routes::Ack;

/// Each bus event becomes one `data:` frame with the JSON-encoded event.
#[get("")]
async fn subscribe(state: web::Data<AppState>) -> impl Responder {
    let rx = state.bus.subscribe();

    let stream = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let json = match serde_json::to_string(&event) {
                        Ok(json) => json,
                        Err(e) => {
                            warn!("Failed to encode event: {:#}", e);
                            continue;
                        }
                    };
                    let frame = web::Bytes::from(format!("data: {json}\n\n"));
                    return Some((Ok::<_, actix_web::Error>(frame), rx));
                }
                // A lagged subscriber skips straight to the newest events.
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    });

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(stream)
}

/// `toggleTable`: show/hide request for the injected overlay, broadcast
/// only, nothing to acknowledge beyond receipt.
#[post("/toggle-table")]
async fn toggle_table(state: web::Data<AppState>) -> impl Responder {
    state.bus.publish(Event::ToggleTable);
    HttpResponse::Ok().json(Ack::ok())
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(subscribe).service(toggle_table);
}
