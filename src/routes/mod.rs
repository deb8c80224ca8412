pub mod appointments;
pub mod events;
pub mod health;
pub mod locations;
pub mod log;
pub mod session;

use actix_web::web;
use serde::Serialize;

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").configure(health::init))
        .service(web::scope("/appointments").configure(appointments::init))
        .service(web::scope("/locations").configure(locations::init))
        .service(web::scope("/session").configure(session::init))
        .service(web::scope("/log").configure(log::init))
        .service(web::scope("/events").configure(events::init));
}

/// The `{success, error?}` acknowledgment most actions answer with.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Ack {
    pub fn ok() -> Self {
        Ack {
            success: true,
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Ack {
            success: false,
            error: Some(error.into()),
        }
    }
}
