use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;

use crate::AppState;
use crate::models::request_log::RequestLogEntry;

#[derive(Debug, Serialize)]
struct LogResponse {
    success: bool,
    log: Vec<RequestLogEntry>,
}

/// `getRequestLog`: the last 20 request outcomes, newest first.
#[get("")]
async fn get_log(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(LogResponse {
        success: true,
        log: state.store.request_log().await,
    })
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(get_log);
}
