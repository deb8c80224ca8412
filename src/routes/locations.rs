use std::collections::BTreeMap;

use actix_web::{HttpResponse, Responder, get, put, web};

use crate::AppState;
use crate::routes::Ack;

#[get("")]
async fn get_mappings(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.store.location_mappings().await)
}

/// `updateLocationMappings`: replace the whole id-to-name map.
#[put("")]
async fn put_mappings(
    state: web::Data<AppState>,
    mappings: web::Json<BTreeMap<String, String>>,
) -> impl Responder {
    match state.store.set_location_mappings(mappings.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(Ack::ok()),
        Err(e) => HttpResponse::InternalServerError().json(Ack::err(e.to_string())),
    }
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(get_mappings).service(put_mappings);
}
