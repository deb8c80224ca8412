use actix_web::{HttpResponse, Responder, delete, get, post, web};
use chrono::Utc;

use crate::AppState;
use crate::models::appointment::LocationsPayload;
use crate::models::session::PageSnapshot;
use crate::render::render_table;
use crate::routes::Ack;

/// `getAppointmentData`: the raw store, as a list of records.
#[get("/all")]
async fn all(state: web::Data<AppState>) -> impl Responder {
    let data = state.store.appointment_data().await;
    HttpResponse::Ok().json(LocationsPayload::from_store(&data))
}

/// Rendered rows for the UI surfaces: sorted, earliest-first, bucketed.
#[get("/table")]
async fn table(state: web::Data<AppState>) -> impl Responder {
    let data = state.store.appointment_data().await;
    HttpResponse::Ok().json(render_table(&data, Utc::now().date_naive()))
}

/// `forceDataFetch`: refresh every configured location using session
/// material from the posted page snapshot.
#[post("/refresh")]
async fn refresh(state: web::Data<AppState>, page: web::Json<PageSnapshot>) -> impl Responder {
    match state.fetcher.force_refresh(&page).await {
        Ok(()) => HttpResponse::Accepted().json(Ack::ok()),
        Err(e) => HttpResponse::BadRequest().json(Ack::err(e.to_string())),
    }
}

/// `checkAppointmentsForLocation`.
#[post("/check/{location_id}")]
async fn check(
    state: web::Data<AppState>,
    path: web::Path<String>,
    page: web::Json<PageSnapshot>,
) -> impl Responder {
    let location_id = path.into_inner();
    match state.fetcher.check_location(&location_id, &page).await {
        Ok(()) => HttpResponse::Accepted().json(Ack::ok()),
        Err(e) => HttpResponse::BadRequest().json(Ack::err(e.to_string())),
    }
}

/// `clearAllData`: drop every stored record, keep mappings and settings.
#[delete("/all")]
async fn clear(state: web::Data<AppState>) -> impl Responder {
    match state.store.clear_appointments().await {
        Ok(()) => HttpResponse::Ok().json(Ack::ok()),
        Err(e) => HttpResponse::InternalServerError().json(Ack::err(e.to_string())),
    }
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(all)
        .service(table)
        .service(refresh)
        .service(check)
        .service(clear);
}
