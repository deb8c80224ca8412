use actix_web::{HttpResponse, Responder, post, web};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::AppState;
use crate::bus::Event;
use crate::models::session::PageSnapshot;
use crate::routes::Ack;
use crate::session::extract_session;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtractResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    schedule_id: Option<String>,
    cookies_found: bool,
}

/// `extractPageInfo`: probe a page snapshot for usable session material and
/// persist any schedule id it carries.
#[post("/extract")]
async fn extract(state: web::Data<AppState>, page: web::Json<PageSnapshot>) -> impl Responder {
    match extract_session(&page) {
        Some(session) => {
            if let Some(id) = session.schedule_id.as_deref() {
                if let Err(e) = state.store.set_schedule_id(id).await {
                    warn!("Failed to persist schedule id: {:#}", e);
                }
            }
            HttpResponse::Ok().json(ExtractResponse {
                success: true,
                schedule_id: session.schedule_id,
                cookies_found: true,
            })
        }
        None => HttpResponse::Ok().json(ExtractResponse {
            success: false,
            schedule_id: None,
            cookies_found: false,
        }),
    }
}

#[derive(Debug, Deserialize)]
struct PermissionReport {
    granted: bool,
}

/// The client reports whether it was allowed to read the browser cookie
/// jar. A refusal is broadcast so open surfaces can tell the user.
#[post("/permission")]
async fn permission(
    state: web::Data<AppState>,
    report: web::Json<PermissionReport>,
) -> impl Responder {
    if let Err(e) = state.store.set_cookie_permission(report.granted).await {
        return HttpResponse::InternalServerError().json(Ack::err(e.to_string()));
    }

    if !report.granted {
        state.bus.publish(Event::PermissionDenied {
            permission: "cookies".to_string(),
            message: "Cookie permission denied. Cookie access is required to authenticate \
                      with the visa appointment site."
                .to_string(),
        });
    }

    HttpResponse::Ok().json(Ack::ok())
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(extract).service(permission);
}
