use actix_web::{HttpResponse, Responder, get, web};

#[get("/ping")]
async fn ping() -> impl Responder {
    HttpResponse::Ok().body(concat!("slotwatch ", env!("CARGO_PKG_VERSION")))
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(ping);
}
