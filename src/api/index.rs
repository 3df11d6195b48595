//! Static web interface

use actix_web::{HttpResponse, Responder, get};

const INDEX_HTML: &str = include_str!("../../static/index.html");
const SCRIPT_JS: &str = include_str!("../../static/script.js");

/// Serve the main web interface
#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

#[get("/static/script.js")]
pub async fn script() -> impl Responder {
    HttpResponse::Ok()
        .content_type("application/javascript; charset=utf-8")
        .body(SCRIPT_JS)
}

/// Configure static page routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(index).service(script);
}
