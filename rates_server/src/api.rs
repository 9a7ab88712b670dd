//! HTTP read API.
//!
//! Handlers only read the shared cache; they never wait for a refresh in flight.
//! - `GET /` — liveness string.
//! - `GET /data` — full snapshot view (`DataResponse`).
//! - `GET /tables` — tables-only view (`TablesResponse`).
use actix_web::{HttpResponse, Responder, get, web};

use crate::model::cache::Cache;
use crate::model::response::{DataResponse, StalePolicy, TablesResponse};

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct ApiState {
    /// Cache written by the refresh scheduler.
    pub cache: Cache,
    /// What to serve while the latest attempt failed.
    pub stale_policy: StalePolicy,
}

/// Register the read API routes.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(root).service(data).service(tables);
}

#[get("/")]
async fn root() -> &'static str {
    "Rates service OK"
}

#[get("/data")]
async fn data(state: web::Data<ApiState>) -> impl Responder {
    let snapshot = state.cache.read();
    HttpResponse::Ok().json(DataResponse::from_state(&snapshot, state.stale_policy))
}

#[get("/tables")]
async fn tables(state: web::Data<ApiState>) -> impl Responder {
    let snapshot = state.cache.read();
    let view: TablesResponse = DataResponse::from_state(&snapshot, state.stale_policy).into();
    HttpResponse::Ok().json(view)
}
