use actix_web::{web, HttpResponse};
use metrics::counter;

use crate::state::AppState;

use super::ApiError;

pub async fn transactions_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let address = path.into_inner();
    match state.registry().transactions(&address) {
        Some(observed) => {
            counter!("api_transactions_requests_total", "status" => "ok").increment(1);
            Ok(HttpResponse::Ok().json(observed))
        }
        None => {
            counter!("api_transactions_requests_total", "status" => "not_found").increment(1);
            Err(ApiError::NotFound)
        }
    }
}
