use actix_web::{web, HttpResponse};
use metrics::counter;
use serde::{Deserialize, Serialize};
use strum_macros::AsRefStr;

use crate::state::AppState;

use super::ApiError;

#[derive(Debug, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub address: String,
}

#[derive(Debug, Clone, Copy, AsRefStr)]
#[strum(serialize_all = "snake_case")]
enum SubscribeStatus {
    Subscribed,
    AlreadySubscribed,
}

pub async fn subscribe_handler(
    state: web::Data<AppState>,
    payload: web::Json<SubscribeRequest>,
) -> Result<HttpResponse, ApiError> {
    let address = &payload.address;
    if !state.registry().subscribe(address) {
        let status = SubscribeStatus::AlreadySubscribed.as_ref().to_owned();
        counter!("api_subscribe_requests_total", "status" => status).increment(1);
        return Err(ApiError::AlreadySubscribed);
    }

    let status = SubscribeStatus::Subscribed.as_ref().to_owned();
    counter!("api_subscribe_requests_total", "status" => status).increment(1);
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(format!("Successfully subscribed to address: {address}\n")))
}
