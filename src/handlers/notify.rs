// src/handlers/notify.rs
use log::{error, info, warn};
use std::sync::Arc;
use warp::http::{Method, StatusCode};
use warp::reply::with_status;
use warp::Rejection;

use crate::models::StatusBody;
use crate::services::notifier::NewsNotifier;

use super::error::ApiError;

pub async fn send_news(
    method: Method,
    notifier: Arc<NewsNotifier>,
) -> Result<impl warp::Reply, Rejection> {
    if method != Method::GET {
        warn!("Rejecting {} request to send-news", method);
        return Err(warp::reject::custom(ApiError::method_not_allowed()));
    }

    info!("Handling request to send morning news via {}", notifier.provider_name());
    match notifier.send_news().await {
        Ok(_) => Ok(with_status(
            warp::reply::json(&StatusBody::new("Message sent successfully!")),
            StatusCode::OK,
        )),
        Err(e) => {
            error!("Error in handler: {:#}", e);
            Err(warp::reject::custom(ApiError::internal(format!("{:#}", e))))
        }
    }
}
