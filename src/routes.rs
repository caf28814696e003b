// src/routes.rs
use std::convert::Infallible;
use std::sync::Arc;
use log::{error, info};
use warp::http::StatusCode;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::error::ApiError;
use crate::handlers::notify::send_news;
use crate::models::StatusBody;
use crate::services::notifier::NewsNotifier;

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, body) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, StatusBody::new("Not Found"))
    } else if let Some(api_error) = err.find::<ApiError>() {
        (api_error.status, api_error.body())
    } else {
        error!("Unhandled rejection: {:?}", err);
        let api_error = ApiError::internal(format!("{:?}", err));
        (api_error.status, api_error.body())
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), code))
}

pub fn routes(
    notifier: Arc<NewsNotifier>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let notifier_filter = warp::any().map(move || notifier.clone());

    // Every method reaches the handler, which answers non-GET with 405.
    let send_news_route = warp::path!("api" / "send-news")
        .and(warp::method())
        .and(notifier_filter)
        .and_then(send_news);

    info!("All routes configured successfully.");

    send_news_route.recover(handle_rejection)
}
