use anyhow::{anyhow, Result};
use async_trait::async_trait;
use news_notifier::models::{QuoteValue, StatusBody, FETCH_FAILED_MARKER};
use news_notifier::routes::routes;
use news_notifier::services::line::PushClient;
use news_notifier::services::notifier::NewsNotifier;
use news_notifier::services::quote_provider::QuoteProvider;
use std::sync::{Arc, Mutex};
use warp::http::StatusCode;

struct StubProvider {
    usd_jpy: Option<QuoteValue>,
    sp500: Option<QuoteValue>,
}

#[async_trait]
impl QuoteProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn fetch_usd_jpy_rate(&self) -> Result<QuoteValue> {
        self.usd_jpy.ok_or_else(|| anyhow!("network unreachable"))
    }

    async fn fetch_index_price(&self) -> Result<QuoteValue> {
        self.sp500.ok_or_else(|| anyhow!("network unreachable"))
    }
}

#[derive(Default)]
struct StubPush {
    fail_with: Option<&'static str>,
    sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl PushClient for StubPush {
    async fn push_text(&self, to: &str, text: &str) -> Result<()> {
        if let Some(reason) = self.fail_with {
            return Err(anyhow!(reason));
        }
        self.sent.lock().unwrap().push((to.to_string(), text.to_string()));
        Ok(())
    }
}

fn notifier(provider: StubProvider, push: Arc<StubPush>) -> Arc<NewsNotifier> {
    Arc::new(NewsNotifier::new(Arc::new(provider), push, "U-recipient"))
}

fn both_ok() -> StubProvider {
    StubProvider {
        usd_jpy: Some(QuoteValue::fixed(149.8765, 2)),
        sp500: Some(QuoteValue::fixed(512.3, 2)),
    }
}

fn body_of(resp: &warp::http::Response<warp::hyper::body::Bytes>) -> StatusBody {
    serde_json::from_slice(resp.body()).expect("response body is JSON")
}

#[tokio::test]
async fn non_get_methods_are_rejected() {
    for method in ["POST", "PUT", "DELETE", "PATCH"] {
        let push = Arc::new(StubPush::default());
        let api = routes(notifier(both_ok(), push.clone()));

        let resp = warp::test::request()
            .method(method)
            .path("/api/send-news")
            .reply(&api)
            .await;

        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "{}", method);
        assert_eq!(body_of(&resp), StatusBody::new("Method Not Allowed"));
        assert!(push.sent.lock().unwrap().is_empty());
    }
}

#[tokio::test]
async fn get_sends_formatted_message() {
    let push = Arc::new(StubPush::default());
    let api = routes(notifier(both_ok(), push.clone()));

    let resp = warp::test::request()
        .method("GET")
        .path("/api/send-news")
        .reply(&api)
        .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_of(&resp), StatusBody::new("Message sent successfully!"));

    let sent = push.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "U-recipient");
    assert_eq!(
        sent[0].1,
        "【朝の金融ニュース】\n\n・USD/JPY: 149.88 円\n・S&P 500: 512.30"
    );
}

#[tokio::test]
async fn failed_rate_still_sends_with_marker() {
    let push = Arc::new(StubPush::default());
    let provider = StubProvider {
        usd_jpy: None,
        sp500: Some(QuoteValue::fixed(512.3, 2)),
    };
    let api = routes(notifier(provider, push.clone()));

    let resp = warp::test::request().path("/api/send-news").reply(&api).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let sent = push.sent.lock().unwrap();
    assert!(sent[0].1.contains(&format!("USD/JPY: {} 円", FETCH_FAILED_MARKER)));
    assert!(sent[0].1.contains("S&P 500: 512.30"));
}

#[tokio::test]
async fn failed_index_still_sends_with_marker() {
    let push = Arc::new(StubPush::default());
    let provider = StubProvider {
        usd_jpy: Some(QuoteValue::raw(150.25)),
        sp500: None,
    };
    let api = routes(notifier(provider, push.clone()));

    let resp = warp::test::request().path("/api/send-news").reply(&api).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let sent = push.sent.lock().unwrap();
    assert_eq!(
        sent[0].1,
        format!("【朝の金融ニュース】\n\n・USD/JPY: 150.25 円\n・S&P 500: {}", FETCH_FAILED_MARKER)
    );
}

#[tokio::test]
async fn push_failure_is_a_server_error() {
    let push = Arc::new(StubPush {
        fail_with: Some("invalid channel access token"),
        ..StubPush::default()
    });
    let api = routes(notifier(both_ok(), push));

    let resp = warp::test::request().path("/api/send-news").reply(&api).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_of(&resp);
    assert_eq!(body.message, "Internal Server Error");
    assert!(body
        .error
        .expect("error detail present")
        .contains("invalid channel access token"));
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let api = routes(notifier(both_ok(), Arc::new(StubPush::default())));

    let resp = warp::test::request().path("/api/other").reply(&api).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_of(&resp), StatusBody::new("Not Found"));
}
