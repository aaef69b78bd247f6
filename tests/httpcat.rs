//! `/httpcat` behaviour against a mock image upstream.

use axum::http::{Method, StatusCode};
use newscat_proxy::config::CheckMethod;
use newscat_proxy::validation::CodeFormat;

mod common;

use common::{get, router, start_mock_backend, start_programmable_backend, test_config, MockUpstream};

/// Image upstream that only knows codes listed in `known`.
async fn image_upstream(known: &'static [u16]) -> MockUpstream {
    start_programmable_backend(move |_, uri| {
        let code: u16 = uri.path().trim_start_matches('/').parse().unwrap_or(0);
        if known.contains(&code) {
            (200, "{}".to_string())
        } else {
            (404, "{}".to_string())
        }
    })
    .await
}

async fn cat_router(images: &MockUpstream, format: CodeFormat) -> axum::Router {
    let news = start_mock_backend(200, "{}").await;
    let mut config = test_config(news.url("/v2/everything"), images.url(""), Some("k"));
    config.validation.code_format = format;
    router(config)
}

#[tokio::test]
async fn test_known_code_returns_image() {
    let images = image_upstream(&[404]).await;
    let app = cat_router(&images, CodeFormat::ThreeDigits).await;

    let (status, body) = get(&app, "/httpcat/404").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["code"], 404);
    assert_eq!(body["imageUrl"], images.url("/404"));
    assert_eq!(body["message"], "HTTP Status 404");
    assert_eq!(images.calls(), 1);
}

#[tokio::test]
async fn test_every_valid_code_checks_upstream_once() {
    static KNOWN: [u16; 6] = [100, 200, 404, 418, 500, 599];
    let images = image_upstream(&KNOWN).await;
    let app = cat_router(&images, CodeFormat::ThreeDigits).await;

    for code in 100u16..=599 {
        let before = images.calls();
        let (status, body) = get(&app, &format!("/httpcat/{code}")).await;
        assert_eq!(images.calls(), before + 1, "code {code}");

        if KNOWN.contains(&code) {
            assert_eq!(status, StatusCode::OK, "code {code}");
            assert_eq!(body["code"], code);
        } else {
            assert_eq!(status, StatusCode::NOT_FOUND, "code {code}");
            assert_eq!(body["error"], "Imagen no encontrada para este código HTTP");
        }
    }
}

#[tokio::test]
async fn test_invalid_codes_never_reach_upstream() {
    let images = image_upstream(&[200]).await;
    let app = cat_router(&images, CodeFormat::ThreeDigits).await;

    for raw in ["99", "099", "600", "1000", "abc", "-20", "20a", "%20200", "+200"] {
        let (status, body) = get(&app, &format!("/httpcat/{raw}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "input {raw}");
        assert_eq!(body["ejemplo"], "/httpcat/404");
        assert!(body["error"].is_string());
    }
    assert_eq!(images.calls(), 0);
}

#[tokio::test]
async fn test_numeric_mode_accepts_loose_input() {
    let images = image_upstream(&[200]).await;
    let app = cat_router(&images, CodeFormat::Numeric).await;

    let (status, body) = get(&app, "/httpcat/%20200").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 200);
    assert_eq!(body["imageUrl"], images.url("/200"));

    let (status, body) = get(&app, "/httpcat/099").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "outOfRange");
    assert_eq!(images.calls(), 1);
}

#[tokio::test]
async fn test_query_parameter_form() {
    let images = image_upstream(&[503]).await;
    let app = cat_router(&images, CodeFormat::ThreeDigits).await;

    let (status, body) = get(&app, "/httpcat?code=503").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 503);

    let (status, body) = get(&app, "/httpcat").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalidFormat");
    assert_eq!(images.calls(), 1);
}

#[tokio::test]
async fn test_head_check_method() {
    let images = image_upstream(&[301]).await;
    let news = start_mock_backend(200, "{}").await;
    let mut config = test_config(news.url("/v2/everything"), images.url(""), None);
    config.image.check_method = CheckMethod::Head;
    let app = router(config);

    let (status, _) = get(&app, "/httpcat/301").await;
    assert_eq!(status, StatusCode::OK);
    let (method, uri) = images.last_request().unwrap();
    assert_eq!(method, Method::HEAD);
    assert_eq!(uri.path(), "/301");
}

#[tokio::test]
async fn test_unreachable_image_upstream_is_not_found() {
    let dead = common::closed_addr().await;
    let news = start_mock_backend(200, "{}").await;
    let app = router(test_config(news.url("/v2/everything"), format!("http://{dead}"), None));

    let (status, body) = get(&app, "/httpcat/200").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "imageNotFound");
}

#[tokio::test]
async fn test_undecodable_segment_is_invalid_format() {
    let images = image_upstream(&[200]).await;
    let app = cat_router(&images, CodeFormat::ThreeDigits).await;

    let (status, body) = get(&app, "/httpcat/%FF").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Código HTTP inválido");
    assert_eq!(body["code"], "invalidFormat");
    assert_eq!(body["ejemplo"], "/httpcat/404");
    assert_eq!(images.calls(), 0);
}
