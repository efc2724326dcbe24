use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::future::BoxFuture;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use trend_analyzer::routers::create_routes;
use trend_analyzer::services::gemini::{GenerationOptions, ModelReply};
use trend_analyzer::*;

struct EchoModel;

impl GenerativeModel for EchoModel {
    fn generate<'a>(
        &'a self,
        _prompt: &'a str,
        _options: GenerationOptions,
    ) -> BoxFuture<'a, trend_analyzer::Result<ModelReply>> {
        Box::pin(async {
            Ok(ModelReply {
                text: Some(
                    json!({
                        "summary": "汉服风潮席卷短视频平台。",
                        "intelligence": "年轻用户参与度高。",
                        "keywords": ["汉服", "变装"],
                        "sentimentScore": 0.4
                    })
                    .to_string(),
                ),
                grounding_metadata: None,
            })
        })
    }
}

fn test_state() -> AppState {
    AppState {
        analyzer: TrendAnalysisService::with_seed(Arc::new(EchoModel), 12),
        session: AnalysisSessionHolder::new(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_analysis(topic: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/analysis")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "topic": topic }).to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = create_routes(test_state());
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_analysis_endpoint_returns_camel_case_result() {
    let app = create_routes(test_state());
    let response = app.oneshot(post_analysis("汉服变装挑战")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["summary"], "汉服风潮席卷短视频平台。");
    assert_eq!(body["chartData"].as_array().unwrap().len(), 24);
    assert_eq!(body["keySources"].as_array().unwrap().len(), 4);
    assert!(body["metrics"]["peakValue"].as_u64().unwrap() > 0);
    assert_eq!(body["metrics"]["sentimentScore"], 0.4);
    assert!(body["webSources"].as_array().unwrap().is_empty());
    assert!(body.get("imageUrl").is_none());
}

#[tokio::test]
async fn test_blank_topic_is_rejected() {
    let app = create_routes(test_state());
    let response = app.oneshot(post_analysis("   ")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_current_analysis_and_status_follow_session() {
    let state = test_state();

    let response = create_routes(state.clone())
        .oneshot(get("/api/analysis/current"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = create_routes(state.clone())
        .oneshot(post_analysis("赛博长安概念视频"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = create_routes(state.clone())
        .oneshot(get("/api/analysis/current"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["keywords"], json!(["汉服", "变装"]));

    let response = create_routes(state.clone())
        .oneshot(get("/status"))
        .await
        .unwrap();
    let status = body_json(response).await;
    assert_eq!(status["state"], "succeeded");
    assert_eq!(status["current_topic"], "赛博长安概念视频");
    assert_eq!(status["generation"], 1);

    let response = create_routes(state.clone())
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/analysis/current")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = create_routes(state)
        .oneshot(get("/status"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["state"], "idle");
}

#[tokio::test]
async fn test_hot_list_endpoints() {
    let app = create_routes(test_state());
    let response = app.oneshot(get("/api/hot-list/weibo")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let items = body_json(response).await;
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 10);
    assert_eq!(items[0]["platform"], "微博");
    assert_eq!(items[0]["label"], "爆");
    assert_eq!(items[9]["rank"], 10);

    let app = create_routes(test_state());
    let response = app.oneshot(get("/api/hot-list/bilibili")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = create_routes(test_state());
    let response = app.oneshot(get("/api/hot-lists")).await.unwrap();
    let lists = body_json(response).await;
    for name in ["微博", "抖音", "快手"] {
        assert_eq!(lists[name].as_array().unwrap().len(), 10);
    }
}
