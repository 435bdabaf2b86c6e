use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use gitcast::app::{spawn_fetch, App};
use gitcast::client::AnalyticsClient;
use gitcast::config::Config;
use gitcast::types::{Category, FetchState, ForecastModel};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone)]
struct BackendState {
    requests: Arc<Mutex<Vec<Value>>>,
    /// Issues responses are delayed to simulate a slow first request.
    delay_issues: bool,
}

async fn handle_github(State(state): State<BackendState>, Json(body): Json<Value>) -> Json<Value> {
    let data_type = body["dataType"].as_str().unwrap_or("").to_string();
    state
        .requests
        .lock()
        .expect("requests lock")
        .push(body);

    if state.delay_issues && data_type == "issues" {
        tokio::time::sleep(Duration::from_millis(300)).await;
    }

    match data_type.as_str() {
        "issues" => Json(json!({
            "created": [["2024-01", 5], ["2024-02", 8]],
            "closed": [["2024-01", 2]],
            "createdAtImageUrls": { "model_loss_image_url": "https://x/created-loss.png" }
        })),
        "pulls" => Json(json!({
            "pulls": [["2024-02", 7]],
            "pullsImageUrls": { "lstm_generated_image_url": "https://x/pulls-gen.png" }
        })),
        _ => Json(json!({})),
    }
}

async fn spawn_backend(delay_issues: bool) -> (String, Arc<Mutex<Vec<Value>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = BackendState {
        requests: Arc::clone(&requests),
        delay_issues,
    };
    let app = Router::new()
        .route("/api/github", post(handle_github))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), requests)
}

fn setup(origin: &str) -> (Arc<Mutex<App>>, Arc<AnalyticsClient>) {
    let client = Arc::new(AnalyticsClient::new(&Config {
        api_url: origin.to_string(),
        image_url: origin.to_string(),
    }));
    (Arc::new(Mutex::new(App::default())), client)
}

async fn wait_until_settled(app: &Arc<Mutex<App>>) {
    for _ in 0..150 {
        if app.lock().unwrap().fetch_state != FetchState::Loading {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("fetch never completed");
}

#[tokio::test]
async fn full_workflow() {
    let (origin, requests) = spawn_backend(false).await;
    let (app, client) = setup(&origin);

    {
        let mut state = app.lock().unwrap();
        assert_eq!(state.fetch_state, FetchState::Idle);
        assert!(state.stats.is_empty());
        spawn_fetch(&mut state, Arc::clone(&app), Arc::clone(&client));
        assert_eq!(state.fetch_state, FetchState::Loading);
    }
    wait_until_settled(&app).await;

    let state = app.lock().unwrap();
    assert_eq!(state.fetch_state, FetchState::Ready);
    assert_eq!(
        state.stats.created,
        vec![("2024-01".to_string(), 5), ("2024-02".to_string(), 8)]
    );
    assert_eq!(
        state
            .stats
            .created_image_urls
            .model_loss_image_url
            .as_deref(),
        Some("https://x/created-loss.png")
    );
    assert!(state.chart_needs_update);

    let bodies = requests.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["repository"], "meta-llama/llama3");
    assert_eq!(bodies[0]["dataType"], "issues");
    assert_eq!(bodies[0]["modelType"], "lstm");
}

#[tokio::test]
async fn selection_change_fetches_with_current_full_selection() {
    let (origin, requests) = spawn_backend(false).await;
    let (app, client) = setup(&origin);

    {
        let mut state = app.lock().unwrap();
        assert!(state.select_repository("ollama/ollama"));
        assert!(state.select_category(Category::Pulls));
        assert!(state.select_model(ForecastModel::Statsmodel));
        spawn_fetch(&mut state, Arc::clone(&app), Arc::clone(&client));
    }
    wait_until_settled(&app).await;

    let bodies = requests.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0],
        json!({
            "repository": "ollama/ollama",
            "dataType": "pulls",
            "modelType": "statsmodel"
        })
    );
}

#[tokio::test]
async fn last_request_wins_when_responses_arrive_out_of_order() {
    let (origin, requests) = spawn_backend(true).await;
    let (app, client) = setup(&origin);

    // First fetch: issues, which the backend answers slowly.
    {
        let mut state = app.lock().unwrap();
        spawn_fetch(&mut state, Arc::clone(&app), Arc::clone(&client));
    }
    // Second fetch: pulls, answered immediately.
    {
        let mut state = app.lock().unwrap();
        assert!(state.select_category(Category::Pulls));
        spawn_fetch(&mut state, Arc::clone(&app), Arc::clone(&client));
    }

    // Wait long enough for both responses, including the delayed one.
    tokio::time::sleep(Duration::from_millis(600)).await;

    let state = app.lock().unwrap();
    assert_eq!(requests.lock().unwrap().len(), 2);
    assert_eq!(state.fetch_state, FetchState::Ready);
    // The pulls result must survive the late-arriving issues response.
    assert_eq!(state.stats.pulls, vec![("2024-02".to_string(), 7)]);
    assert!(state.stats.created.is_empty());
}

#[tokio::test]
async fn backend_error_leaves_empty_stats_and_failed_state() {
    // Nothing is listening on this port.
    let (app, client) = setup("http://127.0.0.1:1");

    {
        let mut state = app.lock().unwrap();
        spawn_fetch(&mut state, Arc::clone(&app), Arc::clone(&client));
    }
    wait_until_settled(&app).await;

    let state = app.lock().unwrap();
    assert!(matches!(state.fetch_state, FetchState::Failed(_)));
    assert!(state.stats.is_empty());
    // A failed fetch keeps the dashboard usable: the next selection change
    // simply issues a fresh request.
}
