// tests/api_tests.rs

use std::sync::Arc;

use quizgate::{bank::PYTHON_BASICS, config::Config, routes, state::AppState, store::SqliteUserStore};
use reqwest::{Client, StatusCode, redirect::Policy};

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    // 1. Fresh in-memory account store with migrations applied
    let store = SqliteUserStore::in_memory()
        .await
        .expect("Failed to open in-memory store");

    // 2. Create test configuration and state
    let config = Config {
        secret_key: "test_secret_for_integration_tests".to_string(),
        session_ttl_secs: 600,
        rust_log: "error".to_string(),
        ..Config::default()
    };

    let state = AppState::new(Arc::new(store), config);

    // 3. Create the router with the app state
    let app = routes::create_router(state);

    // 4. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // 5. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// Redirects are asserted on, not followed.
fn client() -> Client {
    Client::builder().redirect(Policy::none()).build().unwrap()
}

fn unique_name() -> String {
    format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8])
}

async fn register(client: &Client, address: &str, username: &str, password: &str) -> StatusCode {
    client
        .post(format!("{}/register", address))
        .form(&[("username", username), ("password", password)])
        .send()
        .await
        .expect("Register failed")
        .status()
}

async fn login(client: &Client, address: &str, username: &str, password: &str) -> String {
    let body: serde_json::Value = client
        .post(format!("{}/login", address))
        .form(&[("username", username), ("password", password)])
        .send()
        .await
        .expect("Login failed")
        .json()
        .await
        .expect("Failed to parse login json");

    body["token"].as_str().expect("Token not found").to_string()
}

/// Form answering the first `correct` questions right and the rest wrong.
fn answers(correct: usize) -> Vec<(String, String)> {
    PYTHON_BASICS
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let index = if i < correct {
                q.correct_index
            } else {
                (q.correct_index + 1) % q.options.len()
            };
            (format!("q{}", q.id), index.to_string())
        })
        .collect()
}

async fn submit(client: &Client, address: &str, token: &str, correct: usize) -> reqwest::Response {
    client
        .post(format!("{}/submit", address))
        .bearer_auth(token)
        .form(&answers(correct))
        .send()
        .await
        .expect("Submit failed")
}

async fn home(client: &Client, address: &str, token: &str) -> serde_json::Value {
    client
        .get(format!("{}/", address))
        .bearer_auth(token)
        .send()
        .await
        .expect("Home failed")
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_check_404() {
    let address = spawn_app().await;

    let response = client()
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn anonymous_home_shows_new() {
    let address = spawn_app().await;

    let body: serde_json::Value = client()
        .get(format!("{}/", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "new");
    assert_eq!(body["total"], 10);
    assert_eq!(body["pass_mark"], 5);
    assert!(body["username"].is_null());
}

#[tokio::test]
async fn register_twice_conflicts() {
    let address = spawn_app().await;
    let client = client();
    let name = unique_name();

    assert_eq!(register(&client, &address, &name, "pw1").await, StatusCode::CREATED);
    assert_eq!(
        register(&client, &address, &name.to_uppercase(), "pw2").await,
        StatusCode::CONFLICT
    );

    // The first registration still logs in.
    let token = login(&client, &address, &name, "pw1").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn register_rejects_blank_fields() {
    let address = spawn_app().await;

    assert_eq!(
        register(&client(), &address, "   ", "pw").await,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn login_failures_share_one_error() {
    let address = spawn_app().await;
    let client = client();
    let name = unique_name();
    register(&client, &address, &name, "secret").await;

    let mut messages = Vec::new();
    for (user, pass) in [(name.as_str(), "wrong"), ("nobody_here", "secret")] {
        let response = client
            .post(format!("{}/login", address))
            .form(&[("username", user), ("password", pass)])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["redirect"], "/login");
        messages.push(body["error"].clone());
    }
    assert_eq!(messages[0], messages[1]);
}

#[tokio::test]
async fn quiz_requires_login() {
    let address = spawn_app().await;

    let response = client()
        .get(format!("{}/quiz", address))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["redirect"], "/login");
}

#[tokio::test]
async fn quiz_hides_answers_and_advertises_deadline() {
    let address = spawn_app().await;
    let client = client();
    let name = unique_name();
    register(&client, &address, &name, "pw").await;
    let token = login(&client, &address, &name, "pw").await;

    let response = client
        .get(format!("{}/quiz", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("set-cookie").is_some());

    let body: serde_json::Value = response.json().await.unwrap();
    let questions = body["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 10);
    assert!(questions[0].get("correct_index").is_none());
    assert_eq!(body["duration_seconds"], 600);
    assert!(body["deadline"].is_string());
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn fail_restart_pass_flow() {
    let address = spawn_app().await;
    let client = client();
    let name = unique_name();
    register(&client, &address, &name, "pw").await;
    let token = login(&client, &address, &name, "pw").await;

    // 1. Four correct answers fail
    let report: serde_json::Value = submit(&client, &address, &token, 4)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(report["score"], 4);
    assert_eq!(report["passed"], false);
    assert_eq!(report["questions"].as_array().unwrap().len(), 10);
    assert_eq!(home(&client, &address, &token).await["status"], "failed");

    // 2. Restart sends the user back to the quiz, keeping the score
    let restart = client
        .get(format!("{}/restart", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(restart.status(), StatusCode::SEE_OTHER);
    assert_eq!(restart.headers()["location"], "/quiz");

    let status = home(&client, &address, &token).await;
    assert_eq!(status["status"], "new");
    assert_eq!(status["last_score"], 4);

    // 3. Six correct answers pass
    let report: serde_json::Value = submit(&client, &address, &token, 6)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(report["score"], 6);
    assert_eq!(report["passed"], true);

    let status = home(&client, &address, &token).await;
    assert_eq!(status["status"], "passed");
    assert_eq!(status["last_score"], 6);
}

#[tokio::test]
async fn passed_account_is_sent_home() {
    let address = spawn_app().await;
    let client = client();
    let name = unique_name();
    register(&client, &address, &name, "pw").await;
    let token = login(&client, &address, &name, "pw").await;

    let report: serde_json::Value = submit(&client, &address, &token, 5)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(report["passed"], true);

    // Resubmission is not scored
    let again = submit(&client, &address, &token, 0).await;
    assert_eq!(again.status(), StatusCode::SEE_OTHER);
    assert_eq!(again.headers()["location"], "/");

    for path in ["/quiz", "/restart"] {
        let response = client
            .get(format!("{}{}", address, path))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", path);
        assert_eq!(response.headers()["location"], "/");
    }

    let status = home(&client, &address, &token).await;
    assert_eq!(status["status"], "passed");
    assert_eq!(status["last_score"], 5);
}

#[tokio::test]
async fn non_numeric_answer_is_rejected() {
    let address = spawn_app().await;
    let client = client();
    let name = unique_name();
    register(&client, &address, &name, "pw").await;
    let token = login(&client, &address, &name, "pw").await;

    let response = client
        .post(format!("{}/submit", address))
        .bearer_auth(&token)
        .form(&[("q1", "def")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(home(&client, &address, &token).await["status"], "new");
}

#[tokio::test]
async fn conflicting_answers_for_one_question_are_rejected() {
    let address = spawn_app().await;
    let client = client();
    let name = unique_name();
    register(&client, &address, &name, "pw").await;
    let token = login(&client, &address, &name, "pw").await;

    let response = client
        .post(format!("{}/submit", address))
        .bearer_auth(&token)
        .form(&[("q1", "0"), ("1", "3")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(home(&client, &address, &token).await["status"], "new");
}
