use assessment_backend::{
    build_router, config::Config, services::question_bank::QuestionBank, AppState,
};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

const BANK: &str = r#"{
    "Python": [
        {"question": "p1", "options": ["right", "wrong", "wrong"], "correctAnswer": 0},
        {"question": "p2", "options": ["right", "wrong"], "correctAnswer": "right"},
        {"question": "p3", "options": ["right", "wrong", "wrong", "wrong"], "correctAnswer": 0},
        {"question": "p4", "options": ["right", "wrong"], "correctAnswer": "right"}
    ],
    "Rust": [
        {"question": "r1", "options": ["right", "wrong"], "correctAnswer": 0}
    ],
    "Broken": [
        {"question": "b1", "options": ["a", "b"], "correctAnswer": "c"}
    ]
}"#;

fn setup_app() -> (Router, tempfile::TempDir) {
    let uploads = tempfile::tempdir().expect("tempdir");
    let config = Config {
        uploads_dir: uploads.path().to_string_lossy().into_owned(),
        static_dir: uploads.path().join("no-static").to_string_lossy().into_owned(),
        public_rps: 10_000,
        ..Config::default()
    };
    let bank = QuestionBank::from_json(BANK).expect("bank");
    let state = AppState::new(&config, bank);
    (build_router(state, &config), uploads)
}

struct Client {
    app: Router,
    cookie: Option<String>,
}

impl Client {
    fn new(app: Router) -> Self {
        Self { app, cookie: None }
    }

    async fn call(
        &mut self,
        method: &str,
        uri: &str,
        body: Option<JsonValue>,
    ) -> (StatusCode, JsonValue) {
        match body {
            Some(b) => {
                let ct = Some("application/json");
                self.send(method, uri, ct, b.to_string()).await
            }
            None => self.send(method, uri, None, String::new()).await,
        }
    }

    async fn send(
        &mut self,
        method: &str,
        uri: &str,
        content_type: Option<&str>,
        body: String,
    ) -> (StatusCode, JsonValue) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        let req = builder.body(Body::from(body)).unwrap();
        let resp = self.app.clone().oneshot(req).await.unwrap();
        if let Some(set) = resp.headers().get(header::SET_COOKIE) {
            let pair = set.to_str().unwrap().split(';').next().unwrap().to_string();
            self.cookie = Some(pair);
        }
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        let body = if bytes.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn get(&mut self, uri: &str) -> (StatusCode, JsonValue) {
        self.call("GET", uri, None).await
    }

    async fn post(&mut self, uri: &str, body: JsonValue) -> (StatusCode, JsonValue) {
        self.call("POST", uri, Some(body)).await
    }
}

#[tokio::test]
async fn lists_bank_languages() {
    let (app, _dir) = setup_app();
    let mut client = Client::new(app);
    let (status, body) = client.get("/api/languages").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["languages"], json!(["Broken", "Python", "Rust"]));
}

#[tokio::test]
async fn quiz_flow_end_to_end() {
    let (app, _dir) = setup_app();
    let mut client = Client::new(app);

    let (status, body) = client
        .post("/api/start", json!({"languages": ["Python"], "perLanguage": 3}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["total"], json!(3));
    assert_eq!(body["languages"], json!(["Python"]));
    assert!(client.cookie.is_some());

    let (status, state) = client.get("/api/state").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["currentIndex"], json!(0));
    assert_eq!(state["total"], json!(3));
    assert_eq!(state["progress"], json!(0));
    assert_eq!(state["submitted"], json!(false));
    assert_eq!(state["selectedAnswer"], JsonValue::Null);
    assert_eq!(state["question"]["language"], json!("Python"));
    assert_eq!(state["question"]["timeLimit"], json!(60));

    let mut ids = Vec::new();
    for step in 0..3 {
        let (_, state) = client.get("/api/state").await;
        ids.push(state["question"]["id"].as_str().unwrap().to_string());
        if step < 2 {
            let (_, nav) = client.post("/api/navigate", json!({"direction": "next"})).await;
            assert_eq!(nav["currentIndex"], json!(step + 1));
        }
    }
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(sorted, vec!["Python-1", "Python-2", "Python-3"]);

    // Two right, one wrong.
    for (i, id) in ids.iter().enumerate() {
        let pick = if i == 0 { 1 } else { 0 };
        let (status, body) = client
            .post("/api/answer", json!({"questionId": id, "answerIndex": pick}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true}));
    }
    let (_, state) = client.get("/api/state").await;
    assert_eq!(state["progress"], json!(100));
    assert_eq!(state["selectedAnswer"], json!(0));

    let (status, first) = client.post("/api/submit", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["score"], json!(67));
    assert_eq!(first["total"], json!(3));
    assert_eq!(first["passed"], json!(true));
    assert_eq!(first["threshold"], json!(60));
    assert_eq!(first["perLangStats"]["Python"], json!({"correct": 2, "total": 3}));

    let (_, second) = client.post("/api/submit", json!({})).await;
    assert_eq!(first, second);

    let (status, result) = client.get("/api/result").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result, first);

    let (status, review) = client.get("/api/review").await;
    assert_eq!(status, StatusCode::OK);
    let items = review["review"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    for item in items {
        let same = item["yourAnswer"] == item["correctAnswer"];
        assert_eq!(item["isCorrect"], json!(same));
        assert_eq!(item["correctAnswer"], json!("right"));
    }
    let wrong = items.iter().find(|i| i["id"] == json!(ids[0])).unwrap();
    assert_eq!(wrong["yourAnswer"], json!("wrong"));
    assert_eq!(wrong["isCorrect"], json!(false));
}

#[tokio::test]
async fn operations_before_start_are_state_errors() {
    let (app, _dir) = setup_app();
    let mut client = Client::new(app);

    let (status, body) = client.get("/api/state").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Quiz not started"));

    let (status, _) = client.post("/api/navigate", json!({"direction": "next"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = client.post("/api/submit", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = client.get("/api/result").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("No result yet"));
}

#[tokio::test]
async fn review_before_submit_is_rejected() {
    let (app, _dir) = setup_app();
    let mut client = Client::new(app);
    client.post("/api/start", json!({"languages": ["Rust"]})).await;

    let (status, body) = client.get("/api/review").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("No review available"));
    let (status, _) = client.get("/api/result").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn start_validates_languages() {
    let (app, _dir) = setup_app();
    let mut client = Client::new(app);

    let (status, body) = client.post("/api/start", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("No languages selected or detected"));

    let (status, body) = client.post("/api/start", json!({"languages": ["Cobol"]})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("No questions found for selected languages"));

    let (status, body) = client
        .post("/api/start", json!({"languages": ["Cobol", "Rust"], "perLanguage": "9"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(1));
}

#[tokio::test]
async fn invalid_answers_are_rejected_without_side_effects() {
    let (app, _dir) = setup_app();
    let mut client = Client::new(app);
    client.post("/api/start", json!({"languages": ["Rust"]})).await;

    let (status, body) = client
        .post("/api/answer", json!({"questionId": "Rust-1", "answerIndex": 2}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Invalid answerIndex"));

    let (status, _) = client
        .post("/api/answer", json!({"questionId": "Rust-1", "answerIndex": "0"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = client
        .post("/api/answer", json!({"questionId": "Rust-9", "answerIndex": 0}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Invalid questionId"));

    let (_, state) = client.get("/api/state").await;
    assert_eq!(state["progress"], json!(0));
    assert_eq!(state["selectedAnswer"], JsonValue::Null);
}

#[tokio::test]
async fn navigation_stays_within_bounds() {
    let (app, _dir) = setup_app();
    let mut client = Client::new(app);
    client
        .post("/api/start", json!({"languages": ["Python"], "perLanguage": 2}))
        .await;

    let (_, nav) = client.post("/api/navigate", json!({"direction": "prev"})).await;
    assert_eq!(nav["currentIndex"], json!(0));
    let (_, nav) = client.post("/api/navigate", json!({"direction": "next"})).await;
    assert_eq!(nav["currentIndex"], json!(1));
    let (_, nav) = client.post("/api/navigate", json!({"direction": "next"})).await;
    assert_eq!(nav["currentIndex"], json!(1));
    let (status, nav) = client.post("/api/navigate", json!({"direction": "up"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(nav["currentIndex"], json!(1));
}

#[tokio::test]
async fn answers_after_submit_are_refused() {
    let (app, _dir) = setup_app();
    let mut client = Client::new(app);
    client.post("/api/start", json!({"languages": ["Rust"], "threshold": 50})).await;
    let (_, submitted) = client.post("/api/submit", json!({})).await;
    assert_eq!(submitted["score"], json!(0));
    assert_eq!(submitted["passed"], json!(false));

    let (status, body) = client
        .post("/api/answer", json!({"questionId": "Rust-1", "answerIndex": 0}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Quiz already submitted"));

    let (_, result) = client.get("/api/result").await;
    assert_eq!(result["score"], json!(0));
    let (_, state) = client.get("/api/state").await;
    assert_eq!(state["submitted"], json!(true));
}

#[tokio::test]
async fn unresolvable_bank_answers_cannot_be_won() {
    let (app, _dir) = setup_app();
    let mut client = Client::new(app);
    client.post("/api/start", json!({"languages": ["Broken"]})).await;
    for pick in 0..2 {
        client
            .post("/api/answer", json!({"questionId": "Broken-1", "answerIndex": pick}))
            .await;
    }
    let (_, result) = client.post("/api/submit", json!({})).await;
    assert_eq!(result["score"], json!(0));

    let (_, review) = client.get("/api/review").await;
    assert_eq!(review["review"][0]["correctAnswer"], JsonValue::Null);
    assert_eq!(review["review"][0]["isCorrect"], json!(false));
}

#[tokio::test]
async fn sessions_do_not_share_quizzes() {
    let (app, _dir) = setup_app();
    let mut alice = Client::new(app.clone());
    let mut bob = Client::new(app);

    alice.post("/api/start", json!({"languages": ["Rust"]})).await;
    let (status, _) = alice.get("/api/state").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = bob.get("/api/state").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_ne!(alice.cookie, bob.cookie);
}

#[tokio::test]
async fn restarting_replaces_the_previous_quiz() {
    let (app, _dir) = setup_app();
    let mut client = Client::new(app);
    client.post("/api/start", json!({"languages": ["Rust"]})).await;
    client.post("/api/submit", json!({})).await;

    let (status, body) = client
        .post("/api/start", json!({"languages": ["Python"], "perLanguage": 4}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(4));
    let (_, state) = client.get("/api/state").await;
    assert_eq!(state["submitted"], json!(false));
    assert_eq!(state["progress"], json!(0));
}

#[tokio::test]
async fn unreadable_bodies_get_json_errors() {
    let (app, _dir) = setup_app();
    let mut client = Client::new(app);

    let (status, body) = client
        .send("POST", "/api/start", Some("application/json"), "{not json".to_string())
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = client
        .send("POST", "/api/start", None, r#"{"languages":["Rust"]}"#.to_string())
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = client
        .send("POST", "/api/navigate", Some("application/json"), "[".to_string())
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn wrongly_typed_fields_reach_field_validation() {
    let (app, _dir) = setup_app();
    let mut client = Client::new(app);
    let (status, _) = client.post("/api/start", json!({"languages": ["Rust"]})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = client
        .post("/api/answer", json!({"questionId": 5, "answerIndex": 0}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid questionId"}));

    let (status, body) = client
        .post("/api/answer", json!({"questionId": "Rust-1", "answerIndex": "zero"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid answerIndex"}));

    let (status, body) = client.post("/api/navigate", json!({"direction": 7})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currentIndex"], json!(0));
}
