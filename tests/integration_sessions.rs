mod common;

use common::{TestContext, unique_email};
use serde_json::{Value, json};

async fn create_draft(context: &TestContext, token: &str, title: &str) -> Value {
    let (status, body) = context
        .post(
            "/api/sessions/save-draft",
            Some(token),
            json!({
                "title": title,
                "tags": ["yoga", "calm"],
                "jsonFileUrl": "http://x/1.json"
            }),
        )
        .await;
    assert_eq!(status, 201, "Draft creation failed: {}", body);
    body
}

#[tokio::test]
async fn test_draft_publish_and_public_listing() {
    let context = TestContext::start().await;
    let email = unique_email("author");
    let token = context.register(&email).await;

    let draft = create_draft(&context, &token, "Yoga").await;
    assert_eq!(draft["status"], "draft");
    assert_eq!(draft["title"], "Yoga");
    assert_eq!(draft["jsonFileUrl"], "http://x/1.json");
    assert!(draft["createdAt"].is_string());
    assert!(draft["updatedAt"].is_string());
    let id = draft["id"].as_str().unwrap().to_string();

    let (status, public) = context.get("/api/sessions", None).await;
    assert_eq!(status, 200);
    assert!(!public.as_array().unwrap().iter().any(|s| s["id"] == id.as_str()));

    let (status, published) = context
        .post(
            "/api/sessions/publish",
            Some(&token),
            json!({ "sessionId": id }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(published["status"], "published");

    let (_, public) = context.get("/api/sessions", None).await;
    let listed = public
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"] == id.as_str())
        .cloned()
        .unwrap();
    assert_eq!(listed["user"]["email"], email.as_str());
    assert_eq!(listed["user"].as_object().unwrap().len(), 1);
    assert_eq!(listed["tags"], json!(["yoga", "calm"]));

    let (status, own) = context.get("/api/sessions/my-sessions", Some(&token)).await;
    assert_eq!(status, 200);
    assert_eq!(own.as_array().unwrap().len(), 1);
    assert!(own[0]["user"].is_string());
}

#[tokio::test]
async fn test_update_keeps_omitted_fields_and_returns_to_draft() {
    let context = TestContext::start().await;
    let token = context.register(&unique_email("update")).await;
    let id = create_draft(&context, &token, "Yoga").await["id"].clone();

    context
        .post("/api/sessions/publish", Some(&token), json!({ "sessionId": id }))
        .await;

    let (status, updated) = context
        .post(
            "/api/sessions/save-draft",
            Some(&token),
            json!({ "sessionId": id, "title": "Evening Yoga" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(updated["id"], id);
    assert_eq!(updated["title"], "Evening Yoga");
    assert_eq!(updated["tags"], json!(["yoga", "calm"]));
    assert_eq!(updated["jsonFileUrl"], "http://x/1.json");
    assert_eq!(updated["status"], "draft");

    let (_, public) = context.get("/api/sessions", None).await;
    assert!(!public.as_array().unwrap().iter().any(|s| s["id"] == id));

    // Publishing again is allowed and idempotent.
    for _ in 0..2 {
        let (status, body) = context
            .post("/api/sessions/publish", Some(&token), json!({ "sessionId": id }))
            .await;
        assert_eq!(status, 200);
        assert_eq!(body["status"], "published");
    }
}

#[tokio::test]
async fn test_blank_fields_do_not_overwrite() {
    let context = TestContext::start().await;
    let token = context.register(&unique_email("blank")).await;
    let id = create_draft(&context, &token, "Yoga").await["id"].clone();

    let (status, updated) = context
        .post(
            "/api/sessions/save-draft",
            Some(&token),
            json!({ "sessionId": id, "title": "  ", "jsonFileUrl": "", "tags": [] }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(updated["title"], "Yoga");
    assert_eq!(updated["jsonFileUrl"], "http://x/1.json");
    assert_eq!(updated["tags"], json!([]));
}

#[tokio::test]
async fn test_create_requires_title_and_url() {
    let context = TestContext::start().await;
    let token = context.register(&unique_email("required")).await;

    let (status, body) = context
        .post(
            "/api/sessions/save-draft",
            Some(&token),
            json!({ "jsonFileUrl": "http://x/1.json" }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Please provide a title");

    let (status, body) = context
        .post("/api/sessions/save-draft", Some(&token), json!({ "title": "Yoga" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Please provide a JSON file URL");
}

#[tokio::test]
async fn test_other_users_cannot_touch_a_session() {
    let context = TestContext::start().await;
    let owner = context.register(&unique_email("owner")).await;
    let intruder = context.register(&unique_email("intruder")).await;
    let id = create_draft(&context, &owner, "Private").await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = context
        .get(&format!("/api/sessions/my-sessions/{}", id), Some(&intruder))
        .await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "Not authorized");

    let (status, _) = context
        .post(
            "/api/sessions/save-draft",
            Some(&intruder),
            json!({ "sessionId": id, "title": "Mine now" }),
        )
        .await;
    assert_eq!(status, 401);

    let (status, _) = context
        .post("/api/sessions/publish", Some(&intruder), json!({ "sessionId": id }))
        .await;
    assert_eq!(status, 401);

    let (status, session) = context
        .get(&format!("/api/sessions/my-sessions/{}", id), Some(&owner))
        .await;
    assert_eq!(status, 200);
    assert_eq!(session["title"], "Private");
    assert_eq!(session["status"], "draft");

    let (_, own) = context.get("/api/sessions/my-sessions", Some(&intruder)).await;
    assert!(own.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_and_malformed_ids() {
    let context = TestContext::start().await;
    let token = context.register(&unique_email("ids")).await;
    let missing = uuid::Uuid::new_v4();

    for path in [
        format!("/api/sessions/my-sessions/{}", missing),
        "/api/sessions/my-sessions/not-an-id".to_string(),
    ] {
        let (status, body) = context.get(&path, Some(&token)).await;
        assert_eq!(status, 404);
        assert_eq!(body["error"], "Session not found");
    }

    let (status, _) = context
        .post(
            "/api/sessions/publish",
            Some(&token),
            json!({ "sessionId": missing.to_string() }),
        )
        .await;
    assert_eq!(status, 404);

    let (status, _) = context
        .post(
            "/api/sessions/save-draft",
            Some(&token),
            json!({ "sessionId": missing.to_string(), "title": "Ghost" }),
        )
        .await;
    assert_eq!(status, 404);

    let (status, body) = context
        .post("/api/sessions/publish", Some(&token), json!({}))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Session ID is required");
}

#[tokio::test]
async fn test_listings_keep_creation_order() {
    let context = TestContext::start().await;
    let token = context.register(&unique_email("order")).await;

    let mut ids = Vec::new();
    for title in ["First", "Second", "Third"] {
        ids.push(create_draft(&context, &token, title).await["id"].clone());
    }

    let (_, own) = context.get("/api/sessions/my-sessions", Some(&token)).await;
    let listed: Vec<Value> = own
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].clone())
        .collect();
    assert_eq!(listed, ids);
}
