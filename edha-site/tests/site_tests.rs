//! End-to-end tests of loaders, forms and dispatch against a stub backend.

use std::time::Duration;

use axum::{
    Json, Router,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use edha_fetch::{FormsMode, HttpClient, SiteConfig};
use edha_site::{
    DetailState, Dispatcher, FormKind, FormState, GridState, SiteClient, SiteError, SubmitOutcome,
    UiCommand, ViewUpdate,
};
use serde_json::{Value, json};
use url::Url;

async fn backend(method: Method, uri: Uri, headers: HeaderMap, body: String) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    match (method.as_str(), uri.path()) {
        ("GET", "/api/programs") => Json(json!({
            "success": true,
            "count": 3,
            "data": [
                {"_id": "p3", "name": "EDHA Social", "order": 3},
                {"_id": "p1", "name": "EDHA Technologie", "slug": "tech", "order": 1},
                {"_id": "p2", "name": "<b>EDHA Santé</b>", "order": 2}
            ]
        }))
        .into_response(),
        ("GET", "/api/programs/slug/tech") => Json(json!({
            "success": true,
            "data": {
                "_id": "p1",
                "slug": "tech",
                "name": "EDHA Technologie",
                "category": "technologie",
                "bullets": ["A", "B"],
                "details": {"location": "Abidjan"}
            }
        }))
        .into_response(),
        ("GET", "/api/programs/p1/articles") => Json(json!({
            "data": [
                {"title": "Rentrée", "slug": "rentree", "publishedAt": "2024-09-02T10:00:00Z"}
            ]
        }))
        .into_response(),
        ("GET", "/api/programs/slug/broken") => {
            Json(json!({"data": {"_id": "p9", "name": "Cassé"}})).into_response()
        }
        ("GET", "/api/programs/p9/articles") => {
            (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
        }
        ("GET", "/api/programs/slug/orphan") => {
            Json(json!({"data": {"name": "Sans id"}})).into_response()
        }
        ("GET", "/api/programs/slug/slow") => {
            tokio::time::sleep(Duration::from_secs(30)).await;
            "late".into_response()
        }
        ("POST", "/api/volunteers") => {
            let parsed: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
            if parsed["_subject"] == "Bénévolat" && parsed["email"] == "awa@example.org" {
                (StatusCode::CREATED, Json(json!({"success": true}))).into_response()
            } else {
                (StatusCode::BAD_REQUEST, Json(json!({"error": "Email requis"}))).into_response()
            }
        }
        ("POST", "/relay/ok") if content_type.starts_with("multipart/form-data") => {
            Json(json!({"ok": true})).into_response()
        }
        ("POST", "/relay/invalid") => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "errors": [
                    {"field": "email", "message": "email should be an email"},
                    {"field": "name", "message": "name is required"}
                ]
            })),
        )
            .into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Programme introuvable"})),
        )
            .into_response(),
    }
}

async fn spawn_stub() -> Url {
    let app = Router::new().fallback(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Url::parse(&format!("http://{addr}/")).unwrap()
}

fn config(base: &Url) -> SiteConfig {
    SiteConfig {
        site_url: base.to_string(),
        api_base: Some(format!("{base}api")),
        ..SiteConfig::default()
    }
}

fn site_client(base: &Url, timeout: Duration) -> SiteClient {
    let config = config(base);
    SiteClient::over_http(
        HttpClient::with_timeout(timeout).unwrap(),
        config.api_base().unwrap(),
    )
}

// ============================================================================
// Loaders
// ============================================================================

#[tokio::test]
async fn test_programs_sorted_by_order() {
    let base = spawn_stub().await;
    let programs = site_client(&base, Duration::from_secs(5)).programs().await.unwrap();

    let ids: Vec<_> = programs.iter().map(|p| p.id.as_deref().unwrap_or_default()).collect();
    assert_eq!(ids, ["p1", "p2", "p3"]);
}

#[tokio::test]
async fn test_program_detail() {
    let base = spawn_stub().await;
    let detail = site_client(&base, Duration::from_secs(5))
        .program_detail("tech")
        .await
        .unwrap();

    assert_eq!(detail.program.name, "EDHA Technologie");
    assert_eq!(detail.program.bullets, ["A", "B"]);
    assert_eq!(detail.program.location, "Abidjan");
    assert_eq!(detail.program.duration, "—");
    assert_eq!(detail.articles.len(), 1);
    assert_eq!(detail.articles[0].published_on.as_deref(), Some("02/09/2024"));
}

#[tokio::test]
async fn test_article_failure_aborts_page() {
    let base = spawn_stub().await;
    let err = site_client(&base, Duration::from_secs(5))
        .program_detail("broken")
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "HTTP 500");
}

#[tokio::test]
async fn test_program_without_id_is_rejected() {
    let base = spawn_stub().await;
    let err = site_client(&base, Duration::from_secs(5))
        .program_detail("orphan")
        .await
        .unwrap_err();

    assert!(matches!(err, SiteError::Core(_)));
    assert_eq!(err.user_message(), "Programme sans identifiant.");
}

#[tokio::test]
async fn test_unknown_slug_shows_backend_error() {
    let base = spawn_stub().await;
    let err = site_client(&base, Duration::from_secs(5))
        .program_detail("nope")
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Programme introuvable");
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let base = spawn_stub().await;
    let err = site_client(&base, Duration::from_millis(200))
        .program_detail("slow")
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(err.user_message(), "Le serveur met trop de temps à répondre.");
}

// ============================================================================
// Forms
// ============================================================================

#[tokio::test]
async fn test_backend_volunteer_form() {
    let base = spawn_stub().await;
    let dispatcher = Dispatcher::from_config(&config(&base)).unwrap();
    let form = dispatcher.form(FormKind::Volunteer);

    form.set_field("name", "Awa");
    form.set_field("email", "awa@example.org");

    let SubmitOutcome::Completed(status) = form.submit().await else {
        panic!("form was idle");
    };
    assert_eq!(status.state, FormState::Success);
    assert!(form.fields().is_empty());
}

#[tokio::test]
async fn test_backend_error_message() {
    let base = spawn_stub().await;
    let dispatcher = Dispatcher::from_config(&config(&base)).unwrap();
    let form = dispatcher.form(FormKind::Volunteer);
    form.set_field("name", "Awa");

    let SubmitOutcome::Completed(status) = form.submit().await else {
        panic!("form was idle");
    };
    assert_eq!(status.state, FormState::Failed);
    assert_eq!(status.message.as_deref(), Some("Email requis"));
    assert_eq!(form.fields().get("name"), Some("Awa"));
}

#[tokio::test]
async fn test_relay_forms() {
    let base = spawn_stub().await;
    let mut config = config(&base);
    config.forms.mode = FormsMode::Relay;
    config.relay.volunteer_action = Some(format!("{base}relay/ok"));
    config.relay.partner_action = Some(format!("{base}relay/invalid"));
    let dispatcher = Dispatcher::from_config(&config).unwrap();

    let volunteer = dispatcher.form(FormKind::Volunteer);
    volunteer.set_field("name", "Awa");
    let SubmitOutcome::Completed(status) = volunteer.submit().await else {
        panic!("form was idle");
    };
    assert_eq!(status.state, FormState::Success);

    let partner = dispatcher.form(FormKind::Partner);
    partner.set_field("organisation", "ONG");
    let SubmitOutcome::Completed(status) = partner.submit().await else {
        panic!("form was idle");
    };
    assert_eq!(
        status.message.as_deref(),
        Some("email should be an email, name is required")
    );
}

// ============================================================================
// Dispatch
// ============================================================================

#[tokio::test]
async fn test_dispatch_program_page() {
    let base = spawn_stub().await;
    let (commands, mut updates) = Dispatcher::from_config(&config(&base)).unwrap().spawn();

    commands
        .send(UiCommand::LoadProgram {
            page_url: base.join("program.html?slug=tech").unwrap(),
        })
        .await
        .unwrap();
    drop(commands);

    let mut received = Vec::new();
    while let Some(update) = updates.recv().await {
        received.push(update);
    }

    assert_eq!(received.len(), 2);
    assert_eq!(
        received[0],
        ViewUpdate::ProgramDetail {
            page: DetailState::Loading
        }
    );
    let html = received[1].render_html();
    assert!(html.contains(r#"<ul id="programBullets"><li>A</li><li>B</li></ul>"#));
    assert!(html.contains(r#"href="article.html?slug=rentree""#));
}

#[tokio::test]
async fn test_dispatch_grid_escapes_names() {
    let base = spawn_stub().await;
    let (commands, mut updates) = Dispatcher::from_config(&config(&base)).unwrap().spawn();

    commands.send(UiCommand::LoadPrograms).await.unwrap();
    drop(commands);

    let mut last = None;
    while let Some(update) = updates.recv().await {
        last = Some(update);
    }
    let Some(update @ ViewUpdate::ProgramsGrid { grid: GridState::Loaded { .. } }) = last else {
        panic!("expected a loaded grid");
    };
    let html = update.render_html();
    assert!(html.contains("&lt;b&gt;EDHA Santé&lt;/b&gt;"));
    assert!(!html.contains("<b>"));
    assert_eq!(html.matches("detail-link").count(), 1);
}
