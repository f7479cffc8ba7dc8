use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use service::{cache::CachedRowStore, store::MemoryRowStore, RowStore};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::{routes, AppState};

fn cors() -> CorsLayer { CorsLayer::very_permissive() }

struct TestApp {
    base_url: String,
    client: reqwest::Client,
}

impl TestApp {
    fn url(&self, path: &str) -> String { format!("{}{}", self.base_url, path) }

    async fn post(&self, path: &str, body: Value) -> anyhow::Result<reqwest::Response> {
        Ok(self.client.post(self.url(path)).json(&body).send().await?)
    }

    async fn created(&self, path: &str, body: Value) -> anyhow::Result<Value> {
        let res = self.post(path, body).await?;
        assert_eq!(res.status(), HttpStatusCode::CREATED, "POST {path}");
        Ok(res.json().await?)
    }

    async fn get_json(&self, path: &str) -> anyhow::Result<Value> {
        let res = self.client.get(self.url(path)).send().await?;
        assert_eq!(res.status(), HttpStatusCode::OK, "GET {path}");
        Ok(res.json().await?)
    }
}

async fn start_server() -> anyhow::Result<TestApp> {
    let memory = Arc::new(MemoryRowStore::new());
    let store: Arc<dyn RowStore> = Arc::new(CachedRowStore::new(memory));
    let app: Router = routes::build_router(AppState::new(store), cors(), "target/no-frontend");

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, client: reqwest::Client::new() })
}

/// Audiovisual > Drone > Lot Aerial, with one metric and one feedback.
async fn seed(app: &TestApp) -> anyhow::Result<(String, String, String)> {
    let svc = app
        .created("/admin/services", json!({"title": "Audiovisual", "description": "Film and photo", "icon": "camera"}))
        .await?;
    let sub = app.created("/admin/sub-services", json!({"service_id": svc["id"], "title": "Drone"})).await?;
    let proj = app
        .created(
            "/admin/projects",
            json!({
                "sub_service_id": sub["id"],
                "title": "Lot Aerial",
                "project_type": "video",
                "video_url": "https://www.youtube.com/watch?v=abc123"
            }),
        )
        .await?;
    app.created(
        "/admin/metrics",
        json!({"project_id": proj["id"], "label": "Leads", "value": "247", "change_percentage": "+340%", "change_type": "positive"}),
    )
    .await?;
    app.created(
        "/admin/feedback",
        json!({"project_id": proj["id"], "author_name": "Roberto", "feedback_text": "Great footage"}),
    )
    .await?;
    let id = |v: &Value| v["id"].as_str().unwrap_or_default().to_string();
    Ok((id(&svc), id(&sub), id(&proj)))
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let body = app.get_json("/health").await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_catalog_scenario() -> anyhow::Result<()> {
    let app = start_server().await?;
    seed(&app).await?;

    let tree = app.get_json("/api/catalog").await?;
    let services = tree.as_array().expect("array");
    assert_eq!(services.len(), 1);
    assert_eq!(services[0]["title"], "Audiovisual");
    let subs = services[0]["sub_services"].as_array().expect("subs");
    assert_eq!(subs.len(), 1);
    let projects = subs[0]["projects"].as_array().expect("projects");
    assert_eq!(projects.len(), 1);
    let project = &projects[0];
    assert_eq!(project["metrics"].as_array().map(Vec::len), Some(1));
    assert_eq!(project["metrics"][0]["change_type"], "positive");
    assert_eq!(project["feedback"]["author_name"], "Roberto");
    assert_eq!(project["video"], json!({"kind": "embedded_video", "provider": "youtube", "id": "abc123"}));
    assert_eq!(project["thumbnail_url"], "https://img.youtube.com/vi/abc123/maxresdefault.jpg");
    Ok(())
}

#[tokio::test]
async fn e2e_hidden_project_only_in_admin_catalog() -> anyhow::Result<()> {
    let app = start_server().await?;
    let (_, _, project) = seed(&app).await?;

    // prime the public cache before the write
    app.get_json("/api/catalog").await?;
    let res = app.post(&format!("/admin/projects/{project}/visibility"), json!({})).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let public = app.get_json("/api/catalog").await?;
    assert_eq!(public[0]["sub_services"][0]["projects"], json!([]));
    let admin = app.get_json("/admin/catalog").await?;
    assert_eq!(admin[0]["sub_services"][0]["projects"][0]["is_visible"], false);
    Ok(())
}

#[tokio::test]
async fn e2e_validation_errors_are_json_400() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = app.post("/admin/services", json!({"title": " ", "description": "d"})).await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Validation Failed");
    assert_eq!(body["detail"], "title is required");

    let res = app
        .post("/admin/sub-services", json!({"service_id": Uuid::new_v4(), "title": "Orphan"}))
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = app.post("/admin/testimonials", json!({"name": "Ana", "content": "ok", "rating": 7})).await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = app.post("/admin/client-logos", json!({"name": 5})).await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_delete_rules() -> anyhow::Result<()> {
    let app = start_server().await?;
    let (service, sub, project) = seed(&app).await?;

    let res = app.client.delete(app.url(&format!("/admin/sub-services/{sub}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);

    let res = app.client.delete(app.url(&format!("/admin/projects/{project}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = app.client.delete(app.url(&format!("/admin/sub-services/{sub}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = app.client.delete(app.url(&format!("/admin/services/{service}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);

    assert_eq!(app.get_json("/admin/catalog").await?, json!([]));
    let res = app.client.delete(app.url(&format!("/admin/services/{service}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_patch_updates_fields() -> anyhow::Result<()> {
    let app = start_server().await?;
    let (service, _, _) = seed(&app).await?;
    let res = app
        .client
        .patch(app.url(&format!("/admin/services/{service}")))
        .json(&json!({"title": "Film", "display_order": 3}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated["title"], "Film");
    assert_eq!(updated["description"], "Film and photo");

    let fetched = app.get_json(&format!("/admin/services/{service}")).await?;
    assert_eq!(fetched["display_order"], 3);
    Ok(())
}

#[tokio::test]
async fn e2e_gallery_and_flat_lists() -> anyhow::Result<()> {
    let app = start_server().await?;
    let (_, _, project) = seed(&app).await?;
    app.created(
        "/admin/gallery",
        json!({"project_id": project, "title": "Still", "media_url": "https://cdn.example.com/a.jpg", "media_type": "image", "display_order": 2}),
    )
    .await?;
    app.created(
        "/admin/gallery",
        json!({"project_id": project, "title": "Cut", "media_url": "https://vimeo.com/76979871", "media_type": "video", "display_order": 1}),
    )
    .await?;
    app.created(
        "/admin/gallery",
        json!({"project_id": project, "title": "Draft", "media_url": "https://cdn.example.com/b.jpg", "media_type": "image", "is_visible": false}),
    )
    .await?;

    let public = app.get_json(&format!("/api/projects/{project}/gallery")).await?;
    let titles: Vec<&str> = public.as_array().expect("array").iter().filter_map(|i| i["title"].as_str()).collect();
    assert_eq!(titles, vec!["Cut", "Still"]);
    assert_eq!(public[0]["media"]["provider"], "vimeo");

    let admin = app.get_json(&format!("/admin/gallery?project_id={project}")).await?;
    assert_eq!(admin.as_array().map(Vec::len), Some(3));

    app.created("/admin/testimonials", json!({"name": "Ana", "content": "Loved it", "rating": 5})).await?;
    app.created("/admin/client-logos", json!({"name": "Acme", "logo_url": "https://cdn.example.com/acme.svg", "is_visible": false}))
        .await?;
    assert_eq!(app.get_json("/api/testimonials").await?.as_array().map(Vec::len), Some(1));
    assert_eq!(app.get_json("/api/client-logos").await?, json!([]));
    assert_eq!(app.get_json("/admin/client-logos").await?.as_array().map(Vec::len), Some(1));
    Ok(())
}
