//! HTTP surface: pages, CSV export and health

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::NaiveDate;
use linetrack_e2e_tests::{TestDataFactory as Data, TestFloor};
use linetrack_server::dashboard::build_router;
use linetrack_server::dashboard::events::PageKind;
use tower::ServiceExt;

async fn get(floor: &TestFloor, uri: &str) -> axum::response::Response {
    build_router(floor.state.clone())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

#[tokio::test]
async fn test_export_is_ascending_quoted_csv() {
    let floor = TestFloor::new_temp();
    let worker = floor.connect(PageKind::Worker).await;
    let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    worker.send(Data::submission("M1", day, "11:00", 7)).await;
    worker.send(Data::submission("M2", day, "08:00", 3)).await;

    let response = get(&floor, "/export").await;
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/csv"));
    assert!(headers[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("production_data.csv"));
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
    assert_eq!(
        headers["x-linetrack-export-schema"],
        linetrack_core::EXPORT_SCHEMA_VERSION.to_string().as_str()
    );

    let body = body_bytes(response).await;
    assert!(body.starts_with(b"\xEF\xBB\xBF"));
    let text = String::from_utf8(body[3..].to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("\"Date\",\"Time\",\"Shift\""));
    assert!(lines[1].starts_with("\"2024-05-01\",\"08:00\""));
    assert!(lines[2].contains("\"M1\""));
}

#[tokio::test]
async fn test_export_of_empty_log_has_header_only() {
    let floor = TestFloor::new_temp();
    let body = body_bytes(get(&floor, "/export").await).await;
    let text = String::from_utf8(body[3..].to_vec()).unwrap();
    assert_eq!(text.lines().count(), 1);
}

#[tokio::test]
async fn test_pages_served_from_pages_dir() {
    let floor = TestFloor::new_temp();

    let missing = get(&floor, "/worker").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let message = String::from_utf8(body_bytes(missing).await).unwrap();
    assert!(message.contains("worker.html"));

    floor.write_page("dashboard.html", "<h1>Live</h1>");
    let page = get(&floor, "/dashboard").await;
    assert_eq!(page.status(), StatusCode::OK);
    assert_eq!(body_bytes(page).await, b"<h1>Live</h1>");
}

#[tokio::test]
async fn test_root_redirects_to_dashboard() {
    let floor = TestFloor::new_temp();
    let response = get(&floor, "/").await;
    assert!(response.status().is_redirection());
    assert_eq!(response.headers()[header::LOCATION], "/dashboard");
}

#[tokio::test]
async fn test_health_reports_counts() {
    let floor = TestFloor::new_temp();
    let worker = floor.worker_on("M1").await;
    let _dashboard = floor.dashboard().await;
    worker
        .send(Data::submission("M1", Data::today(), "09:00", 5))
        .await;

    let response = get(&floor, "/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let health: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(health["submissions"], 1);
    assert_eq!(health["onlineMachines"], 1);
    assert_eq!(health["connections"], 2);
    assert_eq!(health["dashboards"], 1);
}

fn shipped_page(name: &str) -> String {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../pages")
        .join(name);
    std::fs::read_to_string(path).unwrap()
}

#[tokio::test]
async fn test_shipped_pages_served() {
    let floor = TestFloor::new_temp();
    for name in ["worker.html", "dashboard.html"] {
        floor.write_page(name, &shipped_page(name));
    }

    let worker = String::from_utf8(body_bytes(get(&floor, "/worker").await).await).unwrap();
    for key in ["crimpHeight", "crimpWidth", "insulationHeight", "insulationWidth", "pullForce"] {
        assert!(worker.contains(key), "worker form lacks {}", key);
    }
    assert!(worker.contains("data.terminals"));

    let dashboard = String::from_utf8(body_bytes(get(&floor, "/dashboard").await).await).unwrap();
    assert!(dashboard.contains("view.machines"));
    assert!(dashboard.contains("entry.terminals"));
}

#[test]
fn test_shipped_pages_never_inject_markup() {
    // Worker-supplied text must go through textContent
    for name in ["worker.html", "dashboard.html"] {
        let page = shipped_page(name);
        assert!(!page.contains("innerHTML"), "{} writes innerHTML", name);
        assert!(!page.contains("insertAdjacentHTML"), "{} writes raw HTML", name);
    }
}
