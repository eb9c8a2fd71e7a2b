//! Plan and stock upload journeys

use linetrack_core::STOCK_FILE_NAME;
use linetrack_e2e_tests::{TestDataFactory as Data, TestFloor};
use linetrack_server::dashboard::events::{ClientEvent, PageKind, PlanUpload};
use serde_json::json;

// ============================================================================
// PLANS
// ============================================================================

#[tokio::test]
async fn test_plan_keeps_first_ten_rows() {
    let floor = TestFloor::new_temp();
    let mut worker = floor.worker_on("M1").await;
    let mut dash = floor.dashboard().await;

    dash.send(Data::plan_upload("M1", 15)).await;

    let result = dash.drain_of("PlanUploadResult").remove(0);
    assert_eq!(result["success"], true);
    assert_eq!(result["lines"], 10);

    let plan = worker.drain_of("MachinePlan").remove(0);
    let lines = plan["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[9]["line_id"], "M1_10");
    assert_eq!(lines[0]["fields"]["Order"], "ORD-1");
    assert_eq!(plan["columns"], json!(["Order", "FG Part", "Qty"]));
}

#[tokio::test]
async fn test_plan_upload_replaces_previous_plan() {
    let floor = TestFloor::new_temp();
    let mut worker = floor.worker_on("M2").await;
    let dash = floor.dashboard().await;

    dash.send(Data::plan_upload("M2", 3)).await;
    worker
        .send(ClientEvent::CompletePlanLine {
            machine: "M2".to_string(),
            line_id: "M2_1".to_string(),
        })
        .await;
    dash.send(Data::plan_upload("M2", 2)).await;

    let plan = worker.drain_of("MachinePlan").pop().unwrap();
    let lines = plan["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l["status"] == "pending"));
}

#[tokio::test]
async fn test_unsupported_plan_file_is_rejected() {
    let floor = TestFloor::new_temp();
    let mut worker = floor.worker_on("M1").await;
    let mut dash = floor.dashboard().await;

    dash.send(ClientEvent::UploadPlan(
        PlanUpload {
            machine: "M1".to_string(),
            file_name: "plan.pdf".to_string(),
            content: Data::encode(b"%PDF-1.4"),
        },
    ))
    .await;

    let frames = dash.drain();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0]["type"], "PlanUploadResult");
    assert_eq!(frames[0]["data"]["success"], false);
    assert!(worker.drain().is_empty());
    assert!(floor.state.floor.lock().await.plans.list_machines().is_empty());
}

// ============================================================================
// STOCK
// ============================================================================

#[tokio::test]
async fn test_stock_upload_broadcasts_and_persists() {
    let floor = TestFloor::new_temp();
    let mut watcher = floor.dashboard().await;
    let mut uploader = floor.dashboard().await;

    uploader
        .send(Data::stock_upload(&[("C2", 250.0), ("C1", 100.5)]))
        .await;

    let result = uploader.drain_of("StockUploadResult").remove(0);
    assert_eq!(result["success"], true);
    assert_eq!(result["rows"], 2);

    let view = watcher.drain_of("UpdateDashboard").remove(0);
    assert_eq!(view["stock"], json!({"C1": 100.5, "C2": 250.0}));

    let saved = std::fs::read_to_string(floor.data_dir().join(STOCK_FILE_NAME)).unwrap();
    assert!(saved.contains('\n'));
    assert!(saved.find("\"C1\"").unwrap() < saved.find("\"C2\"").unwrap());
}

#[tokio::test]
async fn test_stock_survives_restart() {
    let floor = TestFloor::new_temp();
    let dash = floor.dashboard().await;
    dash.send(Data::stock_upload(&[("C7", 42.0)])).await;
    drop(dash);

    let floor = floor.restart();
    let mut dash = floor.connect(PageKind::Dashboard).await;
    let view = dash.drain_of("UpdateDashboard").remove(0);
    assert_eq!(view["stock"], json!({"C7": 42.0}));
}

#[tokio::test]
async fn test_stock_upload_missing_columns_changes_nothing() {
    let floor = TestFloor::new_temp();
    let mut dash = floor.dashboard().await;
    dash.send(Data::stock_upload(&[("C1", 1.0)])).await;
    dash.drain();

    dash.send(Data::stock_upload_raw("stock.csv", "Cable,Metres\nC9,9\n"))
        .await;

    let frames = dash.drain();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0]["data"]["success"], false);
    assert_eq!(floor.state.floor.lock().await.stock.get("C1"), Some(1.0));

    let saved = std::fs::read_to_string(floor.data_dir().join(STOCK_FILE_NAME)).unwrap();
    assert!(!saved.contains("C9"));
}

#[tokio::test]
async fn test_corrupt_stock_file_starts_empty() {
    let floor = TestFloor::new_temp();
    std::fs::create_dir_all(floor.data_dir()).unwrap();
    std::fs::write(floor.data_dir().join(STOCK_FILE_NAME), "{ not json").unwrap();

    let floor = floor.restart();
    assert!(floor.state.floor.lock().await.stock.is_empty());
}
