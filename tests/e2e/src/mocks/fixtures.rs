//! Test Data Factory
//!
//! Builds inbound events the way the worker and dashboard pages do:
//! camelCase form fields for submissions, base64 file contents for uploads.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{Local, NaiveDate};
use linetrack_server::dashboard::events::{ClientEvent, PlanUpload, StockUpload};
use serde_json::{Value, json};

/// Factory for test events and sheets
pub struct TestDataFactory;

impl TestDataFactory {
    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Submission form payload with sensible defaults
    pub fn submission_payload(machine: &str, date: NaiveDate, time: &str, qty: i64) -> Value {
        json!({
            "entryDate": date.to_string(),
            "entryTime": time,
            "shift": "A",
            "workerName": "Operator",
            "machineName": machine,
            "orderNo": "ORD-1",
            "fgPartNo": "0042-FG",
            "applicatorNo": "AP-7",
            "cableId": "C1",
            "producedQty": qty,
            "producedLength": 5.0,
            "workedHours": 1.0,
        })
    }

    pub fn submission(machine: &str, date: NaiveDate, time: &str, qty: i64) -> ClientEvent {
        Self::event("SubmitOutput", Self::submission_payload(machine, date, time, qty))
    }

    /// Submission carrying terminal readings for slot 1
    pub fn submission_with_terminal(machine: &str, date: NaiveDate, qty: i64) -> ClientEvent {
        let mut payload = Self::submission_payload(machine, date, "10:00", qty);
        payload["terminals"] = json!([{
            "crimpHeight": {"measured": 1.21, "manual": "1.25"},
            "pullForce": {"measured": 55.0},
        }]);
        Self::event("SubmitOutput", payload)
    }

    /// Decode a `{"type", "data"}` frame into a client event
    pub fn event(event_type: &str, data: Value) -> ClientEvent {
        serde_json::from_value(json!({"type": event_type, "data": data}))
            .expect("Fixture built an invalid event")
    }

    /// CSV plan sheet with `rows` orders
    pub fn plan_csv(rows: usize) -> String {
        let mut csv = String::from("Order,FG Part,Qty\n");
        for i in 1..=rows {
            csv.push_str(&format!("ORD-{},FG-{},{}\n", i, i, i * 10));
        }
        csv
    }

    pub fn stock_csv(entries: &[(&str, f64)]) -> String {
        let mut csv = String::from("Cable ID,Initial Stock (M)\n");
        for (cable, qty) in entries {
            csv.push_str(&format!("{},{}\n", cable, qty));
        }
        csv
    }

    pub fn encode(bytes: &[u8]) -> String {
        BASE64.encode(bytes)
    }

    pub fn plan_upload(machine: &str, rows: usize) -> ClientEvent {
        ClientEvent::UploadPlan(PlanUpload {
            machine: machine.to_string(),
            file_name: "plan.csv".to_string(),
            content: Self::encode(Self::plan_csv(rows).as_bytes()),
        })
    }

    pub fn stock_upload(entries: &[(&str, f64)]) -> ClientEvent {
        Self::stock_upload_raw("stock.csv", &Self::stock_csv(entries))
    }

    pub fn stock_upload_raw(file_name: &str, content: &str) -> ClientEvent {
        ClientEvent::UploadStock(StockUpload {
            file_name: file_name.to_string(),
            content: Self::encode(content.as_bytes()),
        })
    }
}
