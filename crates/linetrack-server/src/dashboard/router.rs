//! Event router
//!
//! Applies one inbound event to the [`FloorState`] and decides which pages
//! hear about it. Routing is a plain function of the state and the event:
//! the caller holds the floor lock for the duration and hands the returned
//! [`Outbound`] list to the hub.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use linetrack_core::{
    parse_table, ConnectionId, FloorState, StockError, StockStore, StockTable, SubmissionError,
    SubmissionInput, Table, TabularError,
};
use tracing::{debug, info, warn};

use super::events::{ClientEvent, PageKind, PlanUpload, ServerEvent, StockUpload};
use super::hub::Outbound;

/// Reason an upload was refused
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Upload needs a machine name")]
    MissingMachine,
    #[error("Invalid file encoding: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error(transparent)]
    Tabular(#[from] TabularError),
    #[error("Could not persist stock levels: {0}")]
    Stock(#[from] StockError),
}

/// Turns inbound events into state changes and addressed outbound events
#[derive(Clone)]
pub struct FanoutRouter {
    stock_store: Arc<dyn StockStore>,
}

impl FanoutRouter {
    pub fn new(stock_store: Arc<dyn StockStore>) -> Self {
        Self { stock_store }
    }

    /// Greeting for a freshly opened socket
    pub fn on_connect(
        &self,
        floor: &FloorState,
        connection: ConnectionId,
        page: PageKind,
    ) -> Vec<Outbound> {
        let mut out = vec![Outbound::to(
            connection,
            ServerEvent::Connected {
                version: linetrack_core::VERSION.to_string(),
                connection_id: connection,
                page,
                timestamp: Utc::now(),
            },
        )];

        if page == PageKind::Dashboard {
            out.push(Outbound::to(
                connection,
                ServerEvent::UpdateDashboard(floor.dashboard_view(None)),
            ));
            out.push(Outbound::to(connection, online_machines(floor)));
        }
        out
    }

    /// Drop the connection from presence and refresh the dashboards' online list
    pub fn on_disconnect(&self, floor: &mut FloorState, connection: &ConnectionId) -> Vec<Outbound> {
        floor.presence.leave(connection);
        vec![Outbound::dashboards(online_machines(floor))]
    }

    pub fn route(
        &self,
        floor: &mut FloorState,
        connection: ConnectionId,
        event: ClientEvent,
    ) -> Vec<Outbound> {
        debug!(connection = %connection, event = event.name(), "Routing event");

        match event {
            ClientEvent::SubmitOutput(input) => self.submit_output(floor, connection, input),
            ClientEvent::UploadPlan(upload) => self.upload_plan(floor, connection, upload),
            ClientEvent::UploadStock(upload) => self.upload_stock(floor, connection, upload),
            ClientEvent::JoinMachine { machine } => self.join_machine(floor, connection, &machine),
            ClientEvent::CompletePlanLine { machine, line_id } => {
                self.complete_plan_line(floor, &machine, &line_id)
            }
            ClientEvent::SendMessage { machine, message } => {
                self.send_message(floor, connection, machine, message)
            }
            ClientEvent::RequestDateData { date } => vec![Outbound::dashboards(
                ServerEvent::UpdateDashboard(floor.dashboard_view(date.as_deref())),
            )],
        }
    }

    // ========================================================================
    // SUBMISSIONS
    // ========================================================================

    fn submit_output(
        &self,
        floor: &mut FloorState,
        connection: ConnectionId,
        input: SubmissionInput,
    ) -> Vec<Outbound> {
        let accepted = input
            .into_entry()
            .and_then(|entry| {
                let date = entry.date();
                floor.submissions.append(entry).map(|()| date)
            });

        match accepted {
            Ok(date) => {
                let date = date.to_string();
                vec![
                    Outbound::dashboards(ServerEvent::UpdateDashboard(
                        floor.dashboard_view(Some(&date)),
                    )),
                    Outbound::to(
                        connection,
                        ServerEvent::SubmissionResult {
                            success: true,
                            message: "Submission recorded".to_string(),
                        },
                    ),
                ]
            }
            Err(e) => vec![submission_failed(connection, &e)],
        }
    }

    // ========================================================================
    // PLANS
    // ========================================================================

    fn upload_plan(
        &self,
        floor: &mut FloorState,
        connection: ConnectionId,
        upload: PlanUpload,
    ) -> Vec<Outbound> {
        let machine = upload.machine.trim().to_string();

        let table = match decode_upload(&machine, &upload) {
            Ok(table) => table,
            Err(e) => {
                warn!(machine = %machine, file = %upload.file_name, error = %e, "Plan upload rejected");
                return vec![Outbound::to(
                    connection,
                    ServerEvent::PlanUploadResult {
                        success: false,
                        machine,
                        lines: 0,
                        message: e.to_string(),
                    },
                )];
            }
        };

        let plan = floor.plans.replace_plan(&machine, table).clone();
        let lines = plan.lines.len();
        info!(machine = %machine, file = %upload.file_name, lines, "Plan uploaded");

        let members = floor.presence.connections_in(&machine);
        vec![
            Outbound::room(machine.clone(), members, ServerEvent::MachinePlan(plan)),
            Outbound::dashboards(ServerEvent::UpdateDashboard(floor.dashboard_view(None))),
            Outbound::to(
                connection,
                ServerEvent::PlanUploadResult {
                    success: true,
                    machine,
                    lines,
                    message: format!("Loaded {} plan line(s)", lines),
                },
            ),
        ]
    }

    fn complete_plan_line(&self, floor: &mut FloorState, machine: &str, line_id: &str) -> Vec<Outbound> {
        let machine = machine.trim();
        if !floor.plans.mark_complete(machine, line_id) {
            return Vec::new();
        }
        let plan = floor.plans.plan_for(machine);
        debug!(machine, line_id, pending = plan.pending_count(), "Pushing updated plan to room");
        vec![Outbound::room(
            machine,
            floor.presence.connections_in(machine),
            ServerEvent::MachinePlan(plan),
        )]
    }

    // ========================================================================
    // STOCK
    // ========================================================================

    fn upload_stock(
        &self,
        floor: &mut FloorState,
        connection: ConnectionId,
        upload: StockUpload,
    ) -> Vec<Outbound> {
        match self.replace_stock(floor, &upload) {
            Ok(rows) => {
                info!(file = %upload.file_name, rows, "Stock levels replaced");
                vec![
                    Outbound::dashboards(ServerEvent::UpdateDashboard(floor.dashboard_view(None))),
                    Outbound::to(
                        connection,
                        ServerEvent::StockUploadResult {
                            success: true,
                            rows,
                            message: format!("Loaded stock for {} cable(s)", rows),
                        },
                    ),
                ]
            }
            Err(e) => {
                warn!(file = %upload.file_name, error = %e, "Stock upload rejected");
                vec![Outbound::to(
                    connection,
                    ServerEvent::StockUploadResult {
                        success: false,
                        rows: 0,
                        message: e.to_string(),
                    },
                )]
            }
        }
    }

    /// Parse, persist, then swap in memory. Nothing changes unless all three succeed.
    fn replace_stock(&self, floor: &mut FloorState, upload: &StockUpload) -> Result<usize, UploadError> {
        let bytes = BASE64.decode(upload.content.trim())?;
        let table = parse_table(&upload.file_name, &bytes)?;
        let stock = StockTable::from_table(&table)?;
        self.stock_store.save(&stock)?;
        let rows = stock.len();
        floor.replace_stock(stock);
        Ok(rows)
    }

    // ========================================================================
    // PRESENCE & MESSAGING
    // ========================================================================

    fn join_machine(&self, floor: &mut FloorState, connection: ConnectionId, machine: &str) -> Vec<Outbound> {
        let machine = machine.trim();
        if machine.is_empty() {
            return vec![Outbound::to(
                connection,
                ServerEvent::JoinResult {
                    success: false,
                    machine: String::new(),
                    message: "Machine name is required".to_string(),
                },
            )];
        }

        let machines = floor.presence.join(connection, machine);
        vec![
            Outbound::dashboards(ServerEvent::OnlineMachines { machines }),
            Outbound::to(connection, ServerEvent::MachinePlan(floor.plans.plan_for(machine))),
            Outbound::to(
                connection,
                ServerEvent::JoinResult {
                    success: true,
                    machine: machine.to_string(),
                    message: format!("Joined {}", machine),
                },
            ),
        ]
    }

    fn send_message(
        &self,
        floor: &FloorState,
        connection: ConnectionId,
        machine: String,
        message: String,
    ) -> Vec<Outbound> {
        let machine = machine.trim().to_string();
        if !floor.presence.is_online(&machine) {
            debug!(machine = %machine, "Message for offline machine not delivered");
            return vec![Outbound::to(
                connection,
                ServerEvent::MessageResult {
                    success: false,
                    machine,
                    reason: Some("offline".to_string()),
                },
            )];
        }

        let members = floor.presence.connections_in(&machine);
        vec![
            Outbound::room(
                machine.clone(),
                members,
                ServerEvent::MachineMessage {
                    machine: machine.clone(),
                    message,
                    timestamp: Utc::now(),
                },
            ),
            Outbound::to(
                connection,
                ServerEvent::MessageResult {
                    success: true,
                    machine,
                    reason: None,
                },
            ),
        ]
    }
}

fn online_machines(floor: &FloorState) -> ServerEvent {
    ServerEvent::OnlineMachines {
        machines: floor.presence.online_machines(),
    }
}

fn submission_failed(connection: ConnectionId, error: &SubmissionError) -> Outbound {
    Outbound::to(
        connection,
        ServerEvent::SubmissionResult {
            success: false,
            message: error.to_string(),
        },
    )
}

fn decode_upload(machine: &str, upload: &PlanUpload) -> Result<Table, UploadError> {
    if machine.is_empty() {
        return Err(UploadError::MissingMachine);
    }
    let bytes = BASE64.decode(upload.content.trim())?;
    Ok(parse_table(&upload.file_name, &bytes)?)
}

// ============================================================================
// TESTS
// ============================================================================
