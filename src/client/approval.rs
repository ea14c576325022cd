use serde_json::Value;

use crate::client::api::ApiClient;
use crate::client::transport::Transport;
use crate::client::ClientError;
use crate::models::record::Status;
use crate::models::registry::RecordType;

/// The in-charge's intent for one pending record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalAction {
    Accept,
    Reject,
}

impl ApprovalAction {
    pub fn resolved_status(&self) -> Status {
        match self {
            ApprovalAction::Accept => Status::Accepted,
            ApprovalAction::Reject => Status::Rejected,
        }
    }
}

/// The modal confirmation dialog. A single variant carries both the target
/// record and the intended action, so "dialog open without a target" is
/// unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    Closed,
    Confirming { record: Value, action: ApprovalAction },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Idle,
    Loaded(Vec<Value>),
    Failed(String),
}

/// The pending-approval queue for one record type.
pub struct PendingApprovals {
    record_type: RecordType,
    state: ListState,
    dialog: Dialog,
}

impl PendingApprovals {
    pub fn new(record_type: RecordType) -> Self {
        PendingApprovals {
            record_type,
            state: ListState::Idle,
            dialog: Dialog::Closed,
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    pub fn rows(&self) -> &[Value] {
        match &self.state {
            ListState::Loaded(rows) => rows,
            _ => &[],
        }
    }

    /// Fetch the pending queue (`status=Pending`).
    pub fn refresh<T: Transport>(&mut self, client: &ApiClient<T>) -> Result<(), ClientError> {
        let path = format!("/{}", self.record_type.slug());
        let query = vec![("status".to_string(), "Pending".to_string())];
        match client.get(&path, query) {
            Ok(response) => {
                let rows = response
                    .json()
                    .and_then(|v| v.as_array().cloned())
                    .unwrap_or_default();
                self.state = ListState::Loaded(rows);
                Ok(())
            }
            Err(e) => {
                self.state = ListState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Open the confirmation dialog for one row. The dialog is modal:
    /// while a confirmation is pending, further requests are ignored.
    /// No server state changes here.
    pub fn request(&mut self, record: Value, action: ApprovalAction) -> bool {
        if let Dialog::Confirming { .. } = self.dialog {
            return false;
        }
        self.dialog = Dialog::Confirming { record, action };
        true
    }

    /// Discard the pending action. No network traffic, list untouched.
    pub fn cancel(&mut self) {
        self.dialog = Dialog::Closed;
    }

    /// Confirm the pending action: exactly one status PUT, then — only on
    /// success — a refetch so the resolved record leaves the queue. On
    /// failure the local list is left exactly as it was.
    pub fn confirm<T: Transport>(
        &mut self,
        client: &ApiClient<T>,
        reason: Option<&str>,
    ) -> Result<(), ClientError> {
        let Dialog::Confirming { record, action } =
            std::mem::replace(&mut self.dialog, Dialog::Closed)
        else {
            return Ok(());
        };

        let id = record.get("id").and_then(Value::as_i64).unwrap_or(0);
        let path = format!("/{}/{}/status", self.record_type.slug(), id);
        let mut body = serde_json::json!({
            "status": action.resolved_status().as_str(),
        });
        if let Some(reason) = reason {
            body["reason"] = Value::from(reason);
        }

        client.put_json(&path, body)?;
        self.refresh(client)
    }
}
