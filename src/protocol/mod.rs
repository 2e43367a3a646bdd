//! Request decoding and response encoding for the two scheduler commands,
//! plus the line-oriented serving loop.
//!
//! Requests and responses are JSON documents; the transport (stdin/stdout
//! lines here) is interchangeable plumbing. Every request produces exactly
//! one response, and no per-request failure stops the loop.

use std::io::{BufRead, Write};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{parse_date, Frequency, RuleDraft, TransactionKind},
    engine::SchedulerEngine,
    errors::EngineError,
};

const COMMAND_ADD: &str = "add_recurring";
const COMMAND_APPLY: &str = "apply_recurring";

const STATUS_ERROR: &str = "error";
const STATUS_ADDED: &str = "Recurring transaction added";
const STATUS_APPLIED: &str = "Recurring transactions applied";

/// Payload of an `add_recurring` request, exactly as received on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct AddRecurringPayload {
    #[serde(default)]
    pub description: Option<String>,
    pub amount: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub recurrence: RecurrencePayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecurrencePayload {
    pub frequency: String,
    pub next_due: String,
}

impl AddRecurringPayload {
    /// Ingress validation: every field is checked here so malformed input
    /// fails at the boundary instead of deep inside the engine.
    fn into_draft(self) -> Result<RuleDraft, EngineError> {
        let frequency = Frequency::parse(&self.recurrence.frequency).ok_or_else(|| {
            EngineError::MalformedRule(format!(
                "unknown frequency `{}` (expected daily, bi-weekly, or monthly)",
                self.recurrence.frequency
            ))
        })?;
        let next_due = parse_date(&self.recurrence.next_due).ok_or_else(|| {
            EngineError::MalformedRule(format!(
                "invalid next_due `{}` (expected YYYY-MM-DD)",
                self.recurrence.next_due
            ))
        })?;
        Ok(RuleDraft {
            description: self.description,
            category: self.category,
            amount: self.amount,
            kind: self.kind.map(TransactionKind::from),
            frequency,
            next_due,
        })
    }
}

/// Reply documents. The count field name differs per command, mirroring
/// the wire contract the menu application already speaks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Added {
        status: String,
        transactions_added: usize,
    },
    Applied {
        status: String,
        processed_count: usize,
    },
    Error {
        status: String,
        message: String,
    },
}

impl Response {
    fn added(count: usize) -> Self {
        Response::Added {
            status: STATUS_ADDED.into(),
            transactions_added: count,
        }
    }

    fn applied(count: usize) -> Self {
        Response::Applied {
            status: STATUS_APPLIED.into(),
            processed_count: count,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            status: STATUS_ERROR.into(),
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"status":"{STATUS_ERROR}","message":"response encoding failed"}}"#)
        })
    }
}

/// Synchronous, one-request-at-a-time dispatcher over the two commands.
pub struct RequestHandler {
    engine: SchedulerEngine,
}

impl RequestHandler {
    pub fn new(engine: SchedulerEngine) -> Self {
        Self { engine }
    }

    /// Handles one raw request document. Always produces a response; any
    /// failure is folded into an error reply for this request alone.
    pub fn handle(&self, raw: &str, today: NaiveDate) -> Response {
        match self.dispatch(raw, today) {
            Ok(response) => response,
            Err(err) => Response::error(err.to_string()),
        }
    }

    fn dispatch(&self, raw: &str, today: NaiveDate) -> Result<Response, EngineError> {
        let envelope: Value = serde_json::from_str(raw)
            .map_err(|err| EngineError::Protocol(format!("malformed request: {err}")))?;
        let command = envelope
            .get("command")
            .and_then(Value::as_str)
            .ok_or_else(|| EngineError::Protocol("missing command field".into()))?;
        match command {
            COMMAND_ADD => self.add_recurring(&envelope, today),
            COMMAND_APPLY => self.apply_recurring(today),
            _ => Ok(Response::error("Unknown command")),
        }
    }

    fn add_recurring(&self, envelope: &Value, today: NaiveDate) -> Result<Response, EngineError> {
        let payload = envelope
            .get("transaction")
            .ok_or_else(|| EngineError::Protocol("missing transaction payload".into()))?;
        let payload: AddRecurringPayload = serde_json::from_value(payload.clone())
            .map_err(|err| EngineError::Protocol(format!("invalid transaction payload: {err}")))?;
        let draft = payload.into_draft()?;
        let applied = self.engine.add_rule(draft, today)?;
        Ok(Response::added(applied.len()))
    }

    fn apply_recurring(&self, today: NaiveDate) -> Result<Response, EngineError> {
        let applied = self.engine.apply_due(today)?;
        Ok(Response::applied(applied.len()))
    }
}

/// Serves newline-delimited JSON requests until the reader is exhausted.
///
/// One response line per request line; blank lines are ignored. `today` is
/// sampled per request so a long-lived service crosses midnight correctly.
pub fn serve<R, W, F>(
    handler: &RequestHandler,
    reader: R,
    mut writer: W,
    today: F,
) -> std::io::Result<()>
where
    R: BufRead,
    W: Write,
    F: Fn() -> NaiveDate,
{
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = handler.handle(&line, today());
        writeln!(writer, "{}", response.to_json())?;
        writer.flush()?;
    }
    Ok(())
}
