#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use api_types::{
    raw::{RawPayload, RawRecord},
    record::{ArchivePayload, NewRecord, RecordUpdate},
};
use chrono::{TimeZone, Utc};
use engine::{FixedClock, RecordStore, RemoteError};
use serde_json::json;
use tokio::sync::Notify;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    ListActive,
    CreateActive,
    UpdateActive,
    DeleteActive,
    ListHistory,
    CreateHistory,
    DeleteHistory,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    ListActive(String),
    CreateActive(NewRecord),
    UpdateActive(String, RecordUpdate),
    DeleteActive(String),
    ListHistory(String),
    CreateHistory(ArchivePayload),
    DeleteHistory(String),
}

impl Call {
    pub fn op(&self) -> Op {
        match self {
            Self::ListActive(_) => Op::ListActive,
            Self::CreateActive(_) => Op::CreateActive,
            Self::UpdateActive(..) => Op::UpdateActive,
            Self::DeleteActive(_) => Op::DeleteActive,
            Self::ListHistory(_) => Op::ListHistory,
            Self::CreateHistory(_) => Op::CreateHistory,
            Self::DeleteHistory(_) => Op::DeleteHistory,
        }
    }
}

#[derive(Default)]
struct Inner {
    active: Vec<RawRecord>,
    history: Vec<RawRecord>,
    calls: Vec<Call>,
    failures: HashMap<Op, RemoteError>,
    next_id: u32,
    gate: Option<Arc<Notify>>,
}

impl Inner {
    fn call(&mut self, call: Call) -> Result<(), RemoteError> {
        let op = call.op();
        self.calls.push(call);
        match self.failures.get(&op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn next_object_id(&mut self) -> String {
        self.next_id += 1;
        format!("{:024x}", 0xabc000 + self.next_id)
    }
}

/// In-memory API that records every call.
#[derive(Clone, Default)]
pub struct FakeStore {
    inner: Arc<Mutex<Inner>>,
}

impl FakeStore {
    pub fn with_active(records: Vec<serde_json::Value>) -> Self {
        let store = Self::default();
        store.lock().active = records.into_iter().map(raw).collect();
        store
    }

    pub fn set_history(&self, records: Vec<serde_json::Value>) {
        self.lock().history = records.into_iter().map(raw).collect();
    }

    pub fn fail(&self, op: Op, err: RemoteError) {
        self.lock().failures.insert(op, err);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn ops(&self) -> Vec<Op> {
        self.lock().calls.iter().map(Call::op).collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Holds every list call until the returned gate is notified, once per
    /// call.
    pub fn gate(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.lock().gate = Some(gate.clone());
        gate
    }

    async fn wait_gate(&self) {
        let gate = self.lock().gate.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }
}

fn raw(value: serde_json::Value) -> RawRecord {
    serde_json::from_value(value).unwrap()
}

fn id_of(record: &RawRecord) -> String {
    record
        .object_id
        .as_ref()
        .map(|id| id.as_text())
        .unwrap_or_default()
}

impl RecordStore for FakeStore {
    async fn list_active(&self, user_id: &str) -> Result<RawPayload, RemoteError> {
        self.wait_gate().await;
        let mut inner = self.lock();
        inner.call(Call::ListActive(user_id.to_string()))?;
        Ok(RawPayload::Many(inner.active.clone()))
    }

    async fn create_active(&self, record: &NewRecord) -> Result<RawRecord, RemoteError> {
        let mut inner = self.lock();
        inner.call(Call::CreateActive(record.clone()))?;
        let id = inner.next_object_id();
        let mut stored = serde_json::to_value(record).unwrap();
        stored["_id"] = json!(id);
        inner.active.push(raw(stored));
        Ok(raw(json!({ "acknowledged": true, "insertedId": id })))
    }

    async fn update_active(&self, id: &str, update: &RecordUpdate) -> Result<(), RemoteError> {
        let mut inner = self.lock();
        inner.call(Call::UpdateActive(id.to_string(), update.clone()))
    }

    async fn delete_active(&self, id: &str) -> Result<(), RemoteError> {
        let mut inner = self.lock();
        inner.call(Call::DeleteActive(id.to_string()))?;
        inner.active.retain(|record| id_of(record) != id);
        Ok(())
    }

    async fn list_history(&self, user_id: &str) -> Result<RawPayload, RemoteError> {
        self.wait_gate().await;
        let mut inner = self.lock();
        inner.call(Call::ListHistory(user_id.to_string()))?;
        Ok(RawPayload::Many(inner.history.clone()))
    }

    async fn create_history(&self, payload: &ArchivePayload) -> Result<(), RemoteError> {
        let mut inner = self.lock();
        inner.call(Call::CreateHistory(payload.clone()))?;
        let id = inner.next_object_id();
        let mut stored = serde_json::to_value(payload).unwrap();
        stored["_id"] = json!(id);
        inner.history.push(raw(stored));
        Ok(())
    }

    async fn delete_history(&self, id: &str) -> Result<(), RemoteError> {
        let mut inner = self.lock();
        inner.call(Call::DeleteHistory(id.to_string()))?;
        inner.history.retain(|record| id_of(record) != id);
        Ok(())
    }
}

pub const USER: &str = "user-1";

pub fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 6, 15, 8, 30, 0).unwrap())
}

pub fn yes(_: &str) -> bool {
    true
}

pub fn no(_: &str) -> bool {
    false
}

pub fn server_error(message: &str) -> RemoteError {
    RemoteError::Server {
        status: 500,
        error: Some(message.to_string()),
        message: None,
    }
}

pub fn record(id: &str, category: &str) -> serde_json::Value {
    json!({
        "_id": { "$oid": id },
        "amount": 500,
        "person": "Rahim",
        "dueDate": "2024-06-01",
        "category": category,
    })
}

pub fn oid(n: u32) -> String {
    format!("{n:024x}")
}
