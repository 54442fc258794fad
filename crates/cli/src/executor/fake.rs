// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process cluster double for executor tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cocaine_wire::Value;

use crate::client::{Address, ClientError, Cluster, ServiceInfo};

/// One recorded `invoke`.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub service: String,
    pub method: String,
    pub args: Vec<Value>,
}

type Reply = Result<Vec<Value>, String>;

/// Answers from queued replies per `service.method`; unqueued calls get no chunks.
#[derive(Default)]
pub struct FakeCluster {
    apis: HashMap<String, Vec<String>>,
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeCluster {
    pub fn new() -> Arc<Self> {
        let mut apis = HashMap::new();
        apis.insert("node".to_string(), strings(&["start_app", "pause_app", "info"]));
        apis.insert("storage".to_string(), strings(&["read", "write", "remove", "find"]));
        Arc::new(Self { apis, ..Self::default() })
    }

    pub fn reply(&self, target: &str, values: Vec<Value>) -> &Self {
        self.queue(target, Ok(values))
    }

    pub fn fail(&self, target: &str, reason: &str) -> &Self {
        self.queue(target, Err(reason.to_string()))
    }

    fn queue(&self, target: &str, reply: Reply) -> &Self {
        self.replies.lock().unwrap().entry(target.to_string()).or_default().push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded calls as `service.method` strings.
    pub fn targets(&self) -> Vec<String> {
        self.calls().iter().map(|c| format!("{}.{}", c.service, c.method)).collect()
    }
}

#[async_trait]
impl Cluster for FakeCluster {
    async fn resolve(&self, service: &str) -> Result<ServiceInfo, ClientError> {
        let methods = self.apis.get(service).cloned().ok_or_else(|| ClientError::Resolution {
            service: service.to_string(),
            locator: Address::new("fake", 0),
            reason: "unknown service".to_string(),
        })?;
        Ok(ServiceInfo { address: Address::new("fake", 0), methods })
    }

    async fn invoke(
        &self,
        service: &str,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Vec<Value>, ClientError> {
        self.resolve(service).await?;
        self.calls.lock().unwrap().push(Call {
            service: service.to_string(),
            method: method.to_string(),
            args,
        });
        let target = format!("{service}.{method}");
        let queued = self.replies.lock().unwrap().get_mut(&target).and_then(VecDeque::pop_front);
        match queued {
            Some(Ok(values)) => Ok(values),
            Some(Err(reason)) => Err(ClientError::Action(reason)),
            None => Ok(vec![]),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// msgpack-packed blob, as storage keeps documents.
pub fn packed(value: &Value) -> Value {
    let mut buf = Vec::new();
    rmpv::encode::write_value(&mut buf, value).unwrap();
    Value::Binary(buf)
}
