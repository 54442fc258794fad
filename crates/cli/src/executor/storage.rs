// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Actions served by the `storage` service: manifests, packages, profiles,
//! runlists and crashlogs.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cocaine_wire::{json_to_value, value_to_json, ProtocolError, Value};
use serde_json::Value as Json;
use tracing::debug;

use super::files::{self, MANIFEST_FILE};
use super::{optional, required, unknown_action, ActionArgs, Executor};
use crate::client::{ClientError, Cluster, ClusterClient};

const STORAGE: &str = "storage";

const MANIFESTS: &str = "manifests";
const APPS: &str = "apps";
const PROFILES: &str = "profiles";
const RUNLISTS: &str = "runlists";
const CRASHLOGS: &str = "crashlogs";

/// A stored document kind: its namespace and the tag `find` lists it by.
#[derive(Debug, Clone, Copy)]
struct Kind {
    label: &'static str,
    namespace: &'static str,
    tag: &'static str,
}

const PROFILE: Kind = Kind { label: "Profile", namespace: PROFILES, tag: "profile" };
const RUNLIST: Kind = Kind { label: "Runlist", namespace: RUNLISTS, tag: "runlist" };

pub struct StorageExecutor<C = ClusterClient> {
    cluster: Arc<C>,
}

impl<C: Cluster> StorageExecutor<C> {
    pub fn new(cluster: Arc<C>) -> Self {
        Self { cluster }
    }

    async fn first(&self, method: &str, args: Vec<Value>) -> Result<Option<Value>, ClientError> {
        let replies = self.cluster.invoke(STORAGE, method, args).await?;
        Ok(replies.into_iter().next())
    }

    async fn find(&self, namespace: &str, tags: &[&str]) -> Result<Vec<String>, ClientError> {
        let tags = Value::Array(tags.iter().map(|t| Value::from(*t)).collect());
        match self.first("find", vec![Value::from(namespace), tags]).await? {
            None => Ok(Vec::new()),
            Some(Value::Array(keys)) => {
                Ok(keys.iter().filter_map(|k| k.as_str().map(str::to_string)).collect())
            }
            Some(other) => {
                Err(ProtocolError::Shape(format!("storage find returned {other}, not a list"))
                    .into())
            }
        }
    }

    /// Read and unpack one document.
    async fn read(&self, namespace: &str, key: &str) -> Result<Value, ClientError> {
        let blob = self.first("read", vec![Value::from(namespace), Value::from(key)]).await?;
        let blob = blob.ok_or_else(|| {
            ProtocolError::Shape(format!("storage read of {namespace}/{key} returned nothing"))
        })?;
        Ok(files::unpack(blob))
    }

    async fn write(
        &self,
        namespace: &str,
        key: &str,
        blob: Vec<u8>,
        tags: &[&str],
    ) -> Result<(), ClientError> {
        let tags = Value::Array(tags.iter().map(|t| Value::from(*t)).collect());
        let args = vec![Value::from(namespace), Value::from(key), Value::Binary(blob), tags];
        self.first("write", args).await?;
        Ok(())
    }

    async fn remove(&self, namespace: &str, key: &str) -> Result<(), ClientError> {
        self.first("remove", vec![Value::from(namespace), Value::from(key)]).await?;
        Ok(())
    }

    async fn list(&self, kind: Kind) -> Result<Json, ClientError> {
        Ok(Json::from(self.find(kind.namespace, &[kind.tag]).await?))
    }

    async fn view(&self, namespace: &str, name: &str) -> Result<Json, ClientError> {
        Ok(value_to_json(&self.read(namespace, name).await?))
    }

    /// Upload a JSON document read from `path`.
    async fn upload(&self, kind: Kind, name: &str, path: &str) -> Result<Json, ClientError> {
        let document = files::read_json(Path::new(path))?;
        let blob = files::pack(&json_to_value(&document))?;
        self.write(kind.namespace, name, blob, &[kind.tag]).await?;
        Ok(Json::from(format!("{} {name} has been successfully uploaded", kind.label)))
    }

    async fn remove_document(&self, kind: Kind, name: &str) -> Result<Json, ClientError> {
        self.remove(kind.namespace, name).await?;
        Ok(Json::from(format!("{} {name} has been successfully removed", kind.label)))
    }

    async fn app_upload(
        &self,
        name: &str,
        manifest: &str,
        package: &str,
    ) -> Result<Json, ClientError> {
        let manifest = files::read_json(Path::new(manifest))?;
        let package = files::read_bytes(Path::new(package))?;

        let manifest = files::pack(&json_to_value(&manifest))?;
        let package = files::pack(&Value::Binary(package))?;
        self.store_app(name, manifest, package).await
    }

    /// Upload a whole application directory; the name defaults to the directory's.
    async fn app_upload_dir(&self, path: &str, name: Option<&str>) -> Result<Json, ClientError> {
        let dir = Path::new(path);
        let name = match name {
            Some(name) => name.to_string(),
            None => files::dir_name(dir)?,
        };
        let manifest = files::read_json(&dir.join(MANIFEST_FILE))?;
        let bundle = files::bundle_dir(dir)?;

        let manifest = files::pack(&json_to_value(&manifest))?;
        self.store_app(&name, manifest, bundle).await
    }

    async fn store_app(
        &self,
        name: &str,
        manifest: Vec<u8>,
        package: Vec<u8>,
    ) -> Result<Json, ClientError> {
        self.write(MANIFESTS, name, manifest, &["app"]).await?;
        self.write(APPS, name, package, &["app"]).await?;
        debug!(app = name, "uploaded application");
        Ok(Json::from(format!("Application {name} has been successfully uploaded")))
    }

    async fn app_remove(&self, name: &str) -> Result<Json, ClientError> {
        self.remove(MANIFESTS, name).await?;
        self.remove(APPS, name).await?;
        Ok(Json::from(format!("The app \"{name}\" has been successfully removed")))
    }

    async fn runlist_add_app(
        &self,
        name: &str,
        app: &str,
        profile: &str,
    ) -> Result<Json, ClientError> {
        let entries = match self.read(RUNLISTS, name).await? {
            Value::Map(entries) => entries,
            other => {
                return Err(ProtocolError::Shape(format!("runlist {name} is {other}, not a map"))
                    .into())
            }
        };
        let mut entries: Vec<(Value, Value)> =
            entries.into_iter().filter(|(key, _)| key.as_str() != Some(app)).collect();
        entries.push((Value::from(app), Value::from(profile)));

        let runlist = Value::Map(entries);
        self.write(RUNLISTS, name, files::pack(&runlist)?, &[RUNLIST.tag]).await?;
        Ok(value_to_json(&runlist))
    }

    async fn crashlog_keys(
        &self,
        name: &str,
        timestamp: Option<&str>,
    ) -> Result<Vec<String>, ClientError> {
        let keys = self.find(CRASHLOGS, &[name]).await?;
        let Some(timestamp) = timestamp else {
            return Ok(keys);
        };
        let matching: Vec<String> =
            keys.into_iter().filter(|key| crashlog_timestamp(key) == timestamp).collect();
        if matching.is_empty() {
            return Err(ClientError::Action(format!(
                "crashlog for \"{name}\" with timestamp {timestamp} not found"
            )));
        }
        Ok(matching)
    }

    async fn crashlog_view(&self, name: &str, timestamp: &str) -> Result<Json, ClientError> {
        let mut logs = Vec::new();
        for key in self.crashlog_keys(name, Some(timestamp)).await? {
            logs.push(value_to_json(&self.read(CRASHLOGS, &key).await?));
        }
        Ok(if logs.len() == 1 { logs.remove(0) } else { Json::Array(logs) })
    }

    async fn crashlog_remove(
        &self,
        name: &str,
        timestamp: Option<&str>,
    ) -> Result<Json, ClientError> {
        let keys = self.crashlog_keys(name, timestamp).await?;
        for key in &keys {
            self.remove(CRASHLOGS, key).await?;
        }
        debug!(app = name, removed = keys.len(), "removed crashlogs");
        Ok(Json::from(match timestamp {
            Some(timestamp) => {
                format!("Crashlog for app \"{name}\" at {timestamp} has been removed")
            }
            None => format!("{} crashlog(s) for app \"{name}\" have been removed", keys.len()),
        }))
    }
}

#[async_trait]
impl<C: Cluster> Executor for StorageExecutor<C> {
    async fn execute_action(&self, action: &str, args: ActionArgs) -> Result<Json, ClientError> {
        debug!(action, "executing storage action");
        match action {
            "app:list" => Ok(Json::from(self.find(MANIFESTS, &["app"]).await?)),
            "app:view" => self.view(MANIFESTS, required(&args, "name")?).await,
            "app:upload" => {
                let name = required(&args, "name")?;
                self.app_upload(name, required(&args, "manifest")?, required(&args, "package")?)
                    .await
            }
            "app:upload2" => {
                self.app_upload_dir(required(&args, "path")?, optional(&args, "name")).await
            }
            "app:remove" => self.app_remove(required(&args, "name")?).await,

            "profile:list" => self.list(PROFILE).await,
            "profile:view" => self.view(PROFILES, required(&args, "name")?).await,
            "profile:upload" => {
                self.upload(PROFILE, required(&args, "name")?, required(&args, "manifest")?).await
            }
            "profile:remove" => self.remove_document(PROFILE, required(&args, "name")?).await,

            "runlist:list" => self.list(RUNLIST).await,
            "runlist:view" => self.view(RUNLISTS, required(&args, "name")?).await,
            "runlist:upload" => {
                self.upload(RUNLIST, required(&args, "name")?, required(&args, "manifest")?).await
            }
            "runlist:remove" => self.remove_document(RUNLIST, required(&args, "name")?).await,
            "runlist:add-app" => {
                let name = required(&args, "name")?;
                self.runlist_add_app(name, required(&args, "app")?, required(&args, "profile")?)
                    .await
            }

            "crashlog:list" => {
                Ok(Json::from(self.crashlog_keys(required(&args, "name")?, None).await?))
            }
            "crashlog:view" => {
                self.crashlog_view(required(&args, "name")?, required(&args, "manifest")?).await
            }
            "crashlog:remove" => {
                let name = required(&args, "name")?;
                self.crashlog_remove(name, Some(required(&args, "manifest")?)).await
            }
            "crashlog:removeall" => self.crashlog_remove(required(&args, "name")?, None).await,

            _ => Err(unknown_action(action)),
        }
    }
}

/// Crashlog keys are `<timestamp>:<uuid>`.
fn crashlog_timestamp(key: &str) -> &str {
    key.split_once(':').map_or(key, |(timestamp, _)| timestamp)
}

#[cfg(test)]
#[path = "storage_tests.rs"]
mod tests;
