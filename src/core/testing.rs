//! In-memory doubles for the network capabilities.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::downloader::{ChecksumSource, Fetcher};
use crate::core::error::{LockError, LockResult};
use crate::core::reconcile::Shutdown;

type Hook = Box<dyn Fn() + Send + Sync>;

/// Serves canned bodies by URL and counts requests.
#[derive(Default)]
pub struct FakeRemote {
    bodies: HashMap<String, Vec<u8>>,
    hits: Mutex<HashMap<String, usize>>,
    /// Run after the matching URL has been served.
    hooks: Vec<(String, Hook)>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.bodies.insert(url.to_string(), body.into());
        self
    }

    pub fn with_json(self, url: &str, value: serde_json::Value) -> Self {
        self.with_body(url, value.to_string())
    }

    pub fn after(mut self, url: &str, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.hooks.push((url.to_string(), Box::new(hook)));
        self
    }

    /// Trigger the shutdown once `url` has been served.
    pub fn interrupt_after(self, url: &str, shutdown: Shutdown) -> Self {
        self.after(url, move || shutdown.trigger())
    }

    pub fn hits(&self, url: &str) -> usize {
        self.hits.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    fn serve(&self, url: &str) -> LockResult<Vec<u8>> {
        *self.hits.lock().unwrap().entry(url.to_string()).or_default() += 1;

        let body = self
            .bodies
            .get(url)
            .cloned()
            .ok_or_else(|| LockError::RequestFailed {
                url: url.to_string(),
                status: 404,
            })?;

        for (trigger, hook) in &self.hooks {
            if trigger == url {
                hook();
            }
        }
        Ok(body)
    }
}

#[async_trait]
impl Fetcher for FakeRemote {
    async fn get_text(&self, url: &str) -> LockResult<String> {
        let bytes = self.serve(url)?;
        String::from_utf8(bytes).map_err(|e| LockError::Other(e.to_string()))
    }

    async fn get_bytes(&self, url: &str) -> LockResult<Vec<u8>> {
        self.serve(url)
    }
}

/// Returns a checksum derived from the URL and records every call.
#[derive(Default)]
pub struct FakeChecksums {
    calls: Mutex<Vec<String>>,
}

impl FakeChecksums {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChecksumSource for FakeChecksums {
    async fn sha256(&self, url: &str) -> LockResult<String> {
        self.calls.lock().unwrap().push(url.to_string());
        Ok(format!("sha256-of-{}", url.rsplit('/').next().unwrap_or(url)))
    }
}

/// A userdev jar holding `config` as `config.json`.
pub fn userdev_jar(config: &serde_json::Value) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    writer
        .start_file("config.json", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(config.to_string().as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}
