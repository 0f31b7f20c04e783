//! Fake collaborators for coordinator tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::oneshot;

use crate::prompt::UserPrompt;
use crate::storage::{AuthProvider, FileEntry, StorageClient, StorageError, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ReadDirectory(String),
    DeleteFile(String),
    DeleteKey(String),
    FlushAllKeys,
}

fn failure(endpoint: &str) -> StorageError {
    StorageError::Status {
        url: format!("fake://{}", endpoint),
        status: StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// In-memory storage that records every call, can be told to fail
/// individual operations and can hold a file deletion until released.
#[derive(Debug, Default)]
pub struct FakeStorage {
    files: Mutex<Vec<FileEntry>>,
    calls: Mutex<Vec<Call>>,
    failing_files: Mutex<HashSet<String>>,
    failing_keys: Mutex<HashSet<String>>,
    fail_reads: Mutex<bool>,
    fail_flush: Mutex<bool>,
    holds: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    user: Mutex<Option<User>>,
}

impl FakeStorage {
    pub fn with_paths(paths: &[&str]) -> Self {
        let files = paths
            .iter()
            .enumerate()
            .map(|(index, path)| {
                FileEntry::new(index.to_string(), path.trim_start_matches('/'), *path)
            })
            .collect();
        FakeStorage {
            files: Mutex::new(files),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|call| predicate(call)).count()
    }

    pub fn paths(&self) -> Vec<String> {
        self.files
            .lock()
            .unwrap()
            .iter()
            .map(|entry| entry.path.clone())
            .collect()
    }

    pub fn fail_file(&self, path: &str) {
        self.failing_files.lock().unwrap().insert(path.to_string());
    }

    pub fn fail_key(&self, path: &str) {
        self.failing_keys.lock().unwrap().insert(path.to_string());
    }

    pub fn fail_reads(&self, fail: bool) {
        *self.fail_reads.lock().unwrap() = fail;
    }

    pub fn fail_flush(&self) {
        *self.fail_flush.lock().unwrap() = true;
    }

    pub fn sign_in(&self, username: &str) {
        *self.user.lock().unwrap() = Some(User {
            username: username.to_string(),
        });
    }

    /// The next deletion of `path` waits until the returned sender fires.
    pub fn hold(&self, path: &str) -> oneshot::Sender<()> {
        let (release, held) = oneshot::channel();
        self.holds.lock().unwrap().insert(path.to_string(), held);
        release
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl StorageClient for FakeStorage {
    async fn read_directory(&self, path: &str) -> Result<Vec<FileEntry>, StorageError> {
        self.record(Call::ReadDirectory(path.to_string()));
        if *self.fail_reads.lock().unwrap() {
            return Err(failure("readdir"));
        }
        Ok(self.files.lock().unwrap().clone())
    }

    async fn delete_file(&self, path: &str) -> Result<(), StorageError> {
        self.record(Call::DeleteFile(path.to_string()));
        let held = self.holds.lock().unwrap().remove(path);
        if let Some(held) = held {
            let _ = held.await;
        }
        if self.failing_files.lock().unwrap().contains(path) {
            return Err(failure("delete"));
        }
        self.files.lock().unwrap().retain(|entry| entry.path != path);
        Ok(())
    }

    async fn delete_key(&self, key: &str) -> Result<(), StorageError> {
        self.record(Call::DeleteKey(key.to_string()));
        if self.failing_keys.lock().unwrap().contains(key) {
            return Err(failure("kv/delete"));
        }
        Ok(())
    }

    async fn flush_all_keys(&self) -> Result<(), StorageError> {
        self.record(Call::FlushAllKeys);
        if *self.fail_flush.lock().unwrap() {
            return Err(failure("kv/flush"));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthProvider for FakeStorage {
    async fn current_user(&self) -> Result<Option<User>, StorageError> {
        Ok(self.user.lock().unwrap().clone())
    }
}

/// Prompt with scripted answers. Once the script runs out it answers with
/// the fallback.
#[derive(Debug)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<bool>>,
    fallback: bool,
    prompts: Mutex<Vec<String>>,
    alerts: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn answering(answer: bool) -> Self {
        Self::scripted(&[], answer)
    }

    pub fn scripted(answers: &[bool], fallback: bool) -> Self {
        ScriptedPrompt {
            answers: Mutex::new(answers.iter().copied().collect()),
            fallback,
            prompts: Mutex::new(Vec::new()),
            alerts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl UserPrompt for ScriptedPrompt {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answers.lock().unwrap().pop_front().unwrap_or(self.fallback)
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

/// Yields to other futures on the task until `condition` holds.
pub async fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
