//! Test doubles for the application ports.

use crate::ports::chat_repository::{ChatRepository, RepositoryError};
use crate::ports::engine::{EngineError, Generation, InferenceEngine};
use crate::ports::relay::{ClientGone, EventRelay};
use crate::ports::user_repository::UserRepository;
use async_trait::async_trait;
use hearth_domain::{Chat, ChatId, Message, ModelName, User};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A frame observed by [`TestRelay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayedFrame {
    Fragment(String),
    Heartbeat,
    ErrorMarker,
    Terminal,
}

/// Relay double recording frames; can simulate a dying connection either
/// by write failures (`failing_fragments_after`) or by an explicit
/// teardown (`disconnect`, which resolves `closed()`).
pub struct TestRelay {
    frames: Mutex<Vec<RelayedFrame>>,
    gone: CancellationToken,
    dead: AtomicBool,
    fail_after: AtomicUsize,
    forwarded: AtomicUsize,
}

impl TestRelay {
    pub fn connected() -> Arc<Self> {
        Arc::new(Self {
            frames: Mutex::new(Vec::new()),
            gone: CancellationToken::new(),
            dead: AtomicBool::new(false),
            fail_after: AtomicUsize::new(usize::MAX),
            forwarded: AtomicUsize::new(0),
        })
    }

    /// After `n` successful fragment writes the connection goes dead:
    /// every further write fails, but `closed()` does not resolve (the
    /// death is only observable through write errors).
    pub fn failing_fragments_after(self: Arc<Self>, n: usize) -> Arc<Self> {
        self.fail_after.store(n, Ordering::SeqCst);
        self
    }

    /// Tear the connection down the way an HTTP client going away does:
    /// `closed()` resolves and writes start failing.
    pub fn disconnect(&self) {
        self.gone.cancel();
    }

    pub fn frames(&self) -> Vec<RelayedFrame> {
        self.frames.lock().unwrap().clone()
    }

    pub fn fragments(&self) -> Vec<String> {
        self.frames()
            .into_iter()
            .filter_map(|f| match f {
                RelayedFrame::Fragment(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    fn is_dead(&self) -> bool {
        self.dead.load(Ordering::SeqCst) || self.gone.is_cancelled()
    }

    fn push(&self, frame: RelayedFrame) -> Result<(), ClientGone> {
        if self.is_dead() {
            return Err(ClientGone);
        }
        self.frames.lock().unwrap().push(frame);
        Ok(())
    }
}

#[async_trait]
impl EventRelay for TestRelay {
    fn forward(&self, fragment: &str) -> Result<(), ClientGone> {
        self.push(RelayedFrame::Fragment(fragment.to_string()))?;
        let sent = self.forwarded.fetch_add(1, Ordering::SeqCst) + 1;
        if sent >= self.fail_after.load(Ordering::SeqCst) {
            self.dead.store(true, Ordering::SeqCst);
        }
        Ok(())
    }

    fn heartbeat(&self) -> Result<(), ClientGone> {
        self.push(RelayedFrame::Heartbeat)
    }

    fn error_marker(&self) -> Result<(), ClientGone> {
        self.push(RelayedFrame::ErrorMarker)
    }

    fn terminal(&self) -> Result<(), ClientGone> {
        self.push(RelayedFrame::Terminal)
    }

    async fn closed(&self) {
        self.gone.cancelled().await;
    }
}

/// Generation double yielding a scripted fragment sequence.
pub struct ScriptedGeneration {
    script: VecDeque<Result<String, EngineError>>,
    exit: Option<EngineError>,
    fragment_delay: Option<Duration>,
    pub reaped: Arc<AtomicBool>,
    pub aborted: Arc<AtomicBool>,
}

impl ScriptedGeneration {
    pub fn fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: fragments.into_iter().map(|f| Ok(f.into())).collect(),
            exit: None,
            fragment_delay: None,
            reaped: Arc::new(AtomicBool::new(false)),
            aborted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Fail the read after the scripted fragments are exhausted.
    pub fn then_fail(mut self, error: EngineError) -> Self {
        self.script.push_back(Err(error));
        self
    }

    /// Exit abnormally when reaped after a clean end of stream.
    pub fn with_exit(mut self, error: EngineError) -> Self {
        self.exit = Some(error);
        self
    }

    /// Sleep before producing each fragment (pairs with paused-time tests).
    pub fn with_fragment_delay(mut self, delay: Duration) -> Self {
        self.fragment_delay = Some(delay);
        self
    }
}

#[async_trait]
impl Generation for ScriptedGeneration {
    async fn next_fragment(&mut self) -> Result<Option<String>, EngineError> {
        if let Some(delay) = self.fragment_delay {
            tokio::time::sleep(delay).await;
        }
        match self.script.pop_front() {
            Some(Ok(fragment)) => Ok(Some(fragment)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }

    async fn wait(mut self: Box<Self>) -> Result<(), EngineError> {
        self.reaped.store(true, Ordering::SeqCst);
        match self.exit.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn abort(self: Box<Self>) {
        self.aborted.store(true, Ordering::SeqCst);
    }
}

/// Engine double that counts spawns and records prompts.
///
/// `generate` pops the next queued [`ScriptedGeneration`]; with an empty
/// queue it fails with [`EngineError::Launch`].
pub struct CountingEngine {
    pub spawns: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    queue: Mutex<VecDeque<ScriptedGeneration>>,
}

impl CountingEngine {
    pub fn with_generations<I>(generations: I) -> Arc<Self>
    where
        I: IntoIterator<Item = ScriptedGeneration>,
    {
        Arc::new(Self {
            spawns: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            queue: Mutex::new(generations.into_iter().collect()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Self::with_generations([])
    }

    pub fn spawn_count(&self) -> usize {
        self.spawns.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceEngine for CountingEngine {
    async fn generate(
        &self,
        prompt: &str,
        _model: &ModelName,
    ) -> Result<Box<dyn Generation>, EngineError> {
        self.spawns.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.queue.lock().unwrap().pop_front() {
            Some(generation) => Ok(Box::new(generation)),
            None => Err(EngineError::Launch("engine unavailable".into())),
        }
    }
}

/// In-memory chat repository double.
pub struct MemoryChats {
    chats: Mutex<Vec<Chat>>,
    fail_appends_after: AtomicUsize,
    appends: AtomicUsize,
}

impl MemoryChats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            chats: Mutex::new(Vec::new()),
            fail_appends_after: AtomicUsize::new(usize::MAX),
            appends: AtomicUsize::new(0),
        })
    }

    /// Make every append past the first `n` fail with a storage error.
    pub fn failing_appends_after(self: Arc<Self>, n: usize) -> Arc<Self> {
        self.fail_appends_after.store(n, Ordering::SeqCst);
        self
    }

    pub fn chats(&self) -> Vec<Chat> {
        self.chats.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatRepository for MemoryChats {
    async fn create_chat(&self, title: &str) -> Result<Chat, RepositoryError> {
        let chat = Chat::new(title);
        self.chats.lock().unwrap().push(chat.clone());
        Ok(chat)
    }

    async fn get_chat(&self, id: ChatId) -> Result<Chat, RepositoryError> {
        self.chats
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(RepositoryError::ChatNotFound(id))
    }

    async fn list_chats(&self) -> Result<Vec<Chat>, RepositoryError> {
        Ok(self.chats())
    }

    async fn append_message(&self, id: ChatId, message: Message) -> Result<(), RepositoryError> {
        let done = self.appends.fetch_add(1, Ordering::SeqCst);
        if done >= self.fail_appends_after.load(Ordering::SeqCst) {
            return Err(RepositoryError::Storage("append rejected".into()));
        }
        let mut chats = self.chats.lock().unwrap();
        let chat = chats
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::ChatNotFound(id))?;
        chat.push_message(message);
        Ok(())
    }

    async fn delete_chat(&self, id: ChatId) -> Result<(), RepositoryError> {
        let mut chats = self.chats.lock().unwrap();
        let before = chats.len();
        chats.retain(|c| c.id != id);
        if chats.len() == before {
            return Err(RepositoryError::ChatNotFound(id));
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), RepositoryError> {
        self.chats.lock().unwrap().clear();
        Ok(())
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.chats.lock().unwrap().len())
    }
}

/// In-memory user repository double.
#[derive(Default)]
pub struct MemoryUsers {
    users: Mutex<Vec<User>>,
}

impl MemoryUsers {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_user(user: User) -> Arc<Self> {
        Arc::new(Self {
            users: Mutex::new(vec![user]),
        })
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn create_user(&self, user: User) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(RepositoryError::UserExists(user.username));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn update_settings(
        &self,
        username: &str,
        about_me: &str,
        preferences: &str,
    ) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.username == username)
            .ok_or_else(|| RepositoryError::UserNotFound(username.to_string()))?;
        user.about_me = about_me.to_string();
        user.preferences = preferences.to_string();
        user.updated_at = chrono::Utc::now();
        Ok(user.clone())
    }
}
