//! Fake collaborators for session integration tests
//!
//! The fakes record every call so tests can assert on exact sequences. The
//! transport keeps the armed `StreamDone` handle around; tests fire it to
//! simulate a natural stream end, or let `stop` fire it the way a real
//! transport would on a forced stop.

// Each test binary uses a different subset of the fakes.
#![allow(dead_code)]

use async_trait::async_trait;
use chorus_core::{
    GuildId, NotificationSink, ResolveError, Resolver, SettingsError, SettingsStore, SinkError,
    StreamDone, TopicChannel, Track, Transport, TransportError, UiField,
};
use chorus_session::SessionBackend;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Capture session logs in test output, honoring `RUST_LOG`.
///
/// `try_init` because every test in the binary goes through the setup and
/// only the first registration can win.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Let the session task drain its mailbox on a current-thread runtime.
pub async fn settle() {
    for _ in 0..64 {
        tokio::task::yield_now().await;
    }
}

#[derive(Default)]
pub struct FakeTransport {
    playing: AtomicBool,
    paused: AtomicBool,
    pub fail_play: AtomicBool,
    pub fail_connect: AtomicBool,
    /// Locators of successfully started streams, in order
    pub plays: Mutex<Vec<String>>,
    /// Locators of every play attempt, failed ones included
    pub attempts: Mutex<Vec<String>>,
    pub connects: Mutex<Vec<String>>,
    pub gain: Mutex<f32>,
    pending: Mutex<Option<StreamDone>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Steal the armed completion handle, simulating a foreign-thread owner.
    pub fn take_pending(&self) -> Option<StreamDone> {
        self.pending.lock().unwrap().take()
    }

    /// Simulate the current stream ending naturally.
    pub fn complete_current(&self) {
        self.playing.store(false, Ordering::SeqCst);
        self.paused.store(false, Ordering::SeqCst);
        if let Some(done) = self.take_pending() {
            done.complete(None);
        }
    }

    /// Simulate the current stream dying with an error.
    pub fn fail_current(&self, message: &str) {
        self.playing.store(false, Ordering::SeqCst);
        if let Some(done) = self.take_pending() {
            done.complete(Some(TransportError::Stream(message.to_string())));
        }
    }

    pub fn play_count(&self) -> usize {
        self.plays.lock().unwrap().len()
    }

    pub fn played(&self) -> Vec<String> {
        self.plays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn connect(&self, channel_ref: &str) -> Result<(), TransportError> {
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(TransportError::Connect("no permission".into()));
        }
        self.connects.lock().unwrap().push(channel_ref.to_string());
        Ok(())
    }

    async fn play(
        &self,
        locator: &str,
        gain: f32,
        done: StreamDone,
    ) -> Result<(), TransportError> {
        self.attempts.lock().unwrap().push(locator.to_string());
        if self.fail_play.load(Ordering::SeqCst) {
            return Err(TransportError::Stream("bad stream".into()));
        }
        self.plays.lock().unwrap().push(locator.to_string());
        *self.gain.lock().unwrap() = gain;
        *self.pending.lock().unwrap() = Some(done);
        self.playing.store(true, Ordering::SeqCst);
        self.paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) {
        self.playing.store(false, Ordering::SeqCst);
        self.paused.store(false, Ordering::SeqCst);
        if let Some(done) = self.pending.lock().unwrap().take() {
            done.complete(None);
        }
    }

    fn pause(&self) {
        if self.playing.swap(false, Ordering::SeqCst) {
            self.paused.store(true, Ordering::SeqCst);
        }
    }

    fn resume(&self) {
        if self.paused.swap(false, Ordering::SeqCst) {
            self.playing.store(true, Ordering::SeqCst);
        }
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    fn set_gain(&self, gain: f32) {
        *self.gain.lock().unwrap() = gain;
    }

    async fn disconnect(&self) {
        self.stop();
    }
}

/// Resolves "a,b,c" into one track per comma-separated item.
#[derive(Default)]
pub struct FakeResolver {
    pub fail: AtomicBool,
}

impl FakeResolver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl Resolver for FakeResolver {
    async fn resolve(&self, query: &str) -> Result<Vec<Track>, ResolveError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ResolveError::ServiceUnavailable("search is down".into()));
        }
        let tracks: Vec<Track> = query
            .split(',')
            .filter(|s| !s.is_empty())
            .map(|s| Track::new(format!("https://youtu.be/{s}"), format!("Song {s}")))
            .collect();
        if tracks.is_empty() {
            return Err(ResolveError::NoResults(query.to_string()));
        }
        Ok(tracks)
    }
}

#[derive(Default)]
pub struct FakeSink {
    pub published: Mutex<Vec<(UiField, String)>>,
    pub attached: Mutex<Option<String>>,
}

impl FakeSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn values(&self, field: UiField) -> Vec<String> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .filter(|(f, _)| *f == field)
            .map(|(_, v)| v.clone())
            .collect()
    }

    pub fn last(&self, field: UiField) -> Option<String> {
        self.values(field).pop()
    }

    pub fn publish_count(&self) -> usize {
        self.published.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationSink for FakeSink {
    async fn attach(&self, channel_ref: &str) -> Result<(), SinkError> {
        *self.attached.lock().unwrap() = Some(channel_ref.to_string());
        Ok(())
    }

    async fn detach(&self) {
        *self.attached.lock().unwrap() = None;
    }

    fn publish(&self, field: UiField, value: &str) {
        self.published
            .lock()
            .unwrap()
            .push((field, value.to_string()));
    }
}

#[derive(Default)]
pub struct FakeSettings {
    pub values: Mutex<HashMap<(GuildId, String), String>>,
}

impl FakeSettings {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn preset(self: &Arc<Self>, guild: GuildId, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert((guild, key.to_string()), value.to_string());
    }

    pub fn value(&self, guild: GuildId, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap()
            .get(&(guild, key.to_string()))
            .cloned()
    }
}

#[async_trait]
impl SettingsStore for FakeSettings {
    async fn get(&self, guild: GuildId, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.value(guild, key))
    }

    async fn set(&self, guild: GuildId, key: &str, value: &str) -> Result<(), SettingsError> {
        self.values
            .lock()
            .unwrap()
            .insert((guild, key.to_string()), value.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeTopic {
    pub topics: Mutex<Vec<String>>,
}

impl FakeTopic {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl TopicChannel for FakeTopic {
    async fn set_topic(&self, text: &str) -> Result<(), SinkError> {
        self.topics.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Backend handing out one shared set of fakes for every guild.
pub struct FakeBackend {
    pub transport: Arc<FakeTransport>,
    pub sink: Arc<FakeSink>,
    pub resolver: Arc<FakeResolver>,
    pub settings: Arc<FakeSettings>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        init_tracing();
        Arc::new(Self {
            transport: FakeTransport::new(),
            sink: FakeSink::new(),
            resolver: FakeResolver::new(),
            settings: FakeSettings::new(),
        })
    }
}

impl SessionBackend for FakeBackend {
    fn transport(&self, _guild: GuildId) -> Arc<dyn Transport> {
        self.transport.clone()
    }

    fn sink(&self, _guild: GuildId) -> Arc<dyn NotificationSink> {
        self.sink.clone()
    }

    fn resolver(&self) -> Arc<dyn Resolver> {
        self.resolver.clone()
    }

    fn settings(&self) -> Arc<dyn SettingsStore> {
        self.settings.clone()
    }

    fn topic_channel(&self, _guild: GuildId) -> Option<Arc<dyn TopicChannel>> {
        None
    }
}
