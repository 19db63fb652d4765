//! Per-guild session actor
//!
//! One tokio task owns one `Session`: the queue, history, volume, loop mode
//! and phase live inside it and are only ever touched by that task. Every
//! external input, user commands and stream completions alike, arrives as a
//! [`Command`] on the session's channel, which is what serializes queue
//! mutation against playback advance.
//!
//! The advance algorithm and the completion handling here are the heart of
//! the crate; the rest of the file is the command surface that feeds them.

use crate::bridge::CompletionBridge;
use crate::command::{Command, RemoveSpec, SkipSpec, VolumeSpec};
use crate::config::SessionConfig;
use crate::notify::Notifier;
use chorus_core::{
    GuildId, NotificationSink, Resolver, SettingsStore, TopicChannel, Transport,
};
use chorus_playback::{History, LoopMode, PlaybackError, Queue, SessionPhase, Volume};
use rand::seq::SliceRandom;
use rand::thread_rng;
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

/// Settings key for the persisted volume
const SETTING_VOLUME: &str = "volume";

/// Settings key for the channel-topic toggle
const SETTING_TOPIC: &str = "topic_enabled";

/// Topic line shown when nothing is playing
const TOPIC_IDLE: &str = "Nothing is currently playing.";

/// Collaborators a session needs to run
pub struct SessionDeps {
    /// Voice connection and audio pipeline
    pub transport: Arc<dyn Transport>,
    /// Query-to-tracks resolution
    pub resolver: Arc<dyn Resolver>,
    /// Persistent per-guild settings
    pub settings: Arc<dyn SettingsStore>,
    /// UI field fan-out
    pub sink: Arc<dyn NotificationSink>,
    /// Optional channel-topic target
    pub topic: Option<Arc<dyn TopicChannel>>,
}

/// Sending half of a session's command channel
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: UnboundedSender<Command>,
}

impl SessionHandle {
    /// Submit a command. Returns `false` when the session has terminated.
    pub fn send(&self, command: Command) -> bool {
        self.tx.send(command).is_ok()
    }

    /// Whether the session task has terminated
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Playback session for one guild
pub struct Session {
    guild: GuildId,
    config: SessionConfig,
    phase: SessionPhase,
    queue: Queue,
    history: History,
    volume: Volume,
    loop_mode: LoopMode,
    topic_enabled: bool,
    current: Option<chorus_core::Track>,
    bridge: CompletionBridge,
    transport: Arc<dyn Transport>,
    resolver: Arc<dyn Resolver>,
    settings: Arc<dyn SettingsStore>,
    topic: Option<Arc<dyn TopicChannel>>,
    notifier: Notifier,
}

impl Session {
    /// Spawn a session task and return its handle.
    pub fn spawn(guild: GuildId, config: SessionConfig, deps: SessionDeps) -> SessionHandle {
        let (tx, rx) = unbounded_channel();
        let bridge = CompletionBridge::new(tx.clone());
        let notifier = Notifier::new(deps.sink, config.queue_display_size);

        let session = Self {
            guild,
            phase: SessionPhase::Offline,
            queue: Queue::new(),
            history: History::new(config.history_max),
            volume: Volume::new(config.default_volume),
            loop_mode: LoopMode::Off,
            topic_enabled: false,
            current: None,
            bridge,
            transport: deps.transport,
            resolver: deps.resolver,
            settings: deps.settings,
            topic: deps.topic,
            notifier,
            config,
        };

        tokio::spawn(session.run(rx));
        SessionHandle { tx }
    }

    /// Drive the session until destroyed or until every handle is dropped.
    async fn run(mut self, mut rx: UnboundedReceiver<Command>) {
        while let Some(command) = rx.recv().await {
            if self.handle(command).await.is_break() {
                break;
            }
        }
        self.teardown().await;
        // rx drops here; a completion fired after this point has nowhere
        // to send and disappears silently.
    }

    async fn handle(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::Play {
                voice_channel,
                text_channel,
                query,
                index,
                interrupt,
                shuffle,
            } => {
                self.handle_play(&voice_channel, &text_channel, &query, index, interrupt, shuffle)
                    .await;
            }
            Command::Pause => self.handle_pause(),
            Command::Resume => self.handle_resume(),
            Command::Toggle => self.handle_toggle(),
            Command::Skip(spec) => self.handle_skip(spec).await,
            Command::Remove(spec) => self.handle_remove(spec),
            Command::Rewind(n) => self.handle_rewind(n).await,
            Command::Shuffle => self.handle_shuffle(),
            Command::SetLoop(mode) => self.handle_set_loop(mode),
            Command::SetVolume(spec) => self.handle_volume(spec).await,
            Command::Stop => self.handle_stop().await,
            Command::MoveVoice(channel) => self.handle_move_voice(&channel).await,
            Command::MoveText(channel) => self.handle_move_text(&channel).await,
            Command::TopicOn => self.handle_topic(true).await,
            Command::TopicOff => self.handle_topic(false).await,
            Command::Destroy => return ControlFlow::Break(()),
            Command::StreamEnded { seq, error } => self.handle_stream_ended(seq, error).await,
        }
        ControlFlow::Continue(())
    }

    /// Readiness gate for every command except play. Not being ready means
    /// there is nothing to control yet, so the command is dropped silently.
    fn ensure_ready(&self, what: &str) -> bool {
        if self.phase.is_ready() {
            true
        } else {
            debug!(guild = %self.guild, phase = ?self.phase, command = what,
                "ignoring command while not ready");
            false
        }
    }

    fn stream_active(&self) -> bool {
        self.transport.is_playing() || self.transport.is_paused()
    }

    // ---- play & startup -------------------------------------------------

    async fn handle_play(
        &mut self,
        voice_channel: &str,
        text_channel: &str,
        query: &str,
        index: usize,
        interrupt: bool,
        shuffle: bool,
    ) {
        if self.phase.is_busy() {
            debug!(guild = %self.guild, "ignoring play while a transition is in flight");
            return;
        }
        if self.phase == SessionPhase::Offline && !self.start(voice_channel, text_channel).await {
            return;
        }
        if !self.phase.is_ready() {
            return;
        }

        let mut tracks = match self.resolver.resolve(query).await {
            Ok(tracks) if !tracks.is_empty() => tracks,
            Ok(_) => {
                self.notifier
                    .status_error(&format!("couldn't find anything for '{query}'"));
                return;
            }
            Err(e) => {
                self.notifier
                    .status_error(&format!("couldn't find anything for '{query}': {e}"));
                return;
            }
        };

        if shuffle {
            tracks.shuffle(&mut thread_rng());
        }

        let count = tracks.len();
        self.queue.enqueue(tracks, index);
        self.notifier.queue(&self.queue);
        self.notifier
            .status_info(&format!("added {count} song(s) to the queue"));

        if interrupt || self.current.is_none() {
            self.advance().await;
        }
    }

    /// First connection: attach the UI surface, connect voice, pull
    /// persisted settings. A failure at any step falls back to offline.
    async fn start(&mut self, voice_channel: &str, text_channel: &str) -> bool {
        if self.phase.begin_transition().is_err() {
            return false;
        }
        info!(guild = %self.guild, "starting session");

        if let Err(e) = self.notifier.sink().attach(text_channel).await {
            error!(guild = %self.guild, error = %e, "couldn't attach the ui surface");
            self.phase.end_transition(false);
            return false;
        }

        if let Err(e) = self.transport.connect(voice_channel).await {
            self.notifier
                .status_error(&format!("couldn't join the voice channel: {e}"));
            self.notifier.sink().detach().await;
            self.phase.end_transition(false);
            return false;
        }

        self.load_settings().await;
        self.phase.end_transition(true);

        self.notifier.volume(self.volume.level());
        self.notifier.queue(&self.queue);
        self.notifier.reset_now_playing();
        self.push_topic("The music player is starting").await;
        true
    }

    async fn load_settings(&mut self) {
        match self.settings.get(self.guild, SETTING_VOLUME).await {
            Ok(Some(raw)) => match raw.parse::<u16>() {
                Ok(level) => self.volume.set(level),
                Err(_) => warn!(guild = %self.guild, raw, "discarding unparseable volume setting"),
            },
            Ok(None) => self.volume.set(self.config.default_volume),
            Err(e) => warn!(guild = %self.guild, error = %e, "couldn't load volume setting"),
        }

        match self.settings.get(self.guild, SETTING_TOPIC).await {
            Ok(value) => self.topic_enabled = value.as_deref() == Some("true"),
            Err(e) => warn!(guild = %self.guild, error = %e, "couldn't load topic setting"),
        }
    }

    // ---- the advancer ---------------------------------------------------

    /// Consume the next queued track and start its stream.
    ///
    /// Playback is exclusive: an active stream is force-stopped first, with
    /// its armed completion invalidated so the stop cannot double-advance.
    /// An empty queue applies the loop mode; at most one wraparound rebuild
    /// happens per call, so an empty history terminates instead of cycling.
    async fn advance(&mut self) {
        if self.stream_active() {
            self.bridge.invalidate();
            self.transport.stop();
        }
        self.current = None;

        let mut wrapped = false;
        loop {
            let Some(track) = self.queue.pop_front() else {
                if !wrapped && self.loop_mode != LoopMode::Off && !self.history.is_empty() {
                    let played = self.history.drain_all();
                    self.queue.enqueue(played, 0);
                    if self.loop_mode == LoopMode::Shuffle {
                        self.queue.shuffle();
                    }
                    wrapped = true;
                    self.notifier.queue(&self.queue);
                    continue;
                }

                self.history.clear();
                self.notifier.queue(&self.queue);
                self.notifier.reset_now_playing();
                self.notifier.status_info("the queue is finished");
                self.push_topic(TOPIC_IDLE).await;
                return;
            };

            self.history.push(track.clone());
            self.notifier.queue(&self.queue);

            let done = self.bridge.arm();
            match self
                .transport
                .play(&track.locator, self.volume.gain(), done)
                .await
            {
                Ok(()) => {
                    info!(guild = %self.guild, track = %track.name, "now playing");
                    self.notifier.now_playing(&track);
                    self.notifier
                        .status_info(&format!("playing {}", track.name));
                    self.push_topic(&format!("Playing {}", track.name)).await;
                    self.current = Some(track);
                    return;
                }
                Err(e) => {
                    // Skip-on-failure: the popped track stays consumed and
                    // the session goes idle rather than retrying in place.
                    self.bridge.invalidate();
                    self.notifier
                        .status_error(&format!("couldn't play {}: {e}", track.name));
                    self.notifier.reset_now_playing();
                    return;
                }
            }
        }
    }

    async fn handle_stream_ended(
        &mut self,
        seq: u64,
        error: Option<chorus_core::TransportError>,
    ) {
        if !self.bridge.acknowledge(seq) {
            debug!(guild = %self.guild, seq, "dropping stale stream completion");
            return;
        }
        if let Some(e) = &error {
            self.notifier.status_error(&format!("playback failed: {e}"));
        }
        if self.current.take().is_none() {
            error!(guild = %self.guild, seq,
                "stream completion with no active track, forcing idle");
            self.notifier.reset_now_playing();
            return;
        }
        self.advance().await;
    }

    // ---- playback control -----------------------------------------------

    fn handle_pause(&mut self) {
        if !self.ensure_ready("pause") {
            return;
        }
        if self.transport.is_playing() {
            self.transport.pause();
            self.notifier.status_info("paused");
        }
    }

    fn handle_resume(&mut self) {
        if !self.ensure_ready("resume") {
            return;
        }
        if self.transport.is_paused() {
            self.transport.resume();
            self.notifier.status_info("resumed");
        }
    }

    fn handle_toggle(&mut self) {
        if !self.ensure_ready("toggle") {
            return;
        }
        if self.transport.is_playing() {
            self.transport.pause();
            self.notifier.status_info("paused");
        } else if self.transport.is_paused() {
            self.transport.resume();
            self.notifier.status_info("resumed");
        }
    }

    async fn handle_skip(&mut self, spec: SkipSpec) {
        if !self.ensure_ready("skip") {
            return;
        }
        if self.current.is_none() && self.queue.is_empty() {
            self.notifier.status_info("there's nothing to skip");
            return;
        }

        let n = match spec {
            SkipSpec::Count(n) => n as usize,
            SkipSpec::All => self.queue.len() + 1,
        };

        // The skipped songs still count as played.
        for _ in 1..n {
            match self.queue.pop_front() {
                Some(track) => self.history.push(track),
                None => break,
            }
        }
        self.notifier.queue(&self.queue);

        if self.stream_active() {
            // The forced stop fires the armed completion, which advances
            // through the bridge like a natural stream end.
            self.transport.stop();
        } else {
            self.advance().await;
        }
    }

    async fn handle_rewind(&mut self, n: u32) {
        if !self.ensure_ready("rewind") {
            return;
        }
        if self.history.is_empty() {
            self.notifier.status_info("there's nothing to rewind to");
            return;
        }

        // n + 1 because the current track sits at the history tail; popping
        // in order leaves the most recently played at the very front.
        let want = n as usize + 1;
        let mut moved = 0;
        for _ in 0..want {
            match self.history.pop() {
                Some(track) => {
                    self.queue.push_front(track);
                    moved += 1;
                }
                None => break,
            }
        }
        if moved < want {
            self.notifier
                .status_warn(&format!("only {moved} song(s) in the history"));
        }
        self.notifier.queue(&self.queue);

        if self.stream_active() {
            self.transport.stop();
        } else {
            self.advance().await;
        }
    }

    // ---- queue commands -------------------------------------------------

    fn handle_remove(&mut self, spec: RemoveSpec) {
        if !self.ensure_ready("remove") {
            return;
        }

        let result = match spec {
            RemoveSpec::All => {
                let removed = self.queue.clear();
                if removed == 0 {
                    Err(PlaybackError::QueueEmpty)
                } else {
                    Ok(removed)
                }
            }
            // The parsers only produce positions >= 1, but the specs can be
            // constructed directly, so position 0 is rejected rather than
            // letting the 1-based conversion underflow.
            RemoveSpec::Index(i) => match i.checked_sub(1) {
                Some(lo) => self.queue.remove_range(lo, i),
                None => Err(PlaybackError::IndexOutOfBounds {
                    index: 0,
                    len: self.queue.len(),
                }),
            },
            RemoveSpec::Range(lo, hi) => match lo.checked_sub(1) {
                Some(lo) => self.queue.remove_range(lo, hi),
                None => Err(PlaybackError::InvalidRange {
                    lo: 0,
                    hi,
                    len: self.queue.len(),
                }),
            },
        };

        match result {
            Ok(removed) => {
                self.notifier.queue(&self.queue);
                self.notifier
                    .status_info(&format!("removed {removed} song(s) from the queue"));
            }
            Err(e) => self.notifier.status_error(&e.to_string()),
        }
    }

    fn handle_shuffle(&mut self) {
        if !self.ensure_ready("shuffle") {
            return;
        }
        if self.queue.is_empty() {
            self.notifier.status_info("there's nothing in the queue");
            return;
        }
        self.queue.shuffle();
        self.notifier.queue(&self.queue);
        self.notifier.status_info("shuffled the queue");
    }

    fn handle_set_loop(&mut self, mode: LoopMode) {
        if !self.ensure_ready("loop") {
            return;
        }
        self.loop_mode = mode;
        self.notifier
            .status_info(&format!("loop mode set to {mode}"));
    }

    async fn handle_volume(&mut self, spec: VolumeSpec) {
        if !self.ensure_ready("volume") {
            return;
        }

        let level = match spec {
            VolumeSpec::Up => match self.volume.step_up() {
                Some(level) => level,
                None => {
                    self.notifier.status_warn("the volume is already at maximum");
                    return;
                }
            },
            VolumeSpec::Down => match self.volume.step_down() {
                Some(level) => level,
                None => {
                    self.notifier.status_warn("the volume is already at minimum");
                    return;
                }
            },
            VolumeSpec::Absolute(level) => {
                self.volume.set(level);
                self.volume.level()
            }
        };

        if self.stream_active() {
            self.transport.set_gain(self.volume.gain());
        }
        self.notifier.volume(level);

        if let Err(e) = self
            .settings
            .set(self.guild, SETTING_VOLUME, &level.to_string())
            .await
        {
            warn!(guild = %self.guild, error = %e, "couldn't persist volume");
        }
    }

    async fn handle_stop(&mut self) {
        if !self.ensure_ready("stop") {
            return;
        }
        self.bridge.invalidate();
        if self.stream_active() {
            self.transport.stop();
        }
        self.current = None;
        self.queue.clear();
        self.history.clear();
        self.notifier.queue(&self.queue);
        self.notifier.reset_now_playing();
        self.notifier
            .status_info("stopped playback and cleared the queue");
        self.push_topic(TOPIC_IDLE).await;
    }

    // ---- session transitions --------------------------------------------

    async fn handle_move_voice(&mut self, channel: &str) {
        if !self.ensure_ready("move-voice") {
            return;
        }
        if self.phase.begin_transition().is_err() {
            return;
        }

        self.bridge.invalidate();
        if self.stream_active() {
            self.transport.stop();
        }

        // Put the interrupted track back so it restarts in the new channel.
        let resume = self.current.take().is_some();
        if resume {
            if let Some(track) = self.history.pop() {
                self.queue.push_front(track);
            }
        }

        self.transport.disconnect().await;
        match self.transport.connect(channel).await {
            Ok(()) => {
                self.phase.end_transition(true);
                self.notifier.status_info("moved to the new voice channel");
                if resume {
                    self.advance().await;
                }
            }
            Err(e) => {
                self.phase.end_transition(false);
                // The interrupted track moved back into the queue and nothing
                // is playing anymore; the UI has to reflect both.
                self.notifier.queue(&self.queue);
                self.notifier.reset_now_playing();
                self.notifier
                    .status_error(&format!("couldn't join the voice channel: {e}"));
            }
        }
    }

    async fn handle_move_text(&mut self, channel: &str) {
        if !self.ensure_ready("move-text") {
            return;
        }
        if self.phase.begin_transition().is_err() {
            return;
        }

        self.notifier.sink().detach().await;
        match self.notifier.sink().attach(channel).await {
            Ok(()) => {
                self.phase.end_transition(true);
                // Repaint the freshly attached surface.
                self.notifier.queue(&self.queue);
                self.notifier.volume(self.volume.level());
                match &self.current {
                    Some(track) => {
                        let track = track.clone();
                        self.notifier.now_playing(&track);
                    }
                    None => self.notifier.reset_now_playing(),
                }
            }
            Err(e) => {
                self.phase.end_transition(false);
                error!(guild = %self.guild, error = %e, "couldn't attach the ui surface");
            }
        }
    }

    async fn handle_topic(&mut self, enabled: bool) {
        if !self.ensure_ready("topic") {
            return;
        }
        self.topic_enabled = enabled;
        if let Err(e) = self
            .settings
            .set(self.guild, SETTING_TOPIC, if enabled { "true" } else { "false" })
            .await
        {
            warn!(guild = %self.guild, error = %e, "couldn't persist topic setting");
        }
        if enabled {
            let line = match &self.current {
                Some(track) => format!("Playing {}", track.name),
                None => TOPIC_IDLE.to_string(),
            };
            self.push_topic(&line).await;
        }
    }

    async fn push_topic(&self, text: &str) {
        if !self.topic_enabled {
            return;
        }
        if let Some(topic) = &self.topic {
            if let Err(e) = topic.set_topic(text).await {
                warn!(guild = %self.guild, error = %e, "couldn't update the channel topic");
            }
        }
    }

    /// Release every external resource and mark the session destroyed.
    async fn teardown(&mut self) {
        if self.phase == SessionPhase::Destroyed {
            return;
        }
        info!(guild = %self.guild, "destroying session");
        self.bridge.invalidate();
        if self.stream_active() {
            self.transport.stop();
        }
        self.current = None;
        self.transport.disconnect().await;
        self.notifier.sink().detach().await;
        self.phase.destroy();
    }
}
