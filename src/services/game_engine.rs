//! Round engine: pre-game countdown, timed rounds, scoring and persistence.
//!
//! ```text
//! Idle ─start─► Countdown(3,2,1,Go) ─► RoundActive(1) ─► RoundEnded(1) ─► RoundActive(2) ...
//!                                                    RoundEnded(last) ─► SessionComplete
//! any running phase ─cancel/drop─► Cancelled
//! ```
//!
//! All timing goes through the injected [`Scheduler`]. Scheduled callbacks
//! hold a weak reference to the engine and the id they were armed with; a
//! callback whose id is no longer armed (cancelled, replaced, or dropped
//! engine) does nothing, even if the scheduler already started running it.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use crate::error::EngineError;
use crate::models::{GameConfig, GameSession, RoundRecord};
use crate::services::color_generator::{ColorGenerator, RandomColorGenerator};
use crate::services::scheduler::{CancelHandle, Scheduler};
use crate::services::session_store::{self, SessionStore, GAME_RESULTS_KEY};

/// Selection scored when the player never touched the picker during a round
pub const INITIAL_SELECTION: &str = "#FFFFFF";

/// Where the engine is in a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum GamePhase {
    Idle,
    /// Pre-game countdown; `remaining == 0` is the "Go" second
    Countdown { remaining: u32 },
    RoundActive { round: u32, time_remaining: u32 },
    RoundEnded { round: u32 },
    SessionComplete,
    Cancelled,
}

impl GamePhase {
    /// Countdown, round in progress, or between rounds
    pub fn is_running(&self) -> bool {
        matches!(
            self,
            GamePhase::Countdown { .. } | GamePhase::RoundActive { .. } | GamePhase::RoundEnded { .. }
        )
    }
}

/// The picker widget as seen by the engine: read on demand, reset per round
pub trait ColorPicker: Send + Sync {
    /// Latest selection, `None` if untouched since the last reset
    fn current(&self) -> Option<String>;

    fn reset(&self);
}

/// Picker state shared between the host's input handling and the engine
#[derive(Debug, Clone, Default)]
pub struct PickerState {
    selected: Arc<Mutex<Option<String>>>,
}

impl PickerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a picker change
    pub fn select(&self, color: impl Into<String>) {
        *self.lock() = Some(color.into());
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        self.selected.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ColorPicker for PickerState {
    fn current(&self) -> Option<String> {
        self.lock().clone()
    }

    fn reset(&self) {
        *self.lock() = None;
    }
}

/// Host observation points. Called without any engine lock held.
pub trait EngineObserver: Send + Sync {
    fn on_state_change(&self, _phase: &GamePhase) {}

    fn on_round_end(&self, _round: u32, _record: &RoundRecord) {}

    fn on_session_complete(&self, _history: &[RoundRecord]) {}
}

/// Observer that ignores everything
pub struct NoopObserver;

impl EngineObserver for NoopObserver {}

/// Read-only view of a session for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineSnapshot {
    pub phase: GamePhase,
    pub total_rounds: u32,
    /// Target of the current round; hidden until that round starts
    pub target_color: Option<String>,
    pub rounds_played: usize,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
}

enum EngineEvent {
    Phase(GamePhase),
    RoundEnded(u32, RoundRecord),
    Completed(Vec<RoundRecord>),
}

type Step = fn(&Arc<Shared>, &mut EngineCore, &mut Vec<EngineEvent>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerSlot {
    Countdown,
    Round,
    Advance,
}

enum Cadence {
    EverySecond,
    After(Duration),
}

struct ArmedTimer {
    id: u64,
    handle: CancelHandle,
}

/// Live timers by role. A callback only acts while its id is still armed in
/// its slot, so cancelled or replaced timers are inert even if already running.
#[derive(Default)]
struct Timers {
    next_id: u64,
    countdown: Option<ArmedTimer>,
    round: Option<ArmedTimer>,
    advance: Option<ArmedTimer>,
}

impl Timers {
    fn slot(&mut self, slot: TimerSlot) -> &mut Option<ArmedTimer> {
        match slot {
            TimerSlot::Countdown => &mut self.countdown,
            TimerSlot::Round => &mut self.round,
            TimerSlot::Advance => &mut self.advance,
        }
    }

    fn is_armed(&mut self, slot: TimerSlot, id: u64) -> bool {
        self.slot(slot).as_ref().is_some_and(|t| t.id == id)
    }

    fn disarm(&mut self, slot: TimerSlot) {
        if let Some(timer) = self.slot(slot).take() {
            timer.handle.cancel();
        }
    }

    fn cancel_all(&mut self) {
        for slot in [TimerSlot::Countdown, TimerSlot::Round, TimerSlot::Advance] {
            self.disarm(slot);
        }
    }
}

struct EngineCore {
    phase: GamePhase,
    session: Option<GameSession>,
    timers: Timers,
}

struct Shared {
    config: GameConfig,
    core: Mutex<EngineCore>,
    scheduler: Arc<dyn Scheduler>,
    store: Arc<dyn SessionStore>,
    picker: Arc<dyn ColorPicker>,
    observer: Arc<dyn EngineObserver>,
}

/// Builder for [`GameEngine`]
pub struct GameEngineBuilder {
    config: GameConfig,
    scheduler: Arc<dyn Scheduler>,
    store: Arc<dyn SessionStore>,
    picker: Option<Arc<dyn ColorPicker>>,
    observer: Option<Arc<dyn EngineObserver>>,
    generator: Option<Box<dyn ColorGenerator>>,
}

impl GameEngineBuilder {
    pub fn picker(mut self, picker: Arc<dyn ColorPicker>) -> Self {
        self.picker = Some(picker);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn EngineObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn generator(mut self, generator: Box<dyn ColorGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn build(self) -> GameEngine {
        let shared = Shared {
            config: self.config,
            core: Mutex::new(EngineCore {
                phase: GamePhase::Idle,
                session: None,
                timers: Timers::default(),
            }),
            scheduler: self.scheduler,
            store: self.store,
            picker: self
                .picker
                .unwrap_or_else(|| Arc::new(PickerState::new())),
            observer: self.observer.unwrap_or_else(|| Arc::new(NoopObserver)),
        };
        GameEngine {
            shared: Arc::new(shared),
            generator: Mutex::new(
                self.generator
                    .unwrap_or_else(|| Box::new(RandomColorGenerator::new())),
            ),
        }
    }
}

/// The round engine. Dropping it abandons any running session.
pub struct GameEngine {
    shared: Arc<Shared>,
    generator: Mutex<Box<dyn ColorGenerator>>,
}

impl GameEngine {
    pub fn builder(
        config: GameConfig,
        scheduler: Arc<dyn Scheduler>,
        store: Arc<dyn SessionStore>,
    ) -> GameEngineBuilder {
        GameEngineBuilder {
            config,
            scheduler,
            store,
            picker: None,
            observer: None,
            generator: None,
        }
    }

    /// Start a new session with the pre-game countdown.
    ///
    /// Fails with [`EngineError::MissingPlayerName`] when no player is
    /// registered; the host should return to the start screen.
    pub fn start(&self) -> Result<(), EngineError> {
        let shared = &self.shared;
        shared.config.validate().map_err(EngineError::InvalidConfig)?;

        let player = session_store::read_player_name(shared.store.as_ref())?;
        if player.as_deref().map_or(true, |p| p.trim().is_empty()) {
            tracing::info!("No player registered, redirecting to start");
            return Err(EngineError::MissingPlayerName);
        }

        let mut events = Vec::new();
        {
            let mut core = shared.lock();
            if core.phase.is_running() {
                return Err(EngineError::AlreadyRunning);
            }

            let targets: Vec<String> = {
                let mut generator = self
                    .generator
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                (0..shared.config.total_rounds)
                    .map(|_| generator.generate())
                    .collect()
            };

            shared.store.remove(GAME_RESULTS_KEY)?;

            core.timers.cancel_all();
            core.session = Some(GameSession::new(targets, shared.config.seconds_per_round));
            let remaining = shared.config.countdown_from;
            core.phase = GamePhase::Countdown { remaining };
            events.push(EngineEvent::Phase(core.phase.clone()));

            shared.arm(
                &mut core,
                TimerSlot::Countdown,
                Cadence::EverySecond,
                Shared::countdown_tick,
            );

            tracing::info!(
                player = player.as_deref().unwrap_or_default(),
                rounds = shared.config.total_rounds,
                seconds = shared.config.seconds_per_round,
                "Session started"
            );
        }
        shared.emit(events);
        Ok(())
    }

    /// End the active round early with the current selection.
    ///
    /// Returns whether a round was ended. Ignored outside an active round or
    /// when submitting is disabled.
    pub fn submit(&self) -> bool {
        let shared = &self.shared;
        if !shared.config.allow_submit {
            return false;
        }

        let mut events = Vec::new();
        let ended = {
            let mut core = shared.lock();
            let active = match core.phase {
                GamePhase::RoundActive { time_remaining, .. } => Some(time_remaining),
                _ => None,
            };
            if let Some(time_remaining) = active {
                shared.end_round(&mut core, time_remaining, &mut events);
            }
            active.is_some()
        };
        shared.emit(events);
        ended
    }

    /// Abandon the running session. Only fully ended rounds stay persisted.
    pub fn cancel(&self) {
        let events = self.shared.abandon();
        self.shared.emit(events);
    }

    pub fn phase(&self) -> GamePhase {
        self.shared.lock().phase.clone()
    }

    /// Rounds finished so far in the current or last session
    pub fn history(&self) -> Vec<RoundRecord> {
        self.shared
            .lock()
            .session
            .as_ref()
            .map(|s| s.history.clone())
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let core = self.shared.lock();
        let session = core.session.as_ref();
        let target_color = match core.phase {
            GamePhase::RoundActive { round, .. } | GamePhase::RoundEnded { round } => session
                .and_then(|s| s.target_for(round))
                .map(str::to_string),
            _ => None,
        };

        EngineSnapshot {
            phase: core.phase.clone(),
            total_rounds: self.shared.config.total_rounds,
            target_color,
            rounds_played: session.map_or(0, |s| s.history.len()),
            started_at: session.map(|s| s.started_at),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.shared.config
    }
}

impl Drop for GameEngine {
    fn drop(&mut self) {
        // No observer calls from a destructor.
        let _ = self.shared.abandon();
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, EngineCore> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Schedule `step` and arm it in `slot`, replacing whatever was there
    fn arm(self: &Arc<Self>, core: &mut EngineCore, slot: TimerSlot, cadence: Cadence, step: Step) {
        core.timers.disarm(slot);
        let id = core.timers.next_id;
        core.timers.next_id += 1;

        let weak = Arc::downgrade(self);
        let handle = match cadence {
            Cadence::EverySecond => self
                .scheduler
                .every_second(Box::new(move || Shared::fire(&weak, slot, id, step))),
            Cadence::After(delay) => self
                .scheduler
                .after(delay, Box::new(move || Shared::fire(&weak, slot, id, step))),
        };
        *core.timers.slot(slot) = Some(ArmedTimer { id, handle });
    }

    /// Entry point of every scheduled callback
    fn fire(weak: &Weak<Shared>, slot: TimerSlot, id: u64, step: Step) {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let mut events = Vec::new();
        {
            let mut core = shared.lock();
            if !core.timers.is_armed(slot, id) {
                tracing::trace!(?slot, id, "Ignoring stale timer");
                return;
            }
            step(&shared, &mut core, &mut events);
        }
        shared.emit(events);
    }

    fn countdown_tick(self: &Arc<Self>, core: &mut EngineCore, events: &mut Vec<EngineEvent>) {
        let GamePhase::Countdown { remaining } = core.phase else {
            return;
        };

        if remaining > 0 {
            core.phase = GamePhase::Countdown {
                remaining: remaining - 1,
            };
            events.push(EngineEvent::Phase(core.phase.clone()));
        } else {
            core.timers.disarm(TimerSlot::Countdown);
            self.begin_round(core, 1, events);
        }
    }

    fn begin_round(self: &Arc<Self>, core: &mut EngineCore, round: u32, events: &mut Vec<EngineEvent>) {
        let Some(session) = core.session.as_mut() else {
            return;
        };
        session.current_round = round;
        self.picker.reset();

        core.phase = GamePhase::RoundActive {
            round,
            time_remaining: self.config.seconds_per_round,
        };
        events.push(EngineEvent::Phase(core.phase.clone()));

        self.arm(core, TimerSlot::Round, Cadence::EverySecond, Shared::round_tick);
        tracing::debug!(round, "Round started");
    }

    fn round_tick(self: &Arc<Self>, core: &mut EngineCore, events: &mut Vec<EngineEvent>) {
        let GamePhase::RoundActive {
            round,
            time_remaining,
        } = core.phase
        else {
            return;
        };

        let time_remaining = time_remaining.saturating_sub(1);
        if time_remaining == 0 {
            self.end_round(core, 0, events);
        } else {
            core.phase = GamePhase::RoundActive {
                round,
                time_remaining,
            };
            events.push(EngineEvent::Phase(core.phase.clone()));
        }
    }

    fn end_round(
        self: &Arc<Self>,
        core: &mut EngineCore,
        time_remaining: u32,
        events: &mut Vec<EngineEvent>,
    ) {
        core.timers.disarm(TimerSlot::Round);
        let Some(session) = core.session.as_mut() else {
            return;
        };

        let round = session.current_round;
        let target = session.target_for(round).unwrap_or_default().to_string();
        let selected = self
            .picker
            .current()
            .unwrap_or_else(|| INITIAL_SELECTION.to_string());
        let record = RoundRecord::scored(target, selected, time_remaining);
        session.history.push(record.clone());

        // Written before the next round can be scheduled.
        if let Err(e) = session_store::write_history(self.store.as_ref(), &session.history) {
            tracing::error!(%e, round, "Failed to persist round history");
        }

        tracing::info!(
            round,
            target = %record.target_color,
            selected = %record.selected_color,
            difference = record.difference,
            score = record.score,
            "Round ended"
        );

        core.phase = GamePhase::RoundEnded { round };
        events.push(EngineEvent::RoundEnded(round, record));
        events.push(EngineEvent::Phase(core.phase.clone()));

        self.arm(
            core,
            TimerSlot::Advance,
            Cadence::After(self.config.round_end_delay()),
            Shared::advance,
        );
    }

    fn advance(self: &Arc<Self>, core: &mut EngineCore, events: &mut Vec<EngineEvent>) {
        let GamePhase::RoundEnded { round } = core.phase else {
            return;
        };
        core.timers.disarm(TimerSlot::Advance);

        let last = core.session.as_ref().map_or(true, GameSession::is_last_round);
        if last {
            self.complete(core, events);
        } else {
            self.begin_round(core, round + 1, events);
        }
    }

    fn complete(&self, core: &mut EngineCore, events: &mut Vec<EngineEvent>) {
        core.timers.cancel_all();
        let history = core
            .session
            .as_ref()
            .map(|s| s.history.clone())
            .unwrap_or_default();

        if let Err(e) = session_store::write_history(self.store.as_ref(), &history) {
            tracing::error!(%e, "Failed to persist final round history");
        }

        let total: u32 = history.iter().map(|r| u32::from(r.score)).sum();
        tracing::info!(rounds = history.len(), total, "Session complete");

        core.phase = GamePhase::SessionComplete;
        events.push(EngineEvent::Phase(GamePhase::SessionComplete));
        events.push(EngineEvent::Completed(history));
    }

    fn abandon(&self) -> Vec<EngineEvent> {
        let mut core = self.lock();
        core.timers.cancel_all();
        if !core.phase.is_running() {
            return Vec::new();
        }

        let kept = core.session.as_ref().map_or(0, |s| s.history.len());
        tracing::info!(rounds_kept = kept, "Session abandoned");
        core.phase = GamePhase::Cancelled;
        vec![EngineEvent::Phase(GamePhase::Cancelled)]
    }

    fn emit(&self, events: Vec<EngineEvent>) {
        for event in events {
            match event {
                EngineEvent::Phase(phase) => self.observer.on_state_change(&phase),
                EngineEvent::RoundEnded(round, record) => {
                    self.observer.on_round_end(round, &record)
                }
                EngineEvent::Completed(history) => self.observer.on_session_complete(&history),
            }
        }
    }
}
