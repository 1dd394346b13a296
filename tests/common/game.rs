//! Test harness driving a [`GameEngine`] on a virtual clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use colorete::models::{GameConfig, RoundRecord};
use colorete::services::session_store::{self, PLAYER_NAME_KEY};
use colorete::services::{
    EngineObserver, GameEngine, GamePhase, InMemoryStore, ManualScheduler, PickerState,
    SessionStore,
};

use super::fixtures::{FixedColors, PLAYER};

/// Observer recording everything the engine reports
#[derive(Default)]
pub struct RecordingObserver {
    pub phases: Mutex<Vec<GamePhase>>,
    pub rounds: Mutex<Vec<(u32, RoundRecord)>>,
    /// Persisted round count seen from inside each `on_round_end`
    pub persisted_at_round_end: Mutex<Vec<usize>>,
    pub completed: Mutex<Option<Vec<RoundRecord>>>,
    store: Option<Arc<dyn SessionStore>>,
}

impl RecordingObserver {
    pub fn watching(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store: Some(store),
            ..Self::default()
        }
    }

    pub fn phases(&self) -> Vec<GamePhase> {
        self.phases.lock().unwrap().clone()
    }

    pub fn completed(&self) -> Option<Vec<RoundRecord>> {
        self.completed.lock().unwrap().clone()
    }
}

impl EngineObserver for RecordingObserver {
    fn on_state_change(&self, phase: &GamePhase) {
        self.phases.lock().unwrap().push(phase.clone());
    }

    fn on_round_end(&self, round: u32, record: &RoundRecord) {
        self.rounds.lock().unwrap().push((round, record.clone()));
        if let Some(ref store) = self.store {
            let persisted = session_store::read_history(store.as_ref())
                .unwrap()
                .map_or(0, |h| h.len());
            self.persisted_at_round_end.lock().unwrap().push(persisted);
        }
    }

    fn on_session_complete(&self, history: &[RoundRecord]) {
        *self.completed.lock().unwrap() = Some(history.to_vec());
    }
}

/// Engine wired to a manual scheduler, in-memory store and fixed targets
pub struct TestGame {
    pub engine: GameEngine,
    pub scheduler: Arc<ManualScheduler>,
    pub store: Arc<InMemoryStore>,
    pub picker: PickerState,
    pub observer: Arc<RecordingObserver>,
}

impl TestGame {
    /// Default configuration with a registered player
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        let game = Self::unregistered(config);
        game.store
            .set(PLAYER_NAME_KEY, PLAYER.to_string())
            .unwrap();
        game
    }

    /// No player name in the store
    pub fn unregistered(config: GameConfig) -> Self {
        let scheduler = Arc::new(ManualScheduler::new());
        let store = Arc::new(InMemoryStore::new());
        let picker = PickerState::new();
        let observer = Arc::new(RecordingObserver::watching(store.clone()));

        let engine = GameEngine::builder(config, scheduler.clone(), store.clone())
            .picker(Arc::new(picker.clone()))
            .observer(observer.clone())
            .generator(Box::new(FixedColors::default()))
            .build();

        Self {
            engine,
            scheduler,
            store,
            picker,
            observer,
        }
    }

    pub fn advance_ms(&self, ms: u64) {
        self.scheduler.advance(Duration::from_millis(ms));
    }

    pub fn advance_secs(&self, secs: u64) {
        self.scheduler.advance(Duration::from_secs(secs));
    }

    /// Step the clock until `round` is active. Panics after an hour of virtual time.
    pub fn run_to_round(&self, round: u32) {
        for _ in 0..36_000 {
            if matches!(self.engine.phase(), GamePhase::RoundActive { round: r, .. } if r == round)
            {
                return;
            }
            self.advance_ms(100);
        }
        panic!(
            "round {round} never started, phase {:?}",
            self.engine.phase()
        );
    }

    /// Step the clock until the session is over
    pub fn run_to_completion(&self) {
        for _ in 0..36_000 {
            if self.engine.phase() == GamePhase::SessionComplete {
                return;
            }
            self.advance_ms(100);
        }
        panic!("session never completed, phase {:?}", self.engine.phase());
    }

    /// Target of the active round
    pub fn current_target(&self) -> String {
        self.engine
            .snapshot()
            .target_color
            .expect("a round should be active")
    }

    /// Play every round, answering with whatever `answer` returns for the target
    pub fn play_all(&self, answer: impl Fn(&str) -> String) {
        let total = self.engine.config().total_rounds;
        for round in 1..=total {
            self.run_to_round(round);
            let target = self.current_target();
            self.picker.select(answer(&target));
            assert!(self.engine.submit(), "round {round} should accept submit");
        }
        self.run_to_completion();
    }
}

impl Default for TestGame {
    fn default() -> Self {
        Self::new()
    }
}
