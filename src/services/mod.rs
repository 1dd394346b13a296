pub mod color_generator;
pub mod feedback;
pub mod game_engine;
pub mod player;
pub mod results;
pub mod scheduler;
pub mod session_store;

pub use color_generator::{ColorGenerator, RandomColorGenerator};
pub use feedback::classify;
pub use game_engine::{
    ColorPicker, EngineObserver, EngineSnapshot, GameEngine, GameEngineBuilder, GamePhase,
    NoopObserver, PickerState, INITIAL_SELECTION,
};
pub use player::{
    play_again, register_player, share_results, share_text, FileShareTarget, ShareTarget,
};
pub use results::{filter_first_round, load_results, summarize};
pub use scheduler::{CancelHandle, ManualScheduler, Scheduler, TokioScheduler};
pub use session_store::{InMemoryStore, JsonFileStore, SessionStore};
