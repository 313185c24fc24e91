// Use cases layer: application workflows for the game server.

pub mod actions;
pub mod game_view;
pub mod hits;
pub mod reads;
#[cfg(test)]
pub(crate) mod test_support;
pub mod types;
pub mod watcher;

pub use actions::{ActionDesk, ActionError, ActionReceipt, SubmitActionUseCase};
pub use game_view::{PlayerViewUseCase, build_game_view};
pub use hits::RecentHitsUseCase;
pub use types::{GameAction, GameSnapshot, PlayerSnapshot, RecentTransaction, UnknownAction};
pub use watcher::GameWatcher;
