//! Offline single-player session.
//!
//! Wraps one [`GameService`] around a fixed local player so a client can
//! run the same simulation core without any transport, and pause/resume it
//! from a menu.

use crate::config::Config;
use crate::service::{GameService, SnapshotCallback};
use protocol::GameAction;

const LOCAL_PLAYER_ID: &str = "localPlayer";

/// A single-player room with one built-in local player.
pub struct SoloSession {
    service: GameService,
}

impl SoloSession {
    /// Create the session and add the local player; ticking starts
    /// immediately.
    pub async fn new(config: Config, on_state: SnapshotCallback) -> Self {
        let service = GameService::new(config, on_state);
        service.add_player(LOCAL_PLAYER_ID).await;
        Self { service }
    }

    /// Feed an input action from the local frontend into the simulation.
    pub async fn send_action(&self, action: GameAction) {
        self.service.handle_action(LOCAL_PLAYER_ID, action).await;
    }

    /// Stop ticking while a menu is open.
    pub async fn pause(&mut self) {
        self.service.pause().await;
    }

    /// Resume after a pause; the pause duration does not replay as
    /// elapsed time.
    pub fn resume(&mut self) {
        self.service.resume();
    }

    /// Tear the session down permanently.
    pub async fn dispose(&mut self) {
        self.service.dispose().await;
    }
}
