//! One isolated room: a game state bound to a tick scheduler and an
//! action dispatcher.
//!
//! Each room is an independent unit of execution with its own tokio task;
//! rooms never share mutable state. Within a room, actions and ticks
//! serialize through the room lock, and the tick body runs to completion
//! (movement, combat, cleanup, snapshot) before the lock is released.

use crate::config::Config;
use crate::state::GameState;
use glam::Vec2;
use protocol::{GameAction, ServerState};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Callback invoked with the serialized state after every tick. This is
/// the sole contract toward rendering/transport collaborators.
pub type SnapshotCallback = Box<dyn Fn(ServerState) + Send + Sync>;

/// State guarded by the room lock.
pub(crate) struct RoomInner {
    state: GameState,
    /// Per-player spawn-cadence accumulators, in seconds.
    spawn_timers: HashMap<String, f32>,
    disposed: bool,
}

impl RoomInner {
    pub(crate) fn new(config: Config) -> Self {
        Self {
            state: GameState::new(config),
            spawn_timers: HashMap::new(),
            disposed: false,
        }
    }

    /// Run one tick of `dt` seconds: auto-spawn, physics/combat/cleanup,
    /// snapshot.
    pub(crate) fn tick(&mut self, dt: f32) -> ServerState {
        let interval = self.state.config().spawn.interval_seconds;
        let pixels_per_spawn = self.state.config().spawn.pixels_per_spawn;

        for id in self.state.player_ids() {
            let timer = self.spawn_timers.entry(id.clone()).or_insert(0.0);
            *timer += dt;
            if *timer >= interval {
                *timer = 0.0;
                self.state.spawn_group_for(&id, pixels_per_spawn);
            }
        }

        self.state.update(dt);
        self.state.snapshot()
    }

    fn handle_action(&mut self, player_id: &str, action: GameAction) {
        let Some(player) = self.state.player_mut(player_id) else {
            debug!("Ignoring {:?} for unknown player {}", action, player_id);
            return;
        };
        match action {
            GameAction::Move { x, y } => player.set_target(Vec2::new(x, y)),
            GameAction::Select { selected_entity } => match selected_entity {
                Some(selection) => player.select_entity(selection),
                None => player.clear_selection(),
            },
        }
    }
}

/// One room's simulation service: owns the state, the scheduler and the
/// player lifecycle.
pub struct GameService {
    inner: Arc<Mutex<RoomInner>>,
    on_state: Arc<SnapshotCallback>,
    tick_interval: Duration,
    ticker: Option<JoinHandle<()>>,
}

impl GameService {
    /// Create a room and start ticking immediately at the configured
    /// interval.
    pub fn new(config: Config, on_state: SnapshotCallback) -> Self {
        let tick_interval = Duration::from_millis(config.room.tick_interval_ms);
        Self::with_tick_interval(config, on_state, tick_interval)
    }

    /// Create a room with an explicit tick interval.
    pub fn with_tick_interval(
        config: Config,
        on_state: SnapshotCallback,
        tick_interval: Duration,
    ) -> Self {
        let mut service = Self {
            inner: Arc::new(Mutex::new(RoomInner::new(config))),
            on_state: Arc::new(on_state),
            tick_interval,
            ticker: None,
        };
        service.spawn_ticker();
        service
    }

    fn spawn_ticker(&mut self) {
        let inner = Arc::clone(&self.inner);
        let on_state = Arc::clone(&self.on_state);
        let period = self.tick_interval;

        self.ticker = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            // Skip missed ticks rather than bursting to catch up; rates are
            // dt-scaled so game speed stays consistent under jitter.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            // The elapsed-time baseline starts when the loop starts, never
            // earlier: a resume after a long pause must not surface the
            // whole gap as one giant dt.
            let mut last = Instant::now();
            loop {
                ticker.tick().await;
                let now = Instant::now();
                let dt = (now - last).as_secs_f32();
                last = now;

                let mut room = inner.lock().await;
                if room.disposed {
                    return;
                }
                let snapshot = room.tick(dt);
                // The callback runs under the room lock so dispose() cannot
                // return while a snapshot is still being delivered.
                on_state(snapshot);
            }
        }));
    }

    /// Add a player and start its spawn cadence.
    pub async fn add_player(&self, id: &str) {
        let mut room = self.inner.lock().await;
        room.state.add_player(id);
        room.spawn_timers.insert(id.to_string(), 0.0);
    }

    /// Remove a player, discarding its groups and spawn cadence.
    pub async fn remove_player(&self, id: &str) {
        let mut room = self.inner.lock().await;
        room.state.remove_player(id);
        room.spawn_timers.remove(id);
    }

    /// Spawn a group for `id` immediately, outside the automatic cadence.
    /// `None` when the player is unknown, at its group cap, or
    /// `pixel_count` is zero.
    pub async fn spawn_group(&self, id: &str, pixel_count: u32) -> Option<u32> {
        self.inner.lock().await.state.spawn_group_for(id, pixel_count)
    }

    /// Dispatch one player action. Actions naming an unknown player are
    /// silently ignored: they may legitimately race a disconnect.
    pub async fn handle_action(&self, player_id: &str, action: GameAction) {
        self.inner.lock().await.handle_action(player_id, action);
    }

    /// True iff no players remain; polled by the transport collaborator to
    /// decide when to dispose the room.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.state.is_empty()
    }

    /// Stop the scheduler permanently. No tick or snapshot callback fires
    /// after this returns.
    pub async fn dispose(&mut self) {
        {
            let mut room = self.inner.lock().await;
            room.disposed = true;
        }
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    /// Stop ticking without tearing the room down.
    pub async fn pause(&mut self) {
        // Taking the lock first lets any in-flight tick finish delivering
        // its snapshot before the scheduler goes away.
        let _room = self.inner.lock().await;
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    /// Restart the scheduler after a pause. The fresh loop re-anchors its
    /// elapsed-time baseline, so the pause duration never replays.
    pub fn resume(&mut self) {
        if self.ticker.is_none() {
            self.spawn_ticker();
        }
    }
}

impl Drop for GameService {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::SelectedEntity;
    use std::sync::mpsc;

    fn collector() -> (SnapshotCallback, mpsc::Receiver<ServerState>) {
        let (tx, rx) = mpsc::channel();
        (
            Box::new(move |state| {
                let _ = tx.send(state);
            }),
            rx,
        )
    }

    #[test]
    fn test_auto_spawn_cadence() {
        let mut room = RoomInner::new(Config::default()); // 3s interval
        room.state.add_player("p1");
        room.spawn_timers.insert("p1".to_string(), 0.0);

        room.tick(1.0);
        room.tick(1.0);
        assert!(room.state.player("p1").unwrap().pixel_groups.is_empty());

        room.tick(1.0); // accumulator reaches 3.0
        let player = room.state.player("p1").unwrap();
        assert_eq!(player.pixel_groups.len(), 1);
        assert_eq!(
            player.pixel_groups[0].pixel_count(),
            room.state.config().spawn.pixels_per_spawn
        );

        room.tick(1.0); // accumulator was reset, no double spawn
        assert_eq!(room.state.player("p1").unwrap().pixel_groups.len(), 1);
    }

    #[test]
    fn test_tick_returns_snapshot() {
        let mut room = RoomInner::new(Config::default());
        room.state.add_player("p1");
        let snapshot = room.tick(0.05);
        assert_eq!(snapshot.players.len(), 1);
        assert!(snapshot.players.contains_key("p1"));
    }

    #[test]
    fn test_actions_dispatch_to_player() {
        let mut room = RoomInner::new(Config::default());
        room.state.add_player("p1");

        room.handle_action("p1", GameAction::Move { x: 10.0, y: 0.0 });
        room.tick(1.0);
        let player = room.state.player("p1").unwrap();
        assert_eq!(player.position, Vec2::new(10.0, 0.0));

        room.handle_action(
            "p1",
            GameAction::Select {
                selected_entity: Some(SelectedEntity::SelfPlayer),
            },
        );
        assert!(room.state.player_mut("p1").unwrap().selected_movable().is_some());

        room.handle_action(
            "p1",
            GameAction::Select {
                selected_entity: None,
            },
        );
        assert!(room.state.player_mut("p1").unwrap().selected_movable().is_none());
    }

    #[test]
    fn test_action_for_unknown_player_is_ignored() {
        let mut room = RoomInner::new(Config::default());
        room.handle_action("ghost", GameAction::Move { x: 1.0, y: 1.0 });
        assert!(room.state.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_emits_snapshots() {
        let (on_state, rx) = collector();
        let mut service = GameService::new(Config::default(), on_state);
        service.add_player("p1").await;

        tokio::time::sleep(Duration::from_millis(260)).await;

        let count = rx.try_iter().count();
        assert!(count >= 3, "expected several ticks, got {count}");
        service.dispose().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_spawn_outside_cadence() {
        let (on_state, rx) = collector();
        let mut service = GameService::new(Config::default(), on_state);
        service.add_player("p1").await;

        assert_eq!(service.spawn_group("p1", 30).await, Some(1));
        assert_eq!(service.spawn_group("p1", 0).await, None);

        tokio::time::sleep(Duration::from_millis(60)).await;
        let last = rx.try_iter().last().expect("snapshot emitted");
        let groups = &last.players["p1"].pixel_groups;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].pixel_count, 30);
        service.dispose().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_stops_ticks() {
        let (on_state, rx) = collector();
        let mut service = GameService::new(Config::default(), on_state);
        service.add_player("p1").await;

        tokio::time::sleep(Duration::from_millis(120)).await;
        service.dispose().await;
        let _ = rx.try_iter().count();

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_and_resume_reanchor_baseline() {
        let (on_state, rx) = collector();
        let mut service = GameService::new(Config::default(), on_state);
        service.add_player("p1").await;

        tokio::time::sleep(Duration::from_millis(120)).await;
        service.pause().await;
        let _ = rx.try_iter().count();

        // A long pause: no ticks, and nothing accumulates.
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(rx.try_iter().count(), 0);

        service.resume();
        tokio::time::sleep(Duration::from_millis(120)).await;
        let snapshots: Vec<ServerState> = rx.try_iter().collect();
        assert!(!snapshots.is_empty());

        // The pause did not replay as elapsed time: with a 3s spawn
        // interval, a 60s dt would have spawned a group instantly.
        let last = snapshots.last().unwrap();
        assert!(last.players["p1"].pixel_groups.is_empty());
        service.dispose().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_room_empty_after_last_player_leaves() {
        let (on_state, _rx) = collector();
        let mut service = GameService::new(Config::default(), on_state);
        service.add_player("p1").await;
        assert!(!service.is_empty().await);
        service.remove_player("p1").await;
        assert!(service.is_empty().await);
        service.dispose().await;
    }
}
