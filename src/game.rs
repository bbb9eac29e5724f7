//! Session driver
//!
//! Owns the [`GameState`] plus the injected audio and score collaborators.
//! Each frame it runs the simulation, then drains the queued events into
//! them.

use crate::audio::AudioSink;
use crate::consts::ANNOUNCEMENT_MS;
use crate::persistence::ScoreStore;
use crate::settings::Settings;
use crate::sim::tick;
use crate::sim::{Difficulty, FrameInput, GameEvent, GameState, Grid, Snapshot};

/// Transient banner naming a freshly spawned opponent
#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub difficulty: Difficulty,
    /// Banner is hidden once `now` reaches this (ms)
    pub until: f64,
}

impl Announcement {
    pub fn text(&self) -> String {
        format!("{} OPPONENT INCOMING", self.difficulty.as_str())
    }
}

pub struct Game<A: AudioSink, S: ScoreStore> {
    state: GameState,
    settings: Settings,
    audio: A,
    store: S,
    announcement: Option<Announcement>,
}

impl<A: AudioSink, S: ScoreStore> Game<A, S> {
    pub fn new(grid: Grid, settings: Settings, audio: A, mut store: S, seed: u64) -> Self {
        let high_score = store.load();
        let state = GameState::new(grid, &settings, seed, high_score);
        log::info!(
            "New session: {}x{} grid, theme {}, seed {}",
            grid.cols,
            grid.rows,
            settings.theme.as_str(),
            seed
        );
        Self {
            state,
            settings,
            audio,
            store,
            announcement: None,
        }
    }

    /// Session sized to a viewport, seeded from the thread RNG
    pub fn for_viewport(width: f32, height: f32, settings: Settings, audio: A, store: S) -> Self {
        Self::new(
            Grid::from_viewport(width, height),
            settings,
            audio,
            store,
            rand::random(),
        )
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one rendered frame at wall-clock `now` (ms)
    pub fn frame(&mut self, input: &FrameInput, now: f64) {
        tick::frame(&mut self.state, input, now);
        self.drain_events(now);
    }

    /// Banner still showing at `now`, if any
    pub fn announcement(&self, now: f64) -> Option<&Announcement> {
        self.announcement.as_ref().filter(|a| now < a.until)
    }

    pub fn snapshot(&self, now: f64) -> Snapshot {
        let mut snapshot = Snapshot::capture(&self.state, now, self.settings.trail_reveal_delay);
        snapshot.announcement = self.announcement(now).map(Announcement::text);
        snapshot
    }

    fn drain_events(&mut self, now: f64) {
        for event in std::mem::take(&mut self.state.events) {
            match event {
                GameEvent::Sound(effect) => self.audio.play(effect),
                GameEvent::Engine(level) => self.audio.engine(level),
                GameEvent::OpponentSpawned { difficulty } => {
                    self.announcement = Some(Announcement {
                        difficulty,
                        until: now + ANNOUNCEMENT_MS,
                    });
                }
                GameEvent::GameOver {
                    score,
                    new_high_score: true,
                } => {
                    if let Err(err) = self.store.save(score) {
                        log::warn!("Failed to save high score {}: {}", score, err);
                    }
                }
                GameEvent::OpponentDerezzed { .. }
                | GameEvent::LifeLost { .. }
                | GameEvent::WeaponArmed { .. }
                | GameEvent::ObstacleDestroyed { .. }
                | GameEvent::GameOver { .. } => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundEffect;
    use crate::error::{StorageError, StorageResult};
    use crate::persistence::MemoryStore;
    use crate::sim::{GamePhase, Heading, Vehicle};
    use glam::IVec2;

    #[derive(Default)]
    struct RecordingAudio {
        played: Vec<SoundEffect>,
        engine: Vec<Option<f32>>,
    }

    impl AudioSink for RecordingAudio {
        fn play(&mut self, effect: SoundEffect) {
            self.played.push(effect);
        }

        fn engine(&mut self, level: Option<f32>) {
            self.engine.push(level);
        }
    }

    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn load(&mut self) -> u64 {
            0
        }

        fn save(&mut self, _high_score: u64) -> StorageResult<()> {
            Err(StorageError::Unavailable("test"))
        }
    }

    fn game(high_score: u64) -> Game<RecordingAudio, MemoryStore> {
        Game::new(
            Grid::new(40, 30),
            Settings::default(),
            RecordingAudio::default(),
            MemoryStore::with_score(high_score),
            21,
        )
    }

    /// Put the player one cell from the right edge on its last life
    fn doom(game: &mut Game<impl AudioSink, impl ScoreStore>, score: u64) {
        let state = game.state_mut();
        state.obstacles.clear();
        state.player.cycle = Vehicle::new(IVec2::new(39, 5), Heading::Right);
        state.player.lives = 1;
        state.score = score;
    }

    #[test]
    fn test_high_score_loaded_at_startup() {
        assert_eq!(game(777).state().high_score, 777);
    }

    #[test]
    fn test_start_announces_opponent() {
        let mut game = game(0);
        game.frame(&FrameInput::from_key("Enter"), 1_000.0);
        assert_eq!(game.state().phase, GamePhase::Playing);
        let banner = game.announcement(1_000.0).unwrap();
        assert_eq!(banner.until, 4_000.0);
        assert!(banner.text().ends_with("OPPONENT INCOMING"));
        assert!(game.snapshot(2_000.0).announcement.is_some());
        assert!(game.announcement(4_000.0).is_none());
        assert_eq!(game.audio().engine, vec![Some(0.0)]);
        assert!(game.state().events.is_empty());
    }

    #[test]
    fn test_game_over_saves_new_record() {
        let mut game = game(10);
        game.frame(&FrameInput::from_key("Enter"), 0.0);
        doom(&mut game, 50);
        game.frame(&FrameInput::default(), 120.0);

        assert_eq!(game.state().phase, GamePhase::GameOver);
        assert_eq!(game.state().high_score, 50);
        assert_eq!(game.store().high_score, 50);
        assert_eq!(game.store().saves, 1);
        assert!(game.audio().played.contains(&SoundEffect::Collision));
        assert_eq!(game.audio().engine.last(), Some(&None));
    }

    #[test]
    fn test_game_over_without_record_skips_save() {
        let mut game = game(1_000);
        game.frame(&FrameInput::from_key("Enter"), 0.0);
        doom(&mut game, 50);
        game.frame(&FrameInput::default(), 120.0);
        assert_eq!(game.state().phase, GamePhase::GameOver);
        assert_eq!(game.store().saves, 0);
        assert_eq!(game.state().high_score, 1_000);
    }

    #[test]
    fn test_save_failure_is_not_fatal() {
        let mut game = Game::new(
            Grid::new(40, 30),
            Settings::default(),
            RecordingAudio::default(),
            BrokenStore,
            3,
        );
        game.frame(&FrameInput::from_key("Enter"), 0.0);
        doom(&mut game, 5);
        game.frame(&FrameInput::default(), 120.0);
        assert_eq!(game.state().phase, GamePhase::GameOver);
        assert_eq!(game.state().high_score, 5);
    }

    #[test]
    fn test_snapshot_uses_reveal_delay() {
        let mut settings = Settings::default();
        settings.trail_reveal_delay = 1;
        let mut game = Game::new(
            Grid::new(40, 30),
            settings,
            RecordingAudio::default(),
            MemoryStore::default(),
            8,
        );
        game.frame(&FrameInput::from_key("Enter"), 0.0);
        game.frame(&FrameInput::default(), 120.0);
        let snap = game.snapshot(120.0);
        assert_eq!(snap.player.pos, IVec2::new(11, 10));
        assert_eq!(snap.player.trail, vec![IVec2::new(10, 10)]);
    }
}
