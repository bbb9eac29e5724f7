//! Light Cycle entry point
//!
//! Native builds run a headless demo: the autopilot drives the player for a
//! fixed stretch of simulated time and the run is summarised on stdout. The
//! browser build starts from `light_cycle::web`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    use light_cycle::audio::LogAudio;
    use light_cycle::persistence::JsonFileStore;
    use light_cycle::sim::{FrameInput, GamePhase};
    use light_cycle::{Game, Settings};

    /// 60 fps
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Five minutes of simulated play
    const MAX_FRAMES: u32 = 60 * 60 * 5;

    env_logger::init();
    log::info!("Light Cycle (native) starting...");

    let mut args = std::env::args().skip(1);
    let settings_path = args.next().map(PathBuf::from);
    let score_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("light_cycle_high_score.json"));

    let settings = Settings::load_or_default(settings_path.as_deref());
    let store = JsonFileStore::new(score_path);
    let mut game = Game::for_viewport(1280.0, 720.0, settings, LogAudio::default(), store);

    let start = FrameInput {
        start: true,
        autopilot: true,
        ..FrameInput::default()
    };
    let cruise = FrameInput {
        autopilot: true,
        ..FrameInput::default()
    };

    game.frame(&start, 0.0);
    let mut frames = 1;
    while frames < MAX_FRAMES && game.state().phase == GamePhase::Playing {
        game.frame(&cruise, frames as f64 * FRAME_MS);
        frames += 1;
    }

    let state = game.state();
    println!(
        "Demo finished after {:.1}s: score {}, lives {}, high score {}",
        frames as f64 * FRAME_MS / 1000.0,
        state.score,
        state.player.lives,
        state.high_score
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is light_cycle::web::wasm_start
}
