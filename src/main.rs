//! Neon Snake headless runner
//!
//! Plays one autopilot session at a fixed frame rate, submits the score to
//! the file leaderboard and prints the top scores.
//!
//! Usage: `neon-snake [config.json]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use glam::IVec2;

    use neon_snake::audio::{AudioManager, CueLog};
    use neon_snake::sim::{GameState, GridPosition, SessionPhase, TickInput, TickResult, tick};
    use neon_snake::{FileLeaderboard, GameConfig, LeaderboardService};

    /// Host frame delta (~60 FPS)
    const FRAME_MS: f64 = 16.0;
    /// Give up after this much simulated time
    const MAX_SESSION_MS: f64 = 10.0 * 60.0 * 1000.0;
    const LEADERBOARD_PATH: &str = "leaderboard.json";
    const PLAYER_NAME: &str = "autopilot";

    /// Game instance holding all state
    struct Game {
        state: GameState,
        audio: AudioManager<CueLog>,
        last_step: u64,
    }

    impl Game {
        fn new(config: GameConfig, seed: u64) -> Result<Self, neon_snake::ConfigError> {
            Ok(Self {
                state: GameState::new(config, seed)?,
                audio: AudioManager::new(CueLog::default()),
                last_step: 0,
            })
        }

        /// Run one host frame
        fn update(&mut self) -> TickResult {
            let input = TickInput {
                intent: self.steer(),
                pause: false,
            };
            let result = tick(&mut self.state, &input, FRAME_MS);
            if result.stepped {
                self.last_step = self.state.steps;
            }
            self.report(&result);
            self.audio
                .play_events(&result.collision_events, result.new_best);
            result
        }

        /// Greedy autopilot: head for the nearest edible cell, avoiding
        /// walls, the body and the enemy when another option exists.
        fn steer(&self) -> Option<IVec2> {
            let state = &self.state;
            let head = state.head()?;
            let target = state
                .legendary
                .map(|item| item.position)
                .or(state.food.map(|food| food.position))
                .unwrap_or(head);

            let mut options: Vec<IVec2> = [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y]
                .into_iter()
                .filter(|dir| *dir != -state.heading)
                .filter(|dir| self.is_safe(head + *dir))
                .collect();
            options.sort_by_key(|dir| neon_snake::sim::manhattan(head + *dir, target));
            options.first().copied()
        }

        fn is_safe(&self, cell: GridPosition) -> bool {
            let state = &self.state;
            // The tail moves away on a plain step
            let body_len = state.snake.len().saturating_sub(1);
            state.grid.contains(cell)
                && !state.snake.iter().take(body_len).any(|part| *part == cell)
                && !state.enemy.actor().body.contains(&cell)
        }

        fn report(&self, result: &TickResult) {
            for spawn in &result.spawn_events {
                log::debug!("spawn {:?} at {:?}", spawn.kind, spawn.position);
            }
            for event in &result.collision_events {
                let particles = self.state.config.effects.particles_for(event);
                log::debug!("collision {:?} (particles {:?})", event, particles);
            }
            for kind in &result.deferred_spawns {
                log::debug!("deferred {:?}", kind);
            }
            for id in &result.applied_buffs {
                log::info!(
                    "buff {} active for {}ms",
                    id,
                    self.state.buffs.remaining_ms(*id, self.state.now_ms)
                );
            }
            if result.stepped && self.state.steps % 10 == 0 {
                if let Some(secs) = self.state.enemy.countdown_secs() {
                    log::debug!("enemy in {}s", secs);
                }
            }
        }
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let config = match std::env::args().nth(1) {
            Some(path) => {
                log::info!("Loading config from {}", path);
                GameConfig::load(&path)?
            }
            None => GameConfig::default(),
        };

        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5eed);

        let mut leaderboard = FileLeaderboard::open(LEADERBOARD_PATH)?;
        let mut game = Game::new(config, seed)?;
        game.state.best_score = leaderboard.scores().top_score().unwrap_or(0);

        while game.state.phase != SessionPhase::Terminated && game.state.now_ms < MAX_SESSION_MS {
            game.update();
        }

        let score = game.state.score.score();
        log::info!(
            "Session over after {} steps ({:.1}s): score {}",
            game.last_step,
            game.state.now_ms / 1000.0,
            score
        );

        if score > 0 {
            leaderboard.submit_score(PLAYER_NAME, score)?;
        }
        println!("Top scores:");
        for (rank, entry) in leaderboard.load_top_scores()?.iter().enumerate() {
            println!("{:>2}. {:<16} {}", rank + 1, entry.name, entry.score);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Snake (headless) starting...");
    if let Err(err) = native::run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on wasm
}
