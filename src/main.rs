// src/main.rs

use std::time::Duration;

use anyhow::Result;

use los_alamos_chess::search::engine;

fn main() -> Result<()> {
    let mode = std::env::args().nth(1).unwrap_or_default();

    match mode.as_str() {
        "demo" => {
            engine::run_game_simulated(Duration::from_millis(500));
            Ok(())
        }
        _ => engine::run_game(Duration::from_millis(1000)),
    }
}
