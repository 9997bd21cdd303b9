use ant_scavenge::{Environment, EnvironmentConfig, TerminalVisualizer};
use std::thread;
use std::time::Duration;

/// Draws a random colony for a few frames, slowing each frame down so it can be followed.
struct SlowVisualizer {
    inner: TerminalVisualizer,
    delay: Duration,
}

impl ant_scavenge::Visualizer for SlowVisualizer {
    fn show(&mut self, board: &ant_scavenge::Board) -> ant_scavenge::Result<()> {
        self.inner.show(board)?;
        thread::sleep(self.delay);
        Ok(())
    }

    fn close(&mut self) -> ant_scavenge::Result<()> {
        self.inner.close()
    }
}

fn main() -> anyhow::Result<()> {
    let config = EnvironmentConfig {
        seed: Some(7),
        ..EnvironmentConfig::default()
    };
    let mut environment = Environment::new(config)?;
    let mut visualizer = SlowVisualizer {
        inner: TerminalVisualizer::new(),
        delay: Duration::from_millis(100),
    };

    environment.run(100, &mut visualizer)?;
    println!("Food delivered: {}", environment.food_delivered());

    Ok(())
}
