use ant_scavenge::{Environment, EnvironmentConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = EnvironmentConfig {
        seed: Some(0),
        replay_filename: Some("/tmp/ant_scavenge_replay.json".to_string()),
        ..EnvironmentConfig::default()
    };
    let mut environment = Environment::new(config)?;

    let mut total_reward = 0.0;
    for _ in 0..500 {
        let records = environment.step()?;
        total_reward += records.iter().map(|record| record.reward).sum::<f32>();
    }

    info!(
        turns = environment.turn(),
        reward = total_reward,
        food_collected = environment.food_collected(),
        food_delivered = environment.food_delivered(),
        "episode finished"
    );

    environment.save_replay()?;
    println!("\n{}", environment.board());

    Ok(())
}
