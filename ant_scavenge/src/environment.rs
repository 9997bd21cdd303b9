use crate::board::{Board, LayerKind};
use crate::config::EnvironmentConfig;
use crate::entities::Ant;
use crate::error::{Result, ScavengeError};
use crate::generator::BoardGenerator;
use crate::point::Point;
use crate::policy::{Action, Policy, RandomPolicy};
use crate::replay::{create_replay_logger, ReplayLogger, Reward};
use crate::view::{get_views, View};
use crate::visualizer::Visualizer;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use uuid::Builder;

/// Reward for stepping on a cell the ant has never stood on.
pub const EXPLORATION_BONUS: f32 = 0.01;
/// Reward for stepping on a cell the ant has already stood on.
pub const REVISIT_PENALTY: f32 = -0.01;
/// Reward for a move into a wall or another ant.
pub const BLOCKED_PENALTY: f32 = -0.01;
/// Reward for picking up food.
pub const FOOD_REWARD: f32 = 1.0;
/// Reward for dropping food on the mound.
pub const DELIVERY_REWARD: f32 = 1.0;

/// Builds the policy of each ant from its index and a seed drawn from the environment.
pub type PolicyFactory = Box<dyn FnMut(usize, u64) -> Box<dyn Policy> + Send + Sync>;

/// What one ant saw, did and earned during one step.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TransitionRecord {
    pub ant_id: String,
    pub observation: View,
    pub action: Action,
    pub reward: f32,
    /// The ant's view once every ant has moved.
    pub next_observation: View,
    /// The ant's position once every ant has moved.
    pub position: Point,
}

/// The simulation environment.
/// Owns the board and the ants of the current episode.
pub struct Environment {
    config: EnvironmentConfig,
    generator: BoardGenerator,
    board: Board,
    ants: Vec<Ant>,
    turn: usize,
    food_collected: usize,
    food_delivered: usize,
    policy_factory: PolicyFactory,
    replay_logger: Box<dyn ReplayLogger>,
    rng: StdRng,
}

impl Environment {
    /// Creates an environment where every ant moves at random.
    pub fn new(config: EnvironmentConfig) -> Result<Environment> {
        Environment::with_policies(config, |_, seed| Box::new(RandomPolicy::new(seed)))
    }

    /// Creates an environment on a freshly generated board.
    ///
    /// # Arguments
    /// * `config` - The environment configuration.
    /// * `policy_factory` - Called once per ant with the ant's index and a seed, each time ants
    ///   are created.
    pub fn with_policies<F>(config: EnvironmentConfig, policy_factory: F) -> Result<Environment>
    where
        F: FnMut(usize, u64) -> Box<dyn Policy> + Send + Sync + 'static,
    {
        config.validate()?;
        let mut environment = Environment::empty(config, Box::new(policy_factory));
        environment.reset()?;
        Ok(environment)
    }

    /// Creates an environment around an existing board.
    ///
    /// The board is only used for the first episode, [`Environment::reset`] generates a new one.
    pub fn from_board<F>(
        board: Board,
        config: EnvironmentConfig,
        policy_factory: F,
    ) -> Result<Environment>
    where
        F: FnMut(usize, u64) -> Box<dyn Policy> + Send + Sync + 'static,
    {
        config.validate()?;
        board.validate()?;
        let mut environment = Environment::empty(config, Box::new(policy_factory));
        environment.install(board);
        Ok(environment)
    }

    /// Generates a new board and a new colony.
    pub fn reset(&mut self) -> Result<()> {
        let board = self
            .generator
            .build(self.config.width, self.config.height, &mut self.rng)?;
        self.install(board);

        info!(
            width = self.config.width,
            height = self.config.height,
            ants = self.ants.len(),
            "environment reset"
        );
        Ok(())
    }

    /// Runs one tick of the simulation.
    ///
    /// Ants act in a random order and each move is resolved before the next ant's, so the first
    /// ant to reach a contested cell takes it. Records are returned in that order. On error the
    /// board and the ants are left as they were.
    pub fn step(&mut self) -> Result<Vec<TransitionRecord>> {
        let mut order: Vec<usize> = (0..self.ants.len()).collect();
        order.shuffle(&mut self.rng);

        let positions: Vec<Point> = order.iter().map(|i| self.ants[*i].position()).collect();
        let views = get_views(&self.board, &positions)?;

        // Every action is chosen and checked before the board changes
        let mut actions = Vec::with_capacity(order.len());
        for ((index, view), position) in order.iter().zip(&views).zip(&positions) {
            let action = Action::try_from(self.ants[*index].choose(view)?)?;
            let destination = *position + action.delta();
            if !self.board.contains(destination) {
                return Err(ScavengeError::OutOfBounds {
                    x: destination.x,
                    y: destination.y,
                });
            }
            actions.push(action);
        }

        self.turn += 1;
        let mut rewards = Vec::with_capacity(order.len());
        for (index, action) in order.iter().zip(&actions) {
            rewards.push(self.resolve(*index, *action)?);
        }

        let positions: Vec<Point> = order.iter().map(|i| self.ants[*i].position()).collect();
        let next_views = get_views(&self.board, &positions)?;

        let total_reward: f32 = rewards.iter().sum();
        let turn_rewards = order
            .iter()
            .zip(&rewards)
            .map(|(index, reward)| Reward::new(self.ants[*index].id(), *reward))
            .collect();
        self.replay_logger.log_turn(
            self.turn,
            turn_rewards,
            self.food_collected,
            self.food_delivered,
        );
        debug!(
            turn = self.turn,
            reward = total_reward,
            food_collected = self.food_collected,
            food_delivered = self.food_delivered,
            "step resolved"
        );

        let records = order
            .iter()
            .zip(views)
            .zip(next_views)
            .zip(actions)
            .zip(rewards)
            .zip(positions)
            .map(
                |(((((index, observation), next_observation), action), reward), position)| {
                    TransitionRecord {
                        ant_id: self.ants[*index].id().to_string(),
                        observation,
                        action,
                        reward,
                        next_observation,
                        position,
                    }
                },
            )
            .collect();

        Ok(records)
    }

    /// Shows the board and steps `steps` times, then closes the visualizer.
    pub fn run(
        &mut self,
        steps: usize,
        visualizer: &mut dyn Visualizer,
    ) -> Result<Vec<TransitionRecord>> {
        let mut records = Vec::new();
        for _ in 0..steps {
            visualizer.show(&self.board)?;
            records.extend(self.step()?);
        }
        visualizer.close()?;
        Ok(records)
    }

    /// Writes the replay of the current episode, if a replay file is configured.
    pub fn save_replay(&self) -> Result<()> {
        self.replay_logger.save()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn ants(&self) -> &[Ant] {
        &self.ants
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    /// Number of steps taken in the current episode.
    pub fn turn(&self) -> usize {
        self.turn
    }

    /// Food picked up during the current episode.
    pub fn food_collected(&self) -> usize {
        self.food_collected
    }

    /// Food dropped on the mound during the current episode.
    pub fn food_delivered(&self) -> usize {
        self.food_delivered
    }
}

impl Environment {
    fn empty(config: EnvironmentConfig, policy_factory: PolicyFactory) -> Environment {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Environment {
            generator: BoardGenerator::new(&config),
            board: Board::new(config.width, config.height),
            ants: Vec::new(),
            turn: 0,
            food_collected: 0,
            food_delivered: 0,
            policy_factory,
            replay_logger: create_replay_logger(config.replay_filename.clone()),
            rng,
            config,
        }
    }

    fn install(&mut self, board: Board) {
        let mut ants = Vec::new();
        for (index, position) in board.ants().points().into_iter().enumerate() {
            let id = Builder::from_random_bytes(self.rng.gen()).into_uuid();
            let policy = (self.policy_factory)(index, self.rng.gen());
            ants.push(Ant::new(
                id.to_string(),
                position,
                board.ants().clone(),
                policy,
            ));
        }

        self.ants = ants;
        self.board = board;
        self.turn = 0;
        self.food_collected = 0;
        self.food_delivered = 0;
        self.replay_logger.clear();
        self.replay_logger.log_board(&self.board);
    }

    fn resolve(&mut self, index: usize, action: Action) -> Result<f32> {
        let ant = &mut self.ants[index];
        let source = ant.position();
        let destination = source + action.delta();

        let blocked = self.board.walls().get(destination)?
            || (destination != source && self.board.ants().get(destination)?);
        if blocked {
            ant.stay();
            self.replay_logger
                .log_blocked(self.turn, ant.id(), source, destination);
            return Ok(BLOCKED_PENALTY);
        }

        self.board.layer_mut(LayerKind::Ants).set(source, false)?;
        self.board.layer_mut(LayerKind::Ants).set(destination, true)?;
        ant.move_to(destination);
        if destination == source {
            self.replay_logger.log_stay(self.turn, ant.id(), source);
        } else {
            self.replay_logger
                .log_move(self.turn, ant.id(), source, destination);
        }

        let mut reward = 0.0;

        let first_visit = ant.mark_seen(destination)?;
        if self.config.carrying_reward_shaping || !ant.has_food() {
            reward += if first_visit {
                EXPLORATION_BONUS
            } else {
                REVISIT_PENALTY
            };
        }

        if self.board.food().get(destination)? && !ant.has_food() {
            reward += FOOD_REWARD;
            ant.set_has_food(true);
            self.board.layer_mut(LayerKind::Food).set(destination, false)?;
            self.food_collected += 1;
            self.replay_logger
                .log_pick_up_food(self.turn, ant.id(), destination);
        }

        if self.board.mound().get(destination)? && ant.has_food() {
            reward += DELIVERY_REWARD;
            ant.set_has_food(false);
            self.food_delivered += 1;
            self.replay_logger
                .log_deliver_food(self.turn, ant.id(), destination);
        }

        Ok(reward)
    }
}
