//! # ant_scavenge
//!
//! A grid world where a colony of ants scavenges for food and carries it back to its mound.
//!
//! Every step each ant sees a small window around itself, picks one of five moves and earns a
//! reward for exploring, picking up food and delivering it. Boards are generated from a seed so
//! episodes can be replayed exactly.

pub mod board;
pub use board::{Board, Layer, LayerKind};

pub mod config;
pub use config::EnvironmentConfig;

pub mod environment;
pub use environment::{Environment, PolicyFactory, TransitionRecord};

pub mod error;
pub use error::{Result, ScavengeError};

pub mod generator;
pub use generator::BoardGenerator;

pub mod point;
pub use point::Point;

pub mod policy;
pub use policy::{Action, Policy, RandomPolicy, ScriptedPolicy};

pub mod view;
pub use view::{get_view, get_views, View};

pub mod visualizer;
pub use visualizer::{TerminalVisualizer, Visualizer};

mod entities;
pub use entities::Ant;

mod replay;
