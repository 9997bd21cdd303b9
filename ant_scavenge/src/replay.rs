use crate::board::Board;
use crate::error::Result;
use crate::point::Point;
use serde_json::json;
use std::{collections::HashMap, fs::File, io::BufWriter};

pub fn create_replay_logger(filename: Option<String>) -> Box<dyn ReplayLogger> {
    match filename {
        None => Box::new(NoOpReplayLogger {}),
        Some(filename) => Box::new(JsonReplayLogger::new(filename)),
    }
}

/// Buffers what happens during an episode.
///
/// Logging only touches memory; nothing is written until [`ReplayLogger::save`].
pub trait ReplayLogger: Send + Sync {
    #[allow(unused_variables)]
    fn log_board(&mut self, board: &Board) {}

    #[allow(unused_variables)]
    fn log_turn(
        &mut self,
        turn: usize,
        rewards: Vec<Reward>,
        food_collected: usize,
        food_delivered: usize,
    ) {
    }

    #[allow(unused_variables)]
    fn log_event(&mut self, turn: usize, event: Event) {}

    fn clear(&mut self) {}

    fn save(&self) -> Result<()> {
        Ok(())
    }

    fn log_move(&mut self, turn: usize, id: &str, location: Point, destination: Point) {
        self.log_ant_event(turn, EventType::Move, id, location, Some(destination));
    }

    fn log_stay(&mut self, turn: usize, id: &str, location: Point) {
        self.log_ant_event(turn, EventType::Stay, id, location, None);
    }

    fn log_blocked(&mut self, turn: usize, id: &str, location: Point, destination: Point) {
        self.log_ant_event(turn, EventType::Blocked, id, location, Some(destination));
    }

    fn log_pick_up_food(&mut self, turn: usize, id: &str, location: Point) {
        self.log_ant_event(turn, EventType::PickUpFood, id, location, None);
    }

    fn log_deliver_food(&mut self, turn: usize, id: &str, location: Point) {
        self.log_ant_event(turn, EventType::DeliverFood, id, location, None);
    }

    fn log_ant_event(
        &mut self,
        turn: usize,
        event_type: EventType,
        id: &str,
        location: Point,
        destination: Option<Point>,
    ) {
        self.log_event(
            turn,
            Event {
                event_type,
                ant_id: id.to_string(),
                location,
                destination,
            },
        );
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum EventType {
    Move,
    Stay,
    Blocked,
    PickUpFood,
    DeliverFood,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct Event {
    event_type: EventType,
    ant_id: String,
    location: Point,
    destination: Option<Point>,
}

/// The reward one ant earned during a turn.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Reward {
    ant_id: String,
    reward: f32,
}

impl Reward {
    pub fn new(ant_id: &str, reward: f32) -> Reward {
        Reward {
            ant_id: ant_id.to_string(),
            reward,
        }
    }
}

struct Turn {
    turn: usize,
    rewards: Vec<Reward>,
    food_collected: usize,
    food_delivered: usize,
}

struct NoOpReplayLogger;
impl ReplayLogger for NoOpReplayLogger {}

struct JsonReplayLogger {
    filename: String,
    width: usize,
    height: usize,
    board: Vec<String>,
    turns: Vec<Turn>,
    events: HashMap<usize, Vec<Event>>,
}

impl JsonReplayLogger {
    pub fn new(filename: String) -> JsonReplayLogger {
        JsonReplayLogger {
            filename,
            width: 0,
            height: 0,
            board: Vec::new(),
            turns: Vec::new(),
            events: HashMap::new(),
        }
    }
}

impl ReplayLogger for JsonReplayLogger {
    fn log_board(&mut self, board: &Board) {
        self.width = board.width();
        self.height = board.height();
        self.board = board
            .symbols()
            .into_iter()
            .map(|row| row.into_iter().collect())
            .collect();
    }

    fn log_turn(
        &mut self,
        turn: usize,
        rewards: Vec<Reward>,
        food_collected: usize,
        food_delivered: usize,
    ) {
        self.turns.push(Turn {
            turn,
            rewards,
            food_collected,
            food_delivered,
        });
    }

    fn log_event(&mut self, turn: usize, event: Event) {
        self.events.entry(turn).or_default().push(event);
    }

    fn clear(&mut self) {
        self.board.clear();
        self.turns.clear();
        self.events.clear();
    }

    fn save(&self) -> Result<()> {
        let file = File::create(&self.filename)?;
        let turns: Vec<_> = self
            .turns
            .iter()
            .map(|turn| {
                json!({
                    "turn": turn.turn,
                    "rewards": turn.rewards,
                    "food_collected": turn.food_collected,
                    "food_delivered": turn.food_delivered,
                    "events": self.events.get(&turn.turn).unwrap_or(&Vec::new()),
                })
            })
            .collect();

        let (food_collected, food_delivered) = self
            .turns
            .last()
            .map_or((0, 0), |turn| (turn.food_collected, turn.food_delivered));

        let data = json!({
            "width": self.width,
            "height": self.height,
            "board": self.board,
            "turns": turns,
            "food_collected": food_collected,
            "food_delivered": food_delivered,
        });

        let mut writer = BufWriter::new(&file);
        serde_json::to_writer_pretty(&mut writer, &data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn when_saving_a_json_replay_the_board_turns_and_events_are_written() {
        let path = std::env::temp_dir().join(format!("ant_scavenge_replay_{}.json", std::process::id()));
        let mut logger = create_replay_logger(Some(path.to_string_lossy().to_string()));

        let board = "\
            rows 3
            cols 3
            m www
            m wfw
            m www";
        logger.log_board(&Board::parse(board).unwrap());
        logger.log_move(1, "ant", Point::new(1, 1), Point::new(2, 1));
        logger.log_pick_up_food(1, "ant", Point::new(2, 1));
        logger.log_turn(1, vec![Reward::new("ant", 1.01)], 1, 0);
        logger.log_blocked(2, "ant", Point::new(2, 1), Point::new(3, 1));
        logger.log_stay(2, "other", Point::new(1, 1));
        logger.log_turn(2, vec![Reward::new("ant", -0.01), Reward::new("other", -0.01)], 1, 0);
        logger.save().unwrap();

        let replay: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(replay["width"], 3);
        assert_eq!(replay["board"][1], "wfw");
        assert_eq!(replay["turns"].as_array().unwrap().len(), 2);
        assert_eq!(replay["turns"][0]["events"][0]["event_type"], "Move");
        assert_eq!(replay["turns"][0]["events"][1]["event_type"], "PickUpFood");
        assert_eq!(replay["turns"][1]["events"][0]["destination"]["x"], 3);
        assert_eq!(replay["turns"][1]["events"][1]["event_type"], "Stay");
        assert!(replay["turns"][1]["events"][1]["destination"].is_null());
        assert_eq!(replay["turns"][1]["rewards"][1]["ant_id"], "other");
        assert_eq!(replay["turns"][0]["rewards"].as_array().unwrap().len(), 1);
        assert_eq!(replay["food_collected"], 1);
    }

    #[test]
    fn when_clearing_a_replay_previous_turns_are_dropped() {
        let mut logger = JsonReplayLogger::new("unused.json".to_string());

        logger.log_turn(1, Vec::new(), 0, 0);
        logger.log_move(1, "ant", Point::new(1, 1), Point::new(1, 2));
        logger.clear();

        assert!(logger.turns.is_empty());
        assert!(logger.events.is_empty());
    }

    #[test]
    fn when_no_replay_file_is_configured_saving_does_nothing() {
        let mut logger = create_replay_logger(None);

        logger.log_turn(1, Vec::new(), 0, 0);
        assert!(logger.save().is_ok());
    }
}
