use crate::board::Board;
use crate::error::Result;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    style::{Color, Print, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{stdout, Write};

/// Displays boards. Implementations only read the board.
pub trait Visualizer {
    fn show(&mut self, board: &Board) -> Result<()>;

    /// Releases whatever the visualizer holds on to.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Draws the symbolic projection of the board to the terminal.
#[derive(Default)]
pub struct TerminalVisualizer {
    frame: usize,
}

impl TerminalVisualizer {
    pub fn new() -> TerminalVisualizer {
        TerminalVisualizer::default()
    }
}

impl Visualizer for TerminalVisualizer {
    fn show(&mut self, board: &Board) -> Result<()> {
        let mut stdout = stdout();
        self.frame += 1;

        execute!(
            stdout,
            Clear(ClearType::All),
            Hide,
            Print("Frame: "),
            Print(self.frame.to_string()),
            Print(", Food left: "),
            Print(board.food().count().to_string()),
            Print("\n\n")
        )?;

        for row in board.symbols() {
            for symbol in row {
                execute!(
                    stdout,
                    SetForegroundColor(symbol_to_color(symbol)),
                    Print(symbol),
                    SetForegroundColor(Color::Reset)
                )?;
            }
            execute!(stdout, Print("\n"))?;
        }

        stdout.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        execute!(stdout(), Show, Print("\n"))?;
        Ok(())
    }
}

fn symbol_to_color(symbol: char) -> Color {
    match symbol {
        'w' => Color::DarkBlue,
        'f' => Color::Green,
        'a' => Color::Red,
        'm' => Color::DarkYellow,
        '@' => Color::Yellow,
        _ => Color::Reset,
    }
}
