//! # Console Board Rendering
//!
//! Text rendering of a [`Board`] for the blocking console game, plus the
//! human-move prompt parser. Two layouts exist, one per engine variant:
//!
//! - [`Layout::Compact`] (alpha-beta): column numbers on top, row numbers on the
//!   left, human `O`, computer `X`.
//! - [`Layout::Framed`] (MCTS): column numbers above and below, row numbers on both
//!   sides, human `X`, computer `O`.
//!
//! Stones are coloured with `colored`; `colored::control::set_override(false)`
//! turns that off.

use crate::games::gomoku::{Board, Cell, GomokuMove, Player};
use colored::Colorize;
use std::fmt::Write;

/// Glyph for an empty intersection
pub const EMPTY_GLYPH: char = '.';

/// Grid framing style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Compact,
    Framed,
}

/// Characters and framing used to draw a board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardStyle {
    pub human: char,
    pub computer: char,
    pub layout: Layout,
}

impl BoardStyle {
    /// Alpha-beta variant: human `O`, computer `X`
    pub fn alpha_beta() -> Self {
        BoardStyle {
            human: 'O',
            computer: 'X',
            layout: Layout::Compact,
        }
    }

    /// MCTS variant: human `X`, computer `O`
    pub fn mcts() -> Self {
        BoardStyle {
            human: 'X',
            computer: 'O',
            layout: Layout::Framed,
        }
    }

    fn glyph(&self, cell: Cell, human: Player) -> String {
        match cell.player() {
            None => EMPTY_GLYPH.to_string(),
            Some(p) if p == human => self.human.to_string().red().bold().to_string(),
            Some(_) => self.computer.to_string().blue().bold().to_string(),
        }
    }
}

/// Draws `board` with `human` shown using the style's human glyph
pub fn render(board: &Board, human: Player, style: &BoardStyle) -> String {
    let size = board.size();
    let mut out = String::new();
    match style.layout {
        Layout::Compact => {
            out.push_str("  ");
            for col in 0..size {
                let _ = write!(out, "{col:>2}");
            }
            out.push('\n');
            for row in 0..size {
                let _ = write!(out, "{row:>2} ");
                for col in 0..size {
                    let cell = board.get(row, col).unwrap_or_default();
                    let _ = write!(out, "{} ", style.glyph(cell, human));
                }
                out.push('\n');
            }
        }
        Layout::Framed => {
            let header = column_header(size);
            out.push_str(&header);
            for row in 0..size {
                let _ = write!(out, "{row:>2} ");
                for col in 0..size {
                    let cell = board.get(row, col).unwrap_or_default();
                    let _ = write!(out, " {} ", style.glyph(cell, human));
                }
                let _ = writeln!(out, " {row:>2}");
            }
            out.push_str(&header);
        }
    }
    out
}

fn column_header(size: usize) -> String {
    let mut header = String::from("   ");
    for col in 0..size {
        let _ = write!(header, "{col:>2} ");
    }
    header.push('\n');
    header
}

/// Parses a typed `row col` line
pub fn parse_move(line: &str) -> Result<GomokuMove, String> {
    line.trim().parse()
}
