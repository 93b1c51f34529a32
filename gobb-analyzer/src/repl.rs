//! The interactive inspect shell.
//!
//! Reads commands from stdin, prints the current position, its move lists
//! and a bounded navigation history. Every goto/move command pushes a
//! history entry; `next`/`previous`/`goto-history` only travel within it.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use gobb_core::{is_valid_position_id, Position, PositionId};

use crate::inspector::{Inspector, MoveInspection, PositionInspection};
use crate::text::PositionText;

/// Upper bound of stored history entries; the oldest entry is evicted.
const MAX_HISTORY_SIZE: usize = 32;

/// Bounded navigation history with a cursor.
///
/// Pushing truncates everything after the cursor, so branching off an old
/// entry discards the abandoned forward tail.
pub struct History {
    entries: VecDeque<PositionInspection>,
    index: usize,
}

impl History {
    pub fn new(first: PositionInspection) -> History {
        let mut entries = VecDeque::with_capacity(MAX_HISTORY_SIZE);
        entries.push_back(first);
        History { entries, index: 0 }
    }

    /// Append an entry after the cursor and move the cursor onto it.
    pub fn push(&mut self, entry: PositionInspection) {
        self.entries.truncate(self.index + 1);
        if self.entries.len() == MAX_HISTORY_SIZE {
            self.entries.pop_front();
            self.index = self.index.saturating_sub(1);
        }
        self.entries.push_back(entry);
        self.index += 1;
    }

    /// Move the cursor to an absolute index.
    pub fn goto(&mut self, index: usize) -> Option<PositionInspection> {
        if index >= self.entries.len() {
            return None;
        }
        self.index = index;
        Some(self.entries[index])
    }

    /// Advance the cursor.
    pub fn next(&mut self) -> Option<PositionInspection> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.entries[self.index])
    }

    /// Step the cursor back.
    pub fn previous(&mut self) -> Option<PositionInspection> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.entries[self.index])
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn entries(&self) -> impl Iterator<Item = &PositionInspection> {
        self.entries.iter()
    }
}

/// The shell state: one inspected position plus its cached move lists.
pub struct InspectShell<'a> {
    inspector: &'a Inspector,
    renderer: &'a dyn PositionText,
    position: Position,
    inspection: PositionInspection,
    moves: Vec<MoveInspection>,
    move_backs: Vec<MoveInspection>,
    history: History,
}

impl<'a> InspectShell<'a> {
    /// Start a shell at `position`.
    pub fn new(
        inspector: &'a Inspector,
        renderer: &'a dyn PositionText,
        position: Position,
    ) -> InspectShell<'a> {
        let inspection = inspector
            .inspect_position(position.id())
            .expect("shell positions are valid");
        InspectShell {
            inspector,
            renderer,
            position,
            inspection,
            moves: inspector.inspect_moves(position.id()),
            move_backs: inspector.inspect_move_backs(position.id()),
            history: History::new(inspection),
        }
    }

    /// Run until `exit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        self.show_position();
        self.show_moves();

        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            print!("gobb_inspect> ");
            io::stdout().flush()?;

            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                return Ok(());
            }
            let args: Vec<&str> = line.split_whitespace().collect();
            let Some(&command) = args.first() else {
                continue;
            };

            match command {
                "show-position" | "sp" => self.cmd_show_position(&args),
                "goto-position" | "gp" => self.cmd_goto_position(&args),
                "show-moves" | "sm" => self.cmd_show_moves(&args),
                "show-movebacks" | "smb" => self.cmd_show_move_backs(&args),
                "move" | "m" => self.cmd_move(&args),
                "moveback" | "mb" => self.cmd_move_back(&args),
                "show-history" | "sh" => self.cmd_show_history(&args),
                "goto-history" | "gh" => self.cmd_goto_history(&args),
                "next" | "n" => self.cmd_next(&args),
                "previous" | "p" => self.cmd_previous(&args),
                "help" | "?" => self.cmd_help(),
                "exit" => return Ok(()),
                _ => {
                    println!("invalid command");
                    self.show_hint();
                }
            }
        }
    }

    /// Re-inspect after navigating to a new position.
    fn refresh(&mut self, position: Position) {
        self.position = position;
        self.inspection = self
            .inspector
            .inspect_position(position.id())
            .expect("shell positions are valid");
        self.moves = self.inspector.inspect_moves(position.id());
        self.move_backs = self.inspector.inspect_move_backs(position.id());
    }

    fn cmd_show_position(&self, args: &[&str]) {
        if args.len() != 1 {
            println!("invalid arguments to 'show-position' command");
            self.show_hint();
            return;
        }
        self.show_position();
    }

    fn cmd_show_moves(&self, args: &[&str]) {
        if args.len() != 1 {
            println!("invalid arguments to 'show-moves' command");
            self.show_hint();
            return;
        }
        self.show_moves();
    }

    fn cmd_show_move_backs(&self, args: &[&str]) {
        if args.len() != 1 {
            println!("invalid arguments to 'show-movebacks' command");
            self.show_hint();
            return;
        }
        self.show_move_backs();
    }

    fn cmd_goto_position(&mut self, args: &[&str]) {
        if args.len() != 2 {
            println!("invalid arguments to 'goto-position' command");
            self.show_hint();
            return;
        }
        let position = match args[1].parse::<PositionId>() {
            Ok(id) if is_valid_position_id(id) => match Position::from_id(id) {
                Some(position) => position,
                None => {
                    println!("invalid position");
                    return;
                }
            },
            _ => {
                println!("invalid position");
                return;
            }
        };

        self.refresh(position);
        self.show_horizontal_line();
        self.show_position();
        self.show_moves();
        self.history.push(self.inspection);
    }

    fn cmd_move(&mut self, args: &[&str]) {
        if args.len() != 2 {
            println!("invalid arguments for 'move' command");
            self.show_hint();
            return;
        }
        let Ok(index) = args[1].parse::<usize>() else {
            println!("invalid index");
            return;
        };
        let Some(entry) = self.moves.get(index).copied() else {
            println!("invalid index for 'move' command");
            return;
        };

        let next = self
            .position
            .move_piece(entry.piece, entry.source, entry.destination)
            .position()
            .expect("listed moves are legal");
        self.refresh(next);
        self.show_horizontal_line();
        self.show_position();
        self.show_moves();
        self.history.push(self.inspection);
    }

    fn cmd_move_back(&mut self, args: &[&str]) {
        if args.len() != 2 {
            println!("invalid arguments for 'moveback' command");
            self.show_hint();
            return;
        }
        let Ok(index) = args[1].parse::<usize>() else {
            println!("invalid index");
            return;
        };
        let Some(entry) = self.move_backs.get(index).copied() else {
            println!("invalid index for 'moveback' command");
            return;
        };

        let prev = self
            .position
            .move_back(entry.piece, entry.source, entry.destination)
            .position()
            .expect("listed retrograde moves are legal");
        self.refresh(prev);
        self.show_horizontal_line();
        self.show_position();
        self.show_moves();
        self.history.push(self.inspection);
    }

    fn cmd_show_history(&self, args: &[&str]) {
        if args.len() != 1 {
            println!("invalid arguments to 'show-history' command");
            self.show_hint();
            return;
        }
        self.show_history();
    }

    fn cmd_goto_history(&mut self, args: &[&str]) {
        if args.len() != 2 {
            println!("invalid arguments to 'goto-history' command");
            self.show_hint();
            return;
        }
        let Ok(index) = args[1].parse::<usize>() else {
            println!("invalid index");
            return;
        };
        let Some(entry) = self.history.goto(index) else {
            println!("invalid index for 'goto-history' command");
            return;
        };

        let position = Position::from_id(entry.position_id).expect("history holds valid ids");
        self.refresh(position);
        self.show_horizontal_line();
        self.show_position();
        self.show_moves();
    }

    fn cmd_next(&mut self, args: &[&str]) {
        if args.len() != 1 {
            println!("invalid arguments to 'next' command");
            self.show_hint();
            return;
        }
        let Some(entry) = self.history.next() else {
            println!("no next entry in the history table");
            return;
        };
        let position = Position::from_id(entry.position_id).expect("history holds valid ids");
        self.refresh(position);
        self.show_position();
        self.show_moves();
    }

    fn cmd_previous(&mut self, args: &[&str]) {
        if args.len() != 1 {
            println!("invalid arguments to 'previous' command");
            self.show_hint();
            return;
        }
        let Some(entry) = self.history.previous() else {
            println!("no previous entry in the history table");
            return;
        };
        let position = Position::from_id(entry.position_id).expect("history holds valid ids");
        self.refresh(position);
        self.show_position();
        self.show_moves();
    }

    fn cmd_help(&self) {
        println!("Position:");
        println!("  (sp)  show-position     show the current position");
        println!("  (gp)  goto-position ID  go to the position ID");
        println!("Move:");
        println!("  (sm)  show-moves        show possible moves");
        println!("  (smb) show-movebacks    show possible retrograde moves");
        println!("  (m)   move NUM          execute the movement of the possible move NUM");
        println!("  (mb)  moveback NUM      execute the movement of the possible");
        println!("                          retrograde move NUM");
        println!("History:");
        println!("  (sh)  show-history      show the history table");
        println!("  (gh)  goto-history NUM  go to the position of the history NUM");
        println!("  (n)   next              go to the next position of the history");
        println!("  (p)   previous          go to the previous position of the history");
        println!();
        println!("Miscellaneous:");
        println!("  (?)   help              print this help");
        println!("        exit              exit the program");
    }

    fn show_horizontal_line(&self) {
        println!("----------------------------------------");
    }

    fn show_position(&self) {
        println!(
            "position = {}, remainingTurns = {}, {}",
            self.position.id(),
            self.inspection.turn,
            self.inspection.status.name()
        );
        for line in self.renderer.position_lines(&self.position) {
            println!("{}", line);
        }
        println!(
            "(the player having the turn: \"{}\")",
            self.renderer.color_symbol(self.position.active_color())
        );
        println!();
    }

    fn show_moves(&self) {
        println!("possible moves:");
        self.show_move_list(&self.moves);
    }

    fn show_move_backs(&self) {
        println!("possible retrograde moves:");
        self.show_move_list(&self.move_backs);
    }

    fn show_move_list(&self, moves: &[MoveInspection]) {
        for (index, entry) in moves.iter().enumerate() {
            let best_mark = if entry.is_best_move { " [best]" } else { "" };
            println!(
                "  {:2}| {:6}, {:6} -> {:6}, position = {:10}, remainingTurns = {:2}, {}{}",
                index,
                entry.piece.size().name(),
                entry.source.name(),
                entry.destination.name(),
                entry.position_id,
                entry.turn,
                entry.status.name(),
                best_mark
            );
        }
    }

    fn show_history(&self) {
        println!("history:");
        for (index, entry) in self.history.entries().enumerate() {
            let here_mark = if index == self.history.index() {
                " [here]"
            } else {
                ""
            };
            println!(
                "  {:2}| position = {:10}, remainingTurns = {:2}, {}{}",
                index,
                entry.position_id,
                entry.turn,
                entry.status.name(),
                here_mark
            );
        }
    }

    fn show_hint(&self) {
        println!("Try 'help' or '?' for more information.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::AnalysisStatus;

    fn entry(id: PositionId) -> PositionInspection {
        PositionInspection {
            position_id: id,
            turn: 0,
            status: AnalysisStatus::Unfixed,
        }
    }

    #[test]
    fn test_history_push_and_navigate() {
        let mut history = History::new(entry(0));
        history.push(entry(1));
        history.push(entry(2));
        assert_eq!(history.index(), 2);

        assert_eq!(history.previous().unwrap().position_id, 1);
        assert_eq!(history.previous().unwrap().position_id, 0);
        assert!(history.previous().is_none());

        assert_eq!(history.next().unwrap().position_id, 1);
        assert_eq!(history.next().unwrap().position_id, 2);
        assert!(history.next().is_none());
    }

    #[test]
    fn test_history_push_truncates_forward_tail() {
        let mut history = History::new(entry(0));
        history.push(entry(1));
        history.push(entry(2));
        history.previous();
        history.previous();

        // Branch off the first entry; 1 and 2 are discarded.
        history.push(entry(9));
        assert_eq!(history.index(), 1);
        assert!(history.next().is_none());
        let ids: Vec<u64> = history.entries().map(|e| e.position_id).collect();
        assert_eq!(ids, vec![0, 9]);
    }

    #[test]
    fn test_history_evicts_oldest_when_full() {
        let mut history = History::new(entry(0));
        for id in 1..32 {
            history.push(entry(id));
        }
        let ids: Vec<u64> = history.entries().map(|e| e.position_id).collect();
        assert_eq!(ids.len(), 32);
        assert_eq!(ids[0], 0);

        history.push(entry(99));
        let ids: Vec<u64> = history.entries().map(|e| e.position_id).collect();
        assert_eq!(ids.len(), 32);
        assert_eq!(ids[0], 1);
        assert_eq!(*ids.last().unwrap(), 99);
        assert_eq!(history.index(), 31);
    }

    #[test]
    fn test_history_goto() {
        let mut history = History::new(entry(0));
        history.push(entry(1));
        history.push(entry(2));

        assert_eq!(history.goto(0).unwrap().position_id, 0);
        assert_eq!(history.index(), 0);
        assert!(history.goto(3).is_none());
        // A failed goto leaves the cursor alone.
        assert_eq!(history.index(), 0);
    }
}
