//! Text rendering of positions for the inspect shell.
//!
//! Each board cell is drawn as three stacked slots (large over medium over
//! small), so covered pieces stay visible:
//!
//! ```text
//! +-------+-------+-------+
//! |== L ==|       |       |
//! |       |** M **|       |
//! |== S ==|       |       |
//! +-------+-------+-------+
//! ...
//! ```
//!
//! Orange pieces render as `== S ==`, Blue as `** S **`; with escapes
//! enabled they are wrapped in 256-color ANSI sequences.

use gobb_core::{Color, Location, Piece, Position, Role, Size};

const ORANGE_ESCAPE: &str = "\x1b[38;5;208m";
const BLUE_ESCAPE: &str = "\x1b[38;5;32m";
const RESET_ESCAPE: &str = "\x1b[0m";

/// Renders positions and piece markers as text lines.
pub trait PositionText {
    /// The board as top-to-bottom lines, without trailing newlines.
    fn position_lines(&self, pos: &Position) -> Vec<String>;

    /// A 7-character piece marker, or blanks for `None`.
    fn piece_text(&self, color: Color, size: Option<Size>) -> String;

    /// The 2-character symbol of a color (`"=="` Orange, `"**"` Blue).
    fn color_symbol(&self, color: Color) -> String;
}

/// Plain or ANSI-colored ASCII rendering.
#[derive(Clone, Copy, Debug)]
pub struct AsciiRenderer {
    escapes: bool,
}

impl AsciiRenderer {
    /// `escapes` turns on ANSI coloring.
    pub fn new(escapes: bool) -> AsciiRenderer {
        AsciiRenderer { escapes }
    }

    fn colorize(&self, color: Color, text: &str) -> String {
        if !self.escapes {
            return text.to_string();
        }
        let escape = match color {
            Color::Orange => ORANGE_ESCAPE,
            Color::Blue => BLUE_ESCAPE,
        };
        format!("{}{}{}", escape, text, RESET_ESCAPE)
    }

    /// The piece of `size` sitting at `loc`, covered or not.
    fn piece_at(pos: &Position, loc: Location, size: Size) -> Option<Piece> {
        Piece::ALL
            .into_iter()
            .filter(|piece| piece.size() == size)
            .find(|&piece| pos.locations_of(piece).contains(loc))
    }
}

/// Cell of column `x`, row `y` (top-left is NW).
const CELL_GRID: [[Location; 3]; 3] = [
    [Location::NW, Location::N, Location::NE],
    [Location::W, Location::Center, Location::E],
    [Location::SW, Location::S, Location::SE],
];

const HORIZONTAL_LINE: &str = "+-------+-------+-------+";

impl PositionText for AsciiRenderer {
    fn position_lines(&self, pos: &Position) -> Vec<String> {
        let mut lines = Vec::with_capacity(13);

        for row in &CELL_GRID {
            lines.push(HORIZONTAL_LINE.to_string());
            for size in Size::ALL.into_iter().rev() {
                let mut line = String::from("|");
                for &loc in row {
                    let text = match Self::piece_at(pos, loc, size) {
                        Some(piece) => {
                            let color = match piece.role() {
                                Role::Active => pos.active_color(),
                                Role::Inactive => pos.inactive_color(),
                            };
                            self.piece_text(color, Some(size))
                        }
                        None => self.piece_text(Color::Orange, None),
                    };
                    line.push_str(&text);
                    line.push('|');
                }
                lines.push(line);
            }
        }

        lines.push(HORIZONTAL_LINE.to_string());
        lines
    }

    fn piece_text(&self, color: Color, size: Option<Size>) -> String {
        let Some(size) = size else {
            return "       ".to_string();
        };
        let text = match (color, size) {
            (Color::Orange, Size::Small) => "== S ==",
            (Color::Orange, Size::Medium) => "== M ==",
            (Color::Orange, Size::Large) => "== L ==",
            (Color::Blue, Size::Small) => "** S **",
            (Color::Blue, Size::Medium) => "** M **",
            (Color::Blue, Size::Large) => "** L **",
        };
        self.colorize(color, text)
    }

    fn color_symbol(&self, color: Color) -> String {
        let text = match color {
            Color::Orange => "==",
            Color::Blue => "**",
        };
        self.colorize(color, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gobb_core::LocationPair;
    use Location::{Out, NW};

    #[test]
    fn test_empty_board_shape() {
        let pos = Position::from_id(0).unwrap();
        let lines = AsciiRenderer::new(false).position_lines(&pos);
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], HORIZONTAL_LINE);
        assert_eq!(lines[12], HORIZONTAL_LINE);
        for body in [&lines[1], &lines[2], &lines[3]] {
            assert_eq!(body.as_str(), "|       |       |       |");
        }
    }

    #[test]
    fn test_stacked_pieces_render_in_their_slots() {
        // Orange active small under a blue large at NW.
        let pos = Position::from_parts(
            Color::Orange,
            [
                LocationPair::new(NW, Out),
                LocationPair::out(),
                LocationPair::out(),
                LocationPair::out(),
                LocationPair::out(),
                LocationPair::new(NW, Out),
            ],
        )
        .unwrap();
        let lines = AsciiRenderer::new(false).position_lines(&pos);
        // Top row of the NW cell shows the large, bottom row the small.
        assert_eq!(lines[1], "|** L **|       |       |");
        assert_eq!(lines[2], "|       |       |       |");
        assert_eq!(lines[3], "|== S ==|       |       |");
    }

    #[test]
    fn test_colors_follow_active_player() {
        // Same placement, Blue to move: the small piece is Blue's.
        let pos = Position::from_parts(
            Color::Blue,
            [
                LocationPair::new(NW, Out),
                LocationPair::out(),
                LocationPair::out(),
                LocationPair::out(),
                LocationPair::out(),
                LocationPair::out(),
            ],
        )
        .unwrap();
        let lines = AsciiRenderer::new(false).position_lines(&pos);
        assert_eq!(lines[3], "|** S **|       |       |");
    }

    #[test]
    fn test_escapes_wrap_pieces() {
        let renderer = AsciiRenderer::new(true);
        let text = renderer.piece_text(Color::Orange, Some(Size::Medium));
        assert_eq!(text, "\x1b[38;5;208m== M ==\x1b[0m");
        assert_eq!(renderer.color_symbol(Color::Blue), "\x1b[38;5;32m**\x1b[0m");
        // Blanks stay plain.
        assert_eq!(renderer.piece_text(Color::Blue, None), "       ");
    }
}
