//! Core enumerations: player colors, roles, piece sizes, piece kinds and
//! board locations.
//!
//! Piece ownership is expressed as a *role* (Active = the player to move,
//! Inactive = the opponent) rather than a named player. A position then only
//! needs one color bit to say which physical player is active, which halves
//! the state space; the cost is a role swap after every move.

/// Color of the pieces a physical player controls.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
pub enum Color {
    Orange = 0,
    Blue = 1,
}

impl Color {
    /// Get the opposite color.
    #[inline]
    pub fn invert(self) -> Color {
        match self {
            Color::Orange => Color::Blue,
            Color::Blue => Color::Orange,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Color::Orange => "Orange",
            Color::Blue => "Blue",
        }
    }
}

/// A player relative to the current turn.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
pub enum Role {
    /// The player having the current turn.
    Active = 0,
    /// The opponent.
    Inactive = 1,
}

impl Role {
    /// Get the opposite role.
    #[inline]
    pub fn invert(self) -> Role {
        match self {
            Role::Active => Role::Inactive,
            Role::Inactive => Role::Active,
        }
    }
}

/// Piece size.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum Size {
    Small = 0,
    Medium = 1,
    Large = 2,
}

impl Size {
    /// The three sizes, smallest first.
    pub const ALL: [Size; 3] = [Size::Small, Size::Medium, Size::Large];

    /// Check if this size can gobble (cover) another size.
    #[inline]
    pub fn can_gobble(self, other: Size) -> bool {
        self > other
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Size::Small => "Small",
            Size::Medium => "Medium",
            Size::Large => "Large",
        }
    }
}

/// A piece kind: role times size. There are two physical copies of each.
///
/// The discriminant order interleaves roles so that iterating kinds in
/// ascending order visits sizes smallest to largest; stacking code relies on
/// later kinds covering earlier ones.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
pub enum Piece {
    ActiveSmall = 0,
    InactiveSmall = 1,
    ActiveMedium = 2,
    InactiveMedium = 3,
    ActiveLarge = 4,
    InactiveLarge = 5,
}

impl Piece {
    /// The number of piece kinds.
    pub const NUM: usize = 6;

    /// All six kinds in discriminant order.
    pub const ALL: [Piece; 6] = [
        Piece::ActiveSmall,
        Piece::InactiveSmall,
        Piece::ActiveMedium,
        Piece::InactiveMedium,
        Piece::ActiveLarge,
        Piece::InactiveLarge,
    ];

    /// The active player's kinds, smallest first.
    pub const ACTIVE: [Piece; 3] = [Piece::ActiveSmall, Piece::ActiveMedium, Piece::ActiveLarge];

    /// The inactive player's kinds, smallest first.
    pub const INACTIVE: [Piece; 3] = [
        Piece::InactiveSmall,
        Piece::InactiveMedium,
        Piece::InactiveLarge,
    ];

    /// Build a kind from a role and a size.
    #[inline]
    pub fn new(role: Role, size: Size) -> Piece {
        Piece::from_index((size as usize) * 2 + role as usize)
            .expect("role/size index within kind range")
    }

    /// Convert from a discriminant index (0-5).
    #[inline]
    pub fn from_index(index: usize) -> Option<Piece> {
        match index {
            0 => Some(Piece::ActiveSmall),
            1 => Some(Piece::InactiveSmall),
            2 => Some(Piece::ActiveMedium),
            3 => Some(Piece::InactiveMedium),
            4 => Some(Piece::ActiveLarge),
            5 => Some(Piece::InactiveLarge),
            _ => None,
        }
    }

    /// Discriminant index (0-5), usable for table lookups.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The owning role.
    #[inline]
    pub fn role(self) -> Role {
        if self.index() % 2 == 0 {
            Role::Active
        } else {
            Role::Inactive
        }
    }

    /// The size.
    #[inline]
    pub fn size(self) -> Size {
        match self.index() / 2 {
            0 => Size::Small,
            1 => Size::Medium,
            _ => Size::Large,
        }
    }

    /// The same size owned by the opposite role.
    #[inline]
    pub fn invert_role(self) -> Piece {
        Piece::from_index(self.index() ^ 1).expect("xor keeps index within kind range")
    }
}

/// Where a piece sits: off the board, or one of the nine cells.
///
/// Board cells are numbered row-major from the northwest corner; `Out` is 0
/// so a location doubles as a base-10 digit of the quad encoding.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum Location {
    /// In the reserve, off the board.
    Out = 0,
    NW = 1,
    N = 2,
    NE = 3,
    W = 4,
    Center = 5,
    E = 6,
    SW = 7,
    S = 8,
    SE = 9,
}

impl Location {
    /// The number of locations, `Out` included.
    pub const NUM: usize = 10;

    /// All locations, `Out` first.
    pub const ALL: [Location; 10] = [
        Location::Out,
        Location::NW,
        Location::N,
        Location::NE,
        Location::W,
        Location::Center,
        Location::E,
        Location::SW,
        Location::S,
        Location::SE,
    ];

    /// The nine board cells.
    pub const ON_BOARD: [Location; 9] = [
        Location::NW,
        Location::N,
        Location::NE,
        Location::W,
        Location::Center,
        Location::E,
        Location::SW,
        Location::S,
        Location::SE,
    ];

    /// Convert from a raw digit (0-9).
    #[inline]
    pub fn from_u8(value: u8) -> Option<Location> {
        if (value as usize) < Location::NUM {
            Some(Location::ALL[value as usize])
        } else {
            None
        }
    }

    /// Raw digit value.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// True for the nine board cells, false for `Out`.
    #[inline]
    pub fn is_on_board(self) -> bool {
        self != Location::Out
    }

    /// Board cell index (0-8), or `None` for `Out`.
    #[inline]
    pub fn cell(self) -> Option<usize> {
        if self.is_on_board() {
            Some(self.index() - 1)
        } else {
            None
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Location::Out => "Out",
            Location::NW => "NW",
            Location::N => "N",
            Location::NE => "NE",
            Location::W => "W",
            Location::Center => "Center",
            Location::E => "E",
            Location::SW => "SW",
            Location::S => "S",
            Location::SE => "SE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_invert() {
        assert_eq!(Color::Orange.invert(), Color::Blue);
        assert_eq!(Color::Blue.invert(), Color::Orange);
    }

    #[test]
    fn test_role_invert() {
        assert_eq!(Role::Active.invert(), Role::Inactive);
        assert_eq!(Role::Inactive.invert(), Role::Active);
    }

    #[test]
    fn test_size_can_gobble() {
        assert!(!Size::Small.can_gobble(Size::Small));
        assert!(!Size::Small.can_gobble(Size::Large));
        assert!(Size::Medium.can_gobble(Size::Small));
        assert!(!Size::Medium.can_gobble(Size::Medium));
        assert!(Size::Large.can_gobble(Size::Small));
        assert!(Size::Large.can_gobble(Size::Medium));
        assert!(!Size::Large.can_gobble(Size::Large));
    }

    #[test]
    fn test_piece_role_size() {
        assert_eq!(Piece::ActiveSmall.role(), Role::Active);
        assert_eq!(Piece::ActiveSmall.size(), Size::Small);
        assert_eq!(Piece::InactiveLarge.role(), Role::Inactive);
        assert_eq!(Piece::InactiveLarge.size(), Size::Large);

        for piece in Piece::ALL {
            assert_eq!(Piece::new(piece.role(), piece.size()), piece);
        }
    }

    #[test]
    fn test_piece_invert_role() {
        assert_eq!(Piece::ActiveSmall.invert_role(), Piece::InactiveSmall);
        assert_eq!(Piece::InactiveSmall.invert_role(), Piece::ActiveSmall);
        assert_eq!(Piece::ActiveLarge.invert_role(), Piece::InactiveLarge);
        for piece in Piece::ALL {
            assert_eq!(piece.invert_role().invert_role(), piece);
            assert_eq!(piece.invert_role().size(), piece.size());
            assert_eq!(piece.invert_role().role(), piece.role().invert());
        }
    }

    #[test]
    fn test_location_cell() {
        assert_eq!(Location::Out.cell(), None);
        assert_eq!(Location::NW.cell(), Some(0));
        assert_eq!(Location::SE.cell(), Some(8));
        for (i, loc) in Location::ON_BOARD.iter().enumerate() {
            assert_eq!(loc.cell(), Some(i));
        }
    }

    #[test]
    fn test_location_from_u8() {
        for loc in Location::ALL {
            assert_eq!(Location::from_u8(loc.index() as u8), Some(loc));
        }
        assert_eq!(Location::from_u8(10), None);
        assert_eq!(Location::from_u8(255), None);
    }
}
