/// Material counting for the local evaluation

use shakmaty::{Board, Color, Role};

pub const PAWN_VALUE: i32 = 1;
pub const KNIGHT_VALUE: i32 = 3;
pub const BISHOP_VALUE: i32 = 3;
pub const ROOK_VALUE: i32 = 5;
pub const QUEEN_VALUE: i32 = 9;

/// Piece value (king counts zero)
pub fn piece_value(role: Role) -> i32 {
    match role {
        Role::Pawn => PAWN_VALUE,
        Role::Knight => KNIGHT_VALUE,
        Role::Bishop => BISHOP_VALUE,
        Role::Rook => ROOK_VALUE,
        Role::Queen => QUEEN_VALUE,
        Role::King => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Material {
    pub white: i32,
    pub black: i32,
}

impl Material {
    pub fn count(board: &Board) -> Self {
        let mut material = Self::default();
        for (_, piece) in board.iter() {
            let value = piece_value(piece.role);
            match piece.color {
                Color::White => material.white += value,
                Color::Black => material.black += value,
            }
        }
        material
    }

    /// White minus black.
    pub fn diff(&self) -> i32 {
        self.white - self.black
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::{Chess, Position};

    #[test]
    fn test_starting_material_is_even() {
        let material = Material::count(Chess::default().board());
        assert_eq!(material.white, 39);
        assert_eq!(material.black, 39);
        assert_eq!(material.diff(), 0);
    }

    #[test]
    fn test_piece_values() {
        assert_eq!(piece_value(Role::Queen), 9);
        assert_eq!(piece_value(Role::King), 0);
    }
}
