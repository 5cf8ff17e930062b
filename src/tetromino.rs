//! Piece catalog and analytic rotation
//!
//! The 7 pieces are stored once as row-major square masks. Rotated views are
//! computed by remapping indices, so no rotation tables exist.

/// The 7 piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

/// An immutable square bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceShape {
    pub kind: PieceKind,
    /// Side length of the square mask (2-4)
    pub side: usize,
    /// Row-major mask, `side * side` entries of 0 or 1
    pub mask: &'static [u8],
}

#[rustfmt::skip]
const MASK_I: [u8; 16] = [
    0, 0, 0, 0,
    1, 1, 1, 1,
    0, 0, 0, 0,
    0, 0, 0, 0,
];

#[rustfmt::skip]
const MASK_J: [u8; 9] = [
    1, 0, 0,
    1, 1, 1,
    0, 0, 0,
];

#[rustfmt::skip]
const MASK_L: [u8; 9] = [
    0, 0, 1,
    1, 1, 1,
    0, 0, 0,
];

#[rustfmt::skip]
const MASK_O: [u8; 4] = [
    1, 1,
    1, 1,
];

#[rustfmt::skip]
const MASK_S: [u8; 9] = [
    0, 1, 1,
    1, 1, 0,
    0, 0, 0,
];

#[rustfmt::skip]
const MASK_T: [u8; 9] = [
    0, 1, 0,
    1, 1, 1,
    0, 0, 0,
];

#[rustfmt::skip]
const MASK_Z: [u8; 9] = [
    1, 1, 0,
    0, 1, 1,
    0, 0, 0,
];

/// Every shape, in `PieceKind` order
pub static CATALOG: [PieceShape; 7] = [
    PieceShape { kind: PieceKind::I, side: 4, mask: &MASK_I },
    PieceShape { kind: PieceKind::J, side: 3, mask: &MASK_J },
    PieceShape { kind: PieceKind::L, side: 3, mask: &MASK_L },
    PieceShape { kind: PieceKind::O, side: 2, mask: &MASK_O },
    PieceShape { kind: PieceKind::S, side: 3, mask: &MASK_S },
    PieceShape { kind: PieceKind::T, side: 3, mask: &MASK_T },
    PieceShape { kind: PieceKind::Z, side: 3, mask: &MASK_Z },
];

impl PieceKind {
    /// All kinds, used for uniform random selection
    pub fn all() -> [PieceKind; 7] {
        [
            PieceKind::I,
            PieceKind::J,
            PieceKind::L,
            PieceKind::O,
            PieceKind::S,
            PieceKind::T,
            PieceKind::Z,
        ]
    }

    /// Look up the catalog entry for this kind
    pub fn shape(self) -> &'static PieceShape {
        &CATALOG[self as usize]
    }
}

/// Rotation states, clockwise from spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Up,
    Right,
    Down,
    Left,
}

impl Rotation {
    /// Rotate clockwise: Up → Right → Down → Left → Up
    pub fn cw(self) -> Rotation {
        match self {
            Rotation::Up => Rotation::Right,
            Rotation::Right => Rotation::Down,
            Rotation::Down => Rotation::Left,
            Rotation::Left => Rotation::Up,
        }
    }

    /// Rotate counter-clockwise: Up → Left → Down → Right → Up
    pub fn ccw(self) -> Rotation {
        match self {
            Rotation::Up => Rotation::Left,
            Rotation::Left => Rotation::Down,
            Rotation::Down => Rotation::Right,
            Rotation::Right => Rotation::Up,
        }
    }
}

/// Index into a `side * side` row-major mask for local cell `(i, k)` viewed at `rotation`
pub fn rotated_index(side: usize, rotation: Rotation, i: usize, k: usize) -> usize {
    match rotation {
        Rotation::Up => i * side + k,
        Rotation::Right => side * (side - k - 1) + i,
        Rotation::Down => (side - i - 1) * side + (side - k - 1),
        Rotation::Left => k * side + (side - i - 1),
    }
}

impl PieceShape {
    /// Whether local cell `(i, k)` is occupied when the piece is at `rotation`
    pub fn cell(&self, rotation: Rotation, i: usize, k: usize) -> bool {
        self.mask[rotated_index(self.side, rotation, i, k)] != 0
    }

    /// Occupied local cells `(i, k)` in row-major order
    pub fn cells(&self, rotation: Rotation) -> impl Iterator<Item = (usize, usize)> + '_ {
        let side = self.side;
        (0..side)
            .flat_map(move |i| (0..side).map(move |k| (i, k)))
            .filter(move |&(i, k)| self.cell(rotation, i, k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROTATIONS: [Rotation; 4] = [Rotation::Up, Rotation::Right, Rotation::Down, Rotation::Left];

    /// Materialize a mask as seen through `rotation`
    fn view(mask: &[u8], side: usize, rotation: Rotation) -> Vec<u8> {
        let mut out = Vec::with_capacity(side * side);
        for i in 0..side {
            for k in 0..side {
                out.push(mask[rotated_index(side, rotation, i, k)]);
            }
        }
        out
    }

    #[test]
    fn test_catalog_order_matches_kind() {
        for kind in PieceKind::all() {
            assert_eq!(kind.shape().kind, kind);
            assert_eq!(kind.shape().mask.len(), kind.shape().side * kind.shape().side);
        }
    }

    #[test]
    fn test_every_piece_has_four_cells() {
        for shape in &CATALOG {
            for rotation in ROTATIONS {
                assert_eq!(shape.cells(rotation).count(), 4, "{:?} {:?}", shape.kind, rotation);
            }
        }
    }

    #[test]
    fn test_right_twice_equals_down() {
        for shape in &CATALOG {
            let once = view(shape.mask, shape.side, Rotation::Right);
            let twice = view(&once, shape.side, Rotation::Right);
            assert_eq!(twice, view(shape.mask, shape.side, Rotation::Down), "{:?}", shape.kind);
        }
    }

    #[test]
    fn test_four_rights_is_identity() {
        for shape in &CATALOG {
            let mut mask = shape.mask.to_vec();
            for _ in 0..4 {
                mask = view(&mask, shape.side, Rotation::Right);
            }
            assert_eq!(mask, shape.mask);
        }
    }

    #[test]
    fn test_right_then_left_is_identity() {
        for shape in &CATALOG {
            let right = view(shape.mask, shape.side, Rotation::Right);
            assert_eq!(view(&right, shape.side, Rotation::Left), shape.mask);
        }
    }

    #[test]
    fn test_i_piece_right_is_vertical() {
        let shape = PieceKind::I.shape();
        let cells: Vec<_> = shape.cells(Rotation::Right).collect();
        assert_eq!(cells, vec![(0, 2), (1, 2), (2, 2), (3, 2)]);
    }

    #[test]
    fn test_rotation_cycle() {
        let mut r = Rotation::Up;
        for _ in 0..4 {
            r = r.cw();
        }
        assert_eq!(r, Rotation::Up);
        assert_eq!(Rotation::Up.ccw(), Rotation::Left);
        assert_eq!(Rotation::Left.cw(), Rotation::Up);
    }
}
