pub mod board;
pub mod tile;

pub use board::{
    BoardFault, ClearOutcome, ConsumeOutcome, ReleaseOutcome, SelectionBoard, ToggleOutcome,
    GROUP_CAPACITY,
};
pub use tile::{TileId, TileTag};
