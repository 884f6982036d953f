pub mod attribute;
pub mod block;
pub mod chr;
pub mod common;
pub mod config;
pub mod error;
pub mod helpers;
pub mod nametable;
pub mod palette;
pub mod persist;
pub mod render;
pub mod tile;

pub use attribute::{Attribute, AttributeLayout};
pub use block::{Block, BlockLayout};
pub use error::CodecError;
pub use nametable::{Nametable, NametableLayout};
pub use tile::Tile;
