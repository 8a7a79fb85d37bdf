pub use board::*;
pub use cards::*;
pub use errors::*;
pub use game::*;
pub use protocol_types::*;
pub use sequences::*;
pub use strategy::*;
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod board;
mod cards;
mod errors;
mod game;
mod protocol_types;
mod sequences;
mod strategy;
mod visualization;
