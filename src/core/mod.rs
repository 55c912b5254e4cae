//! Core deck types

pub mod deck;
pub mod types;

pub use deck::{Deck, Zone};
pub use types::{normalize_name, CardId, CardName};
