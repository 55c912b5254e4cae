//! deckforge - Yu-Gi-Oh! deck list conversion
//!
//! Decodes deck lists from the common interchange formats into one
//! canonical [`Deck`] and encodes them back out. Formats that carry card
//! names or need card types resolve them through a [`CardDirectory`] built
//! from two SQLite card databases and refreshed in the background.

pub mod codec;
pub mod convert;
pub mod core;
pub mod directory;
pub mod error;

pub use codec::{DeckCodec, DeckFormat};
pub use convert::{Conversion, Converter};
pub use core::{CardId, Deck, Zone};
pub use directory::{CardDirectory, Dataset, Scope};
pub use error::{DeckError, Result};
