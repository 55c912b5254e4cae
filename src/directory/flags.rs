//! Card type bit-field decoding
//!
//! Card databases store a card's types as one integer of OR-ed masks.
//! [`TypeFlags`] decodes it against the fixed set of known masks; bits that
//! match no known mask are dropped.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// A named card type flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeFlag {
    Monster,
    Spell,
    Trap,
    Normal,
    Effect,
    Fusion,
    Ritual,
    TrapMonster,
    Spirit,
    Union,
    Gemini,
    Tuner,
    Synchro,
    Token,
    Maximum,
    QuickPlay,
    Continuous,
    Equip,
    Field,
    Counter,
    Flip,
    Toon,
    Xyz,
    Pendulum,
    SpecialSummon,
    Link,
}

impl TypeFlag {
    /// Every known flag, in mask order
    pub const ALL: [TypeFlag; 26] = [
        TypeFlag::Monster,
        TypeFlag::Spell,
        TypeFlag::Trap,
        TypeFlag::Normal,
        TypeFlag::Effect,
        TypeFlag::Fusion,
        TypeFlag::Ritual,
        TypeFlag::TrapMonster,
        TypeFlag::Spirit,
        TypeFlag::Union,
        TypeFlag::Gemini,
        TypeFlag::Tuner,
        TypeFlag::Synchro,
        TypeFlag::Token,
        TypeFlag::Maximum,
        TypeFlag::QuickPlay,
        TypeFlag::Continuous,
        TypeFlag::Equip,
        TypeFlag::Field,
        TypeFlag::Counter,
        TypeFlag::Flip,
        TypeFlag::Toon,
        TypeFlag::Xyz,
        TypeFlag::Pendulum,
        TypeFlag::SpecialSummon,
        TypeFlag::Link,
    ];

    /// Types whose cards live in the extra deck
    pub const EXTRA_DECK: [TypeFlag; 4] = [
        TypeFlag::Fusion,
        TypeFlag::Synchro,
        TypeFlag::Xyz,
        TypeFlag::Link,
    ];

    pub const fn mask(self) -> u32 {
        match self {
            TypeFlag::Monster => 0x1,
            TypeFlag::Spell => 0x2,
            TypeFlag::Trap => 0x4,
            TypeFlag::Normal => 0x10,
            TypeFlag::Effect => 0x20,
            TypeFlag::Fusion => 0x40,
            TypeFlag::Ritual => 0x80,
            TypeFlag::TrapMonster => 0x100,
            TypeFlag::Spirit => 0x200,
            TypeFlag::Union => 0x400,
            TypeFlag::Gemini => 0x800,
            TypeFlag::Tuner => 0x1000,
            TypeFlag::Synchro => 0x2000,
            TypeFlag::Token => 0x4000,
            TypeFlag::Maximum => 0x8000,
            TypeFlag::QuickPlay => 0x10000,
            TypeFlag::Continuous => 0x20000,
            TypeFlag::Equip => 0x40000,
            TypeFlag::Field => 0x80000,
            TypeFlag::Counter => 0x100000,
            TypeFlag::Flip => 0x200000,
            TypeFlag::Toon => 0x400000,
            TypeFlag::Xyz => 0x800000,
            TypeFlag::Pendulum => 0x1000000,
            TypeFlag::SpecialSummon => 0x2000000,
            TypeFlag::Link => 0x4000000,
        }
    }

    /// Upper-case name as used by card scripts (`TYPE_` prefix omitted)
    pub const fn name(self) -> &'static str {
        match self {
            TypeFlag::Monster => "MONSTER",
            TypeFlag::Spell => "SPELL",
            TypeFlag::Trap => "TRAP",
            TypeFlag::Normal => "NORMAL",
            TypeFlag::Effect => "EFFECT",
            TypeFlag::Fusion => "FUSION",
            TypeFlag::Ritual => "RITUAL",
            TypeFlag::TrapMonster => "TRAPMONSTER",
            TypeFlag::Spirit => "SPIRIT",
            TypeFlag::Union => "UNION",
            TypeFlag::Gemini => "GEMINI",
            TypeFlag::Tuner => "TUNER",
            TypeFlag::Synchro => "SYNCHRO",
            TypeFlag::Token => "TOKEN",
            TypeFlag::Maximum => "MAXIMUM",
            TypeFlag::QuickPlay => "QUICKPLAY",
            TypeFlag::Continuous => "CONTINUOUS",
            TypeFlag::Equip => "EQUIP",
            TypeFlag::Field => "FIELD",
            TypeFlag::Counter => "COUNTER",
            TypeFlag::Flip => "FLIP",
            TypeFlag::Toon => "TOON",
            TypeFlag::Xyz => "XYZ",
            TypeFlag::Pendulum => "PENDULUM",
            TypeFlag::SpecialSummon => "SPSUMMON",
            TypeFlag::Link => "LINK",
        }
    }
}

impl fmt::Display for TypeFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const KNOWN_BITS: u32 = {
    let mut bits = 0;
    let mut i = 0;
    while i < TypeFlag::ALL.len() {
        bits |= TypeFlag::ALL[i].mask();
        i += 1;
    }
    bits
};

/// Decoded set of type flags for one card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeFlags(u32);

impl TypeFlags {
    /// Decode a raw type field, ignoring unknown bits
    pub const fn from_bits(raw: u32) -> Self {
        TypeFlags(raw & KNOWN_BITS)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, flag: TypeFlag) -> bool {
        self.0 & flag.mask() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Flags present, in mask order
    pub fn iter(self) -> impl Iterator<Item = TypeFlag> {
        TypeFlag::ALL.into_iter().filter(move |flag| self.contains(*flag))
    }

    pub fn to_vec(self) -> SmallVec<[TypeFlag; 8]> {
        self.iter().collect()
    }

    /// Fusion, Synchro, XYZ and Link monsters belong in the extra deck
    pub fn is_extra_deck(self) -> bool {
        TypeFlag::EXTRA_DECK.iter().any(|flag| self.contains(*flag))
    }
}

impl FromIterator<TypeFlag> for TypeFlags {
    fn from_iter<I: IntoIterator<Item = TypeFlag>>(iter: I) -> Self {
        TypeFlags(iter.into_iter().fold(0, |bits, flag| bits | flag.mask()))
    }
}

impl fmt::Display for TypeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.iter().map(TypeFlag::name).collect();
        write!(f, "{}", names.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_are_distinct_single_bits() {
        let mut seen = 0u32;
        for flag in TypeFlag::ALL {
            assert_eq!(flag.mask().count_ones(), 1, "{flag} is not a single bit");
            assert_eq!(seen & flag.mask(), 0, "{flag} overlaps another mask");
            seen |= flag.mask();
        }
        assert_eq!(seen, KNOWN_BITS);
    }

    #[test]
    fn test_decode_effect_monster() {
        // Pot of Greed is a normal spell: 0x2
        let spell = TypeFlags::from_bits(0x2);
        assert_eq!(spell.to_vec().as_slice(), &[TypeFlag::Spell]);

        // Effect tuner monster: 0x1 | 0x20 | 0x1000
        let flags = TypeFlags::from_bits(0x1021);
        assert!(flags.contains(TypeFlag::Monster));
        assert!(flags.contains(TypeFlag::Effect));
        assert!(flags.contains(TypeFlag::Tuner));
        assert!(!flags.contains(TypeFlag::Synchro));
        assert!(!flags.is_extra_deck());
    }

    #[test]
    fn test_extra_deck_types() {
        for flag in TypeFlag::EXTRA_DECK {
            let flags = TypeFlags::from_bits(TypeFlag::Monster.mask() | flag.mask());
            assert!(flags.is_extra_deck(), "{flag} should be extra deck");
        }
        let pendulum = TypeFlags::from_bits(0x1 | 0x20 | 0x1000000);
        assert!(!pendulum.is_extra_deck());
    }

    #[test]
    fn test_unknown_bits_ignored() {
        let flags = TypeFlags::from_bits(0x8 | 0x8000_0000 | 0x1);
        assert_eq!(flags.bits(), 0x1);
        assert_eq!(flags.to_string(), "MONSTER");
    }

    #[test]
    fn test_from_iterator() {
        let flags: TypeFlags = [TypeFlag::Monster, TypeFlag::Xyz].into_iter().collect();
        assert_eq!(flags.bits(), 0x800001);
        assert_eq!(flags.to_string(), "MONSTER|XYZ");
    }
}
