//! Round trips over the sample decks in `test_decks/`
//!
//! One test is generated per `.ydk` file by `dir-test`; drop a new file in
//! `test_decks/` to cover it. Every card in those files must be present in
//! [`directory`] below.

use deckforge_rs::codec::{DeckCodec, JsonCodec, NameListCodec, OmegaCodec, YdkCodec, YdkeCodec};
use deckforge_rs::directory::CardRecord;
use deckforge_rs::{CardDirectory, Zone};
use dir_test::{dir_test, Fixture};
use similar_asserts::assert_eq;
use std::sync::Arc;

fn directory() -> Arc<CardDirectory> {
    let cards = || {
        vec![
            CardRecord::new(55144522, "Pot of Greed", 0x2),
            CardRecord::new(14558127, "Ash Blossom & Joyous Spring", 0x1021),
            CardRecord::new(24224830, "Called by the Grave", 0x10002),
            CardRecord::new(1861629, "Decode Talker", 0x4000021),
            CardRecord::new(86066372, "Accesscode Talker", 0x4000021),
        ]
    };
    CardDirectory::from_records(cards(), cards())
}

#[dir_test(
    dir: "$CARGO_MANIFEST_DIR/test_decks",
    glob: "**/*.ydk",
)]
fn test_ydk_fixture_round_trips(fixture: Fixture<&str>) {
    let path = fixture.path();
    let deck = YdkCodec.decode(fixture.content()).unwrap();
    assert!(!deck.is_empty(), "{path} decoded to an empty deck");

    let ydk = YdkCodec.encode(&deck).unwrap();
    assert_eq!(YdkCodec.decode(&ydk).unwrap(), deck, "{path} via ydk");

    let json = JsonCodec.encode(&deck).unwrap();
    let via_json = YdkCodec
        .encode(&JsonCodec.decode(&json).unwrap())
        .unwrap();
    assert_eq!(via_json, ydk, "{path} via json");

    let uri = YdkeCodec.encode(&deck).unwrap();
    assert_eq!(YdkeCodec.decode(&uri).unwrap(), deck, "{path} via ydke");

    let directory = directory();
    let omega = OmegaCodec::new(&directory);
    assert_eq!(
        omega.decode(&omega.encode(&deck).unwrap()).unwrap(),
        deck,
        "{path} via omega"
    );

    let names = NameListCodec::new(&directory);
    let via_names = names.decode(&names.encode(&deck).unwrap()).unwrap();
    for zone in Zone::ALL {
        let mut expected = deck.zone(zone).to_vec();
        let mut actual = via_names.zone(zone).to_vec();
        expected.sort();
        actual.sort();
        assert_eq!(actual, expected, "{path} via namelist, zone {zone}");
    }
}
