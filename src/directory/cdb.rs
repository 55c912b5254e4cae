//! Reading card rows out of `.cdb` files
//!
//! A `.cdb` is an SQLite database with a `texts` table (names, card text)
//! and a `datas` table (stats, type bits) keyed by the same card id.

use crate::core::CardName;
use crate::directory::record::CardRecord;
use crate::Result;
use rusqlite::{params, Connection, OpenFlags, Row};
use std::path::Path;

const SELECT_CARDS: &str = "
    SELECT
        texts.id,
        texts.name,
        texts.desc,
        datas.ot,
        datas.alias,
        datas.setcode,
        datas.type,
        datas.atk,
        datas.def,
        datas.level,
        datas.race,
        datas.attribute,
        datas.category
    FROM texts
    INNER JOIN datas ON datas.id = texts.id";

/// Read every card in a `.cdb` file
pub fn read_records(path: &Path) -> Result<Vec<CardRecord>> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    let mut stmt = conn.prepare(SELECT_CARDS)?;
    let rows = stmt.query_map([], record_from_row)?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }
    Ok(records)
}

// Integer columns are SQLite INTEGER (i64); narrowing keeps the low bits the
// same way the game client reads them.
fn record_from_row(row: &Row<'_>) -> rusqlite::Result<CardRecord> {
    Ok(CardRecord {
        id: row.get::<_, i64>(0)? as u32,
        name: CardName::new(row.get::<_, Option<String>>(1)?.unwrap_or_default()),
        desc: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        ot: row.get::<_, i64>(3)? as u32,
        alias: row.get::<_, i64>(4)? as u32,
        setcode: row.get::<_, i64>(5)? as u64,
        type_bits: row.get::<_, i64>(6)? as u32,
        atk: row.get::<_, i64>(7)? as i32,
        def: row.get::<_, i64>(8)? as i32,
        level: row.get::<_, i64>(9)? as u32,
        race: row.get::<_, i64>(10)? as u32,
        attribute: row.get::<_, i64>(11)? as u32,
        category: row.get::<_, i64>(12)? as u64,
    })
}

/// Write records into a new `.cdb` file with the standard two-table schema
///
/// Used to build offline snapshots and test fixtures.
pub fn write_records(path: &Path, records: &[CardRecord]) -> Result<()> {
    let mut conn = Connection::open(path)?;
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS datas (
            id INTEGER PRIMARY KEY,
            ot INTEGER, alias INTEGER, setcode INTEGER, type INTEGER,
            atk INTEGER, def INTEGER, level INTEGER, race INTEGER,
            attribute INTEGER, category INTEGER
        );
        CREATE TABLE IF NOT EXISTS texts (
            id INTEGER PRIMARY KEY,
            name TEXT, desc TEXT
        );",
    )?;

    let tx = conn.transaction()?;
    {
        let mut datas = tx.prepare(
            "INSERT OR REPLACE INTO datas VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )?;
        let mut texts = tx.prepare("INSERT OR REPLACE INTO texts VALUES (?1, ?2, ?3)")?;
        for card in records {
            datas.execute(params![
                card.id,
                card.ot,
                card.alias,
                card.setcode as i64,
                card.type_bits,
                card.atk,
                card.def,
                card.level,
                card.race,
                card.attribute,
                card.category as i64,
            ])?;
            texts.execute(params![card.id, card.name.as_str(), card.desc])?;
        }
    }
    tx.commit()?;
    Ok(())
}
