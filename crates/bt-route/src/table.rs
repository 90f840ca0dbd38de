//! Predefined line endpoints and their CSV loader.
//!
//! # CSV format
//!
//! One row per line.  Line keys must be unique.
//!
//! ```csv
//! line,origin_lat,origin_lon,destination_lat,destination_lon
//! 12,40.4168,-3.7038,40.4531,-3.6883
//! airport,40.4168,-3.7038,40.4936,-3.5668
//! ```
//!
//! Vehicles whose `line` appears in the table travel between that line's
//! fixed endpoints; everything else gets a synthesized destination.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use bt_core::{GeoPoint, LineId};

use crate::{RouteError, RouteResult};

// ── Types ─────────────────────────────────────────────────────────────────────

/// Fixed origin and destination for one line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineEndpoints {
    pub origin:      GeoPoint,
    pub destination: GeoPoint,
}

/// Lookup table from [`LineId`] to [`LineEndpoints`].
///
/// Backed by a `BTreeMap` so iteration order (used for round-robin line
/// assignment) is stable across runs.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    lines: BTreeMap<LineId, LineEndpoints>,
}

impl RouteTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Insert or replace a line, returning the previous endpoints.
    pub fn insert(&mut self, line: LineId, endpoints: LineEndpoints) -> Option<LineEndpoints> {
        self.lines.insert(line, endpoints)
    }

    #[inline]
    pub fn get(&self, line: &LineId) -> Option<&LineEndpoints> {
        self.lines.get(line)
    }

    /// Line keys in sorted order.
    pub fn lines(&self) -> impl Iterator<Item = &LineId> {
        self.lines.keys()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LineRecord {
    line:            String,
    origin_lat:      f64,
    origin_lon:      f64,
    destination_lat: f64,
    destination_lon: f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`RouteTable`] from a CSV file.
pub fn load_table_csv(path: &Path) -> RouteResult<RouteTable> {
    let file = std::fs::File::open(path)?;
    load_table_reader(file)
}

/// Like [`load_table_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or for tables embedded in
/// the binary.
pub fn load_table_reader<R: Read>(reader: R) -> RouteResult<RouteTable> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut table = RouteTable::empty();

    for (row_no, result) in csv_reader.deserialize::<LineRecord>().enumerate() {
        let row = result.map_err(|e| RouteError::Table(e.to_string()))?;

        let endpoints = LineEndpoints {
            origin:      GeoPoint::new(row.origin_lat, row.origin_lon),
            destination: GeoPoint::new(row.destination_lat, row.destination_lon),
        };
        if !endpoints.origin.is_finite() || !endpoints.destination.is_finite() {
            return Err(RouteError::Table(format!(
                "row {}: line {:?} has a non-finite coordinate",
                row_no + 1,
                row.line
            )));
        }

        let line = LineId::new(row.line);
        if table.insert(line.clone(), endpoints).is_some() {
            return Err(RouteError::Table(format!("duplicate line {line:?}")));
        }
    }

    Ok(table)
}
