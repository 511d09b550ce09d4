// Schema normalizer - Turns an arbitrary site table into site records
use crate::domain::site::SiteRecord;
use crate::domain::table::Table;
use crate::error::{MapError, Result};
use std::collections::BTreeMap;

const NAME_COLUMN: &str = "name";
const NAME_ALTERNATES: &[&str] = &["site_name", "site", "location"];
const LAT_COLUMN: &str = "lat";
const LON_COLUMN: &str = "lon";
const LAT_LONG_FORM: &str = "latitude";
const LON_LONG_FORM: &str = "longitude";

pub fn normalize_column_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalized header: names after trimming and lower-casing, with later
/// duplicates blanked out so the first occurrence wins.
fn normalized_columns(table: &Table) -> Vec<Option<String>> {
    let mut seen = Vec::new();
    table
        .columns
        .iter()
        .map(|raw| {
            let name = normalize_column_name(raw);
            if seen.contains(&name) {
                tracing::warn!("Duplicate column '{}' after normalization, keeping the first", name);
                None
            } else {
                seen.push(name.clone());
                Some(name)
            }
        })
        .collect()
}

fn position_of(columns: &[Option<String>], name: &str) -> Option<usize> {
    columns.iter().position(|c| c.as_deref() == Some(name))
}

/// Locate a coordinate column, preferring the short form over the long form.
fn coordinate_column(
    columns: &mut [Option<String>],
    short: &'static str,
    long: &'static str,
) -> Result<usize> {
    match (position_of(columns, short), position_of(columns, long)) {
        (Some(idx), Some(_)) => {
            tracing::warn!(
                "Both '{}' and '{}' columns present; using '{}' and keeping '{}' as an extra field",
                short, long, short, long
            );
            Ok(idx)
        }
        (Some(idx), None) => Ok(idx),
        (None, Some(idx)) => {
            columns[idx] = Some(short.to_string());
            Ok(idx)
        }
        (None, None) => Err(MapError::missing_column(short, &[short, long])),
    }
}

fn name_column(columns: &mut [Option<String>]) -> Option<usize> {
    if let Some(idx) = position_of(columns, NAME_COLUMN) {
        return Some(idx);
    }

    for alt in NAME_ALTERNATES {
        if let Some(idx) = position_of(columns, alt) {
            tracing::info!("Using '{}' column as site name", alt);
            columns[idx] = Some(NAME_COLUMN.to_string());
            return Some(idx);
        }
    }

    tracing::warn!("No name column found, sites will be named by row number");
    None
}

fn parse_coordinate(text: &str, row: usize, column: &'static str) -> Result<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| MapError::InvalidCoordinate {
            row,
            column,
            value: text.to_string(),
        })
}

/// Build one site record per table row.
///
/// Rows are numbered from 1 both in synthesized names and in error messages.
pub fn normalize_sites(table: &Table) -> Result<Vec<SiteRecord>> {
    let mut columns = normalized_columns(table);

    let name_idx = name_column(&mut columns);
    let lat_idx = coordinate_column(&mut columns, LAT_COLUMN, LAT_LONG_FORM)?;
    let lon_idx = coordinate_column(&mut columns, LON_COLUMN, LON_LONG_FORM)?;

    let mut sites = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let row_number = row + 1;

        let name = name_idx
            .and_then(|idx| table.cell(row, idx))
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Site {}", row_number));

        let lat_text = table.cell(row, lat_idx).unwrap_or("").trim();
        let lon_text = table.cell(row, lon_idx).unwrap_or("").trim();
        let lat = parse_coordinate(lat_text, row_number, LAT_COLUMN)?;
        let lon = parse_coordinate(lon_text, row_number, LON_COLUMN)?;

        let mut fields = BTreeMap::new();
        for (idx, column) in columns.iter().enumerate() {
            if Some(idx) == name_idx || idx == lat_idx || idx == lon_idx {
                continue;
            }
            if let (Some(column), Some(value)) = (column, table.cell(row, idx)) {
                fields.insert(column.clone(), value.to_string());
            }
        }

        sites.push(
            SiteRecord::new(name, lat, lon, fields).with_coordinate_text(lat_text, lon_text),
        );
    }

    tracing::debug!("Normalized {} site records", sites.len());
    Ok(sites)
}
