// CSV adapter for the tabular file primitive
use crate::application::repositories::TableRepository;
use crate::domain::table::Table;
use crate::error::{MapError, Result};
use crate::infrastructure::config::TextEncoding;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct CsvTableRepository {
    encoding: TextEncoding,
}

impl CsvTableRepository {
    pub fn new(encoding: TextEncoding) -> Self {
        Self { encoding }
    }

    fn decode(&self, bytes: &[u8]) -> String {
        match self.encoding {
            TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            TextEncoding::Latin1 => decode_windows_1252(bytes),
            TextEncoding::Auto => match std::str::from_utf8(bytes) {
                Ok(text) => text.to_string(),
                Err(_) => decode_windows_1252(bytes),
            },
        }
    }
}

/// Spreadsheet exports labelled Latin-1 are in practice Windows-1252.
fn decode_windows_1252(bytes: &[u8]) -> String {
    encoding_rs::WINDOWS_1252
        .decode_without_bom_handling(bytes)
        .0
        .into_owned()
}

impl TableRepository for CsvTableRepository {
    fn read_table(&self, path: &Path) -> Result<Table> {
        let read_error = |source: csv::Error| MapError::TableRead {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(read_error)?;

        let columns: Vec<String> = reader
            .byte_headers()
            .map_err(read_error)?
            .iter()
            .map(|field| self.decode(field))
            .collect();

        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in reader.byte_records() {
            let record = record.map_err(read_error)?;
            rows.push(record.iter().map(|field| self.decode(field)).collect());
        }

        tracing::debug!("Read {} rows from {}", rows.len(), path.display());
        Ok(Table::new(columns, rows))
    }

    fn write_table(&self, path: &Path, table: &Table) -> Result<()> {
        let write_error = |source: csv::Error| MapError::TableWrite {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(write_error)?;

        writer.write_record(&table.columns).map_err(write_error)?;
        for row in &table.rows {
            writer.write_record(row).map_err(write_error)?;
        }
        writer
            .flush()
            .map_err(|e| write_error(csv::Error::from(e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_utf8_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sites.csv");
        fs::write(
            &path,
            "Name,Lat,Lon,photos\nRivière,49.1,-62.0,\"a.jpg, b.jpg\"\nShort,1,2\n",
        )
        .unwrap();

        let table = CsvTableRepository::default().read_table(&path).unwrap();
        assert_eq!(table.columns, vec!["Name", "Lat", "Lon", "photos"]);
        assert_eq!(table.rows[0], vec!["Rivière", "49.1", "-62.0", "a.jpg, b.jpg"]);
        assert_eq!(table.rows[1], vec!["Short", "1", "2"]);
    }

    #[test]
    fn test_auto_falls_back_to_latin1() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sites.csv");
        // "Baie-Sainte-Cl\xe9ment" in Latin-1
        let mut bytes = b"name,lat,lon\nBaie-Sainte-Cl".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"ment,49.2,-61.9\n");
        fs::write(&path, bytes).unwrap();

        let table = CsvTableRepository::new(TextEncoding::Auto)
            .read_table(&path)
            .unwrap();
        assert_eq!(table.rows[0][0], "Baie-Sainte-Clément");
    }

    #[test]
    fn test_windows_1252_punctuation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sites.csv");
        // "l\x92anse" with a cp1252 right single quote
        let mut bytes = b"name,lat,lon\nl".to_vec();
        bytes.push(0x92);
        bytes.extend_from_slice(b"anse,49.3,-62.0\n");
        fs::write(&path, bytes).unwrap();

        for encoding in [TextEncoding::Auto, TextEncoding::Latin1] {
            let table = CsvTableRepository::new(encoding).read_table(&path).unwrap();
            assert_eq!(table.rows[0][0], "l\u{2019}anse");
        }
    }

    #[test]
    fn test_missing_table_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvTableRepository::default()
            .read_table(&dir.path().join("nope.csv"))
            .unwrap_err();
        assert!(matches!(err, MapError::TableRead { .. }));
    }

    #[test]
    fn test_write_then_read_keeps_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let table = Table::new(
            vec!["name".to_string(), "photos".to_string()],
            vec![vec!["A".to_string(), "x,y".to_string()]],
        );

        let repo = CsvTableRepository::new(TextEncoding::Utf8);
        repo.write_table(&path, &table).unwrap();
        assert_eq!(repo.read_table(&path).unwrap(), table);
    }
}
