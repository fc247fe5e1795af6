//! CSV catalog import
//!
//! Accepts the chart-export layout (`track_name`, `artist(s)_name`, ...) and
//! fills every field the export lacks with placeholders.

use cascade_core::types::{Provider, Song, SongId, DEFAULT_DURATION_MS};
use std::collections::HashMap;

const TITLE_COLUMN: &str = "track_name";
const ARTISTS_COLUMN: &str = "artist(s)_name";
const REQUIRED_COLUMNS: [&str; 2] = [TITLE_COLUMN, ARTISTS_COLUMN];

/// Statistics for one CSV import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Data rows seen (header excluded)
    pub rows: usize,

    /// Rows turned into songs
    pub imported: usize,

    /// Rows skipped as malformed
    pub skipped: usize,
}

/// Result of parsing a CSV catalog
#[derive(Debug, Clone, Default)]
pub struct CsvImport {
    pub songs: Vec<Song>,
    pub stats: ImportStats,
}

/// Split CSV text into records
///
/// Handles quoted fields (with `""` escapes and embedded newlines) and both LF
/// and CRLF line endings. Blank lines produce no record.
pub fn parse_records(data: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = data.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                record.push(std::mem::take(&mut field));
                if record.len() == 1 && record[0].is_empty() {
                    record.clear();
                } else {
                    records.push(std::mem::take(&mut record));
                }
            }
            _ => field.push(c),
        }
    }

    // Last record when the file has no trailing newline
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    records
}

/// Parse CSV text into songs
///
/// Returns an empty import (and logs an error) when the header lacks a
/// required column. Individual bad rows are skipped with a warning.
pub fn parse_songs(data: &str) -> CsvImport {
    let mut records = parse_records(data).into_iter();

    let Some(header) = records.next() else {
        return CsvImport::default();
    };

    let columns: HashMap<String, usize> = header
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim().trim_start_matches('\u{feff}').to_string(), i))
        .collect();

    if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !columns.contains_key(**c)) {
        tracing::error!(
            "CSV catalog is missing required column '{}' (required: {:?})",
            missing,
            REQUIRED_COLUMNS
        );
        return CsvImport::default();
    }

    let row_reader = RowReader {
        columns: &columns,
        width: header.len(),
    };

    let mut import = CsvImport::default();
    for (index, row) in records.enumerate() {
        import.stats.rows += 1;
        // +2: one for the header, one for 1-based line numbers
        let line = index + 2;

        match row_reader.song(index, &row) {
            Ok(song) => {
                import.songs.push(song);
                import.stats.imported += 1;
            }
            Err(reason) => {
                tracing::warn!("Skipping CSV row {}: {}", line, reason);
                import.stats.skipped += 1;
            }
        }
    }

    tracing::debug!(
        "Parsed CSV catalog: {} rows, {} imported, {} skipped",
        import.stats.rows,
        import.stats.imported,
        import.stats.skipped
    );

    import
}

struct RowReader<'a> {
    columns: &'a HashMap<String, usize>,
    width: usize,
}

impl RowReader<'_> {
    fn field<'r>(&self, row: &'r [String], name: &str) -> Option<&'r str> {
        self.columns
            .get(name)
            .and_then(|&i| row.get(i))
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    fn song(&self, index: usize, row: &[String]) -> Result<Song, String> {
        if row.len() < self.width {
            return Err(format!(
                "expected {} fields, found {}",
                self.width,
                row.len()
            ));
        }

        let title = self
            .field(row, TITLE_COLUMN)
            .ok_or_else(|| format!("missing {}", TITLE_COLUMN))?;

        let artists: Vec<String> = self
            .field(row, ARTISTS_COLUMN)
            .map(|value| {
                value
                    .split(',')
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if artists.is_empty() {
            return Err(format!("missing {}", ARTISTS_COLUMN));
        }

        let mut song = Song::new(SongId::new(format!("{}-{}", title, index)), title, artists);
        song.provider = Provider::Csv;
        song.cover_url = format!(
            "https://placehold.co/128x128?text={}",
            urlencoding::encode(title)
        );

        if let Some(album) = self.field(row, "album") {
            song.album = album.to_string();
        }
        song.duration_ms = self
            .field(row, "duration_ms")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_DURATION_MS);
        if let Some(url) = self.field(row, "audio_url") {
            song.audio_url = url.to_string();
        }
        if let Some(url) = self.field(row, "cover_url") {
            song.cover_url = url.to_string();
        }
        if let Some(provider) = self.field(row, "provider") {
            song.provider = Provider::from(provider);
        }
        song.explicit = self
            .field(row, "explicit")
            .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "yes"));
        if let Some(tags) = self.field(row, "tags") {
            song.tags = tags
                .split(';')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
        }
        song.release_date = self.release_date(row);

        Ok(song)
    }

    /// `release_date` column, or `released_year`/`_month`/`_day` as an ISO date
    fn release_date(&self, row: &[String]) -> String {
        if let Some(date) = self.field(row, "release_date") {
            return date.to_string();
        }

        let part = |name: &str| self.field(row, name).and_then(|v| v.parse::<u32>().ok());
        match (
            part("released_year"),
            part("released_month"),
            part("released_day"),
        ) {
            (Some(y), Some(m), Some(d)) => format!("{:04}-{:02}-{:02}", y, m, d),
            (Some(y), _, _) => format!("{:04}", y),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_handle_quotes_and_crlf() {
        let data = "a,b\r\n\"x, y\",\"say \"\"hi\"\"\"\r\n";
        let records = parse_records(data);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], vec!["x, y", "say \"hi\""]);
    }

    #[test]
    fn records_keep_newlines_inside_quotes() {
        let records = parse_records("a\n\"line1\nline2\"\n");
        assert_eq!(records[1], vec!["line1\nline2"]);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let records = parse_records("a,b\n\n1,2\n\n");
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn last_record_without_trailing_newline() {
        let records = parse_records("a,b\n1,2");
        assert_eq!(records[1], vec!["1", "2"]);
    }

    #[test]
    fn missing_required_column_yields_empty_import() {
        let import = parse_songs("track_name,album\nSong,Album\n");
        assert!(import.songs.is_empty());
        assert_eq!(import.stats, ImportStats::default());
    }

    #[test]
    fn ids_use_title_and_row_index() {
        let import = parse_songs("track_name,artist(s)_name\nA,X\nB,Y\n");
        let ids: Vec<_> = import.songs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["A-0", "B-1"]);
    }

    #[test]
    fn artists_are_split_and_trimmed() {
        let import = parse_songs("track_name,artist(s)_name\nSong,\"Alpha , Beta,\"\n");
        assert_eq!(import.songs[0].artists, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn malformed_rows_are_skipped_and_counted() {
        let data = "track_name,artist(s)_name,streams\n\
                    Good,Artist,10\n\
                    Short,Artist\n\
                    ,Artist,3\n\
                    NoArtist,,4\n";
        let import = parse_songs(data);

        assert_eq!(import.songs.len(), 1);
        assert_eq!(import.songs[0].title, "Good");
        assert_eq!(
            import.stats,
            ImportStats {
                rows: 4,
                imported: 1,
                skipped: 3
            }
        );
    }

    #[test]
    fn placeholders_fill_missing_metadata() {
        let import = parse_songs("track_name,artist(s)_name\nHello World,Someone\n");
        let song = &import.songs[0];
        assert_eq!(song.album, "Unknown Album");
        assert_eq!(song.duration_ms, DEFAULT_DURATION_MS);
        assert_eq!(song.provider, Provider::Csv);
        assert_eq!(
            song.cover_url,
            "https://placehold.co/128x128?text=Hello%20World"
        );
        assert!(song.audio_url.is_empty());
    }

    #[test]
    fn optional_columns_are_honoured() {
        let data = "track_name,artist(s)_name,duration_ms,audio_url,explicit,tags,released_year,released_month,released_day\n\
                    Song,Artist,215000,https://cdn.example/a.mp3,true,pop;dance,2023,7,14\n";
        let song = &parse_songs(data).songs[0];

        assert_eq!(song.duration_ms, 215_000);
        assert_eq!(song.audio_url, "https://cdn.example/a.mp3");
        assert!(song.explicit);
        assert_eq!(song.tags, vec!["pop", "dance"]);
        assert_eq!(song.release_date, "2023-07-14");
    }
}
