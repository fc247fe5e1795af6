//! Catalog loading integration tests
//!
//! Loads catalogs from files on disk the way the server does at startup.

use cascade_catalog::{Catalog, CatalogFormat};
use cascade_core::{CascadeError, SongId};
use std::io::Write;
use tempfile::NamedTempFile;

// ===== Test Helpers =====

fn write_temp(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

const CHART_CSV: &str = "\
track_name,artist(s)_name,released_year,released_month,released_day,streams
Seven Nation Army,The White Stripes,2003,2,17,100
\"Hello, Goodbye\",The Beatles,1967,11,24,90
Bad Row
Flowers,Miley Cyrus,2023,1,12,80
";

// ===== CSV =====

#[test]
fn test_load_csv_by_extension() {
    let file = write_temp(".csv", CHART_CSV);
    let catalog = Catalog::load(file.path(), None).unwrap();

    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.songs()[1].title, "Hello, Goodbye");
    assert_eq!(catalog.songs()[1].release_date, "1967-11-24");

    // Row index counts the skipped row, so ids stay tied to file position
    assert!(catalog.get(&SongId::new("Flowers-3")).is_some());
}

#[test]
fn test_csv_continuation_order_matches_file_order() {
    let catalog = Catalog::from_csv_str(CHART_CSV);

    let first = &catalog.songs()[0];
    let next = catalog.next_after(&first.id).unwrap();
    assert_eq!(next.title, "Hello, Goodbye");
}

#[test]
fn test_csv_missing_required_column_loads_empty_catalog() {
    let file = write_temp(".csv", "title,artist\nA,B\n");
    let catalog = Catalog::load(file.path(), None).unwrap();
    assert!(catalog.is_empty());
}

// ===== JSON =====

#[test]
fn test_load_json_with_explicit_format() {
    let json = r#"[
        {"id":"a","title":"A","artists":["X"],"album":"Al","durationMs":1000,
         "coverUrl":"","audioUrl":"https://cdn.example/a.mp3",
         "recommendations":[{"songId":"b","score":0.7,"reasonShort":"similar energy"}]},
        {"id":"b","title":"B","artists":["Y"],"album":"Al","durationMs":1000,
         "coverUrl":"","audioUrl":"https://cdn.example/b.mp3"}
    ]"#;
    // Extension says nothing useful; the explicit format wins
    let file = write_temp(".data", json);
    let catalog = Catalog::load(file.path(), Some(CatalogFormat::Json)).unwrap();

    let a = catalog.get(&SongId::new("a")).unwrap();
    let recs = catalog.resolve_recommendations(a, 3);
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].id.as_str(), "b");
}

#[test]
fn test_invalid_json_is_a_serialization_error() {
    let file = write_temp(".json", "{ not json");
    let err = Catalog::load(file.path(), None).unwrap_err();
    assert!(matches!(err, CascadeError::Serialization(_)));
}

// ===== Errors =====

#[test]
fn test_unknown_extension_without_format_fails() {
    let file = write_temp(".txt", CHART_CSV);
    let err = Catalog::load(file.path(), None).unwrap_err();
    assert!(matches!(err, CascadeError::Catalog(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Catalog::load(&dir.path().join("absent.csv"), None).unwrap_err();
    assert!(matches!(err, CascadeError::Io(_)));
}
