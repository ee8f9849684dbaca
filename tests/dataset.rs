use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ipl_terminal::dataset::{DatasetCache, DatasetError, Season, load_dataset};

const HEADER: &str =
    "Season,Team,MatchID,Player,Runs,Wickets,Strike Rate,Economy Rate,Overs Bowled,AllRounder Score";

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn write_csv(path: &Path, rows: &[&str]) {
    let mut file = fs::File::create(path).expect("create csv");
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
}

#[test]
fn loads_fixture_records() {
    let data = load_dataset(&fixture_path("ipl_sample.csv")).expect("fixture should load");
    assert_eq!(data.len(), 10);
    let first = &data.records()[0];
    assert_eq!(first.season, Season::from("2020"));
    assert_eq!(first.team, "MI");
    assert_eq!(first.match_id, "1");
    assert_eq!(first.player, "Rohit");
    assert_eq!(first.runs, 50);
    assert_eq!(first.strike_rate, 125.0);
    assert_eq!(data.players(), ["Rohit", "Bumrah", "Jadeja", "Dhoni", "Kohli", "Chahal"]);
    assert_eq!(data.match_ids(), ["1", "2", "3"]);
    assert_eq!(data.teams(), ["MI", "CSK", "RCB"]);
}

#[test]
fn bundled_dataset_loads() {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("data");
    path.push("ipl_dataset.csv");
    let data = load_dataset(&path).expect("bundled dataset should load");
    assert!(!data.is_empty());
    assert_eq!(data.teams().len(), 4);
}

#[test]
fn missing_file_is_io_error() {
    let err = load_dataset(Path::new("/no/such/dir/ipl.csv")).unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }), "got {err}");
}

#[test]
fn cache_returns_same_table_until_file_changes() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("ipl.csv");
    write_csv(&path, &["2020,MI,1,Rohit,50,0,125.0,0.0,0.0,50"]);

    let mut cache = DatasetCache::new();
    let first = cache.get_or_load(&path).expect("first load");
    let second = cache.get_or_load(&path).expect("cached load");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.loads(), 1);

    write_csv(
        &path,
        &[
            "2020,MI,1,Rohit,50,0,125.0,0.0,0.0,50",
            "2020,MI,1,Bumrah,5,3,83.33,6.5,4.0,65",
        ],
    );
    let third = cache.get_or_load(&path).expect("reload after change");
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(third.len(), 2);
    assert_eq!(cache.loads(), 2);
    assert_eq!(first.len(), 1);
}

#[test]
fn cache_sees_same_length_edit_with_restored_mtime() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("ipl.csv");
    write_csv(&path, &["2020,MI,1,Rohit,50,0,125.0,0.0,0.0,50"]);
    let modified = fs::metadata(&path).unwrap().modified().unwrap();

    let mut cache = DatasetCache::new();
    let first = cache.get_or_load(&path).expect("first load");
    assert_eq!(first.records()[0].runs, 50);

    write_csv(&path, &["2020,MI,1,Rohit,90,0,125.0,0.0,0.0,50"]);
    fs::File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(modified)
        .unwrap();

    let second = cache.get_or_load(&path).expect("reload after edit");
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(second.records()[0].runs, 90);
    assert_eq!(cache.loads(), 2);
}

#[test]
fn failed_reload_keeps_previous_table() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("ipl.csv");
    write_csv(&path, &["2020,MI,1,Rohit,50,0,125.0,0.0,0.0,50"]);

    let mut cache = DatasetCache::new();
    let loaded = cache.get_or_load(&path).expect("first load");

    fs::write(&path, "Season,Team\n2020,MI\n").unwrap();
    let err = cache.get_or_load(&path).unwrap_err();
    assert!(matches!(err, DatasetError::MissingColumns { .. }), "got {err}");

    let current = cache.current().expect("previous entry kept");
    assert!(Arc::ptr_eq(&loaded, &current));
}

#[test]
fn malformed_row_reports_line() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("ipl.csv");
    write_csv(
        &path,
        &[
            "2020,MI,1,Rohit,50,0,125.0,0.0,0.0,50",
            "2020,MI,1,Bumrah,five,3,83.33,6.5,4.0,65",
        ],
    );
    match load_dataset(&path).unwrap_err() {
        DatasetError::Row { line, .. } => assert_eq!(line, 3),
        other => panic!("unexpected error: {other}"),
    }
}
