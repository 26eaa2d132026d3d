use super::RecordingStore;
use chrono::{Local, TimeZone, Timelike};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn temp_root(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    let seq = DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "soundtrap-{label}-{}-{nanos}-{seq}",
        process::id()
    ))
}

fn temp_store(label: &str) -> RecordingStore {
    let store = RecordingStore::new(temp_root(label), 44_100);
    store.ensure_dir().expect("create temp store dir");
    store
}

#[test]
fn chunk_path_formats_local_timestamp() {
    let store = RecordingStore::new("audio", 44_100);
    let at = Local.with_ymd_and_hms(2024, 8, 29, 14, 5, 9).unwrap();
    assert_eq!(
        store.chunk_path(at),
        PathBuf::from("audio/08-29_14h-05m-09s.wav")
    );
}

#[test]
fn chunk_path_ignores_subsecond_precision() {
    let store = RecordingStore::new("audio", 44_100);
    let at = Local.with_ymd_and_hms(2024, 8, 29, 14, 5, 9).unwrap();
    let later = at.with_nanosecond(900_000_000).unwrap();
    assert_eq!(store.chunk_path(at), store.chunk_path(later));
}

#[test]
fn chunk_paths_one_second_apart_sort_lexically() {
    let store = RecordingStore::new("audio", 44_100);
    let first = store.chunk_path(Local.with_ymd_and_hms(2024, 8, 29, 14, 5, 9).unwrap());
    let second = store.chunk_path(Local.with_ymd_and_hms(2024, 8, 29, 14, 5, 10).unwrap());
    assert_ne!(first, second);
    assert!(first < second);
}

#[test]
fn saved_chunk_round_trips() {
    let store = temp_store("roundtrip");
    let samples = vec![0.25f32; 1024];
    let path = store.root().join("08-29_10h-00m-00s.wav");

    store.save(&path, &samples).expect("save chunk");
    let (loaded, rate) = RecordingStore::load(&path).expect("load chunk");

    assert_eq!(rate, 44_100);
    assert_eq!(loaded.len(), samples.len());
    assert!((loaded[0] - 0.25).abs() < 1e-6);

    let _ = std::fs::remove_dir_all(store.root());
}

#[test]
fn list_returns_sorted_regular_files_only() {
    let store = temp_store("list");
    store
        .save(&store.root().join("08-29_10h-00m-01s.wav"), &[0.1])
        .unwrap();
    store
        .save(&store.root().join("08-29_10h-00m-00s.wav"), &[0.1])
        .unwrap();
    std::fs::create_dir(store.root().join("not-a-file")).unwrap();

    let names = store.list().expect("list recordings");
    assert_eq!(
        names,
        vec![
            "08-29_10h-00m-00s.wav".to_string(),
            "08-29_10h-00m-01s.wav".to_string()
        ]
    );

    let _ = std::fs::remove_dir_all(store.root());
}

#[test]
fn resolve_rejects_missing_and_escaping_names() {
    let store = temp_store("resolve");
    store
        .save(&store.root().join("08-29_10h-00m-00s.wav"), &[0.1])
        .unwrap();

    assert!(store.resolve("08-29_10h-00m-00s.wav").is_some());
    assert!(store.resolve("nope.wav").is_none());
    assert!(store.resolve("").is_none());
    assert!(store.resolve("../etc/passwd").is_none());
    assert!(store.resolve("sub/dir.wav").is_none());
    assert!(store.resolve("..").is_none());

    let _ = std::fs::remove_dir_all(store.root());
}

#[test]
fn save_overwrites_same_second_collision() {
    let store = temp_store("collision");
    let path = store.root().join("08-29_10h-00m-00s.wav");

    store.save(&path, &[0.1f32; 10]).unwrap();
    store.save(&path, &[0.2f32; 20]).unwrap();

    let (loaded, _) = RecordingStore::load(&path).unwrap();
    assert_eq!(loaded.len(), 20);
    assert!((loaded[0] - 0.2).abs() < 1e-6);

    let _ = std::fs::remove_dir_all(store.root());
}
