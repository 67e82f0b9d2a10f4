use std::fs;

use unblock_jam_core::LevelIndex;
use unblock_jam_scores::{
    BlobStore, FileBlobStore, MemoryBlobStore, ScoreStore, StoreError, STATS_KEY,
};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1_442_695_040_888_963_407;

fn next_random(state: &mut u64) -> u64 {
    *state = state.wrapping_mul(RNG_MULTIPLIER).wrapping_add(RNG_INCREMENT);
    *state >> 33
}

#[test]
fn fresh_store_has_no_scores() {
    let store = ScoreStore::new(MemoryBlobStore::new());
    let book = store.stats().expect("stats");
    assert!(book.is_empty());
    assert_eq!(book.best_score(LevelIndex::new(0)), None);
}

#[test]
fn only_lower_scores_replace_the_best() {
    let mut store = ScoreStore::new(MemoryBlobStore::new());
    let level = LevelIndex::new(3);

    assert!(store.update_best_score(level, 12).expect("first"));
    assert!(!store.update_best_score(level, 15).expect("worse"));
    assert!(!store.update_best_score(level, 12).expect("equal"));
    assert!(store.update_best_score(level, 9).expect("better"));

    let book = store.stats().expect("stats");
    assert_eq!(book.best_score(level), Some(9));
    assert!(book.is_completed(level));
    assert!(!book.is_completed(LevelIndex::new(4)));
}

#[test]
fn best_scores_never_increase_over_random_updates() {
    let mut store = ScoreStore::new(MemoryBlobStore::new());
    let mut rng_state = 0x5c0e_u64;
    let mut best = [None::<u32>; 4];

    for _ in 0..400 {
        let slot = (next_random(&mut rng_state) % best.len() as u64) as usize;
        let score = 1 + (next_random(&mut rng_state) % 50) as u32;
        let level = LevelIndex::new(slot as u32);

        let changed = store.update_best_score(level, score).expect("update");
        let expected = best[slot].map_or(true, |current| score < current);
        assert_eq!(changed, expected, "update {slot} -> {score}");
        if expected {
            best[slot] = Some(score);
        }

        let book = store.stats().expect("stats");
        for (index, stored) in best.iter().enumerate() {
            assert_eq!(book.best_score(LevelIndex::new(index as u32)), *stored);
        }
    }
}

#[test]
fn stored_blob_uses_index_keyed_json_map() {
    let mut store = ScoreStore::new(MemoryBlobStore::new());
    let _ = store.update_best_score(LevelIndex::new(0), 7).expect("write");
    let _ = store.update_best_score(LevelIndex::new(11), 20).expect("write");

    let blob = store.store().get(STATS_KEY).expect("get").expect("blob");
    let value: serde_json::Value = serde_json::from_slice(&blob).expect("json");
    assert_eq!(
        value,
        serde_json::json!({ "0": { "bestScore": 7 }, "11": { "bestScore": 20 } })
    );
}

#[test]
fn corrupt_blob_reads_as_empty_and_is_replaced() {
    let mut blobs = MemoryBlobStore::new();
    blobs.put(STATS_KEY, b"{ definitely not json").expect("seed");
    let mut store = ScoreStore::new(blobs);

    assert!(store.stats().expect("stats").is_empty());
    assert!(store.update_best_score(LevelIndex::new(1), 5).expect("update"));
    assert_eq!(
        store.stats().expect("stats").best_score(LevelIndex::new(1)),
        Some(5)
    );
}

#[test]
fn file_store_persists_across_instances() {
    let dir = tempfile::tempdir().expect("temp dir");

    let mut first = ScoreStore::new(FileBlobStore::new(dir.path()));
    assert!(first.update_best_score(LevelIndex::new(2), 14).expect("write"));

    let second = ScoreStore::new(FileBlobStore::new(dir.path()));
    assert_eq!(
        second.stats().expect("stats").best_score(LevelIndex::new(2)),
        Some(14)
    );

    let file = dir.path().join("level_stats").join("level_stats_map.json");
    assert!(file.is_file());
    assert!(!file.with_extension("tmp").exists());
}

#[test]
fn file_store_reports_unwritable_root() {
    let dir = tempfile::tempdir().expect("temp dir");
    let blocker = dir.path().join("occupied");
    fs::write(&blocker, b"not a directory").expect("write blocker");

    let mut store = ScoreStore::new(FileBlobStore::new(&blocker));
    let error = store
        .update_best_score(LevelIndex::new(0), 3)
        .expect_err("root is a file");
    assert!(matches!(error, StoreError::Io { .. }));
}
