//! Classification scenarios over trees built with the real pipeline.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use dupecache::actions::{classify, SortContext, SortKey};
use dupecache::cache::RecordStore;
use dupecache::duplicates::{
    Aggregator, DuplicateGroups, RecordBuilder, RescanMode, SummaryStore,
};

fn build_all(root: &Path) -> DuplicateGroups {
    let store = RecordStore::new();
    RecordBuilder::new(&store, RescanMode::None)
        .build(root)
        .unwrap();
    let index = Aggregator::new(&store).aggregate(root).unwrap();
    let summary = SummaryStore::new();
    summary.write(root, &index).unwrap();
    summary.read(root).unwrap()
}

fn ctx<'a>(root: &'a Path, prim: &'a [String], dup: &'a [String]) -> SortContext<'a> {
    SortContext {
        root,
        primary_dirs: prim,
        duplicate_dirs: dup,
    }
}

#[test]
fn depth_tie_breaks_by_lowercase_path() {
    let tree = TempDir::new().unwrap();
    let a = tree.path().join("a");
    let b = tree.path().join("b");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();
    fs::write(a.join("x.txt"), "abcd").unwrap();
    fs::write(b.join("y.txt"), "abcd").unwrap();

    let groups = build_all(tree.path());
    assert_eq!(groups.len(), 1);
    let paths = groups.values().next().unwrap();
    assert_eq!(paths.len(), 2);

    let result = classify(paths, SortKey::Depth, false, &ctx(tree.path(), &[], &[]));
    assert_eq!(result.primary, vec![a.join("x.txt")]);
    assert_eq!(result.duplicates, vec![b.join("y.txt")]);
}

#[test]
fn classification_is_a_partition() {
    let tree = TempDir::new().unwrap();
    let deep = tree.path().join("one").join("two");
    fs::create_dir_all(&deep).unwrap();
    fs::write(tree.path().join("a.txt"), "abcd").unwrap();
    fs::write(tree.path().join("one").join("b.txt"), "abcd").unwrap();
    fs::write(deep.join("c.txt"), "abcd").unwrap();

    let groups = build_all(tree.path());
    let paths = groups.values().next().unwrap();
    assert_eq!(paths.len(), 3);

    for key in [
        SortKey::Depth,
        SortKey::Dlist,
        SortKey::Plist,
        SortKey::Length,
        SortKey::Date,
    ] {
        let result = classify(paths, key, false, &ctx(tree.path(), &[], &[]));
        assert!(!result.primary.is_empty(), "{key:?}: primary must be non-empty");
        assert_eq!(
            result.primary.len() + result.duplicates.len(),
            paths.len(),
            "{key:?}: classification must cover the group"
        );
        for p in paths {
            assert!(
                result.primary.contains(p) ^ result.duplicates.contains(p),
                "{key:?}: {p:?} must land on exactly one side"
            );
        }
    }
}

#[test]
fn date_key_prefers_older_copy() {
    let tree = TempDir::new().unwrap();
    let old = tree.path().join("old.txt");
    let new = tree.path().join("new.txt");
    fs::write(&old, "abcd").unwrap();
    fs::write(&new, "abcd").unwrap();
    filetime::set_file_mtime(&old, filetime::FileTime::from_unix_time(1_500_000_000, 0)).unwrap();
    filetime::set_file_mtime(&new, filetime::FileTime::from_unix_time(1_700_000_000, 0)).unwrap();

    let groups = build_all(tree.path());
    let paths = groups.values().next().unwrap();

    let result = classify(paths, SortKey::Date, false, &ctx(tree.path(), &[], &[]));
    assert_eq!(result.primary, vec![old.clone()]);
    assert_eq!(result.duplicates, vec![new.clone()]);
}

#[test]
fn length_key_prefers_shorter_filename() {
    let tree = TempDir::new().unwrap();
    // "z.txt" sorts after "a_copy_final.txt" lexically; only its shorter
    // name can make it primary.
    fs::write(tree.path().join("z.txt"), "abcd").unwrap();
    fs::write(tree.path().join("a_copy_final.txt"), "abcd").unwrap();

    let groups = build_all(tree.path());
    let paths = groups.values().next().unwrap();

    let result = classify(paths, SortKey::Length, false, &ctx(tree.path(), &[], &[]));
    assert_eq!(result.primary, vec![tree.path().join("z.txt")]);
}

#[test]
fn plist_prefers_configured_primary_directory() {
    let tree = TempDir::new().unwrap();
    let originals = tree.path().join("zz_originals");
    let elsewhere = tree.path().join("aa");
    fs::create_dir_all(&originals).unwrap();
    fs::create_dir_all(&elsewhere).unwrap();
    fs::write(originals.join("f.txt"), "abcd").unwrap();
    fs::write(elsewhere.join("f.txt"), "abcd").unwrap();

    let groups = build_all(tree.path());
    let paths = groups.values().next().unwrap();

    // "zz_originals" sorts after "aa" lexically, so only the plist value
    // can promote it.
    let prim = vec!["zz_originals".to_string()];
    let result = classify(paths, SortKey::Plist, false, &ctx(tree.path(), &prim, &[]));
    assert_eq!(result.primary, vec![originals.join("f.txt")]);
    assert_eq!(result.duplicates, vec![elsewhere.join("f.txt")]);
}

#[test]
fn dlist_demotes_configured_duplicate_directory() {
    let tree = TempDir::new().unwrap();
    let backup = tree.path().join("aaa_backup");
    let keep = tree.path().join("zzz");
    fs::create_dir_all(&backup).unwrap();
    fs::create_dir_all(&keep).unwrap();
    fs::write(backup.join("f.txt"), "abcd").unwrap();
    fs::write(keep.join("f.txt"), "abcd").unwrap();

    let groups = build_all(tree.path());
    let paths = groups.values().next().unwrap();

    // "aaa_backup" sorts before "zzz" lexically, so only the dlist value
    // can demote it.
    let dup = vec!["aaa_backup".to_string()];
    let result = classify(paths, SortKey::Dlist, false, &ctx(tree.path(), &[], &dup));
    assert_eq!(result.primary, vec![keep.join("f.txt")]);
    assert_eq!(result.duplicates, vec![backup.join("f.txt")]);
}
