use dupefinder::duplicates::{DuplicateFinder, FinderConfig};
use dupefinder::output::TextOutput;
use dupefinder::scanner::PREHASH_SIZE;
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

fn write_file(path: &std::path::Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (groups, stats) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(stats.examined, 0);
    assert_eq!(
        TextOutput::new(&groups, &stats).render(),
        "0 file(s) examined\n"
    );
}

#[test]
fn test_scan_hello_world() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), b"hello");
    write_file(&dir.path().join("b.txt"), b"hello");
    write_file(&dir.path().join("c.txt"), b"world");

    let finder = DuplicateFinder::with_defaults();
    let (groups, stats) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(stats.examined, 3);
    assert_eq!(stats.skipped, 0);
    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].files,
        vec![dir.path().join("a.txt"), dir.path().join("b.txt")]
    );
    assert_eq!(groups[0].hash_hex(), blake3::hash(b"hello").to_hex().as_str());
}

#[test]
fn test_scan_single_large_file() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("big.bin"), &vec![7u8; 10 * 1024 * 1024]);

    let finder = DuplicateFinder::with_defaults();
    let (groups, stats) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(stats.examined, 1);
    // A unique size is never opened.
    assert_eq!(stats.fully_hashed, 0);
    assert_eq!(
        TextOutput::new(&groups, &stats).render(),
        "1 file(s) examined\n"
    );
}

#[test]
fn test_scan_small_equal_files() {
    let dir = tempdir().unwrap();
    let content: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();
    write_file(&dir.path().join("one.bin"), &content);
    write_file(&dir.path().join("two.bin"), &content);

    let finder = DuplicateFinder::with_defaults();
    let (groups, stats) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].size, 1000);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(stats.fully_hashed, 2);
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("subdir");
    let deeper = sub.join("deeper");
    fs::create_dir_all(&deeper).unwrap();

    write_file(&dir.path().join("a.txt"), b"dup");
    write_file(&deeper.join("b.txt"), b"dup");
    write_file(&sub.join("c.txt"), b"not");

    let finder = DuplicateFinder::with_defaults();
    let (groups, stats) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(stats.examined, 3);
    assert_eq!(groups.len(), 1);
    assert!(groups[0].files.contains(&deeper.join("b.txt")));
}

#[test]
fn test_scan_multiple_groups_sorted_by_size() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("1a.txt"), b"group1");
    write_file(&dir.path().join("1b.txt"), b"group1");
    write_file(&dir.path().join("1c.txt"), b"group1");
    write_file(&dir.path().join("2a.txt"), b"second group");
    write_file(&dir.path().join("2b.txt"), b"second group");

    let finder = DuplicateFinder::with_defaults();
    let (groups, stats) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(stats.examined, 5);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].size, 12);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(groups[1].size, 6);
    assert_eq!(groups[1].len(), 3);
}

#[test]
fn test_same_prefix_different_tail() {
    let dir = tempdir().unwrap();
    let len = PREHASH_SIZE as usize + 4096;
    let base = vec![0xabu8; len];
    let mut changed = base.clone();
    changed[len - 1] = 0xcd;

    write_file(&dir.path().join("a.bin"), &base);
    write_file(&dir.path().join("b.bin"), &changed);

    let finder = DuplicateFinder::with_defaults();
    let (groups, stats) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(stats.eliminated_by_prehash, 0);
    assert_eq!(stats.fully_hashed, 2);
}

#[test]
fn test_different_prefix_stops_before_full_hash() {
    let dir = tempdir().unwrap();
    let len = PREHASH_SIZE as usize * 2;
    let base = vec![1u8; len];
    let mut changed = base.clone();
    changed[0] = 2;

    write_file(&dir.path().join("a.bin"), &base);
    write_file(&dir.path().join("b.bin"), &changed);

    let finder = DuplicateFinder::with_defaults();
    let (groups, stats) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(stats.eliminated_by_prehash, 2);
    assert_eq!(stats.fully_hashed, 0);
}

#[test]
fn test_empty_files_are_never_duplicates() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("empty1")).unwrap();
    File::create(dir.path().join("empty2")).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, stats) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(stats.examined, 2);
    assert_eq!(stats.empty_files, 2);
}

#[test]
fn test_thread_count_does_not_change_result() {
    let dir = tempdir().unwrap();
    for i in 0..20u8 {
        let content = vec![i % 4; 2048];
        write_file(&dir.path().join(format!("f{i:02}.bin")), &content);
    }

    let sequential = DuplicateFinder::new(FinderConfig::default().with_io_threads(1))
        .find_duplicates(dir.path())
        .unwrap();
    let parallel = DuplicateFinder::new(FinderConfig::default().with_io_threads(8))
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(sequential.0, parallel.0);
    assert_eq!(sequential.1, parallel.1);
    assert_eq!(sequential.0.len(), 4);
}

#[test]
fn test_repeated_scans_are_identical() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("x"), b"same bytes");
    write_file(&dir.path().join("y"), b"same bytes");
    write_file(&dir.path().join("z"), b"same bytes");

    let finder = DuplicateFinder::with_defaults();
    let (first, first_stats) = finder.find_duplicates(dir.path()).unwrap();
    let (second, second_stats) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(
        TextOutput::new(&first, &first_stats).render(),
        TextOutput::new(&second, &second_stats).render()
    );
}

#[test]
fn test_scan_does_not_modify_files() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    write_file(&a, b"keep me");
    write_file(&b, b"keep me");

    let finder = DuplicateFinder::with_defaults();
    finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(fs::read(&a).unwrap(), b"keep me");
    assert_eq!(fs::read(&b).unwrap(), b"keep me");
}
