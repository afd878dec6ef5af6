use dupefinder::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use dupefinder::output::TextOutput;
use dupefinder::progress::Progress;
use dupefinder::scanner::FileEntry;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_find_duplicates_from_files_continues_on_error() {
    let dir = tempdir().unwrap();
    let present_a = dir.path().join("present_a.txt");
    let present_b = dir.path().join("present_b.txt");
    std::fs::write(&present_a, b"0123456789").unwrap();
    std::fs::write(&present_b, b"0123456789").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let files = vec![
        FileEntry::new(present_a.clone(), 10),
        FileEntry::new(dir.path().join("vanished.txt"), 10),
        FileEntry::new(present_b.clone(), 10),
    ];

    let (groups, stats) = finder.find_duplicates_from_files(files);

    assert_eq!(stats.examined, 3);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.diagnostics.len(), 1);
    assert_eq!(stats.diagnostics[0].category, "NotFound");
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files, vec![present_a, present_b]);
}

#[test]
fn test_skipped_file_is_echoed_and_counted() {
    let dir = tempdir().unwrap();
    let present = dir.path().join("present.bin");
    std::fs::write(&present, b"same size").unwrap();

    let echoed = SharedBuffer::default();
    let progress = Arc::new(Progress::with_diagnostic_writer(true, echoed.clone()));
    let finder = DuplicateFinder::new(FinderConfig::default().with_progress_callback(progress));

    // Listed by the walk, gone before its prefix is read.
    let files = vec![
        FileEntry::new(dir.path().join("gone.bin"), 9),
        FileEntry::new(present, 9),
    ];
    let (groups, stats) = finder.find_duplicates_from_files(files);

    assert!(groups.is_empty());
    let lines = echoed.contents();
    assert_eq!(lines.lines().count(), 1);
    assert!(lines.starts_with("gone.bin NotFound: "));
    assert_eq!(
        TextOutput::new(&groups, &stats).render(),
        "2 file(s) examined (1 skipped due to errors)\nNo duplicates found\n"
    );
}

#[test]
fn test_all_candidates_missing() {
    let finder = DuplicateFinder::with_defaults();
    let files = vec![
        FileEntry::new(PathBuf::from("nonexistent_1.txt"), 100),
        FileEntry::new(PathBuf::from("nonexistent_2.txt"), 100),
    ];

    let (groups, stats) = finder.find_duplicates_from_files(files);

    assert!(groups.is_empty());
    assert_eq!(stats.skipped, 2);
    for diag in &stats.diagnostics {
        assert!(diag.to_string().starts_with("nonexistent_"));
        assert_eq!(diag.category, "NotFound");
    }
}

#[test]
fn test_missing_unique_size_is_never_opened() {
    let finder = DuplicateFinder::with_defaults();
    let files = vec![FileEntry::new(PathBuf::from("nonexistent.txt"), 100)];

    let (_, stats) = finder.find_duplicates_from_files(files);

    assert_eq!(stats.examined, 1);
    assert_eq!(stats.skipped, 0);
}

#[test]
fn test_invalid_roots_are_rejected() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    std::fs::write(&file, b"x").unwrap();
    let finder = DuplicateFinder::with_defaults();

    assert!(matches!(
        finder.find_duplicates(&dir.path().join("missing")),
        Err(FinderError::PathNotFound(_))
    ));
    assert!(matches!(
        finder.find_duplicates(&file),
        Err(FinderError::NotADirectory(_))
    ));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped() {
    use std::fs::{self, File, Permissions};
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked.bin");
    let open = dir.path().join("open.bin");
    fs::write(&locked, b"same size").unwrap();
    fs::write(&open, b"same size").unwrap();
    fs::set_permissions(&locked, Permissions::from_mode(0o000)).unwrap();

    // Privileged users can still read the file; the NotFound case above
    // covers the same path for them.
    if File::open(&locked).is_ok() {
        fs::set_permissions(&locked, Permissions::from_mode(0o644)).unwrap();
        return;
    }

    let finder = DuplicateFinder::with_defaults();
    let (groups, stats) = finder.find_duplicates(dir.path()).unwrap();
    fs::set_permissions(&locked, Permissions::from_mode(0o644)).unwrap();

    assert!(groups.is_empty());
    assert_eq!(stats.examined, 2);
    assert_eq!(stats.skipped, 1);
    assert_eq!(
        stats.diagnostics[0].to_string().split(' ').take(2).collect::<Vec<_>>(),
        vec!["locked.bin", "PermissionDenied:"]
    );

    let report = TextOutput::new(&groups, &stats).render();
    assert!(report.starts_with("2 file(s) examined (1 skipped due to errors)\n"));
}
