// src/infrastructure/log_tailer.rs
//
// Tail of the game client's append-only log file.
//
// CRITICAL RULES:
// - Never loads the whole file into memory
// - Never fails: a missing or unreadable file means "no line available"
// - The line count is the change signal; content is not compared

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

const CHUNK_SIZE: usize = 8 * 1024;

/// Snapshot of the log at one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTail {
    /// Number of lines, counting an unterminated final line
    pub line_count: u64,

    /// Final line, trimmed. `None` for an empty file.
    pub last_line: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LogTailer {
    path: PathBuf,
}

impl LogTailer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current tail. Errors are logged and reported as `None`.
    pub fn read(&self) -> Option<LogTail> {
        if !self.path.exists() {
            return None;
        }

        match read_tail(&self.path) {
            Ok(tail) => Some(tail),
            Err(e) => {
                log::warn!("Error reading log file {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

fn read_tail(path: &Path) -> io::Result<LogTail> {
    let mut file = File::open(path)?;
    let size = file.metadata()?.len();

    if size == 0 {
        return Ok(LogTail {
            line_count: 0,
            last_line: None,
        });
    }

    let line_count = count_lines(&mut file)?;
    let last_line = read_last_line(&mut file, size)?;

    Ok(LogTail {
        line_count,
        last_line: Some(last_line),
    })
}

fn count_lines(file: &mut File) -> io::Result<u64> {
    file.seek(SeekFrom::Start(0))?;
    let mut reader = BufReader::with_capacity(CHUNK_SIZE, file);
    let mut buf = [0u8; CHUNK_SIZE];
    let mut newlines = 0u64;
    let mut last_byte = None;

    loop {
        let read = reader.read(&mut buf)?;
        if read == 0 {
            break;
        }
        newlines += buf[..read].iter().filter(|b| **b == b'\n').count() as u64;
        last_byte = Some(buf[read - 1]);
    }

    match last_byte {
        Some(b'\n') | None => Ok(newlines),
        Some(_) => Ok(newlines + 1),
    }
}

/// Walk backwards from the end to the start of the final line.
///
/// The very last byte is skipped so that a trailing newline terminates the
/// final line instead of starting an empty one.
fn read_last_line(file: &mut File, size: u64) -> io::Result<String> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut search_end = size - 1;
    let mut line_start = 0u64;

    while search_end > 0 {
        let chunk_start = search_end.saturating_sub(CHUNK_SIZE as u64);
        let len = (search_end - chunk_start) as usize;

        file.seek(SeekFrom::Start(chunk_start))?;
        file.read_exact(&mut buf[..len])?;

        if let Some(pos) = buf[..len].iter().rposition(|b| *b == b'\n') {
            line_start = chunk_start + pos as u64 + 1;
            break;
        }
        search_end = chunk_start;
    }

    // Bytes appended after `size` was taken belong to a later read.
    file.seek(SeekFrom::Start(line_start))?;
    let mut tail = Vec::new();
    file.by_ref().take(size - line_start).read_to_end(&mut tail)?;

    Ok(String::from_utf8_lossy(&tail).trim().to_string())
}

/// Change detector over successive line counts.
///
/// A change is any difference between the last observed count and the last
/// processed count, so a truncated-then-regrown file also counts.
#[derive(Debug, Default)]
pub struct LineCountTracker {
    last_seen: AtomicU64,
    last_processed: AtomicU64,
}

impl LineCountTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tracker shared by every stream in the process.
    ///
    /// Sessions using it consume each other's changes: with two open streams,
    /// only the first one to poll after an append sees it.
    pub fn process_wide() -> Arc<LineCountTracker> {
        static SHARED: OnceLock<Arc<LineCountTracker>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(LineCountTracker::new())))
    }

    pub fn observe(&self, line_count: u64) {
        self.last_seen.store(line_count, Ordering::SeqCst);
    }

    /// True once per change; marks the current count as processed.
    pub fn take_change(&self) -> bool {
        let seen = self.last_seen.load(Ordering::SeqCst);
        let previous = self.last_processed.swap(seen, Ordering::SeqCst);
        previous != seen
    }

    pub fn last_seen(&self) -> u64 {
        self.last_seen.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn log_with(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let tailer = LogTailer::new(dir.path().join("absent.log"));
        assert_eq!(tailer.read(), None);
    }

    #[test]
    fn test_empty_file() {
        let file = log_with(b"");
        let tail = LogTailer::new(file.path()).read().unwrap();
        assert_eq!(tail.line_count, 0);
        assert_eq!(tail.last_line, None);
    }

    #[test]
    fn test_terminated_last_line() {
        let file = log_with(b"first\nsecond\nthird\n");
        let tail = LogTailer::new(file.path()).read().unwrap();
        assert_eq!(tail.line_count, 3);
        assert_eq!(tail.last_line.as_deref(), Some("third"));
    }

    #[test]
    fn test_unterminated_last_line() {
        let file = log_with(b"first\nsecond");
        let tail = LogTailer::new(file.path()).read().unwrap();
        assert_eq!(tail.line_count, 2);
        assert_eq!(tail.last_line.as_deref(), Some("second"));
    }

    #[test]
    fn test_single_line() {
        let file = log_with(b"a::b::Cards: [1]\n");
        let tail = LogTailer::new(file.path()).read().unwrap();
        assert_eq!(tail.line_count, 1);
        assert_eq!(tail.last_line.as_deref(), Some("a::b::Cards: [1]"));

        let file = log_with(b"x");
        let tail = LogTailer::new(file.path()).read().unwrap();
        assert_eq!(tail.line_count, 1);
        assert_eq!(tail.last_line.as_deref(), Some("x"));
    }

    #[test]
    fn test_blank_final_line() {
        let file = log_with(b"first\n\n");
        let tail = LogTailer::new(file.path()).read().unwrap();
        assert_eq!(tail.line_count, 2);
        assert_eq!(tail.last_line.as_deref(), Some(""));
    }

    #[test]
    fn test_last_line_longer_than_chunk() {
        let long_line = "7".repeat(CHUNK_SIZE * 2 + 17);
        let contents = format!("header\n{}\n", long_line);
        let file = log_with(contents.as_bytes());
        let tail = LogTailer::new(file.path()).read().unwrap();
        assert_eq!(tail.line_count, 2);
        assert_eq!(tail.last_line.as_deref(), Some(long_line.as_str()));
    }

    #[test]
    fn test_many_lines_across_chunks() {
        let mut contents = String::new();
        for n in 0..5000 {
            contents.push_str(&format!("line {}\n", n));
        }
        let file = log_with(contents.as_bytes());
        let tail = LogTailer::new(file.path()).read().unwrap();
        assert_eq!(tail.line_count, 5000);
        assert_eq!(tail.last_line.as_deref(), Some("line 4999"));
    }

    #[test]
    fn test_last_line_stops_at_measured_size() {
        let mut file = log_with(b"first\nsecond\n");
        let size = file.as_file().metadata().unwrap().len();
        file.write_all(b"third\nfourth\n").unwrap();
        file.flush().unwrap();

        let mut handle = File::open(file.path()).unwrap();
        let line = read_last_line(&mut handle, size).unwrap();
        assert_eq!(line, "second");
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let file = log_with(b"ok\n\xff\xfebad\n");
        let tail = LogTailer::new(file.path()).read().unwrap();
        assert!(tail.last_line.unwrap().ends_with("bad"));
    }

    #[test]
    fn test_tracker_reports_each_change_once() {
        let tracker = LineCountTracker::new();
        assert!(!tracker.take_change());

        tracker.observe(3);
        assert!(tracker.take_change());
        assert!(!tracker.take_change());

        tracker.observe(3);
        assert!(!tracker.take_change());

        tracker.observe(4);
        assert!(tracker.take_change());
    }

    #[test]
    fn test_tracker_sees_truncation() {
        let tracker = LineCountTracker::new();
        tracker.observe(10);
        assert!(tracker.take_change());
        tracker.observe(2);
        assert!(tracker.take_change());
        assert_eq!(tracker.last_seen(), 2);
    }

    #[test]
    fn test_process_wide_is_shared() {
        let a = LineCountTracker::process_wide();
        let b = LineCountTracker::process_wide();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
