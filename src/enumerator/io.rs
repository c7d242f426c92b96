//! Enumerators backed by files, readers and directories.
//!
//! Every enumerator here acquires its resource when it is driven, owns it in
//! the state of its read loop, and drops it as soon as the loop exits: when
//! the input is exhausted, when the step is done, or when a read fails. Wrap
//! them with [`ensure_eval`](super::Enumerator::ensure_eval) to run extra
//! release logic on the same paths.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;

use either::Either;

use super::Enumerator;
use crate::effect::Effect;
use crate::error::Result;
use crate::step::Step;

/// Block size used by [`read_bytes`] when given a chunk size of zero.
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Feeds the lines of a reader, without their terminators.
#[derive(Debug)]
pub struct ReadLines<R>(R);

/// Read lines from an already open reader. The reader is dropped when the
/// drive finishes.
pub fn read_lines_from<R: BufRead>(reader: R) -> ReadLines<R> {
    ReadLines(reader)
}

fn next_line<R: BufRead>(mut reader: R) -> Result<(R, Option<String>)> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok((reader, None));
    }
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok((reader, Some(line)))
}

impl<F, R> Enumerator<F, String> for ReadLines<R>
where
    F: Effect,
    R: BufRead + 'static,
{
    fn apply<A: 'static>(self, step: Step<F, String, A>) -> F::Of<Step<F, String, A>> {
        F::tail_rec((self.0, step), |(reader, step): (R, Step<F, String, A>)| {
            if step.is_done() {
                return F::pure(Either::Right(step));
            }
            F::bind(F::delay(move || next_line(reader)), move |(reader, line)| match line {
                Some(line) => F::map(step.feed_el(line), move |next| Either::Left((reader, next))),
                None => {
                    tracing::trace!("reader exhausted");
                    F::pure(Either::Right(step))
                }
            })
        })
    }
}

/// Feeds the lines of a file, opened when driven.
#[derive(Debug, Clone)]
pub struct ReadLinesAt {
    path: PathBuf,
}

/// Read a file line by line.
///
/// ```rust,no_run
/// use stepwise::prelude::*;
/// use stepwise::enumerator::io::read_lines;
///
/// let step: Step<Strict, String, u64> = iteratee::length();
/// let count = read_lines("Cargo.toml").drive(step)?;
/// println!("{count} lines");
/// # Ok::<(), stepwise::Error>(())
/// ```
pub fn read_lines(path: impl Into<PathBuf>) -> ReadLinesAt {
    ReadLinesAt { path: path.into() }
}

impl<F: Effect> Enumerator<F, String> for ReadLinesAt {
    fn apply<A: 'static>(self, step: Step<F, String, A>) -> F::Of<Step<F, String, A>> {
        if step.is_done() {
            return F::pure(step);
        }
        let path = self.path;
        let opened = F::delay(move || {
            tracing::debug!(path = %path.display(), "opening file for lines");
            Ok(BufReader::new(File::open(&path)?))
        });
        F::bind(opened, move |reader| read_lines_from(reader).apply(step))
    }
}

/// Feeds a reader as blocks of bytes.
#[derive(Debug)]
pub struct ReadBytes<R> {
    reader: R,
    chunk_size: usize,
}

pub fn read_bytes_from<R: Read>(reader: R, chunk_size: usize) -> ReadBytes<R> {
    ReadBytes {
        reader,
        chunk_size: if chunk_size == 0 { DEFAULT_CHUNK_SIZE } else { chunk_size },
    }
}

fn next_block<R: Read>(mut reader: R, size: usize) -> Result<(R, Vec<u8>)> {
    let mut block = Vec::with_capacity(size);
    reader.by_ref().take(size as u64).read_to_end(&mut block)?;
    Ok((reader, block))
}

impl<F, R> Enumerator<F, Vec<u8>> for ReadBytes<R>
where
    F: Effect,
    R: Read + 'static,
{
    fn apply<A: 'static>(self, step: Step<F, Vec<u8>, A>) -> F::Of<Step<F, Vec<u8>, A>> {
        let size = self.chunk_size;
        F::tail_rec((self.reader, step), move |(reader, step): (R, Step<F, Vec<u8>, A>)| {
            if step.is_done() {
                return F::pure(Either::Right(step));
            }
            F::bind(F::delay(move || next_block(reader, size)), move |(reader, block)| {
                if block.is_empty() {
                    F::pure(Either::Right(step))
                } else {
                    F::map(step.feed_el(block), move |next| Either::Left((reader, next)))
                }
            })
        })
    }
}

/// Feeds the bytes of a file, opened when driven.
#[derive(Debug, Clone)]
pub struct ReadBytesAt {
    path: PathBuf,
    chunk_size: usize,
}

/// Read a file in blocks of `chunk_size` bytes; the last block may be shorter.
/// A `chunk_size` of zero means [`DEFAULT_CHUNK_SIZE`].
pub fn read_bytes(path: impl Into<PathBuf>, chunk_size: usize) -> ReadBytesAt {
    ReadBytesAt {
        path: path.into(),
        chunk_size,
    }
}

impl<F: Effect> Enumerator<F, Vec<u8>> for ReadBytesAt {
    fn apply<A: 'static>(self, step: Step<F, Vec<u8>, A>) -> F::Of<Step<F, Vec<u8>, A>> {
        if step.is_done() {
            return F::pure(step);
        }
        let ReadBytesAt { path, chunk_size } = self;
        let opened = F::delay(move || {
            tracing::debug!(path = %path.display(), chunk_size, "opening file for bytes");
            Ok(File::open(&path)?)
        });
        F::bind(opened, move |file| read_bytes_from(file, chunk_size).apply(step))
    }
}

/// Feeds the paths of a directory's entries, in the order the OS returns them.
#[derive(Debug, Clone)]
pub struct ListDirectory {
    path: PathBuf,
}

/// List the entries of a directory, opened when driven.
pub fn list_directory(path: impl Into<PathBuf>) -> ListDirectory {
    ListDirectory { path: path.into() }
}

fn next_entry(mut entries: fs::ReadDir) -> Result<(fs::ReadDir, Option<PathBuf>)> {
    match entries.next() {
        Some(entry) => {
            let path = entry?.path();
            Ok((entries, Some(path)))
        }
        None => Ok((entries, None)),
    }
}

impl<F: Effect> Enumerator<F, PathBuf> for ListDirectory {
    fn apply<A: 'static>(self, step: Step<F, PathBuf, A>) -> F::Of<Step<F, PathBuf, A>> {
        if step.is_done() {
            return F::pure(step);
        }
        let path = self.path;
        let opened = F::delay(move || {
            tracing::debug!(path = %path.display(), "listing directory");
            Ok(fs::read_dir(&path)?)
        });
        F::bind(opened, move |entries| {
            F::tail_rec((entries, step), |(entries, step): (fs::ReadDir, Step<F, PathBuf, A>)| {
                if step.is_done() {
                    return F::pure(Either::Right(step));
                }
                F::bind(F::delay(move || next_entry(entries)), move |(entries, entry)| match entry {
                    Some(path) => F::map(step.feed_el(path), move |next| Either::Left((entries, next))),
                    None => F::pure(Either::Right(step)),
                })
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{Deferred, Strict};
    use crate::error::Error;
    use crate::iteratee;
    use std::cell::Cell;
    use std::io::{self, Cursor};
    use std::path::Path;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TempDir(PathBuf);

    impl TempDir {
        fn new() -> Self {
            static NEXT: AtomicUsize = AtomicUsize::new(0);
            let name = format!(
                "stepwise-io-{}-{}",
                std::process::id(),
                NEXT.fetch_add(1, Ordering::Relaxed)
            );
            let path = std::env::temp_dir().join(name);
            fs::create_dir_all(&path).unwrap();
            TempDir(path)
        }

        fn file(&self, name: &str, contents: &str) -> PathBuf {
            let path = self.0.join(name);
            fs::write(&path, contents).unwrap();
            path
        }

        fn path(&self) -> &Path {
            &self.0
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    /// Serves `data` once, then fails every read.
    struct FailsAfter {
        data: Option<&'static [u8]>,
    }

    impl Read for FailsAfter {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.take() {
                Some(data) => {
                    let n = data.len().min(buf.len());
                    buf[..n].copy_from_slice(&data[..n]);
                    Ok(n)
                }
                None => Err(io::Error::new(io::ErrorKind::Other, "device went away")),
            }
        }
    }

    fn close_counter() -> (Rc<Cell<u32>>, impl FnOnce() -> Result<()> + 'static) {
        let closed = Rc::new(Cell::new(0));
        let close = {
            let closed = Rc::clone(&closed);
            move || -> Result<()> {
                closed.set(closed.get() + 1);
                Ok(())
            }
        };
        (closed, close)
    }

    #[test]
    fn test_read_lines_strips_terminators() {
        let reader = Cursor::new("one\r\ntwo\nthree");
        let step: Step<Strict, String, Vec<String>> = iteratee::consume();
        let lines = read_lines_from(reader).drive(step).unwrap();
        assert_eq!(lines, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_three_line_file_closes_once_after_full_read() {
        let dir = TempDir::new();
        let path = dir.file("lines.txt", "alpha\nbeta\ngamma\n");
        let (closed, close) = close_counter();

        let step: Step<Strict, String, Vec<String>> = iteratee::consume();
        let lines = read_lines(path).ensure_eval(close).drive(step).unwrap();

        assert_eq!(lines, vec!["alpha", "beta", "gamma"]);
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn test_three_line_file_closes_once_after_early_stop() {
        let dir = TempDir::new();
        let path = dir.file("lines.txt", "alpha\nbeta\ngamma\n");
        let (closed, close) = close_counter();

        let step: Step<Strict, String, Option<String>> = iteratee::head();
        let first = read_lines(path).ensure_eval(close).drive(step).unwrap();

        assert_eq!(first.as_deref(), Some("alpha"));
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn test_three_line_reader_closes_once_after_failure() {
        let reader = BufReader::new(FailsAfter {
            data: Some(b"alpha\nbeta\n"),
        });
        let (closed, close) = close_counter();

        let step: Step<Strict, String, Vec<String>> = iteratee::consume();
        let err = read_lines_from(reader).ensure_eval(close).drive(step).unwrap_err();

        assert!(matches!(err, Error::Io(_)));
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn test_missing_file_fails_and_still_finalizes() {
        let dir = TempDir::new();
        let (closed, close) = close_counter();

        let step: Step<Strict, String, Vec<String>> = iteratee::consume();
        let err = read_lines(dir.path().join("absent.txt"))
            .ensure_eval(close)
            .drive(step)
            .unwrap_err();

        assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn test_read_lines_opens_at_drive_time() {
        let dir = TempDir::new();
        let path = dir.path().join("later.txt");

        let step: Step<Deferred, String, Vec<String>> = iteratee::consume();
        let thunk = read_lines(path.clone()).drive(step);
        fs::write(&path, "written after composing\n").unwrap();

        assert_eq!(thunk.run().unwrap(), vec!["written after composing"]);
    }

    #[test]
    fn test_read_bytes_in_blocks() {
        let dir = TempDir::new();
        let path = dir.file("bytes.bin", "abcdefghij");

        let step: Step<Strict, Vec<u8>, Vec<Vec<u8>>> = iteratee::consume();
        let blocks = read_bytes(path, 4).drive(step).unwrap();
        assert_eq!(blocks, vec![b"abcd".to_vec(), b"efgh".to_vec(), b"ij".to_vec()]);
    }

    #[test]
    fn test_read_bytes_zero_chunk_uses_default() {
        let reader = Cursor::new(vec![7_u8; DEFAULT_CHUNK_SIZE + 1]);
        let step: Step<Strict, Vec<u8>, Vec<usize>> =
            iteratee::fold(Vec::new(), |mut sizes: Vec<usize>, block: Vec<u8>| {
                sizes.push(block.len());
                sizes
            });
        let sizes = read_bytes_from(reader, 0).drive(step).unwrap();
        assert_eq!(sizes, vec![DEFAULT_CHUNK_SIZE, 1]);
    }

    #[test]
    fn test_list_directory() {
        let dir = TempDir::new();
        dir.file("a.txt", "");
        dir.file("b.txt", "");

        let step: Step<Strict, PathBuf, Vec<PathBuf>> = iteratee::consume();
        let mut names: Vec<String> = list_directory(dir.path())
            .drive(step)
            .unwrap()
            .into_iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }
}
