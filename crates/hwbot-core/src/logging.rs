use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{errors::Error, Result};

/// Size at which the log file is rotated.
pub const LOG_MAX_BYTES: u64 = 50_000_000;
/// Number of rotated files kept next to the active one.
pub const LOG_BACKUPS: usize = 5;

/// Initialize tracing: human-readable events on stdout plus a size-rotated log file.
///
/// The filter can be overridden with `RUST_LOG`.
pub fn init(service_name: &str, log_file: &Path) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("info,{service_name}=info")));

    let file = RotatingFile::open(log_file, LOG_MAX_BYTES, LOG_BACKUPS)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()
        .map_err(|e| Error::Config(format!("failed to initialize logging: {e}")))?;

    Ok(())
}

/// Append-only log file that rolls over once it would grow past `max_bytes`.
///
/// Rotation shifts `<path>.1` to `<path>.2` and so on, moves the active file to
/// `<path>.1` and drops whatever would land past `<path>.<backups>`.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    file: File,
    written: u64,
}

impl RotatingFile {
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64, backups: usize) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = open_append(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            max_bytes,
            backups,
            file,
            written,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_path(&self, n: usize) -> PathBuf {
        let mut os = self.path.clone().into_os_string();
        os.push(format!(".{n}"));
        PathBuf::from(os)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        if self.backups == 0 {
            self.file = OpenOptions::new()
                .write(true)
                .truncate(true)
                .open(&self.path)?;
            self.written = 0;
            return Ok(());
        }

        for n in (1..self.backups).rev() {
            let src = self.backup_path(n);
            if src.exists() {
                replace(&src, &self.backup_path(n + 1))?;
            }
        }
        replace(&self.path, &self.backup_path(1))?;

        self.file = open_append(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.max_bytes > 0
            && self.written > 0
            && self.written + buf.len() as u64 > self.max_bytes
        {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn replace(src: &Path, dst: &Path) -> io::Result<()> {
    if dst.exists() {
        fs::remove_file(dst)?;
    }
    fs::rename(src, dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap_or_default()
    }

    #[test]
    fn rolls_over_once_the_cap_would_be_exceeded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.log");
        let mut log = RotatingFile::open(&path, 10, 2).unwrap();

        log.write_all(b"aaaa\n").unwrap();
        log.write_all(b"bbbb\n").unwrap();
        assert_eq!(read(&path), "aaaa\nbbbb\n");

        log.write_all(b"cccc\n").unwrap();
        assert_eq!(read(&path), "cccc\n");
        assert_eq!(read(&log.backup_path(1)), "aaaa\nbbbb\n");
    }

    #[test]
    fn keeps_at_most_the_configured_number_of_backups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.log");
        let mut log = RotatingFile::open(&path, 4, 2).unwrap();

        for line in ["1111", "2222", "3333", "4444"] {
            log.write_all(line.as_bytes()).unwrap();
        }

        assert_eq!(read(&path), "4444");
        assert_eq!(read(&log.backup_path(1)), "3333");
        assert_eq!(read(&log.backup_path(2)), "2222");
        assert!(!log.backup_path(3).exists());
    }

    #[test]
    fn appends_to_an_existing_file_and_counts_its_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.log");
        fs::write(&path, "old!").unwrap();

        let mut log = RotatingFile::open(&path, 6, 1).unwrap();
        log.write_all(b"xy").unwrap();
        assert_eq!(read(&path), "old!xy");

        log.write_all(b"z").unwrap();
        assert_eq!(read(&path), "z");
        assert_eq!(read(&log.backup_path(1)), "old!xy");
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/logs/bot.log");
        let mut log = RotatingFile::open(&path, LOG_MAX_BYTES, LOG_BACKUPS).unwrap();
        log.write_all(b"hello\n").unwrap();
        log.flush().unwrap();
        assert_eq!(log.path(), path.as_path());
        assert_eq!(read(&path), "hello\n");
    }
}
