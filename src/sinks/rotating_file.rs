//! Size-bounded rotating file sink
//!
//! The active file keeps its configured name. When a write would push it past
//! `max_size`, it is renamed to `<stem>-<timestamp>-<seq><.ext>` and a fresh
//! file takes its place. Rolled backups are pruned by age and by count after
//! every rollover.

use crate::core::error::{LoggerError, Result};
use crate::core::sink::Sink;
use chrono::{Local, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the directory of the default log file
pub const LOG_PATH_ENV: &str = "LOG_PATH";

pub const MEGABYTE: u64 = 1024 * 1024;
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

pub const DEFAULT_MAX_SIZE: u64 = 10 * MEGABYTE;
pub const DEFAULT_MAX_BACKUPS: usize = 5;
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(28 * 24 * 60 * 60);

const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";
const COMPRESS_SUFFIX: &str = ".gz";

static DEFAULT_LOG_PATH: Lazy<PathBuf> = Lazy::new(|| {
    let base = std::env::var_os(LOG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_default();
    let path = base.join(program_name());
    if is_current_exe(&path) {
        // Started from its own directory with LOG_PATH unset or pointing there
        let mut name = path.as_os_str().to_os_string();
        name.push(".log");
        return PathBuf::from(name);
    }
    path
});

/// `true` when `path` names the running executable
fn is_current_exe(path: &Path) -> bool {
    let Ok(exe) = std::env::current_exe().and_then(fs::canonicalize) else {
        return false;
    };
    fs::canonicalize(path).is_ok_and(|resolved| resolved == exe)
}

fn program_name() -> OsString {
    std::env::args_os()
        .next()
        .and_then(|arg0| Path::new(&arg0).file_name().map(|name| name.to_os_string()))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| OsString::from("app"))
}

/// Rules for when a log file rolls over and which backups survive.
///
/// A zero `max_size`, `max_backups` or `max_age` disables that limit.
///
/// # Examples
///
/// ```
/// use rust_log_facade::sinks::RotationPolicy;
/// use std::time::Duration;
///
/// let policy = RotationPolicy::new("/var/log/app.log")
///     .with_max_size_mb(50)
///     .with_max_backups(7)
///     .with_max_age(Duration::from_secs(7 * 24 * 3600))
///     .with_compression(true);
/// assert_eq!(policy.max_size, 50 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Active log file
    pub path: PathBuf,
    /// Size in bytes at which the active file rolls over
    pub max_size: u64,
    /// Number of rolled files to keep
    pub max_backups: usize,
    /// Rolled files older than this are deleted
    pub max_age: Duration,
    /// Name backups with local time instead of UTC
    pub local_time: bool,
    /// Gzip rolled files
    pub compress: bool,
}

impl Default for RotationPolicy {
    /// `<LOG_PATH>/<program name>`, 10 MiB, 5 backups, 28 days, local time
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl RotationPolicy {
    /// Default limits applied to `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_size: DEFAULT_MAX_SIZE,
            max_backups: DEFAULT_MAX_BACKUPS,
            max_age: DEFAULT_MAX_AGE,
            local_time: true,
            compress: false,
        }
    }

    /// Custom file name, size in megabytes and age in days; everything else default
    #[must_use]
    pub fn custom(path: impl Into<PathBuf>, max_size_mb: u64, max_age_days: u64) -> Self {
        Self::new(path)
            .with_max_size_mb(max_size_mb)
            .with_max_age(Duration::from_secs(max_age_days.saturating_mul(DAY.as_secs())))
    }

    /// `<LOG_PATH>/<program name>`, computed once per process.
    ///
    /// When that names the running executable itself, `.log` is appended.
    pub fn default_path() -> &'static Path {
        &DEFAULT_LOG_PATH
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_size = bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size_mb(self, megabytes: u64) -> Self {
        self.with_max_size(megabytes.saturating_mul(MEGABYTE))
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age(mut self, age: Duration) -> Self {
        self.max_age = age;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_local_time(mut self, local_time: bool) -> Self {
        self.local_time = local_time;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    /// A path that can name a log file: non-empty, not an existing directory
    /// and not the running executable
    pub fn has_usable_path(&self) -> bool {
        !self.path.as_os_str().is_empty()
            && self.path.file_name().is_some()
            && !self.path.is_dir()
            && !is_current_exe(&self.path)
    }

    fn now(&self) -> NaiveDateTime {
        if self.local_time {
            Local::now().naive_local()
        } else {
            Utc::now().naive_utc()
        }
    }
}

/// A rolled file found next to the active log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    pub path: PathBuf,
    pub timestamp: NaiveDateTime,
    pub sequence: u64,
}

struct FileState {
    file: Option<File>,
    size: u64,
    sequence: u64,
}

/// File sink that rolls over by size and prunes backups by age and count.
///
/// The file is opened on the first write, so constructing the sink never
/// touches the file system. All file operations, including rollover, happen
/// under one lock.
///
/// # Examples
///
/// ```no_run
/// use rust_log_facade::sinks::{RotatingFileSink, RotationPolicy};
/// use rust_log_facade::Sink;
///
/// let sink = RotatingFileSink::new(RotationPolicy::new("/var/log/app.log").with_max_backups(3));
/// sink.write_record(b"hello\n").unwrap();
/// ```
pub struct RotatingFileSink {
    policy: RotationPolicy,
    stem: String,
    extension: String,
    state: Mutex<FileState>,
}

impl RotatingFileSink {
    pub fn new(policy: RotationPolicy) -> Self {
        let file_name = policy
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "app".to_string());
        let (stem, extension) = match file_name.rfind('.') {
            Some(idx) if idx > 0 => (file_name[..idx].to_string(), file_name[idx..].to_string()),
            _ => (file_name, String::new()),
        };

        Self {
            policy,
            stem,
            extension,
            state: Mutex::new(FileState {
                file: None,
                size: 0,
                sequence: 0,
            }),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.policy.path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Bytes in the active file, as tracked by this sink
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.state.lock().size
    }

    /// Close the active file and roll it over immediately
    pub fn rotate(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.file.is_none() {
            self.open(&mut state)?;
        }
        self.roll_over(&mut state)
    }

    /// Rolled files belonging to this log, newest first
    pub fn backups(&self) -> Result<Vec<Backup>> {
        let dir = self.directory();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(LoggerError::io_operation(
                    "listing log backups",
                    format!("Failed to read directory '{}'", dir.display()),
                    e,
                ))
            }
        };

        let mut backups: Vec<Backup> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                let (timestamp, sequence) = self.parse_backup_name(&name)?;
                Some(Backup {
                    path: entry.path(),
                    timestamp,
                    sequence,
                })
            })
            .collect();

        backups.sort_by(|a, b| {
            (b.timestamp, b.sequence).cmp(&(a.timestamp, a.sequence))
        });
        Ok(backups)
    }

    fn directory(&self) -> PathBuf {
        match self.policy.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// `<stem>-<timestamp>-<seq><.ext>[.gz]` -> (timestamp, seq)
    fn parse_backup_name(&self, name: &str) -> Option<(NaiveDateTime, u64)> {
        let rest = name.strip_prefix(&self.stem)?.strip_prefix('-')?;
        let rest = rest.strip_suffix(COMPRESS_SUFFIX).unwrap_or(rest);
        let rest = rest.strip_suffix(self.extension.as_str())?;
        let (timestamp, sequence) = rest.rsplit_once('-')?;
        let timestamp = NaiveDateTime::parse_from_str(timestamp, BACKUP_TIME_FORMAT).ok()?;
        let sequence = sequence.parse().ok()?;
        Some((timestamp, sequence))
    }

    fn backup_path(&self, timestamp: NaiveDateTime, sequence: u64) -> PathBuf {
        self.policy.path.with_file_name(format!(
            "{}-{}-{:04}{}",
            self.stem,
            timestamp.format(BACKUP_TIME_FORMAT),
            sequence,
            self.extension
        ))
    }

    fn open(&self, state: &mut FileState) -> Result<()> {
        let path = &self.policy.path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_sink(path.display().to_string(), format!("Failed to open: {}", e))
            })?;
        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_sink(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();

        // Continue numbering after backups left by a previous run
        if state.sequence == 0 {
            state.sequence = self
                .backups()
                .ok()
                .and_then(|backups| backups.iter().map(|b| b.sequence).max())
                .unwrap_or(0);
        }

        state.file = Some(file);
        state.size = size;
        Ok(())
    }

    fn roll_over(&self, state: &mut FileState) -> Result<()> {
        let path = &self.policy.path;
        // Dropping the handle closes the file before it is renamed
        state.file = None;

        if path.exists() {
            state.sequence += 1;
            let backup = self.backup_path(self.policy.now(), state.sequence);
            fs::rename(path, &backup).map_err(|e| {
                LoggerError::file_rotation(
                    path.display().to_string(),
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;

            if self.policy.compress {
                if let Err(e) = compress_file(&backup) {
                    eprintln!("[LOGGER WARNING] Failed to compress {}: {}", backup.display(), e);
                }
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_rotation(
                    path.display().to_string(),
                    format!("Failed to create new log file: {}", e),
                )
            })?;
        state.file = Some(file);
        state.size = 0;

        self.prune();
        Ok(())
    }

    /// Delete backups beyond `max_backups` (oldest first) or older than `max_age`
    fn prune(&self) {
        if self.policy.max_backups == 0 && self.policy.max_age.is_zero() {
            return;
        }

        let backups = match self.backups() {
            Ok(backups) => backups,
            Err(e) => {
                eprintln!("[LOGGER WARNING] Skipping backup cleanup: {}", e);
                return;
            }
        };

        let cutoff = chrono::Duration::from_std(self.policy.max_age)
            .ok()
            .filter(|_| !self.policy.max_age.is_zero())
            .and_then(|age| self.policy.now().checked_sub_signed(age));

        for (idx, backup) in backups.iter().enumerate() {
            let over_count = self.policy.max_backups > 0 && idx >= self.policy.max_backups;
            let too_old = cutoff.is_some_and(|cutoff| backup.timestamp < cutoff);
            if over_count || too_old {
                if let Err(e) = fs::remove_file(&backup.path) {
                    eprintln!(
                        "[LOGGER WARNING] Failed to remove old backup {}: {}",
                        backup.path.display(),
                        e
                    );
                }
            }
        }
    }

    fn reopen_after_failure(&self, state: &mut FileState) -> Result<()> {
        if state.file.is_none() {
            self.open(state)?;
        }
        // Let the file grow past the limit instead of retrying on every write
        state.size = 0;
        Ok(())
    }
}

impl Sink for RotatingFileSink {
    fn write_record(&self, record: &[u8]) -> Result<()> {
        let mut state = self.state.lock();
        if state.file.is_none() {
            self.open(&mut state)?;
        }

        let incoming = record.len() as u64;
        let max_size = self.policy.max_size;
        if max_size > 0 && state.size > 0 && state.size + incoming > max_size {
            if let Err(e) = self.roll_over(&mut state) {
                eprintln!("[LOGGER WARNING] Log rotation failed: {}. Continuing with current file.", e);
                self.reopen_after_failure(&mut state)?;
            }
        }

        let file = state
            .file
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Log file not open"))?;
        file.write_all(record).map_err(|e| {
            LoggerError::file_sink(
                self.policy.path.display().to_string(),
                format!("Failed to write log entry: {}", e),
            )
        })?;
        state.size += incoming;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let mut state = self.state.lock();
        if let Some(ref mut file) = state.file {
            file.sync_data().map_err(|e| {
                LoggerError::file_sink(
                    self.policy.path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "rotating_file"
    }
}

/// Gzip `path` into `path.gz`, removing the original only once the archive is complete
#[cfg(feature = "compression")]
fn compress_file(path: &Path) -> Result<()> {
    use std::io::{BufReader, BufWriter};

    let mut gz_name = path.as_os_str().to_os_string();
    gz_name.push(COMPRESS_SUFFIX);
    let gz_path = PathBuf::from(gz_name);
    let mut tmp_name = gz_path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let temp_gz_path = PathBuf::from(tmp_name);

    let input = File::open(path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to open file for compression: {}", path.display()),
            e,
        )
    })?;
    let mut reader = BufReader::with_capacity(64 * 1024, input);

    let output = File::create(&temp_gz_path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to create temporary compressed file: {}", temp_gz_path.display()),
            e,
        )
    })?;
    let mut encoder = flate2::write::GzEncoder::new(
        BufWriter::with_capacity(64 * 1024, output),
        flate2::Compression::default(),
    );

    let streamed = std::io::copy(&mut reader, &mut encoder)
        .and_then(|_| encoder.finish())
        .and_then(|mut writer| writer.flush());
    if let Err(e) = streamed {
        let _ = fs::remove_file(&temp_gz_path);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress {}", path.display()),
            e,
        ));
    }

    fs::rename(&temp_gz_path, &gz_path).map_err(|e| {
        let _ = fs::remove_file(&temp_gz_path);
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to rename compressed file to: {}", gz_path.display()),
            e,
        )
    })?;

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[LOGGER WARNING] Compressed {} but failed to remove the original: {}",
            path.display(),
            e
        );
    }
    Ok(())
}

#[cfg(not(feature = "compression"))]
fn compress_file(path: &Path) -> Result<()> {
    Err(LoggerError::file_rotation(
        path.display().to_string(),
        "compression requested but the `compression` feature is disabled",
    ))
}
