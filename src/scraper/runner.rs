use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::ScrapeError;

/// Narrow capability over the external scraper: run it to completion and
/// return the raw artifact text. Blocking.
pub trait ScraperRunner: Send + Sync {
    fn run(&self) -> Result<String, ScrapeError>;
}

/// How the scraper process is started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchStrategy {
    /// `interpreter script`, e.g. `python3 start_scraper.py`.
    EntryScript { interpreter: String, script: String },
    /// `program crawl spider`, e.g. `scrapy crawl bolagsplatsen`.
    Crawl { program: String, spider: String },
    /// EntryScript when the script exists in the workdir, Crawl otherwise.
    Auto {
        interpreter: String,
        script: String,
        program: String,
        spider: String,
    },
}

impl LaunchStrategy {
    /// Resolve to a concrete `(program, args)` pair for the given workdir.
    pub fn command(&self, workdir: &Path) -> (String, Vec<String>) {
        match self {
            LaunchStrategy::EntryScript { interpreter, script } => {
                (interpreter.clone(), vec![script.clone()])
            }
            LaunchStrategy::Crawl { program, spider } => {
                (program.clone(), vec!["crawl".to_string(), spider.clone()])
            }
            LaunchStrategy::Auto {
                interpreter,
                script,
                program,
                spider,
            } => {
                if workdir.join(script).exists() {
                    (interpreter.clone(), vec![script.clone()])
                } else {
                    (program.clone(), vec!["crawl".to_string(), spider.clone()])
                }
            }
        }
    }
}

impl fmt::Display for LaunchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchStrategy::EntryScript { interpreter, script } => {
                write!(f, "script ({interpreter} {script})")
            }
            LaunchStrategy::Crawl { program, spider } => write!(f, "crawl ({program} crawl {spider})"),
            LaunchStrategy::Auto { script, spider, .. } => {
                write!(f, "auto ({script} if present, else crawl {spider})")
            }
        }
    }
}

/// Runs the scraper as a child process and reads the JSON file it leaves behind.
pub struct ProcessRunner {
    strategy: LaunchStrategy,
    workdir: PathBuf,
    artifact: PathBuf,
}

impl ProcessRunner {
    pub fn new(strategy: LaunchStrategy, workdir: impl Into<PathBuf>, output: &str) -> Self {
        let workdir = workdir.into();
        let artifact = workdir.join(output);
        Self {
            strategy,
            workdir,
            artifact,
        }
    }

    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    /// A leftover file from an earlier run must not be mistaken for fresh output.
    fn remove_stale_artifact(&self) -> Result<(), ScrapeError> {
        match fs::remove_file(&self.artifact) {
            Ok(()) => {
                debug!("[RUNNER] removed stale artifact {}", self.artifact.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl ScraperRunner for ProcessRunner {
    fn run(&self) -> Result<String, ScrapeError> {
        self.remove_stale_artifact()?;

        let (program, args) = self.strategy.command(&self.workdir);
        info!(
            "[RUNNER] launching `{program} {}` in {}",
            args.join(" "),
            self.workdir.display()
        );

        let started = Instant::now();
        let output = Command::new(&program)
            .args(&args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| ScrapeError::Unexpected(format!("failed to launch {program}: {e}")))?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("[RUNNER] stdout tail: {}", tail(&stdout, 2000));
        debug!("[RUNNER] stderr tail: {}", tail(&stderr, 2000));

        if !output.status.success() {
            let status = output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "terminated by signal".to_string());
            warn!(elapsed_ms, "[RUNNER] scraper exited with status {status}");
            return Err(ScrapeError::ProcessFailure {
                status,
                stderr: stderr.trim().to_string(),
            });
        }
        info!(elapsed_ms, "[RUNNER] scraper completed");

        match fs::read_to_string(&self.artifact) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("[RUNNER] no artifact at {}", self.artifact.display());
                Err(ScrapeError::MissingArtifact(self.artifact.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Last `max` bytes of `s`, cut on a char boundary.
fn tail(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut start = s.len() - max;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}
