// src/config.rs

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use dotenvy::dotenv;

use crate::{bank::PYTHON_BASICS, error::AppError};

/// Minimum number of correct answers required to pass.
pub const DEFAULT_PASS_MARK: i64 = 5;

/// Advisory attempt duration in seconds (10 minutes).
pub const DEFAULT_QUIZ_DURATION_SECS: i64 = 600;

/// Longest accepted attempt duration (one week).
pub const MAX_QUIZ_DURATION_SECS: i64 = 7 * 86_400;

/// Session token lifetime in seconds.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;

pub const DEFAULT_PORT: u16 = 5000;

pub const DATABASE_FILE: &str = "quiz.db";

const DEV_SECRET_KEY: &str = "dev-only-quizgate";
const WRITE_PROBE_FILE: &str = ".write_test";

#[derive(Debug, Clone)]
pub struct Config {
    pub pass_mark: i64,
    pub quiz_duration_secs: i64,
    /// Configured storage location, before the writable fallback is applied.
    pub data_dir: PathBuf,
    pub secret_key: String,
    pub session_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let secret_key = env::var("SECRET_KEY").unwrap_or_else(|_| {
            tracing::warn!("SECRET_KEY not set, using the development signing key");
            DEV_SECRET_KEY.to_string()
        });

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        Self {
            pass_mark: parse_or("PASS_MARK", DEFAULT_PASS_MARK),
            quiz_duration_secs: parse_or("QUIZ_DURATION", DEFAULT_QUIZ_DURATION_SECS),
            data_dir,
            secret_key,
            session_ttl_secs: parse_or("SESSION_TTL", DEFAULT_SESSION_TTL_SECS),
            port: parse_or("PORT", DEFAULT_PORT),
            rust_log,
        }
        .within_bounds()
    }

    /// Replaces out-of-range thresholds with their defaults.
    ///
    /// The pass mark must be reachable and non-trivial (`1..=question count`),
    /// and the attempt duration positive and at most a week.
    pub fn within_bounds(mut self) -> Self {
        let question_count = PYTHON_BASICS.len() as i64;
        if !(1..=question_count).contains(&self.pass_mark) {
            tracing::warn!(
                "PASS_MARK {} outside 1..={}, using default {}",
                self.pass_mark,
                question_count,
                DEFAULT_PASS_MARK
            );
            self.pass_mark = DEFAULT_PASS_MARK;
        }
        if !(1..=MAX_QUIZ_DURATION_SECS).contains(&self.quiz_duration_secs) {
            tracing::warn!(
                "QUIZ_DURATION {} outside 1..={}, using default {}",
                self.quiz_duration_secs,
                MAX_QUIZ_DURATION_SECS,
                DEFAULT_QUIZ_DURATION_SECS
            );
            self.quiz_duration_secs = DEFAULT_QUIZ_DURATION_SECS;
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pass_mark: DEFAULT_PASS_MARK,
            quiz_duration_secs: DEFAULT_QUIZ_DURATION_SECS,
            data_dir: PathBuf::from("."),
            secret_key: DEV_SECRET_KEY.to_string(),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            port: DEFAULT_PORT,
            rust_log: "info".to_string(),
        }
    }
}

fn parse_or<T: std::str::FromStr + Copy + std::fmt::Display>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value {:?} for {}, using default {}", raw, key, default);
            default
        }),
        Err(_) => default,
    }
}

/// Checks that `dir` exists (creating it if needed) and accepts writes.
fn probe_writable(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    let probe = dir.join(WRITE_PROBE_FILE);
    fs::write(&probe, b"ok")?;
    fs::remove_file(&probe)?;
    Ok(())
}

/// Resolves the storage directory.
///
/// Uses `preferred` when it is writable, otherwise falls back to `fallback`.
/// Fails with `StorageUnavailable` when neither accepts writes.
pub fn resolve_data_dir(preferred: &Path, fallback: &Path) -> Result<PathBuf, AppError> {
    match probe_writable(preferred) {
        Ok(()) => return Ok(preferred.to_path_buf()),
        Err(e) => tracing::warn!(
            "Data dir {} is not writable ({}), falling back to {}",
            preferred.display(),
            e,
            fallback.display()
        ),
    }

    probe_writable(fallback).map_err(|e| {
        AppError::StorageUnavailable(format!(
            "neither {} nor {} is writable: {}",
            preferred.display(),
            fallback.display(),
            e
        ))
    })?;

    Ok(fallback.to_path_buf())
}
