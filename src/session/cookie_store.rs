//! Cookie storage backends.
//!
//! Stores behave like a browser jar: writing a cookie with a zero max-age or
//! an expiry in the past deletes it, and expired cookies read as absent.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use axum_extra::extract::cookie::Cookie;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum CookieStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid cookie file: {0}")]
    Json(#[from] serde_json::Error),
}

/// A jar of cookies keyed by name.
pub trait CookieStore: Send + Sync {
    /// Returns the cookie named `name` unless it is absent or expired.
    fn get(&self, name: &str) -> Option<Cookie<'static>>;

    /// Stores `cookie`, replacing any cookie with the same name.
    fn set(&self, cookie: Cookie<'static>) -> Result<(), CookieStoreError>;

    /// Names of all live cookies, sorted.
    fn names(&self) -> Vec<String>;
}

pub(crate) fn is_expired(cookie: &Cookie<'_>, now: OffsetDateTime) -> bool {
    if cookie.max_age().is_some_and(|age| age <= Duration::ZERO) {
        return true;
    }
    cookie.expires_datetime().is_some_and(|at| at <= now)
}

/// Pins a relative max-age to an absolute expiry so it survives a restart.
fn normalize(mut cookie: Cookie<'static>, now: OffsetDateTime) -> Cookie<'static> {
    if cookie.expires_datetime().is_none() {
        if let Some(age) = cookie.max_age() {
            cookie.set_expires(now + age);
        }
    }
    cookie
}

/// Applies a write to `jar`. Returns true when the jar changed.
fn apply(jar: &mut HashMap<String, Cookie<'static>>, cookie: Cookie<'static>) -> bool {
    let now = OffsetDateTime::now_utc();
    if is_expired(&cookie, now) {
        debug!("Removing cookie {}", cookie.name());
        return jar.remove(cookie.name()).is_some();
    }
    let cookie = normalize(cookie, now);
    jar.insert(cookie.name().to_string(), cookie);
    true
}

fn get_live(jar: &mut HashMap<String, Cookie<'static>>, name: &str) -> Option<Cookie<'static>> {
    let expired = is_expired(jar.get(name)?, OffsetDateTime::now_utc());
    if expired {
        debug!("Cookie {} expired", name);
        jar.remove(name);
        return None;
    }
    jar.get(name).cloned()
}

fn live_names(jar: &HashMap<String, Cookie<'static>>) -> Vec<String> {
    let now = OffsetDateTime::now_utc();
    let mut names: Vec<String> = jar
        .values()
        .filter(|c| !is_expired(c, now))
        .map(|c| c.name().to_string())
        .collect();
    names.sort();
    names
}

/// In-process cookie jar.
#[derive(Default)]
pub struct MemoryCookieStore {
    jar: Mutex<HashMap<String, Cookie<'static>>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieStore for MemoryCookieStore {
    fn get(&self, name: &str) -> Option<Cookie<'static>> {
        get_live(&mut self.jar.lock().unwrap(), name)
    }

    fn set(&self, cookie: Cookie<'static>) -> Result<(), CookieStoreError> {
        apply(&mut self.jar.lock().unwrap(), cookie);
        Ok(())
    }

    fn names(&self) -> Vec<String> {
        live_names(&self.jar.lock().unwrap())
    }
}

#[derive(Serialize, Deserialize, Default)]
struct Dump {
    /// One `Set-Cookie` style line per cookie.
    cookies: Vec<String>,
}

/// Cookie jar persisted as JSON, rewritten on every change.
pub struct FileCookieStore {
    file_path: PathBuf,
    jar: Mutex<HashMap<String, Cookie<'static>>>,
}

impl FileCookieStore {
    fn load_dump_from_file(file_path: &Path) -> Result<Dump, CookieStoreError> {
        let mut file = File::open(file_path)?;

        let mut content = String::new();
        file.read_to_string(&mut content)?;

        Ok(serde_json::from_str(&content)?)
    }

    /// Opens the jar at `file_path`. A missing file is an empty jar, an
    /// unreadable one is an error.
    pub fn open(file_path: PathBuf) -> Result<Self, CookieStoreError> {
        let dump = if file_path.exists() {
            Self::load_dump_from_file(&file_path)?
        } else {
            Dump::default()
        };

        let now = OffsetDateTime::now_utc();
        let mut jar = HashMap::new();
        for line in dump.cookies {
            match Cookie::parse(line) {
                Ok(cookie) if !is_expired(&cookie, now) => {
                    jar.insert(cookie.name().to_string(), cookie);
                }
                Ok(cookie) => debug!("Dropping expired cookie {}", cookie.name()),
                Err(err) => warn!("Skipping malformed cookie in {:?}: {}", file_path, err),
            }
        }

        Ok(Self {
            file_path,
            jar: Mutex::new(jar),
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn save_dump(&self, jar: &HashMap<String, Cookie<'static>>) -> Result<(), CookieStoreError> {
        let mut cookies: Vec<String> = jar.values().map(|c| c.to_string()).collect();
        cookies.sort();
        let json_string = serde_json::to_string_pretty(&Dump { cookies })?;

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // Holds bearer and refresh tokens.
        #[cfg(unix)]
        options.mode(0o600);
        let mut file = options.open(&self.file_path)?;
        file.write_all(json_string.as_bytes())?;
        Ok(())
    }
}

impl CookieStore for FileCookieStore {
    fn get(&self, name: &str) -> Option<Cookie<'static>> {
        get_live(&mut self.jar.lock().unwrap(), name)
    }

    fn set(&self, cookie: Cookie<'static>) -> Result<(), CookieStoreError> {
        let mut jar = self.jar.lock().unwrap();
        let mut updated = jar.clone();
        if apply(&mut updated, cookie) {
            // The in-memory jar only changes once the dump is on disk.
            self.save_dump(&updated)?;
            *jar = updated;
        }
        Ok(())
    }

    fn names(&self) -> Vec<String> {
        live_names(&self.jar.lock().unwrap())
    }
}
