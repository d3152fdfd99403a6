//! Per-submission result storage.
//!
//! Every submission gets its own token and directory:
//!
//! ```text
//! <root>/<token>/manifest.json
//! <root>/<token>/<file>...
//! ```
//!
//! The manifest records each file's size and SHA-256 so a fetch can detect a
//! file changed on disk. Submissions older than the store's time-to-live are
//! refused and removed by [`ArtifactStore::sweep`].

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ReportError, Result};

const MANIFEST_FILE: &str = "manifest.json";

/// Handle to one stored submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(Uuid);

impl Token {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Token {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| ReportError::UnknownToken {
                token: s.to_string(),
            })
    }
}

/// One stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub name: String,
    pub size: u64,
    pub sha256: String,
}

/// Contents of `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub token: Token,
    /// What produced the files, e.g. `shortage` or `supply-gapji`.
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub files: Vec<StoredFile>,
}

impl Manifest {
    pub fn file(&self, name: &str) -> Option<&StoredFile> {
        self.files.iter().find(|file| file.name == name)
    }

    pub fn is_expired(&self, ttl: TimeDelta, now: DateTime<Utc>) -> bool {
        now - self.created_at >= ttl
    }
}

/// SHA-256 of a byte slice as lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 of a file, read in chunks.
pub fn file_sha256(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| ReportError::io("read", path, e))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| ReportError::io("read", path, e))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Write through a temp file, then rename into place.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path).map_err(|e| ReportError::io("create", &temp_path, e))?;
    file.write_all(bytes)
        .map_err(|e| ReportError::io("write", &temp_path, e))?;
    file.sync_all()
        .map_err(|e| ReportError::io("sync", &temp_path, e))?;
    fs::rename(&temp_path, path).map_err(|e| ReportError::io("rename", path, e))?;
    Ok(())
}

fn validate_name(name: &str) -> Result<()> {
    let plain = Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name);
    if !plain || name == MANIFEST_FILE {
        return Err(ReportError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn read_manifest(path: &Path) -> Result<Manifest> {
    let bytes = fs::read(path).map_err(|e| ReportError::io("read", path, e))?;
    serde_json::from_slice(&bytes).map_err(|source| ReportError::Manifest {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the files and then the manifest of a new submission into `dir`.
fn write_submission(
    dir: &Path,
    token: Token,
    kind: &str,
    files: &[(String, Vec<u8>)],
) -> Result<Manifest> {
    let mut stored = Vec::with_capacity(files.len());
    for (name, bytes) in files {
        write_atomic(&dir.join(name), bytes)?;
        stored.push(StoredFile {
            name: name.clone(),
            size: bytes.len() as u64,
            sha256: sha256_hex(bytes),
        });
    }

    let manifest = Manifest {
        token,
        kind: kind.to_string(),
        created_at: Utc::now(),
        files: stored,
    };
    let manifest_path = dir.join(MANIFEST_FILE);
    let json = serde_json::to_vec_pretty(&manifest).map_err(|source| ReportError::Manifest {
        path: manifest_path.clone(),
        source,
    })?;
    write_atomic(&manifest_path, &json)?;
    Ok(manifest)
}

/// Directory-backed store of submission outputs.
#[derive(Debug)]
pub struct ArtifactStore {
    root: PathBuf,
    ttl: TimeDelta,
    index: Mutex<BTreeMap<Token, Manifest>>,
}

impl ArtifactStore {
    /// Open (or create) a store and load the manifests already on disk.
    ///
    /// Directories with an unreadable manifest are skipped with a warning.
    pub fn open(root: &Path, ttl: TimeDelta) -> Result<Self> {
        fs::create_dir_all(root).map_err(|e| ReportError::io("create directory", root, e))?;

        let mut index = BTreeMap::new();
        let entries = fs::read_dir(root).map_err(|e| ReportError::io("list", root, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| ReportError::io("list", root, e))?;
            let manifest_path = entry.path().join(MANIFEST_FILE);
            if !manifest_path.is_file() {
                continue;
            }
            match read_manifest(&manifest_path) {
                Ok(manifest) => {
                    index.insert(manifest.token, manifest);
                }
                Err(error) => warn!(path = %manifest_path.display(), %error, "skipping submission"),
            }
        }
        debug!(root = %root.display(), submissions = index.len(), "opened artifact store");

        Ok(Self {
            root: root.to_path_buf(),
            ttl,
            index: Mutex::new(index),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    fn submission_dir(&self, token: Token) -> PathBuf {
        self.root.join(token.to_string())
    }

    fn index(&self) -> std::sync::MutexGuard<'_, BTreeMap<Token, Manifest>> {
        self.index.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store the files of one submission under a new token.
    pub fn put(&self, kind: &str, files: &[(String, Vec<u8>)]) -> Result<Token> {
        for (name, _) in files {
            validate_name(name)?;
        }

        let token = Token::generate();
        let dir = self.submission_dir(token);
        fs::create_dir_all(&dir).map_err(|e| ReportError::io("create directory", &dir, e))?;

        let manifest = match write_submission(&dir, token, kind, files) {
            Ok(manifest) => manifest,
            Err(error) => {
                if let Err(cleanup) = fs::remove_dir_all(&dir) {
                    warn!(path = %dir.display(), error = %cleanup, "failed to remove partial submission");
                }
                return Err(error);
            }
        };

        info!(%token, kind, files = manifest.files.len(), "stored submission");
        self.index().insert(token, manifest);
        Ok(token)
    }

    /// Manifest of a live submission.
    pub fn manifest(&self, token: Token) -> Result<Manifest> {
        let manifest = self
            .index()
            .get(&token)
            .cloned()
            .ok_or_else(|| ReportError::UnknownToken {
                token: token.to_string(),
            })?;
        if manifest.is_expired(self.ttl, Utc::now()) {
            return Err(ReportError::Expired {
                token: token.to_string(),
            });
        }
        Ok(manifest)
    }

    /// Path of a stored file after checking expiry and checksum.
    pub fn get(&self, token: Token, name: &str) -> Result<PathBuf> {
        let manifest = self.manifest(token)?;
        let stored = manifest.file(name).ok_or_else(|| ReportError::UnknownFile {
            token: token.to_string(),
            name: name.to_string(),
        })?;

        let path = self.submission_dir(token).join(&stored.name);
        let actual = file_sha256(&path)?;
        if actual != stored.sha256 {
            return Err(ReportError::ChecksumMismatch {
                path,
                expected: stored.sha256.clone(),
                actual,
            });
        }
        debug!(%token, name, "verified artifact");
        Ok(path)
    }

    /// All submissions that have not expired, oldest first.
    pub fn list(&self) -> Vec<Manifest> {
        let now = Utc::now();
        let mut live: Vec<Manifest> = self
            .index()
            .values()
            .filter(|manifest| !manifest.is_expired(self.ttl, now))
            .cloned()
            .collect();
        live.sort_by_key(|manifest| manifest.created_at);
        live
    }

    /// Delete submissions expired at `now`; returns how many were removed.
    ///
    /// Token directories without a manifest count as submissions created at
    /// their directory's modification time.
    pub fn sweep(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut index = self.index();
        let expired: Vec<Token> = index
            .values()
            .filter(|manifest| manifest.is_expired(self.ttl, now))
            .map(|manifest| manifest.token)
            .collect();

        for token in &expired {
            let dir = self.submission_dir(*token);
            if dir.exists() {
                fs::remove_dir_all(&dir).map_err(|e| ReportError::io("remove", &dir, e))?;
            }
            index.remove(token);
        }

        let orphans = self.sweep_orphans(now)?;
        let removed = expired.len() + orphans;
        if removed > 0 {
            info!(removed, orphans, "swept expired submissions");
        }
        Ok(removed)
    }

    fn sweep_orphans(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut removed = 0;
        let entries = fs::read_dir(&self.root).map_err(|e| ReportError::io("list", &self.root, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| ReportError::io("list", &self.root, e))?;
            let dir = entry.path();
            let is_token = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.parse::<Token>().is_ok());
            if !is_token || !dir.is_dir() || dir.join(MANIFEST_FILE).exists() {
                continue;
            }
            let modified = entry
                .metadata()
                .and_then(|metadata| metadata.modified())
                .map_err(|e| ReportError::io("inspect", &dir, e))?;
            if now - DateTime::<Utc>::from(modified) < self.ttl {
                continue;
            }
            fs::remove_dir_all(&dir).map_err(|e| ReportError::io("remove", &dir, e))?;
            debug!(path = %dir.display(), "removed submission without manifest");
            removed += 1;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_parse_rejects_garbage() {
        assert!(matches!(
            "not-a-token".parse::<Token>(),
            Err(ReportError::UnknownToken { .. })
        ));
        let token = Token::generate();
        assert_eq!(token.to_string().parse::<Token>().unwrap(), token);
    }

    #[test]
    fn names_must_be_plain() {
        assert!(validate_name("result.xlsx").is_ok());
        assert!(validate_name("../escape.xlsx").is_err());
        assert!(validate_name("dir/file.xlsx").is_err());
        assert!(validate_name(MANIFEST_FILE).is_err());
        assert!(validate_name("").is_err());
    }

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
