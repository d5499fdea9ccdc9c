//! File-backed credential store.
//!
//! The session identity lives in `credentials.json` inside a directory opened
//! through cap-std, so the adapter can only touch files under that root.
//! Writes go to a hidden temporary file first and are renamed into place, so
//! a crash mid-write never leaves a truncated identity behind.

use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::UserIdentity;
use crate::domain::ports::{CredentialStore, CredentialStoreError};

/// File name used inside the credentials directory.
pub const CREDENTIALS_FILE: &str = "credentials.json";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredIdentity {
    user_id: Option<String>,
    auth_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredIdentityRef<'a> {
    user_id: &'a str,
    auth_token: &'a str,
}

/// Credential store persisting the identity as plain JSON.
pub struct FileCredentialStore {
    dir: Dir,
}

impl FileCredentialStore {
    /// Open (creating if needed) the credentials directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialStoreError::Io`] when the directory cannot be
    /// created or opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CredentialStoreError> {
        let path = path.as_ref();
        Dir::create_ambient_dir_all(path, ambient_authority()).map_err(map_io_error)?;
        let dir = Dir::open_ambient_dir(path, ambient_authority()).map_err(map_io_error)?;
        Ok(Self::from_dir(dir))
    }

    /// Wrap an already opened directory.
    #[must_use]
    pub fn from_dir(dir: Dir) -> Self {
        Self { dir }
    }
}

impl CredentialStore for FileCredentialStore {
    fn identity(&self) -> Result<Option<UserIdentity>, CredentialStoreError> {
        let contents = match self.dir.read_to_string(CREDENTIALS_FILE) {
            Ok(contents) => Zeroizing::new(contents),
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(map_io_error(err)),
        };
        let stored: StoredIdentity = serde_json::from_str(&contents)
            .map_err(|err| CredentialStoreError::corrupt(err.to_string()))?;
        let (Some(user_id), Some(auth_token)) = (stored.user_id, stored.auth_token) else {
            return Err(CredentialStoreError::corrupt(
                "stored identity is missing userId or authToken",
            ));
        };
        UserIdentity::try_from_parts(user_id, auth_token)
            .map(Some)
            .map_err(|err| CredentialStoreError::corrupt(err.to_string()))
    }

    fn save(&self, identity: &UserIdentity) -> Result<(), CredentialStoreError> {
        let contents = serde_json::to_string(&StoredIdentityRef {
            user_id: identity.id().as_ref(),
            auth_token: identity.token().expose(),
        })
        .map(Zeroizing::new)
        .map_err(|err| CredentialStoreError::io(err.to_string()))?;
        write_atomic(&self.dir, CREDENTIALS_FILE, &contents)?;
        debug!(user_id = %identity.id(), "credentials saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        match self.dir.remove_file(CREDENTIALS_FILE) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(map_io_error(err)),
        }
    }
}

fn map_io_error(error: io::Error) -> CredentialStoreError {
    CredentialStoreError::io(error.to_string())
}

fn write_atomic(dir: &Dir, file_name: &str, contents: &str) -> Result<(), CredentialStoreError> {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(
        ".{}.tmp.{}.{}.{}",
        file_name,
        std::process::id(),
        suffix,
        counter
    );

    write_to_temp_file(dir, &tmp_name, contents)?;
    if let Err(err) = rename_temp_to_target(dir, &tmp_name, file_name) {
        drop(dir.remove_file(&tmp_name));
        return Err(map_io_error(err));
    }
    Ok(())
}

fn write_to_temp_file(dir: &Dir, tmp_name: &str, contents: &str) -> Result<(), CredentialStoreError> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options).map_err(map_io_error)?;

    if let Err(err) = file.write_all(contents.as_bytes()).and_then(|()| file.sync_all()) {
        drop(file);
        drop(dir.remove_file(tmp_name));
        return Err(map_io_error(err));
    }
    Ok(())
}

#[cfg(windows)]
fn rename_temp_to_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows rename fails if the target exists.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn rename_temp_to_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}
