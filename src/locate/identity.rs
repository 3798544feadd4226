//! Resolution of the user whose cache is dumped
//!
//! When started through `sudo`, the invoking user is the one whose Discord
//! cache is wanted, and the dumped files should belong to them rather than
//! to root.

use super::Platform;
use crate::error::{DumpError, DumpResult};
use std::path::PathBuf;
use tracing::debug;

/// Numeric owner applied to dumped files and directories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner {
    pub uid: u32,
    pub gid: u32,
}

/// The user on whose behalf the dump runs
#[derive(Debug, Clone)]
pub struct Identity {
    /// Login name (the sudo caller when run through sudo)
    pub user_name: String,
    /// Home directory the cache paths are resolved against
    pub home: PathBuf,
    /// Whether the process runs with root privileges
    pub is_root: bool,
    /// Owner for created files; `None` where ownership is not applicable
    pub owner: Option<Owner>,
}

impl Identity {
    /// Resolve the identity from the process environment
    pub fn detect(platform: Platform, home_override: Option<PathBuf>) -> DumpResult<Self> {
        Self::resolve(
            platform,
            |key| std::env::var(key).ok(),
            dirs::home_dir(),
            effective_ids(),
            home_override,
        )
    }

    /// Resolve from explicit inputs.
    ///
    /// `ids` holds the effective uid and gid on Unix and is `None` elsewhere.
    pub fn resolve(
        platform: Platform,
        env: impl Fn(&str) -> Option<String>,
        home_dir: Option<PathBuf>,
        ids: Option<(u32, u32)>,
        home_override: Option<PathBuf>,
    ) -> DumpResult<Self> {
        let sudo_user = env("SUDO_USER").filter(|u| !u.is_empty());

        let user_name = match platform {
            Platform::Windows => env("USERNAME")
                .map(|name| match name.split_once('\\') {
                    Some((_domain, user)) => user.to_string(),
                    None => name,
                })
                .ok_or(DumpError::UserNotFound)?,
            _ => sudo_user
                .clone()
                .or_else(|| env("USER"))
                .or_else(|| env("LOGNAME"))
                .ok_or(DumpError::UserNotFound)?,
        };

        let owner = match ids {
            Some((uid, gid)) => Some(Owner {
                uid: parse_id(&env, "SUDO_UID")?.unwrap_or(uid),
                gid: parse_id(&env, "SUDO_GID")?.unwrap_or(gid),
            }),
            None => None,
        };
        let is_root = matches!(ids, Some((0, _)));

        let invoked_by_user = sudo_user.is_some() && owner.is_some_and(|o| o.uid != 0);
        let home = match home_override {
            Some(home) => home,
            None if invoked_by_user => match platform {
                Platform::MacOS => PathBuf::from("/Users").join(&user_name),
                // Assumes the user kept the default home location.
                _ => PathBuf::from("/home").join(&user_name),
            },
            None => home_dir.ok_or_else(|| DumpError::HomeNotFound(user_name.clone()))?,
        };

        debug!(
            "Resolved user {} (root: {}) with home {}",
            user_name,
            is_root,
            home.display()
        );

        Ok(Self {
            user_name,
            home,
            is_root,
            owner,
        })
    }

    /// Owner to chown created paths to; only meaningful when running as root
    pub fn chown_target(&self) -> Option<Owner> {
        if self.is_root {
            self.owner
        } else {
            None
        }
    }
}

fn parse_id(env: &impl Fn(&str) -> Option<String>, var: &'static str) -> DumpResult<Option<u32>> {
    match env(var) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| DumpError::InvalidId { var, value }),
        None => Ok(None),
    }
}

#[cfg(unix)]
fn effective_ids() -> Option<(u32, u32)> {
    use rustix::process::{getegid, geteuid};
    Some((geteuid().as_raw(), getegid().as_raw()))
}

#[cfg(not(unix))]
fn effective_ids() -> Option<(u32, u32)> {
    None
}
