//! ServerContext - platform capabilities handed to handlers at registration
//!
//! Collaborator operations sometimes need a filesystem root (database
//! directories, asset fixtures) or the address the server is reachable at.
//! Those capabilities live here and are injected into handler construction;
//! nothing in the dispatch core touches them.

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct ServerContext {
    /// Root directory for collaborator files (injected as the `directory`
    /// argument by the HTTP adapter when the caller omits it)
    files_dir: PathBuf,
    /// Address this server is bound to
    local_addr: IpAddr,
}

impl ServerContext {
    pub fn new(files_dir: impl Into<PathBuf>, local_addr: IpAddr) -> Self {
        Self {
            files_dir: files_dir.into(),
            local_addr,
        }
    }

    pub fn files_dir(&self) -> &Path {
        &self.files_dir
    }

    pub fn local_addr(&self) -> IpAddr {
        self.local_addr
    }

    /// Read a fixture shipped alongside the server (test blobs, seed data).
    /// The name is resolved under the files directory.
    pub fn load_asset(&self, name: &str) -> Result<Vec<u8>> {
        Ok(std::fs::read(self.files_dir.join(name))?)
    }
}
