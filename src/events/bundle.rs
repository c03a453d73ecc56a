//! Messages exchanged with the manifest reader thread.
//!
//! See [`crate::resources::manifestloader`] and
//! [`crate::systems::bundle::manifest_thread`].

use std::path::PathBuf;

use crate::resources::manifest::BundleManifest;

/// Commands sent *to* the manifest thread
#[derive(Debug)]
pub enum ManifestCmd {
    Read { id: String, path: PathBuf },
    Shutdown,
}

/// Results sent *back* from the manifest thread
#[derive(Debug)]
pub enum ManifestMessage {
    Parsed { id: String, manifest: BundleManifest },
    Failed { id: String, error: String },
}
