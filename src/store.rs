use std::collections::BTreeSet;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::domain::Accession;
use crate::error::FetchError;

/// Storage directory for downloaded sequence artifacts, one
/// `<accession>.fasta` file per record.
#[derive(Debug, Clone)]
pub struct Store {
    data_dir: Utf8PathBuf,
}

impl Store {
    /// Opens the storage directory, creating it (and parents) if missing.
    pub fn open(data_dir: impl Into<Utf8PathBuf>) -> Result<Self, FetchError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(data_dir.as_std_path())
            .map_err(|err| FetchError::Filesystem(err.to_string()))?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Utf8Path {
        &self.data_dir
    }

    pub fn artifact_path(&self, accession: &Accession) -> Utf8PathBuf {
        self.data_dir.join(format!("{accession}.fasta"))
    }

    pub fn artifact_exists(&self, accession: &Accession) -> bool {
        self.artifact_path(accession).as_std_path().exists()
    }

    /// Lists the storage directory and collects the accession of every
    /// `.fasta` artifact, taken as the filename with that extension stripped.
    /// The stem must survive a dotted version suffix, so only the trailing
    /// extension is removed. Other entries are ignored.
    pub fn scan_local(&self) -> Result<BTreeSet<Accession>, FetchError> {
        let mut local = BTreeSet::new();
        let entries = fs::read_dir(self.data_dir.as_std_path())
            .map_err(|err| FetchError::Filesystem(err.to_string()))?;
        for entry in entries {
            let entry = entry.map_err(|err| FetchError::Filesystem(err.to_string()))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let Some(stem) = name.strip_suffix(".fasta") else {
                continue;
            };
            if !stem.is_empty() {
                local.insert(Accession::new(stem));
            }
        }
        Ok(local)
    }
}
