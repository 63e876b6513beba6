use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::{Accession, Lineage};
use crate::ena::EnaClient;
use crate::error::FetchError;
use crate::manifest::Manifest;
use crate::store::Store;

#[derive(Debug, Clone, Copy)]
pub struct DownloadOptions {
    /// Strict all-or-nothing mode: one unknown accession aborts the batch.
    pub download_all: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self { download_all: true }
    }
}

/// Outcome of one `download_accessions` call. Soft failures land here rather
/// than in an `Err`; the caller decides how loudly to report them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DownloadReport {
    pub unknown: Vec<Accession>,
    pub skipped: Vec<Accession>,
    pub downloaded: Vec<Accession>,
    pub failed: Vec<Accession>,
    pub aborted: bool,
}

impl DownloadReport {
    pub fn all_verified(&self) -> bool {
        !self.aborted && self.failed.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LineagesResult {
    pub lineages: Vec<Lineage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineageAccessionsResult {
    pub lineage: Lineage,
    pub accessions: Vec<Accession>,
}

/// Orchestrates the manifest indices, the local artifact set and the ENA
/// client. All lookup structures are built once here and never rebuilt.
pub struct Fetcher<E: EnaClient> {
    manifest: Manifest,
    store: Store,
    local: BTreeSet<Accession>,
    ena: E,
}

impl<E: EnaClient> Fetcher<E> {
    pub fn new(manifest: Manifest, store: Store, ena: E) -> Result<Self, FetchError> {
        let local = store.scan_local()?;
        Ok(Self {
            manifest,
            store,
            local,
            ena,
        })
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn local_accessions(&self) -> &BTreeSet<Accession> {
        &self.local
    }

    /// Downloads the requested accessions, skipping those already local.
    ///
    /// With `download_all` set (the default) an unknown accession aborts the
    /// whole batch before any download is attempted. Without it, unknowns are
    /// reported and the remaining fetchable accessions are downloaded anyway.
    /// Each download is followed by an existence check on the artifact; only a
    /// verified artifact joins the local set.
    pub fn download_accessions(
        &mut self,
        requested: &[Accession],
        options: DownloadOptions,
    ) -> DownloadReport {
        let mut report = DownloadReport::default();
        let mut fetchable = Vec::new();

        for accession in requested {
            if !self.manifest.contains(accession) {
                tracing::warn!(%accession, "accession does not exist in the manifest");
                report.unknown.push(accession.clone());
            } else if self.local.contains(accession) {
                report.skipped.push(accession.clone());
            } else {
                fetchable.push(accession.clone());
            }
        }

        if options.download_all && !report.unknown.is_empty() {
            report.aborted = true;
            return report;
        }

        for accession in fetchable {
            let destination = self.store.artifact_path(&accession);
            if let Err(err) = self
                .ena
                .download_sequence(&accession, destination.as_std_path())
            {
                tracing::warn!(%accession, error = %err, "download failed");
            }
            if self.verify(&accession) {
                report.downloaded.push(accession);
            } else {
                report.failed.push(accession);
            }
        }

        report
    }

    pub fn lineages(&self) -> LineagesResult {
        LineagesResult {
            lineages: self.manifest.lineages(),
        }
    }

    /// Unknown lineages are a soft miss: an empty result plus a diagnostic.
    pub fn accessions_by_lineage(&self, lineage: &Lineage) -> LineageAccessionsResult {
        let accessions = match self.manifest.accessions_by_lineage(lineage) {
            Some(set) => set.iter().cloned().collect(),
            None => {
                tracing::warn!(%lineage, "lineage is not present in the manifest");
                Vec::new()
            }
        };
        LineageAccessionsResult {
            lineage: lineage.clone(),
            accessions,
        }
    }

    fn verify(&mut self, accession: &Accession) -> bool {
        if !self.store.artifact_exists(accession) {
            tracing::warn!(
                %accession,
                "accession found in the manifest but its artifact did not appear on disk"
            );
            return false;
        }
        self.local.insert(accession.clone());
        true
    }
}
