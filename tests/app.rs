use std::path::Path;
use std::sync::Mutex;

use camino::Utf8PathBuf;

use ena_accession_fetcher::app::{DownloadOptions, Fetcher};
use ena_accession_fetcher::domain::Accession;
use ena_accession_fetcher::ena::EnaClient;
use ena_accession_fetcher::error::FetchError;
use ena_accession_fetcher::manifest::Manifest;
use ena_accession_fetcher::store::Store;

/// Writes a plausible FASTA body for every requested accession and records
/// the request order.
#[derive(Default)]
struct MockEna {
    calls: Mutex<Vec<String>>,
}

impl EnaClient for MockEna {
    fn download_sequence(
        &self,
        accession: &Accession,
        destination: &Path,
    ) -> Result<(), FetchError> {
        self.calls.lock().unwrap().push(accession.to_string());
        std::fs::write(destination, format!(">ENA|{accession}\nACGTACGT\n"))
            .map_err(|err| FetchError::Filesystem(err.to_string()))?;
        Ok(())
    }
}

/// Accepts the request but never produces a file, so verification must fail.
#[derive(Default)]
struct SilentEna;

impl EnaClient for SilentEna {
    fn download_sequence(
        &self,
        _accession: &Accession,
        _destination: &Path,
    ) -> Result<(), FetchError> {
        Ok(())
    }
}

const MANIFEST: &str = "\
acc\tlineage\tcountry
ABC123\tB.1.1.7\tUK
DEF456\tB.1.1.7\tDK
GHI789\tP.1\tBR
";

fn store_in(dir: &Path) -> Store {
    Store::open(Utf8PathBuf::from_path_buf(dir.to_path_buf()).unwrap()).unwrap()
}

fn acc(value: &str) -> Accession {
    value.parse().unwrap()
}

#[test]
fn strict_batch_with_unknown_accession_writes_nothing() {
    let temp = tempfile::tempdir().unwrap();
    let manifest = Manifest::parse(MANIFEST).unwrap();
    let mut fetcher = Fetcher::new(manifest, store_in(temp.path()), MockEna::default()).unwrap();

    let report = fetcher.download_accessions(
        &[acc("ABC123"), acc("ZZZ999")],
        DownloadOptions::default(),
    );

    assert!(report.aborted);
    assert_eq!(report.unknown, vec![acc("ZZZ999")]);
    assert!(report.downloaded.is_empty());
    assert!(std::fs::read_dir(temp.path()).unwrap().next().is_none());
}

#[test]
fn partial_batch_downloads_known_accessions() {
    let temp = tempfile::tempdir().unwrap();
    let manifest = Manifest::parse(MANIFEST).unwrap();
    let mut fetcher = Fetcher::new(manifest, store_in(temp.path()), MockEna::default()).unwrap();

    let report = fetcher.download_accessions(
        &[acc("ABC123"), acc("ZZZ999"), acc("GHI789")],
        DownloadOptions { download_all: false },
    );

    assert!(!report.aborted);
    assert_eq!(report.unknown, vec![acc("ZZZ999")]);
    assert_eq!(report.downloaded, vec![acc("ABC123"), acc("GHI789")]);
    assert!(temp.path().join("ABC123.fasta").exists());
    assert!(temp.path().join("GHI789.fasta").exists());
    assert!(!temp.path().join("ZZZ999.fasta").exists());
}

#[test]
fn already_local_batch_is_a_verified_noop() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("ABC123.fasta"), b">seq\n").unwrap();
    std::fs::write(temp.path().join("DEF456.fasta"), b">seq\n").unwrap();

    let manifest = Manifest::parse(MANIFEST).unwrap();
    let ena = MockEna::default();
    let mut fetcher = Fetcher::new(manifest, store_in(temp.path()), ena).unwrap();
    assert_eq!(fetcher.local_accessions().len(), 2);

    let report = fetcher.download_accessions(
        &[acc("ABC123"), acc("DEF456")],
        DownloadOptions::default(),
    );

    assert!(report.all_verified());
    assert_eq!(report.skipped.len(), 2);
    assert!(report.downloaded.is_empty());
}

#[test]
fn unverified_download_is_reported_and_not_marked_local() {
    let temp = tempfile::tempdir().unwrap();
    let manifest = Manifest::parse(MANIFEST).unwrap();
    let mut fetcher = Fetcher::new(manifest, store_in(temp.path()), SilentEna).unwrap();

    let report = fetcher.download_accessions(&[acc("ABC123")], DownloadOptions::default());

    assert!(!report.all_verified());
    assert_eq!(report.failed, vec![acc("ABC123")]);
    assert!(fetcher.local_accessions().is_empty());

    // The failed accession stays fetchable on the next attempt.
    let report = fetcher.download_accessions(&[acc("ABC123")], DownloadOptions::default());
    assert_eq!(report.failed, vec![acc("ABC123")]);
}

#[test]
fn lineage_lookups_match_the_manifest_grouping() {
    let temp = tempfile::tempdir().unwrap();
    let manifest = Manifest::parse(MANIFEST).unwrap();
    let fetcher = Fetcher::new(manifest, store_in(temp.path()), MockEna::default()).unwrap();

    let lineages = fetcher.lineages().lineages;
    assert_eq!(lineages.len(), 2);

    let alpha = fetcher.accessions_by_lineage(&"B.1.1.7".parse().unwrap());
    assert_eq!(alpha.accessions, vec![acc("ABC123"), acc("DEF456")]);

    let unknown = fetcher.accessions_by_lineage(&"XY.9".parse().unwrap());
    assert!(unknown.accessions.is_empty());
}
