use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum FetchError {
    #[error("invalid accession: {0}")]
    InvalidAccession(String),

    #[error("invalid lineage: {0}")]
    InvalidLineage(String),

    #[error("missing manifest file {0}")]
    #[diagnostic(help("run from a directory containing accessions.tsv, or pass --manifest"))]
    MissingManifest(Utf8PathBuf),

    #[error("failed to read manifest {0}")]
    ManifestRead(Utf8PathBuf),

    #[error("manifest line {line}: expected {expected} tab-separated fields, found {found}")]
    ManifestRowWidth {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("manifest header declares no property columns")]
    ManifestEmptyHeader,

    #[error("accession {0} has no \"lineage\" property in the manifest")]
    MissingLineageProperty(String),

    #[error("ENA request failed: {0}")]
    EnaHttp(String),

    #[error("ENA returned status {status}: {message}")]
    EnaStatus { status: u16, message: String },

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
