use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;

use camino::Utf8Path;

use crate::domain::{Accession, Lineage};
use crate::error::FetchError;

/// Property column whose value drives the lineage index.
pub const LINEAGE_PROPERTY: &str = "lineage";

pub type PropertyMap = HashMap<String, String>;

/// In-memory form of `accessions.tsv`: the accession properties table plus the
/// lineage index derived from it. Built once at startup, read-only afterwards.
#[derive(Debug, Clone)]
pub struct Manifest {
    properties: HashMap<Accession, PropertyMap>,
    lineages: BTreeMap<Lineage, BTreeSet<Accession>>,
}

impl Manifest {
    pub fn load(path: &Utf8Path) -> Result<Self, FetchError> {
        if !path.as_std_path().exists() {
            return Err(FetchError::MissingManifest(path.to_owned()));
        }
        let content = fs::read_to_string(path.as_std_path())
            .map_err(|_| FetchError::ManifestRead(path.to_owned()))?;
        Self::parse(&content)
    }

    /// Parses the tab-separated manifest text. The first line is the header;
    /// its first column is the accession key, the rest name the properties.
    /// Every row must align with the header column count.
    pub fn parse(content: &str) -> Result<Self, FetchError> {
        let mut lines = content.lines().enumerate();

        let header = lines
            .next()
            .map(|(_, line)| split_fields(line))
            .ok_or(FetchError::ManifestEmptyHeader)?;
        if header.len() < 2 {
            return Err(FetchError::ManifestEmptyHeader);
        }
        let property_names = &header[1..];

        let mut properties = HashMap::new();
        for (index, line) in lines {
            if line.is_empty() {
                continue;
            }
            let fields = split_fields(line);
            if fields.len() != header.len() {
                return Err(FetchError::ManifestRowWidth {
                    line: index + 1,
                    expected: header.len(),
                    found: fields.len(),
                });
            }
            // Manifest identifiers are opaque; column-count alignment is the
            // only validation applied to a row.
            let accession = Accession::new(fields[0].clone());
            let property_map = property_names
                .iter()
                .cloned()
                .zip(fields[1..].iter().cloned())
                .collect::<PropertyMap>();
            properties.insert(accession, property_map);
        }

        let lineages = build_lineage_index(&properties)?;
        Ok(Self {
            properties,
            lineages,
        })
    }

    pub fn contains(&self, accession: &Accession) -> bool {
        self.properties.contains_key(accession)
    }

    pub fn properties(&self, accession: &Accession) -> Option<&PropertyMap> {
        self.properties.get(accession)
    }

    pub fn accessions(&self) -> impl Iterator<Item = &Accession> {
        self.properties.keys()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn lineages(&self) -> Vec<Lineage> {
        self.lineages.keys().cloned().collect()
    }

    pub fn accessions_by_lineage(&self, lineage: &Lineage) -> Option<&BTreeSet<Accession>> {
        self.lineages.get(lineage)
    }
}

/// Splits a manifest line on tabs, stripping double quotes from every field.
fn split_fields(line: &str) -> Vec<String> {
    line.trim_end_matches('\r')
        .split('\t')
        .map(|field| field.replace('"', ""))
        .collect()
}

fn build_lineage_index(
    properties: &HashMap<Accession, PropertyMap>,
) -> Result<BTreeMap<Lineage, BTreeSet<Accession>>, FetchError> {
    let mut index: BTreeMap<Lineage, BTreeSet<Accession>> = BTreeMap::new();
    for (accession, property_map) in properties {
        let value = property_map
            .get(LINEAGE_PROPERTY)
            .ok_or_else(|| FetchError::MissingLineageProperty(accession.to_string()))?;
        let lineage = Lineage::new(value.clone());
        index.entry(lineage).or_default().insert(accession.clone());
    }
    Ok(index)
}
