//! Group the match relation by FASTQ file.
use crate::matching::MatchTriple;
use read_container::ReadId;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};

/// Everything needed to write the container of one FASTQ file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputGroup {
    pub fastq_file: String,
    /// Distinct source containers, sorted.
    pub inputs: Vec<PathBuf>,
    /// Ids to copy.
    pub keep: HashSet<ReadId>,
    pub output: PathBuf,
}

/// Invert the match relation. One group per FASTQ file having at least one
/// match, ordered by FASTQ file name. Container names are resolved against
/// `pod5_dir`.
pub fn plan_groups(
    triples: &[MatchTriple],
    pod5_dir: &Path,
    output_dir: &Path,
    fastq_suffix: &str,
    pod5_suffix: &str,
) -> Vec<OutputGroup> {
    let mut groups: BTreeMap<&str, (BTreeSet<&str>, HashSet<ReadId>)> = BTreeMap::new();
    for triple in triples {
        let entry = groups.entry(triple.fastq_file.as_str()).or_default();
        entry.0.insert(triple.pod5_file.as_str());
        entry.1.insert(triple.id);
    }
    groups
        .into_iter()
        .map(|(fastq_file, (inputs, keep))| OutputGroup {
            fastq_file: fastq_file.to_string(),
            inputs: inputs.into_iter().map(|name| pod5_dir.join(name)).collect(),
            keep,
            output: output_dir.join(output_name(fastq_file, fastq_suffix, pod5_suffix)),
        })
        .collect()
}

/// `reads.fastq` -> `reads.pod5`. Only the trailing suffix is replaced;
/// a name without it gets the container suffix appended.
pub fn output_name(fastq_file: &str, fastq_suffix: &str, pod5_suffix: &str) -> String {
    let stem = fastq_file.strip_suffix(fastq_suffix).unwrap_or(fastq_file);
    format!("{}{}", stem, pod5_suffix)
}
