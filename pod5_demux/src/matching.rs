//! Match read ids between FASTQ files and containers.
use crate::index::{IdIndex, IdSet};
use crate::DemuxError;
use read_container::ReadId;
use std::path::Path;

pub const HEADER: [&str; 3] = ["POD5 File", "FASTQ File", "ID"];

/// A read found both in `pod5_file` and in `fastq_file`. Files are named
/// relative to their input directories.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchTriple {
    #[serde(rename = "POD5 File")]
    pub pod5_file: String,
    #[serde(rename = "FASTQ File")]
    pub fastq_file: String,
    #[serde(rename = "ID")]
    pub id: ReadId,
}

/// Every (container, FASTQ file, id) with the id in both files.
/// The output is sorted by FASTQ file, container and id.
pub fn find_matches(index: &IdIndex) -> Vec<MatchTriple> {
    let mut triples = vec![];
    for fastq in index.fastq.iter() {
        for pod5 in index.pod5.iter() {
            let common = intersection(fastq, pod5);
            trace!("{}\t{}\t{}", fastq.name, pod5.name, common.len());
            triples.extend(common.into_iter().map(|id| MatchTriple {
                pod5_file: pod5.name.clone(),
                fastq_file: fastq.name.clone(),
                id,
            }));
        }
    }
    debug!("{} matched reads.", triples.len());
    triples
}

// Probe the larger set with the smaller one.
fn intersection(xs: &IdSet, ys: &IdSet) -> Vec<ReadId> {
    let (small, large) = if xs.ids.len() <= ys.ids.len() {
        (&xs.ids, &ys.ids)
    } else {
        (&ys.ids, &xs.ids)
    };
    let mut common: Vec<_> = small.iter().filter(|id| large.contains(id)).copied().collect();
    common.sort();
    common
}

/// Write the match relation as CSV. The header is written even when there
/// is no match.
pub fn write_match_file(triples: &[MatchTriple], path: &Path) -> Result<(), DemuxError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|why| DemuxError::csv(path, why))?;
    wtr.write_record(&HEADER)
        .map_err(|why| DemuxError::csv(path, why))?;
    for triple in triples {
        wtr.serialize(triple)
            .map_err(|why| DemuxError::csv(path, why))?;
    }
    wtr.flush().map_err(|why| DemuxError::io(path, why))
}

pub fn read_match_file(path: &Path) -> Result<Vec<MatchTriple>, DemuxError> {
    let mut rdr = csv::Reader::from_path(path).map_err(|why| DemuxError::csv(path, why))?;
    rdr.deserialize()
        .map(|triple| triple.map_err(|why| DemuxError::csv(path, why)))
        .collect()
}
