//! Copy the selected reads of several containers into a new one.
use crate::plan::OutputGroup;
use crate::DemuxError;
use read_container::{Container, ReadId, RecordCursor, RecordSink};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// What one output container received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSummary {
    pub output: PathBuf,
    /// Records written. A read held by two inputs is written twice.
    pub written: usize,
    /// Distinct ids asked for.
    pub requested: usize,
    /// Records copied from each input, in input order.
    pub per_input: Vec<(PathBuf, usize)>,
}

/// Write `group.output` with every record of `group.inputs` whose id is in
/// `group.keep`. Ids not found in any input are skipped silently.
///
/// The output is closed on every path, so a group failing halfway still
/// leaves a well-formed (partial) container. A failing input aborts the group.
pub fn filter_group<C: Container>(backend: &C, group: &OutputGroup) -> Result<FilterSummary, DemuxError> {
    let output = &group.output;
    let mut wtr = backend
        .create(output)
        .map_err(|source| group_error(output, None, source))?;
    let mut per_input = Vec::with_capacity(group.inputs.len());
    let mut found = HashSet::new();
    for input in group.inputs.iter() {
        let copied = copy_matching(backend, input, &group.keep, &mut wtr, &mut found)
            .map_err(|source| group_error(output, Some(input), source))?;
        trace!("{} <- {}\t{}", output.display(), input.display(), copied);
        per_input.push((input.clone(), copied));
    }
    wtr.finish().map_err(|source| group_error(output, None, source))?;
    if found.len() < group.keep.len() {
        debug!(
            "{} of {} reads for {} were not found in the inputs.",
            group.keep.len() - found.len(),
            group.keep.len(),
            output.display()
        );
    }
    Ok(FilterSummary {
        output: output.clone(),
        written: per_input.iter().map(|(_, count)| count).sum(),
        requested: group.keep.len(),
        per_input,
    })
}

fn copy_matching<C: Container>(
    backend: &C,
    input: &Path,
    keep: &HashSet<ReadId>,
    wtr: &mut C::Writer,
    found: &mut HashSet<ReadId>,
) -> Result<usize, read_container::ContainerError> {
    let mut rdr = backend.open_read(input)?;
    let mut copied = 0;
    while let Some(id) = rdr.next_id()? {
        if keep.contains(&id) {
            let record = rdr.take_record()?;
            wtr.add_read(&record)?;
            found.insert(id);
            copied += 1;
        }
    }
    Ok(copied)
}

fn group_error(output: &Path, input: Option<&PathBuf>, source: read_container::ContainerError) -> DemuxError {
    DemuxError::GroupWrite {
        output: output.to_path_buf(),
        input: input.cloned(),
        source,
    }
}
