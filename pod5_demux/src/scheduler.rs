//! Run the output groups on a worker pool.
//!
//! Every group is an independent job. Outcomes are received (and logged) in
//! completion order; a failed or panicking job never stops the others.
use crate::filter::{filter_group, FilterSummary};
use crate::plan::OutputGroup;
use crate::DemuxError;
use read_container::Container;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};

/// The result of one group.
#[derive(Debug)]
pub struct GroupOutcome {
    pub fastq_file: String,
    pub output: PathBuf,
    pub inputs: Vec<PathBuf>,
    pub result: Result<FilterSummary, DemuxError>,
}

impl GroupOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of every group, in submission order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<GroupOutcome>,
}

#[derive(Serialize)]
struct OutcomeView<'a> {
    fastq_file: &'a str,
    output: &'a Path,
    inputs: &'a [PathBuf],
    succeeded: bool,
    summary: Option<&'a FilterSummary>,
    error: Option<String>,
}

#[derive(Serialize)]
struct ReportView<'a> {
    groups: usize,
    succeeded: usize,
    failed: usize,
    outcomes: Vec<OutcomeView<'a>>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
    pub fn to_json(&self) -> serde_json::Result<String> {
        let outcomes = self
            .outcomes
            .iter()
            .map(|o| OutcomeView {
                fastq_file: &o.fastq_file,
                output: &o.output,
                inputs: &o.inputs,
                succeeded: o.is_ok(),
                summary: o.result.as_ref().ok(),
                error: o.result.as_ref().err().map(|e| e.to_string()),
            })
            .collect();
        let view = ReportView {
            groups: self.outcomes.len(),
            succeeded: self.succeeded(),
            failed: self.failed(),
            outcomes,
        };
        serde_json::ser::to_string_pretty(&view)
    }
    pub fn write_json(&self, path: &Path) -> Result<(), DemuxError> {
        let json = self.to_json().map_err(|source| DemuxError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|why| DemuxError::io(path, why))
    }
}

/// Write every group with at most `workers` groups in flight.
pub fn run_groups<C>(backend: &C, groups: Vec<OutputGroup>, workers: usize) -> Result<RunReport, DemuxError>
where
    C: Container + Clone + Send + 'static,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("demux-{}", i))
        .build()
        .map_err(|why| DemuxError::Config(format!("cannot start {} workers:{}", workers, why)))?;
    let total = groups.len();
    debug!("Writing {} containers with {} workers.", total, workers);
    let (sender, receiver) = crossbeam_channel::unbounded();
    for (index, group) in groups.into_iter().enumerate() {
        let sender = sender.clone();
        let backend = backend.clone();
        pool.spawn(move || {
            let result = guarded_filter(&backend, &group);
            let outcome = GroupOutcome {
                fastq_file: group.fastq_file,
                output: group.output,
                inputs: group.inputs,
                result,
            };
            if sender.send((index, outcome)).is_err() {
                error!("The outcome of group {} was lost.", index);
            }
        });
    }
    drop(sender);
    let mut outcomes: Vec<_> = receiver
        .iter()
        .inspect(|(_, outcome)| log_outcome(outcome))
        .collect();
    if outcomes.len() < total {
        warn!("Only {} of {} groups reported back.", outcomes.len(), total);
    }
    outcomes.sort_by_key(|&(index, _)| index);
    let outcomes = outcomes.into_iter().map(|(_, outcome)| outcome).collect();
    Ok(RunReport { outcomes })
}

// A panic is reported as the failure of its own group.
fn guarded_filter<C: Container>(backend: &C, group: &OutputGroup) -> Result<FilterSummary, DemuxError> {
    match catch_unwind(AssertUnwindSafe(|| filter_group(backend, group))) {
        Ok(result) => result,
        Err(payload) => {
            let message = if let Some(msg) = payload.downcast_ref::<&str>() {
                msg.to_string()
            } else if let Some(msg) = payload.downcast_ref::<String>() {
                msg.clone()
            } else {
                "unknown panic".to_string()
            };
            Err(DemuxError::Panicked {
                output: group.output.clone(),
                message,
            })
        }
    }
}

fn log_outcome(outcome: &GroupOutcome) {
    match &outcome.result {
        Ok(summary) => {
            info!("Created new POD5 file: {}", outcome.output.display());
            debug!(
                "{}\t{} of {} reads",
                outcome.fastq_file, summary.written, summary.requested
            );
        }
        Err(why) => error!(
            "Failed to create POD5 file {} from {:?}: {}",
            outcome.output.display(),
            outcome.inputs,
            why
        ),
    }
}
