//! The whole run: index, match, plan and write.
use crate::config::Config;
use crate::index::IdIndex;
use crate::matching::{find_matches, read_match_file, write_match_file};
use crate::plan::plan_groups;
use crate::scheduler::{run_groups, RunReport};
use crate::scratch::Scratch;
use crate::DemuxError;
use read_container::Container;

/// Extract ids, write the match relation, then build one container per
/// FASTQ file with matches. Everything before the writing phase is single
/// threaded.
pub fn run<C>(config: &Config, backend: &C) -> Result<RunReport, DemuxError>
where
    C: Container + Clone + Send + 'static,
{
    config.validate()?;
    debug!("Configuration\n{}", config);
    let scratch = Scratch::from_option(config.scratch_dir.as_deref())?;
    let index = IdIndex::build(backend, config, &scratch)?;
    if !index.failures.is_empty() {
        warn!("{} inputs were skipped.", index.failures.len());
    }
    let triples = find_matches(&index);
    write_match_file(&triples, &config.match_output)?;
    info!(
        "Wrote {} matches to {}",
        triples.len(),
        config.match_output.display()
    );
    // The dumps are only needed for auditing.
    drop(scratch);
    write_outputs(config, backend)
}

/// Build the containers from an existing match relation.
pub fn run_from_matches<C>(config: &Config, backend: &C) -> Result<RunReport, DemuxError>
where
    C: Container + Clone + Send + 'static,
{
    config.validate()?;
    write_outputs(config, backend)
}

fn write_outputs<C>(config: &Config, backend: &C) -> Result<RunReport, DemuxError>
where
    C: Container + Clone + Send + 'static,
{
    let triples = read_match_file(&config.match_output)?;
    let groups = plan_groups(
        &triples,
        &config.pod5_dir,
        &config.output_dir,
        &config.fastq_suffix,
        &config.pod5_suffix,
    );
    std::fs::create_dir_all(&config.output_dir)
        .map_err(|why| DemuxError::io(&config.output_dir, why))?;
    info!("{} output containers to write.", groups.len());
    let report = run_groups(backend, groups, config.workers)?;
    info!(
        "Finished. {} succeeded, {} failed.",
        report.succeeded(),
        report.failed()
    );
    if let Some(path) = config.report.as_ref() {
        report.write_json(path)?;
    }
    Ok(report)
}
