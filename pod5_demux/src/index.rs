//! Collect the read ids of every input file.
use crate::config::Config;
use crate::fastq;
use crate::scratch::Scratch;
use crate::DemuxError;
use read_container::{Container, ReadId};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// The ids found in one input file.
#[derive(Debug, Clone)]
pub struct IdSet {
    /// File name, relative to the input directory.
    pub name: String,
    pub path: PathBuf,
    pub ids: HashSet<ReadId>,
}

impl IdSet {
    pub fn new(name: String, path: PathBuf, ids: &[ReadId]) -> Self {
        let set: HashSet<_> = ids.iter().copied().collect();
        if set.len() < ids.len() {
            warn!(
                "{} has {} duplicated read ids. They are counted once.",
                path.display(),
                ids.len() - set.len()
            );
        }
        Self {
            name,
            path,
            ids: set,
        }
    }
}

/// An input file that was skipped.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: DemuxError,
}

/// Id sets of the FASTQ files and the containers, both sorted by file name.
#[derive(Debug, Default)]
pub struct IdIndex {
    pub fastq: Vec<IdSet>,
    pub pod5: Vec<IdSet>,
    pub failures: Vec<FileFailure>,
}

impl IdIndex {
    /// Extract the ids of every input file and dump them into `scratch`.
    /// A file that fails is logged, recorded in `failures`, and contributes
    /// no ids. An unreadable input directory is recorded the same way; only
    /// two unreadable directories are fatal.
    pub fn build<C: Container>(
        backend: &C,
        config: &Config,
        scratch: &Scratch,
    ) -> Result<Self, DemuxError> {
        let mut index = IdIndex::default();
        let fastq_files = list_files(&config.fastq_dir, &config.fastq_suffix);
        let pod5_files = list_files(&config.pod5_dir, &config.pod5_suffix);
        let (fastq_files, pod5_files) = match (fastq_files, pod5_files) {
            (Err(why), Err(_)) => return Err(why),
            (fastq_files, pod5_files) => (
                index.listed(&config.fastq_dir, fastq_files),
                index.listed(&config.pod5_dir, pod5_files),
            ),
        };
        info!(
            "{} FASTQ files and {} POD5 files.",
            fastq_files.len(),
            pod5_files.len()
        );
        for (name, path) in fastq_files {
            if let Some(set) = index.add_file(name, path, scratch, fastq_ids) {
                index.fastq.push(set);
            }
        }
        for (name, path) in pod5_files {
            let extract = |path: &Path| container_ids(backend, path);
            if let Some(set) = index.add_file(name, path, scratch, extract) {
                index.pod5.push(set);
            }
        }
        Ok(index)
    }
    fn listed(
        &mut self,
        dir: &Path,
        listing: Result<Vec<(String, PathBuf)>, DemuxError>,
    ) -> Vec<(String, PathBuf)> {
        listing.unwrap_or_else(|error| {
            error!("Skip the directory {}: {}", dir.display(), error);
            self.failures.push(FileFailure {
                path: dir.to_path_buf(),
                error,
            });
            vec![]
        })
    }
    fn add_file<F>(&mut self, name: String, path: PathBuf, scratch: &Scratch, extract: F) -> Option<IdSet>
    where
        F: Fn(&Path) -> Result<Vec<ReadId>, DemuxError>,
    {
        let ids = extract(&path).and_then(|ids| {
            write_id_dump(&ids, &scratch.dump_path(&name))?;
            Ok(ids)
        });
        match ids {
            Ok(ids) => {
                debug!("{}\t{} reads", path.display(), ids.len());
                Some(IdSet::new(name, path, &ids))
            }
            Err(error) => {
                error!("Skip {}: {}", path.display(), error);
                self.failures.push(FileFailure { path, error });
                None
            }
        }
    }
}

/// Regular files in `dir` whose names end with `suffix`, sorted by name.
pub fn list_files(dir: &Path, suffix: &str) -> Result<Vec<(String, PathBuf)>, DemuxError> {
    let entries = std::fs::read_dir(dir).map_err(|why| DemuxError::io(dir, why))?;
    let mut files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| match entry.file_name().into_string() {
            Ok(name) => Some((name, entry.path())),
            Err(name) => {
                warn!("Skip a file with a non UTF-8 name:{:?}", name);
                None
            }
        })
        .filter(|(name, _)| name.ends_with(suffix))
        .collect();
    files.sort();
    Ok(files)
}

/// All ids of a FASTQ file, in file order.
pub fn fastq_ids(path: &Path) -> Result<Vec<ReadId>, DemuxError> {
    fastq::read_ids(path)?.collect()
}

/// All ids of a container, in container order. Payloads are not read.
pub fn container_ids<C: Container>(backend: &C, path: &Path) -> Result<Vec<ReadId>, DemuxError> {
    let reader = backend
        .open_read(path)
        .map_err(|why| DemuxError::container(path, why))?;
    read_container::read_ids(reader)
        .map(|id| id.map_err(|why| DemuxError::container(path, why)))
        .collect()
}

/// One id per row, no header.
pub fn write_id_dump(ids: &[ReadId], path: &Path) -> Result<(), DemuxError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|why| DemuxError::csv(path, why))?;
    for id in ids {
        wtr.write_record(&[id.to_string()])
            .map_err(|why| DemuxError::csv(path, why))?;
    }
    wtr.flush().map_err(|why| DemuxError::io(path, why))
}
