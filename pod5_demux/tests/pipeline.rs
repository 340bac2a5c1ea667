extern crate pod5_demux;
extern crate read_container;
extern crate tempfile;
extern crate uuid;
use pod5_demux::{Config, DemuxError};
use read_container::{
    write_container, Container, FramedContainer, ReadId, ReadRecord, RecordCursor,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("fastq")).unwrap();
        std::fs::create_dir(dir.path().join("pod5")).unwrap();
        Self { dir }
    }
    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
    fn fastq(&self, name: &str, ids: &[ReadId]) {
        let body: String = ids
            .iter()
            .map(|id| format!("@{}\tRG:Z:run1\nACGTTGCA\n+\n!!!!!!!!\n", id))
            .collect();
        std::fs::write(self.path("fastq").join(name), body).unwrap();
    }
    fn pod5(&self, name: &str, records: &[ReadRecord]) {
        write_container(&FramedContainer, &self.path("pod5").join(name), records).unwrap();
    }
    fn config(&self, out: &str, workers: usize) -> Config {
        Config::new(
            self.path("fastq"),
            self.path("pod5"),
            self.path(&format!("{}.csv", out)),
            self.path(out),
        )
        .workers(workers)
    }
}

fn new_id() -> ReadId {
    uuid::Uuid::new_v4().into()
}

fn record(id: ReadId, tag: &str) -> ReadRecord {
    ReadRecord::new(id, format!("signal of {} in {}", id, tag).into_bytes())
}

fn load(path: &Path) -> Vec<ReadRecord> {
    let mut rdr = FramedContainer.open_read(path).unwrap();
    let mut records = vec![];
    while rdr.next_id().unwrap().is_some() {
        records.push(rdr.take_record().unwrap());
    }
    records
}

fn rows(path: &Path) -> HashSet<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .skip(1)
        .map(|line| line.to_string())
        .collect()
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    names
}

#[test]
fn two_containers_feed_one_fastq() {
    let fx = Fixture::new();
    let (x, y, z) = (new_id(), new_id(), new_id());
    fx.fastq("a.fastq", &[x, y]);
    fx.pod5("p1.pod5", &[record(x, "p1"), record(z, "p1")]);
    fx.pod5("p2.pod5", &[record(y, "p2")]);
    let config = fx.config("out", 4);
    let report = pod5_demux::run(&config, &FramedContainer).unwrap();
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 0);
    let expected: HashSet<_> = vec![
        format!("p1.pod5,a.fastq,{}", x),
        format!("p2.pod5,a.fastq,{}", y),
    ]
    .into_iter()
    .collect();
    assert_eq!(rows(&config.match_output), expected);
    assert_eq!(listing(&config.output_dir), vec!["a.pod5"]);
    let output = load(&config.output_dir.join("a.pod5"));
    assert_eq!(output, vec![record(x, "p1"), record(y, "p2")]);
}

#[test]
fn worker_count_does_not_change_outputs() {
    let fx = Fixture::new();
    let ids: Vec<_> = (0..60).map(|_| new_id()).collect();
    for (i, chunk) in ids.chunks(20).enumerate() {
        let records: Vec<_> = chunk.iter().map(|&id| record(id, "src")).collect();
        fx.pod5(&format!("batch_{}.pod5", i), &records);
    }
    for (i, chunk) in ids.chunks(7).enumerate() {
        fx.fastq(&format!("barcode{:02}.fastq", i), chunk);
    }
    let single = fx.config("single", 1);
    let many = fx.config("many", 8);
    let report1 = pod5_demux::run(&single, &FramedContainer).unwrap();
    let report8 = pod5_demux::run(&many, &FramedContainer).unwrap();
    assert_eq!(report1.succeeded(), 9);
    assert_eq!(report8.succeeded(), 9);
    assert_eq!(rows(&single.match_output), rows(&many.match_output));
    assert_eq!(rows(&single.match_output).len(), 60);
    let names = listing(&single.output_dir);
    assert_eq!(names, listing(&many.output_dir));
    for name in names {
        let a = load(&single.output_dir.join(&name));
        let b = load(&many.output_dir.join(&name));
        assert_eq!(a, b, "{}", name);
        assert!(!a.is_empty());
    }
}

#[test]
fn rerun_is_idempotent() {
    let fx = Fixture::new();
    let (x, y) = (new_id(), new_id());
    fx.fastq("a.fastq", &[x]);
    fx.fastq("b.fastq", &[y, new_id()]);
    fx.pod5("p1.pod5", &[record(x, "p1"), record(y, "p1")]);
    let config = fx.config("out", 2);
    pod5_demux::run(&config, &FramedContainer).unwrap();
    let first = std::fs::read(&config.match_output).unwrap();
    let a = load(&config.output_dir.join("a.pod5"));
    pod5_demux::run(&config, &FramedContainer).unwrap();
    assert_eq!(std::fs::read(&config.match_output).unwrap(), first);
    assert_eq!(load(&config.output_dir.join("a.pod5")), a);
    assert_eq!(load(&config.output_dir.join("b.pod5")), vec![record(y, "p1")]);
}

#[test]
fn no_matches_give_header_only() {
    let fx = Fixture::new();
    fx.fastq("a.fastq", &[new_id()]);
    fx.fastq("empty.fastq", &[]);
    fx.pod5("p1.pod5", &[record(new_id(), "p1")]);
    fx.pod5("empty.pod5", &[]);
    let config = fx.config("out", 4);
    let report = pod5_demux::run(&config, &FramedContainer).unwrap();
    assert!(report.outcomes.is_empty());
    assert_eq!(
        std::fs::read_to_string(&config.match_output).unwrap(),
        "POD5 File,FASTQ File,ID\n"
    );
    assert!(listing(&config.output_dir).is_empty());
}

#[test]
fn shared_read_is_copied_per_container() {
    let fx = Fixture::new();
    let x = new_id();
    fx.fastq("a.fastq", &[x]);
    fx.pod5("p1.pod5", &[record(x, "p1")]);
    fx.pod5("p2.pod5", &[record(x, "p2")]);
    let config = fx.config("out", 4);
    pod5_demux::run(&config, &FramedContainer).unwrap();
    assert_eq!(rows(&config.match_output).len(), 2);
    let output = load(&config.output_dir.join("a.pod5"));
    assert_eq!(output, vec![record(x, "p1"), record(x, "p2")]);
}

#[test]
fn broken_inputs_do_not_stop_the_run() {
    let fx = Fixture::new();
    let (x, y) = (new_id(), new_id());
    fx.fastq("a.fastq", &[x]);
    std::fs::write(fx.path("fastq").join("bad.fastq"), format!("@{}\nACGT\n", y)).unwrap();
    fx.pod5("p1.pod5", &[record(x, "p1"), record(y, "p1")]);
    std::fs::write(fx.path("pod5").join("corrupt.pod5"), b"not a container").unwrap();
    let mut config = fx.config("out", 4);
    config.scratch_dir = Some(fx.path("scratch"));
    config.report = Some(fx.path("report.json"));
    let report = pod5_demux::run(&config, &FramedContainer).unwrap();
    assert_eq!(report.succeeded(), 1);
    assert_eq!(rows(&config.match_output).len(), 1);
    assert_eq!(listing(&config.output_dir), vec!["a.pod5"]);
    // Only readable inputs leave a dump behind.
    assert_eq!(listing(&fx.path("scratch")), vec!["a.fastq.csv", "p1.pod5.csv"]);
    let json = std::fs::read_to_string(fx.path("report.json")).unwrap();
    assert!(json.contains("\"succeeded\": 1"), "{}", json);
}

#[test]
fn failing_group_is_isolated() {
    let fx = Fixture::new();
    let (x, y) = (new_id(), new_id());
    fx.fastq("a.fastq", &[x]);
    fx.fastq("b.fastq", &[y]);
    fx.pod5("p1.pod5", &[record(x, "p1")]);
    fx.pod5("p2.pod5", &[record(y, "p2")]);
    let config = fx.config("out", 2);
    pod5_demux::run(&config, &FramedContainer).unwrap();
    // The container of b.fastq disappears before the outputs are rebuilt.
    std::fs::remove_file(fx.path("pod5").join("p2.pod5")).unwrap();
    let report = pod5_demux::run_from_matches(&config, &FramedContainer).unwrap();
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);
    let failed = &report.outcomes[1];
    assert_eq!(failed.fastq_file, "b.fastq");
    match &failed.result {
        Err(DemuxError::GroupWrite { output, input, .. }) => {
            assert_eq!(output, &config.output_dir.join("b.pod5"));
            assert_eq!(input.as_ref(), Some(&fx.path("pod5").join("p2.pod5")));
        }
        x => panic!("{:?}", x),
    }
    assert_eq!(load(&config.output_dir.join("a.pod5")), vec![record(x, "p1")]);
}

#[test]
fn one_unreadable_input_directory_gives_header_only() {
    let fx = Fixture::new();
    fx.fastq("a.fastq", &[new_id()]);
    let mut config = fx.config("out", 1);
    config.pod5_dir = fx.path("no_such_dir");
    let report = pod5_demux::run(&config, &FramedContainer).unwrap();
    assert!(report.outcomes.is_empty());
    assert_eq!(
        std::fs::read_to_string(&config.match_output).unwrap(),
        "POD5 File,FASTQ File,ID\n"
    );
}

#[test]
fn unreadable_input_directories_are_fatal() {
    let fx = Fixture::new();
    let mut config = fx.config("out", 1);
    config.fastq_dir = fx.path("no_such_dir");
    config.pod5_dir = fx.path("no_pod5_dir");
    match pod5_demux::run(&config, &FramedContainer) {
        Err(DemuxError::Io { path, .. }) => assert_eq!(path, fx.path("no_such_dir")),
        x => panic!("{:?}", x),
    }
    assert!(!config.match_output.exists());
    assert!(pod5_demux::run(&fx.config("out", 0), &FramedContainer).is_err());
}
