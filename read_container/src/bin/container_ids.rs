extern crate env_logger;
#[macro_use]
extern crate log;
extern crate read_container;
use read_container::{Container, FramedContainer};
use std::io::{BufWriter, Write};
use std::path::Path;
// Print the read ids stored in the given containers, one per line.
fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args: Vec<_> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("Usage: container_ids <CONTAINER>...");
        std::process::exit(1);
    }
    let stdout = std::io::stdout();
    let mut wtr = BufWriter::new(stdout.lock());
    let mut failed = false;
    for file in args.iter() {
        let ids = match FramedContainer.open_read(Path::new(file)) {
            Ok(rdr) => read_container::read_ids(rdr),
            Err(why) => {
                error!("{}:{}", file, why);
                failed = true;
                continue;
            }
        };
        let mut count = 0;
        for id in ids {
            match id {
                Ok(id) => {
                    writeln!(&mut wtr, "{}", id)?;
                    count += 1;
                }
                Err(why) => {
                    error!("{}:{}", file, why);
                    failed = true;
                    break;
                }
            }
        }
        debug!("{} reads in {}", count, file);
    }
    wtr.flush()?;
    if failed {
        std::process::exit(1);
    }
    Ok(())
}
