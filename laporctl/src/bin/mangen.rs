use std::io::Result;
use std::path::Path;
use std::{env, fs};

use clap::CommandFactory;
use clap_mangen::Man;
use laporctl::cli::Cli;

/// Renders one man page per (sub)command into $OUT_DIR, named by the
/// '-'-joined command path, e.g. "laporctl-reports.1".
fn main() -> Result<()> {
    let out_dir =
        env::var("OUT_DIR").map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    let out_dir = Path::new(&out_dir);

    let root = Cli::command();
    let mut queue = vec![(root.get_name().to_string(), root.clone())];
    while let Some((name, cmd)) = queue.pop() {
        let mut buffer = Vec::<u8>::new();
        Man::new(cmd.clone()).render(&mut buffer)?;

        let out_path = out_dir.join(format!("{name}.1"));
        fs::write(&out_path, buffer)?;
        println!("Man page generated at {}", out_path.display());

        for sub in cmd.get_subcommands() {
            queue.push((format!("{name}-{}", sub.get_name()), sub.clone()));
        }
    }
    Ok(())
}
