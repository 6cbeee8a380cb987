use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use flowpin::pathcheck;

/// Historical location of the OVS tree on the build host.
const DEFAULT_ROOT: &str = "/home/ubuntu/oRSS-NIC/ovs";

/// Check which paths from a manifest exist after substituting the OVS root.
#[derive(Parser)]
struct Args {
    /// Manifest of space-separated path templates, one group per line.
    #[arg(default_value = "files.txt")]
    manifest: PathBuf,

    /// Directory substituted for the ${OVS_PATH} placeholder. Falls back to
    /// the OVS_PATH environment variable.
    #[arg(long)]
    root: Option<String>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let root = args.root
        .or_else(|| std::env::var("OVS_PATH").ok())
        .unwrap_or_else(|| DEFAULT_ROOT.to_string());

    let manifest = match File::open(&args.manifest) {
        Ok(f) => BufReader::new(f),
        Err(e) => {
            error!("cannot open {}: {}", args.manifest.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match pathcheck::existing_paths(manifest, &root) {
        Ok(paths) => {
            for path in paths {
                println!("{}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("cannot read {}: {}", args.manifest.display(), e);
            ExitCode::FAILURE
        }
    }
}
