use std::path::PathBuf;

use clap::Parser;
use locgen::{Config, Generator};
use locgen_cli::{Location, load_inputs};
use tracing_subscriber::EnvFilter;

/// Generate Apple `.strings` files from an XLSX translation spreadsheet.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The XLSX workbook to read (path or http(s) URL)
    #[arg(short, long)]
    input: String,

    /// Worksheets to process (the first worksheet when omitted)
    #[arg(short, long, num_args = 0..)]
    sheets: Vec<String>,

    /// The YAML mapping file (path or http(s) URL)
    #[arg(short, long)]
    map: String,

    /// Directory the `<code>.lproj` directories are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Log what is read and written
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("[Error] {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,locgen=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<(), String> {
    let workbook = Location::parse(&args.input);
    let mapping = Location::parse(&args.map);
    tracing::debug!(%workbook, %mapping, "loading inputs");

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| format!("can't start async runtime: {}", e))?;
    let (workbook_bytes, mapping_bytes) = runtime.block_on(load_inputs(&workbook, &mapping))?;

    let config = Config::from_yaml_slice(&mapping_bytes).map_err(|e| e.to_string())?;
    let report = Generator::new(config)
        .sheets(args.sheets)
        .output_dir(args.output_dir)
        .run(workbook_bytes)
        .map_err(|e| e.to_string())?;

    for file in &report.files {
        println!("{} ({} lines)", file.path.display(), file.lines);
    }
    Ok(())
}
