use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use smf_tool::{
    default_output_path, swap_track_file_with_config, ParserConfig, SmfError, SmfFile, SmfResult,
};

#[derive(Parser, Debug)]
#[command(version, about = "Swap track TRACK_NUM1 and track TRACK_NUM2 in SMF_FILE.")]
struct Cli {
    /// Standard MIDI File to read
    #[arg(value_name = "SMF_FILE")]
    input: PathBuf,

    #[arg(value_name = "TRACK_NUM1", required_unless_present_any = ["list", "json"])]
    a: Option<usize>,

    #[arg(value_name = "TRACK_NUM2", required_unless_present_any = ["list", "json"])]
    b: Option<usize>,

    /// Show track list
    #[arg(short, long)]
    list: bool,

    /// Dump the decoded file as JSON
    #[arg(long, conflicts_with = "list")]
    json: bool,

    /// Destination file (default: <name>_swap_<a>_<b>.<ext> in the directory of SMF_FILE)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Lift the default size and event count limits
    #[arg(long)]
    permissive: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// One line per track after the first, labelled by its second event
fn print_track_list(smf: &SmfFile) {
    for (i, track) in smf.tracks.iter().enumerate().skip(1) {
        let label = track
            .label()
            .map(|payload| String::from_utf8_lossy(payload).into_owned())
            .unwrap_or_default();
        println!("[{}] {}", i, label);
    }
}

fn to_json(smf: &SmfFile) -> SmfResult<String> {
    serde_json::to_string_pretty(smf).map_err(|e| SmfError::FileWriteError {
        path: "<stdout>".to_string(),
        reason: format!("JSON serialization failed: {}", e),
    })
}

fn run(cli: Cli) -> SmfResult<()> {
    let input = cli.input.display().to_string();
    let config = if cli.permissive {
        ParserConfig::permissive()
    } else {
        ParserConfig::default()
    };

    if cli.list || cli.json {
        let smf = SmfFile::from_path_with_config(&input, config)?;
        debug!(tracks = smf.track_count(), "decoded {}", input);
        if cli.json {
            println!("{}", to_json(&smf)?);
        } else {
            print_track_list(&smf);
        }
        return Ok(());
    }

    // clap enforces both indices outside of list/json mode
    let (Some(a), Some(b)) = (cli.a, cli.b) else {
        return Ok(());
    };
    let output = cli
        .output
        .unwrap_or_else(|| default_output_path(&cli.input, a, b));

    swap_track_file_with_config(&cli.input, &output, a, b, &config)?;
    println!("{}", output.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {} ({})", e, e.suggested_action());
            ExitCode::FAILURE
        },
    }
}
