//! CLI entrypoint for `ldaplynx`.
//!
//! Without `--batch` this starts the interactive console, optionally loading a
//! document first. With `--batch` it loads the document, parses it, prints a
//! summary, and writes the node and edge tables when an output directory is
//! provided.
use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use log::{LevelFilter, error, info};
use ldaplynx::{
    attributes::MembershipAttributes,
    console::{Command, Console},
    io::DEFAULT_MMAP_THRESHOLD_BYTES,
    report::render_summary_with_top,
    resolve::UidLookup,
    session::Session,
};

#[derive(Parser, Debug)]
#[command(
    name = "ldaplynx",
    version,
    about = "LDIF to user/group membership graph converter"
)]
struct Args {
    /// LDIF file to load at startup
    file: Option<PathBuf>,

    /// Membership attributes, comma-separated (skips detection prompts)
    #[arg(short = 'a', long = "attrs")]
    attrs: Option<String>,

    /// Load, parse, and export without starting the console
    #[arg(long = "batch")]
    batch: bool,

    /// Output directory for batch-mode CSV exports
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Never resolve memberUid references (compatibility mode)
    #[arg(long = "no-uid-lookup")]
    no_uid_lookup: bool,

    /// Override mmap threshold in bytes. If zero, disable mmap.
    #[arg(long = "mmap-threshold", default_value_t = DEFAULT_MMAP_THRESHOLD_BYTES)]
    mmap_threshold: u64,

    /// Limit number of entries in "Largest Groups"
    #[arg(long = "top", default_value_t = 10)]
    top_limit: usize,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Control color output (auto, always, never)
    #[arg(long = "color", value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Suppress summary output in batch mode (still writes exports if -o is provided)
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init();
}

fn build_session(args: &Args) -> Session {
    let threshold = if args.mmap_threshold == 0 {
        u64::MAX
    } else {
        args.mmap_threshold
    };
    let lookup = if args.no_uid_lookup {
        UidLookup::Disabled
    } else {
        UidLookup::Prebuilt
    };
    let mut session = Session::new()
        .with_uid_lookup(lookup)
        .with_mmap_threshold(threshold);
    if let Some(list) = &args.attrs {
        session.set_attributes(MembershipAttributes::parse_list(list));
    }
    session
}

fn verify_inputs(args: &Args) -> Result<()> {
    if !args.batch {
        if args.output.is_some() {
            bail!("-o/--output is only used with --batch");
        }
        return Ok(());
    }
    match &args.file {
        None => bail!("--batch requires an LDIF file"),
        Some(p) if !p.exists() => bail!("LDIF file not found: {}", p.display()),
        Some(_) => Ok(()),
    }
}

fn run_batch(args: &Args, mut session: Session) -> i32 {
    let Some(path) = &args.file else {
        return 2;
    };
    if let Err(e) = session.load(path) {
        error!("failed to load input: {}", e);
        return 3;
    }
    if args.attrs.is_none() {
        match session.detect() {
            Ok(found) if !found.is_empty() => {
                let detected = MembershipAttributes::new(found);
                info!("using detected membership attributes: {}", detected);
                session.set_attributes(detected);
            }
            _ => info!(
                "no membership attributes detected, using: {}",
                session.attributes()
            ),
        }
    }
    let graph = match session.parse() {
        Ok(g) => g,
        Err(e) => {
            error!("failed to parse: {}", e);
            return 3;
        }
    };
    if !args.quiet {
        println!("{}", render_summary_with_top(graph, args.top_limit));
    }

    if let Some(outdir) = &args.output {
        if let Err(e) = fs::create_dir_all(outdir) {
            error!(
                "failed to create output directory {}: {}",
                outdir.display(),
                e
            );
            return 4;
        }
        let ts = chrono::Local::now().format("%Y.%m.%d_%H.%M.%S");
        let nodes = outdir.join(format!("ldaplynx_nodes_{}.csv", ts));
        let edges = outdir.join(format!("ldaplynx_edges_{}.csv", ts));
        if let Err(e) = session.export(&nodes, &edges) {
            error!("failed to write exports to {}: {}", outdir.display(), e);
            return 5;
        }
        info!("wrote {} and {}", nodes.display(), edges.display());
    }
    0
}

fn run_console(args: &Args, session: Session) -> i32 {
    let mut console = Console::new(session, io::stdin().lock(), io::stdout())
        .confirm_attributes(args.attrs.is_none());
    let result = console.banner().and_then(|_| {
        if let Some(path) = &args.file {
            console.execute(Command::Load(Some(path.display().to_string())))?;
        }
        console.run()
    });
    if let Err(e) = result {
        error!("console I/O error: {}", e);
        return 1;
    }
    0
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);
    // Configure color policy
    match args.color {
        ColorChoice::Always => {
            colored::control::set_override(true);
        }
        ColorChoice::Never => {
            colored::control::set_override(false);
        }
        ColorChoice::Auto => {}
    }
    if let Err(e) = verify_inputs(&args) {
        error!("{}", e);
        std::process::exit(2);
    }
    let session = build_session(&args);
    let code = if args.batch {
        run_batch(&args, session)
    } else {
        run_console(&args, session)
    };
    std::process::exit(code);
}
