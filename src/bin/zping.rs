use clap::Parser;
use console::{Term, set_colors_enabled, style};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;

use zping::adapters::{icmp::IcmpProbe, resolver};
use zping::{RunMode, Session, Target, ZpingError, csvlog, fmt};

#[derive(Parser, Debug)]
#[command(name = "zping")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Ping a host repeatedly, with optional per-attempt CSV logging")]
struct Args {
    /// Host name or IP address to ping
    #[arg(index = 1)]
    target: String,

    /// Run a fixed number of attempts instead of pinging until interrupted
    #[arg(short = 't', long = "tt")]
    tt: bool,

    /// Number of attempts in fixed-count mode
    #[arg(short = 'n', long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..))]
    count: u32,

    /// Log every attempt to a CSV file at a generated path
    #[arg(long)]
    csvlog: bool,

    /// Log to this CSV file instead of the generated path (implies --csvlog)
    #[arg(long = "csvlog-path")]
    csvlog_path: Option<PathBuf>,

    /// Disable colored output
    #[arg(long = "no-color", alias = "nocolor")]
    no_color: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let want_color = io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none()
        && !args.no_color;
    set_colors_enabled(want_color);

    let term = Term::stdout();
    let code = run(&args, &term).await;
    process::exit(code);
}

async fn run(args: &Args, term: &Term) -> i32 {
    // Log destination first: a bad log directory must abort before the
    // target is even resolved.
    let log_path = match csvlog::resolve_destination(
        &args.target,
        args.csvlog,
        args.csvlog_path.as_deref(),
    ) {
        Ok(path) => path,
        Err(e) => return fail(term, &e),
    };
    if let Some(path) = &log_path {
        term.write_line(&fmt::text::render_log_notice(path)).ok();
    }

    let ip = match resolver::resolve_ip(&args.target) {
        Ok(ip) => ip,
        Err(e) => return fail(term, &e),
    };
    let target = Target::new(args.target.clone(), ip);
    term.write_line(&fmt::text::render_preamble(&target)).ok();

    let mut prober = match IcmpProbe::open(ip).await {
        Ok(probe) => probe,
        Err(e) => return fail(term, &e),
    };

    let mode = if args.tt {
        RunMode::Count(args.count)
    } else {
        RunMode::UntilInterrupted
    };
    let session = Session {
        target,
        mode,
        log_path,
    };
    session.run(&mut prober, term).await;
    0
}

fn fail(term: &Term, err: &ZpingError) -> i32 {
    term.write_line(&style(format!("Error: {err}")).red().bold().to_string())
        .ok();
    match err {
        ZpingError::Dns(_) | ZpingError::Config(_) => 2,
        _ => 1,
    }
}
