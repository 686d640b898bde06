//! Binary entry point
//!
//! Argument handling is declarative; everything interesting happens in
//! the orchestrator, which hands back a single exit code.

use clap::Parser;
use std::path::PathBuf;

use phantomiis::services::NativeWindowLocator;
use phantomiis::{Orchestrator, RunConfig};

/// Run a PhantomJS script within the context of an IIS Express web server
#[derive(Parser)]
#[command(name = "phantomiis", version)]
struct Args {
    /// Location of iisexpress.exe
    #[arg(short = 'i', long)]
    iisexpress: PathBuf,

    /// Location of phantomjs.exe
    #[arg(short = 'j', long)]
    phantomjs: PathBuf,

    /// Location of a PhantomJS configuration file
    #[arg(long)]
    phantomconfig: Option<PathBuf>,

    /// Location of the PhantomJS script to run
    #[arg(long, default_value = "./phantom.run.js")]
    phantomscript: PathBuf,

    /// Location of the web site root
    #[arg(short = 's', long, default_value = ".")]
    siteroot: PathBuf,

    /// Port to launch the web site on
    #[arg(short = 'p', long, default_value_t = 3000)]
    port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(format!("phantomiis={level}"))
        .unwrap_or_else(|_| EnvFilter::new("phantomiis=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = RunConfig {
        iis_express: args.iisexpress,
        site_root: args.siteroot,
        port: args.port,
        phantomjs: args.phantomjs,
        script: args.phantomscript,
        phantom_config: args.phantomconfig,
    };

    let orchestrator = Orchestrator::new(NativeWindowLocator);
    let result = orchestrator.run(&config).await;

    if let Some(diagnostic) = &result.diagnostic {
        eprintln!("phantomiis: {diagnostic}");
    }
    std::process::exit(result.exit_code);
}
