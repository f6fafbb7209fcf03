use std::path::PathBuf;
use std::sync::Arc;

use clap::{value_parser, Arg, Command};
use testgen_cli::{debug_requested, deliver, init_tracing, read_source, run, CliOutcome};
use testgen_provider::{build_generator, GeneratorConfig};

#[tokio::main]
async fn main() {
    let cli = Command::new("testgen")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate pytest unit tests for a single Python function")
        .arg(
            Arg::new("path")
                .value_parser(value_parser!(PathBuf))
                .help("Path to a Python file containing a single function. If omitted, reads from stdin."),
        );

    let matches = cli.get_matches();
    init_tracing(debug_requested());

    let source = read_source(matches.get_one::<PathBuf>("path").map(PathBuf::as_path));

    let outcome = match GeneratorConfig::from_env().and_then(|config| build_generator(&config)) {
        Ok(generator) => run(&source, Arc::from(generator)).await,
        Err(err) => {
            tracing::debug!(error = %err, "generator unavailable");
            CliOutcome::failure()
        }
    };

    let exit_code = deliver(&outcome, &mut std::io::stdout().lock());
    std::process::exit(exit_code);
}
