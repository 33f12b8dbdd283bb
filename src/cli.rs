use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use crate::server::RunOptions;

pub fn build_cli() -> Command {
    Command::new("forgejo-node")
        .about("Forgejo integration node: run resource/operation calls read as JSON from stdin")
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .num_args(1)
                .global(true)
                .help("Override RUST_LOG level (e.g., info, debug)"),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .help("Print version and exit")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("run")
                .about("Execute a run request from stdin (default)")
                .arg(
                    Arg::new("continue-on-fail")
                        .long("continue-on-fail")
                        .help("Emit {\"error\": ...} items instead of aborting on failure")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("concurrency")
                        .long("concurrency")
                        .num_args(1)
                        .value_parser(value_parser!(usize))
                        .help("Items in flight at once; output order is unchanged"),
                ),
        )
        .subcommand(Command::new("schema").about("Print the node parameter and credential schema"))
        .subcommand(
            Command::new("check-credentials")
                .about("Validate FORGEJO_SERVER_URL/FORGEJO_TOKEN by fetching the authenticated user"),
        )
}

pub fn run_options(matches: Option<&ArgMatches>) -> RunOptions {
    let Some(m) = matches else {
        return RunOptions::default();
    };
    RunOptions {
        continue_on_fail: m.get_flag("continue-on-fail"),
        concurrency: m.get_one::<usize>("concurrency").copied(),
    }
}

pub fn init_logging(level: Option<&str>) {
    // Explicit level wins, then RUST_LOG, then info. Logs go to stderr.
    let env = env_logger::Env::default().default_filter_or(level.unwrap_or("info"));
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(lvl) = level {
        builder.parse_filters(lvl);
    }
    builder.target(env_logger::Target::Stderr).init();
}
