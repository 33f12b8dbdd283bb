use forgejo_node::{cli, server};

#[tokio::main(flavor = "current_thread")] // items run one call at a time unless --concurrency is set
async fn main() -> anyhow::Result<()> {
    let cmd = cli::build_cli();
    let matches = cmd.get_matches();
    let log_level = matches.get_one::<String>("log-level").cloned();
    let version_flag = matches.get_flag("version");

    cli::init_logging(log_level.as_deref());

    if version_flag {
        println!("forgejo-node {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    match matches.subcommand() {
        Some(("schema", _)) => server::print_schema(),
        Some(("check-credentials", _)) => server::check_credentials().await,
        Some(("run", m)) => server::run_stdio(cli::run_options(Some(m))).await,
        _ => server::run_stdio(cli::run_options(None)).await,
    }
}
