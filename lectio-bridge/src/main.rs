use clap::Parser;
use lectio_bridge::{app, cli::Cli, util};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    util::init_tracing(cli.verbose);
    util::install_panic_hook();

    app::run(cli).await
}
