use clap::Parser;
use wordbag_app::cli::Cli;
use wordbag_app::run;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli)
}
