use anyhow::Result;
use devheat::cli::Cli;
use devheat::logging::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.common.verbose);
    cli.execute()
}
