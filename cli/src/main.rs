mod commands;
mod terminal;

use adscout_common::config::Config;
use commands::{CommandLine, Commands, classify, infer};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging();

    let cfg = Config {
        no_banner: commands.no_banner,
        quiet: commands.quiet,
    };

    print::banner(cfg.no_banner, cfg.quiet);

    let result = match commands.command {
        Commands::Infer { report, project } => {
            print::header("loading scan report", cfg.quiet);
            infer::infer(&report, &project, &cfg).await
        }
        Commands::Classify { report, host } => {
            print::header("classifying host", cfg.quiet);
            classify::classify(&report, &host, &cfg)
        }
    };

    print::end_of_program(cfg.quiet);
    result
}
