mod commands;
mod terminal;

use commands::{backup, routes, CommandLine, Commands};
use terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init(commands.verbose);

    match commands.command {
        Commands::Routes { topology } => routes::routes(&topology),
        Commands::Backup {
            topology,
            replay,
            out,
            timeout_ms,
            abort_on_read_failure,
        } => {
            backup::backup(
                &topology,
                &replay,
                out,
                timeout_ms,
                abort_on_read_failure,
                commands.quiet,
            )
            .await
        }
    }
}
