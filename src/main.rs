use clap::Parser;
use miette::Result;
use stocktake::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Init(args) => stocktake::cli::commands::init::run(args),
        Commands::Cat(cmd) => stocktake::cli::commands::cat::run(cmd, &global),
        Commands::Prod(cmd) => stocktake::cli::commands::prod::run(cmd, &global),
        Commands::Sup(cmd) => stocktake::cli::commands::sup::run(cmd, &global),
        Commands::Po(cmd) => stocktake::cli::commands::po::run(cmd, &global),
        Commands::Explore(args) => stocktake::cli::commands::explore::run(args, &global),
        Commands::Status(args) => stocktake::cli::commands::status::run(args, &global),
        Commands::Completions(args) => stocktake::cli::commands::completions::run(args),
    }
}
