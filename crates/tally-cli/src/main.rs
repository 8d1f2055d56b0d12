use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tally_core::{AppConfig, Defaults, config::load_config, server::AppServer};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Personal task and finance trackers")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Task tracker
    Tasks {
        #[command(subcommand)]
        cmd: AppCommand,
    },

    /// Finance tracker
    Finance {
        #[command(subcommand)]
        cmd: AppCommand,
    },

    /// Print the effective configuration of an app as TOML
    Config {
        app: App,

        #[command(flatten)]
        opts: ServeOpts,
    },
}

#[derive(Subcommand, Debug)]
enum AppCommand {
    /// Start the web server
    Serve {
        #[command(flatten)]
        opts: ServeOpts,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct ServeOpts {
    /// Config file (defaults to $TALLY_CONFIG, then ./tally.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bind address, e.g. 127.0.0.1:5000
    #[arg(long)]
    bind: Option<String>,

    /// SQLite file, or ":memory:"
    #[arg(long)]
    database: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum App {
    Tasks,
    Finance,
}

impl App {
    fn defaults(self) -> Defaults {
        match self {
            App::Tasks => tally_tasks::DEFAULTS,
            App::Finance => tally_finance::DEFAULTS,
        }
    }
}

impl ServeOpts {
    /// Config file values, overridden by any flags given.
    fn resolve(&self, app: App) -> anyhow::Result<AppConfig> {
        let mut cfg = load_config(self.config.as_deref(), app.defaults())?;
        if let Some(bind) = &self.bind {
            cfg.server.bind = bind.clone();
        }
        if let Some(database) = &self.database {
            cfg.database.path = database.clone();
        }
        Ok(cfg)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Tasks {
            cmd: AppCommand::Serve { opts },
        } => serve(App::Tasks, &opts).await,
        Command::Finance {
            cmd: AppCommand::Serve { opts },
        } => serve(App::Finance, &opts).await,
        Command::Config { app, opts } => {
            print!("{}", opts.resolve(app)?.to_toml(app.defaults().section)?);
            Ok(())
        }
    }
}

async fn serve(app: App, opts: &ServeOpts) -> anyhow::Result<()> {
    let cfg = opts.resolve(app)?;
    tracing::info!(app = ?app, database = %cfg.database.path, "starting");

    let (ctx, routes) = match app {
        App::Tasks => (tally_tasks::init_context(cfg).await?, tally_tasks::create_router()),
        App::Finance => (
            tally_finance::init_context(cfg).await?,
            tally_finance::create_router(),
        ),
    };

    AppServer::new(ctx, routes).run().await
}
