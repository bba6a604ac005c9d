mod check;
mod ddl;
mod glob_util;
mod init;
mod output;
mod query;
mod scaffold;
mod seed;
mod sync;

use crate::config::{ProjectLayout, TuskConfig};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tusk")]
#[command(version)]
#[command(
    about = "Generate ordered, lock-aware SQL artifacts for a local PostgreSQL mirror",
    long_about = None
)]
pub struct Cli {
    /// Project root containing tusk.yaml
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Verbose output (debug logging, including commands run)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract and sanitize remote schemas into 200-bucket artifacts
    Ddl {
        /// Only process the database with this source or local name
        #[arg(short, long)]
        database: Option<String>,

        /// Preview without running pg_dump or writing files
        #[arg(long)]
        dry_run: bool,

        /// Overwrite artifacts protected with @lock
        #[arg(short, long)]
        force: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate seed artifacts for every seed_tables directive
    Seed {
        /// Only process the database with this source or local name
        #[arg(short, long)]
        database: Option<String>,

        /// Preview without running pg_dump or writing files
        #[arg(long)]
        dry_run: bool,

        /// Overwrite artifacts protected with @lock
        #[arg(short, long)]
        force: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run query templates remotely and save the rows as 600-bucket artifacts
    Query {
        /// Template file name or glob pattern inside templates/queries
        #[arg(long)]
        file: Option<String>,

        /// Preview without running psql or writing files
        #[arg(long)]
        dry_run: bool,

        /// Overwrite artifacts protected with @lock
        #[arg(short, long)]
        force: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write 000_init.sql creating every local target database
    InitSql {
        /// Preview without writing
        #[arg(long)]
        dry_run: bool,

        /// Regenerate even though the script carries @lock
        #[arg(short, long)]
        force: bool,
    },

    /// Verify connectivity and catalog access for every remote source database
    Check {
        /// Only check the database with this source or local name
        #[arg(short, long)]
        database: Option<String>,

        /// Preview without running psql
        #[arg(long)]
        dry_run: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay query-bucket artifacts (600 to 799) against the running local database
    Sync {
        /// Local database user (default: $POSTGRES_USER or postgres)
        #[arg(short = 'U', long)]
        username: Option<String>,

        /// Preview without running psql
        #[arg(long)]
        dry_run: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write starter generator definitions and query templates
    Scaffold {
        #[command(subcommand)]
        target: ScaffoldCommands,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ScaffoldCommands {
    /// Default generator definition for a table
    Faker {
        /// Table name, optionally schema-qualified
        #[arg(short, long)]
        table: String,

        /// Output path (default: templates/faker/<table>.yaml)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Preview without writing
        #[arg(long)]
        dry_run: bool,

        /// Overwrite a file protected with @lock
        #[arg(short, long)]
        force: bool,
    },

    /// Query template for a table, read by the `query` seed method
    Query {
        /// Table name, optionally schema-qualified
        #[arg(short, long)]
        table: String,

        /// Preview without writing
        #[arg(long)]
        dry_run: bool,

        /// Overwrite a file protected with @lock
        #[arg(short, long)]
        force: bool,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let layout = ProjectLayout::new(cli.root);
    match cli.command {
        Commands::Ddl {
            database,
            dry_run,
            force,
            json,
        } => ddl::run(&layout, database, dry_run, force, json),
        Commands::Seed {
            database,
            dry_run,
            force,
            json,
        } => seed::run(&layout, database, dry_run, force, json),
        Commands::Query {
            file,
            dry_run,
            force,
            json,
        } => query::run(&layout, file, dry_run, force, json),
        Commands::InitSql { dry_run, force } => init::run(&layout, dry_run, force),
        Commands::Check {
            database,
            dry_run,
            json,
        } => check::run(&layout, database, dry_run, json),
        Commands::Sync {
            username,
            dry_run,
            json,
        } => sync::run(&layout, username, dry_run, json),
        Commands::Scaffold { target } => match target {
            ScaffoldCommands::Faker {
                table,
                output,
                dry_run,
                force,
            } => scaffold::run_faker(&layout, &table, output, dry_run, force),
            ScaffoldCommands::Query {
                table,
                dry_run,
                force,
            } => scaffold::run_query(&layout, &table, dry_run, force),
        },
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "tusk", &mut io::stdout());
            Ok(())
        }
    }
}

/// Load `tusk.yaml` from the project root
fn load_config(layout: &ProjectLayout) -> anyhow::Result<TuskConfig> {
    Ok(TuskConfig::load(&layout.config_path())?)
}
