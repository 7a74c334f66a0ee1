use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum KindArg {
    Message,
    Component,
    System,
}

impl From<KindArg> for ecs_scope_rust::ItemKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Message => ecs_scope_rust::ItemKind::Message,
            KindArg::Component => ecs_scope_rust::ItemKind::Component,
            KindArg::System => ecs_scope_rust::ItemKind::System,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "ecs-outline",
    version,
    about = "Outline of ECS messages, components and systems in a Rust project"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a project and print its outline
    Scan(ScanArgs),
    /// Print where an item with the given name is declared
    Locate(LocateArgs),
}

#[derive(Parser)]
struct ScanArgs {
    /// Project root (default: current directory)
    #[arg(value_name = "PATH", default_value = ".")]
    path: PathBuf,

    /// Sections to show, repeatable (default: all, or [outline].kinds)
    #[arg(long, value_enum)]
    kind: Vec<KindArg>,

    /// Hide struct fields
    #[arg(long)]
    no_fields: bool,

    /// Extra directory names to skip, repeatable
    #[arg(long, value_name = "DIR")]
    exclude: Vec<String>,

    /// Print scanned/skipped file counts after the outline
    #[arg(long)]
    show_skipped: bool,

    /// Output JSON instead of the text outline
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct LocateArgs {
    /// Item name, matched exactly
    name: String,

    /// Project root (default: current directory)
    #[arg(value_name = "PATH", default_value = ".")]
    path: PathBuf,

    /// Output JSON instead of one line per match
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Scan(args) => commands::scan::run_scan(args),
        Commands::Locate(args) => commands::locate::run_locate(args),
    };

    if let Err(err) = result {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
