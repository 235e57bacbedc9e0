use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use planarpaint_app::{import_ilbm_file, load_project, save_project, Editor, EditorPreferences};
use planarpaint_codec::{decode_ilbm, export_png};

#[derive(Parser)]
#[command(name = "planarpaint", version, about = "Headless tools for PlanarPaint images and projects")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Print the header, palette, and cycle ranges of an ILBM file")]
    Info {
        #[arg(help = "ILBM file to inspect")]
        file: PathBuf,
    },
    #[command(about = "Import an ILBM and write it as a project and/or PNG")]
    Import {
        #[arg(help = "ILBM file to import")]
        file: PathBuf,
        #[arg(long, help = "Write a project JSON file")]
        project: Option<PathBuf>,
        #[arg(long, help = "Write a PNG file")]
        png: Option<PathBuf>,
    },
    #[command(about = "Flatten a project file to PNG")]
    Export {
        #[arg(help = "Project JSON file")]
        project: PathBuf,
        #[arg(long, help = "Output PNG file")]
        png: PathBuf,
    },
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

fn print_info(file: &Path) -> planarpaint_app::Result<()> {
    let bytes = std::fs::read(file)?;
    let decoded = decode_ilbm(&bytes).map_err(planarpaint_app::AppError::Import)?;
    let h = &decoded.header;
    println!("{}", file.display());
    println!("  size:        {}x{}", decoded.width, decoded.height);
    println!("  bitplanes:   {}", h.bitplanes);
    println!("  compression: {}", h.compression);
    println!("  colors:      {}", decoded.palette.len());
    match &decoded.cycles {
        Some(cycles) => {
            println!("  cycles:      {}", cycles.len());
            for c in cycles {
                println!(
                    "    {:>3}..={:<3} rate {:>5} {}",
                    c.low,
                    c.high,
                    c.rate,
                    if c.active { "active" } else { "inactive" }
                );
            }
        }
        None => println!("  cycles:      none"),
    }
    Ok(())
}

fn import(
    editor: &mut Editor,
    file: &Path,
    project: Option<&Path>,
    png: Option<&Path>,
) -> planarpaint_app::Result<()> {
    import_ilbm_file(editor, file)?;
    if let Some(path) = project {
        save_project(editor.state(), path)?;
    }
    if let Some(path) = png {
        export_png(editor.state().document(), path)?;
        info!("Wrote PNG {}", path.display());
    }
    Ok(())
}

fn export(editor: &mut Editor, project: &Path, png: &Path) -> planarpaint_app::Result<()> {
    load_project(editor, project)?;
    export_png(editor.state().document(), png)?;
    info!("Wrote PNG {}", png.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn run(cli: Cli) -> planarpaint_app::Result<()> {
    let prefs = EditorPreferences::load();
    let mut editor = Editor::from_preferences(&prefs)?;
    match &cli.command {
        Commands::Info { file } => print_info(file),
        Commands::Import { file, project, png } => {
            import(&mut editor, file, project.as_deref(), png.as_deref())
        }
        Commands::Export { project, png } => export(&mut editor, project, png),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
