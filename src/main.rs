use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use skill_packager::config::{current_dir, HOME_ENV};
use skill_packager::{
    pack_skill, resolve_output_path, scan_skills, validate_skill_dir, write_manifest,
    ManifestConfig, PackConfig, PackError,
};

#[derive(Parser)]
#[command(
    name = "skill-packager",
    version,
    about = "Package Agent Skills and generate skill manifests"
)]
struct Cli {
    /// Suppress progress output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Package a skill directory into a .skill archive
    Pack {
        skill_name: String,
        /// Directory containing the skill folder [default: .]
        source_dir: Option<PathBuf>,
        /// Directory receiving the archive [default: .]
        output_dir: Option<PathBuf>,
    },
    /// Generate a manifest of every skill in a directory
    Manifest {
        skills_dir: PathBuf,
        /// Manifest file, or a directory to write SKILLS.md into [default: ./SKILLS.md]
        output: Option<PathBuf>,
        /// Home directory shown as ~ in skill paths
        #[arg(long, env = HOME_ENV)]
        home: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Command::Pack {
            skill_name,
            source_dir,
            output_dir,
        } => run_pack(
            PackConfig::resolve(skill_name, source_dir, output_dir, &current_dir()),
            cli.quiet,
        ),
        Command::Manifest {
            skills_dir,
            output,
            home,
        } => run_manifest(ManifestConfig::resolve(skills_dir, output, home), cli.quiet),
    };

    std::process::exit(exit_code);
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("skill_packager={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn run_pack(config: PackConfig, quiet: bool) -> i32 {
    if !quiet {
        println!("Packaging skill: {}\n", config.skill_name);
    }

    let skill = match validate_skill_dir(&config.skill_name, &config.skill_dir()) {
        Ok(skill) => skill,
        Err(err) => return fail(&err),
    };

    if !quiet {
        println!("Skill structure validated: {}", skill.name);
    }

    let report = match pack_skill(&skill, &config.output_dir) {
        Ok(report) => report,
        Err(err) => return fail(&err),
    };

    if !quiet {
        for entry in &report.entries {
            println!("  + {entry}");
        }
        println!("\nSkill packaged successfully!");
        println!("  File: {}", report.output_path.display());
        println!("  Size: {:.1} KB", report.size_bytes as f64 / 1024.0);
        println!("\nTo upload to Claude.ai:");
        println!("  1. Go to Settings -> Capabilities");
        println!("  2. Click 'Upload Custom Skill'");
        println!(
            "  3. Select {}",
            report
                .output_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default()
        );
        println!("  4. The skill will be available in future chats");
    }

    0
}

fn run_manifest(config: ManifestConfig, quiet: bool) -> i32 {
    let report = match scan_skills(&config.skills_dir, config.home_dir.as_deref()) {
        Ok(report) => report,
        Err(err) => return fail(&err),
    };

    let output_path = resolve_output_path(config.output.as_deref(), &current_dir());
    if let Err(err) = write_manifest(&report, &output_path) {
        return fail(&err);
    }

    if !quiet {
        println!(
            "Scanned {} directories, included {} skills, skipped {}",
            report.scanned,
            report.entries.len(),
            report.skipped.len()
        );
        for skipped in &report.skipped {
            println!("  - {}: {}", skipped.dir_name, skipped.reason);
        }
        println!("Manifest written to {}", output_path.display());
    }

    0
}

fn fail(err: &PackError) -> i32 {
    tracing::debug!(code = err.code(), "command failed");
    eprintln!("Error: {err}");
    1
}
