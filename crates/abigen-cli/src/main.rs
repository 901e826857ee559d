//! abigen CLI.
//!
//! Generates Rust contract bindings from ABI artifacts and manages the
//! struct cache that keeps struct names stable across runs.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};

use abigen_core::frontend::ARTIFACT_EXTENSIONS;
use abigen_core::{cache, GenerateResult, Generator, GeneratorConfig};

mod ui;

#[derive(Parser)]
#[command(name = "abigen")]
#[command(about = "Generate strongly-typed Rust bindings from contract ABIs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate bindings and update the struct cache
    Generate(GenerateArgs),

    /// Extract structs against the cache without writing anything
    Check(GenerateArgs),

    /// Regenerate whenever an input changes
    Watch(GenerateArgs),

    /// Struct cache management
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// ABI file or directory (repeatable)
    #[arg(short, long = "input", default_value = "abi")]
    inputs: Vec<PathBuf>,

    /// Output directory for bindings and the struct cache
    #[arg(short, long, default_value = "src/bindings")]
    output: PathBuf,

    /// Package name used in generated docs
    #[arg(short, long, default_value = "bindings")]
    package: String,

    /// Name of the contract set; names the shared structs file
    #[arg(short, long, default_value = "contracts")]
    name: String,

    /// Crate the generated code imports its runtime types from
    #[arg(long, default_value = "abigen_runtime")]
    runtime: String,

    /// Emit placeholders for ABI types without a Rust rendering instead of failing
    #[arg(long)]
    allow_unsupported: bool,
}

impl GenerateArgs {
    fn into_config(self) -> GeneratorConfig {
        GeneratorConfig {
            inputs: self.inputs,
            out_dir: self.output,
            package: self.package,
            name: self.name,
            runtime_crate: self.runtime,
            strict_types: !self.allow_unsupported,
        }
    }
}

#[derive(Subcommand)]
enum CacheAction {
    /// List every cached struct
    Show {
        /// Output directory holding the cache
        #[arg(short, long, default_value = "src/bindings")]
        output: PathBuf,
    },

    /// Delete the struct cache (requires explicit confirmation)
    Reset {
        /// Output directory holding the cache
        #[arg(short, long, default_value = "src/bindings")]
        output: PathBuf,

        /// I understand struct names may silently change shape afterwards
        #[arg(long)]
        i_know_what_im_doing: bool,
    },
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => generate(args.into_config())?,
        Commands::Check(args) => check(args.into_config())?,
        Commands::Watch(args) => watch(args.into_config())?,
        Commands::Cache { action } => match action {
            CacheAction::Show { output } => cache_show(&output)?,
            CacheAction::Reset {
                output,
                i_know_what_im_doing,
            } => cache_reset(&output, i_know_what_im_doing)?,
        },
    }

    Ok(())
}

/// Generate bindings once and print a summary.
fn generate(config: GeneratorConfig) -> miette::Result<()> {
    let start = Instant::now();
    let spinner = ui::spinner("Generating bindings...");

    let generator = Generator::new(config);
    let result = match generator.generate() {
        Ok(result) => result,
        Err(e) => {
            spinner.finish_and_clear();
            ui::nope_header();
            return Err(e.into());
        }
    };
    spinner.finish_and_clear();

    print_summary(&result, &generator.config().out_dir);
    ui::timing("Done", start.elapsed().as_millis());
    println!();

    Ok(())
}

fn print_summary(result: &GenerateResult, out_dir: &Path) {
    println!();
    ui::box_header("CONTRACTS");
    ui::box_line("");
    for contract in &result.contracts {
        ui::box_line(&format!("{} {}", ui::symbols::TRIANGLE, contract));
    }
    ui::box_line("");
    ui::box_line(&format!(
        "{} {} {} new",
        ui::plural(result.structs, "struct"),
        ui::symbols::DOT,
        result.new_structs
    ));
    ui::box_line(&format!("{} written to {}", ui::plural(result.files.len(), "file"), out_dir.display()));
    ui::box_line("");
    ui::box_footer();
    println!();
}

/// Run extraction only.
fn check(config: GeneratorConfig) -> miette::Result<()> {
    let spinner = ui::spinner("Checking structs against the cache...");

    match Generator::new(config).check() {
        Ok(result) => {
            spinner.finish_and_clear();
            ui::success("No struct conflicts.");
            println!();
            println!(
                "    {} {} {} cached {} {} new",
                ui::plural(result.contracts.len(), "contract"),
                ui::symbols::DOT,
                ui::plural(result.cached_structs, "struct"),
                ui::symbols::DOT,
                result.new_structs
            );
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            ui::nope_header();
            Err(e.into())
        }
    }
}

/// Regenerate on every debounced change to an input.
///
/// Errors are reported and watching continues.
fn watch(config: GeneratorConfig) -> miette::Result<()> {
    let (tx, rx) = mpsc::channel();

    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        move |result: DebounceEventResult| {
            if let Ok(events) = result {
                if events.iter().any(|event| is_input_change(&event.path)) {
                    let _ = tx.send(());
                }
            }
        },
    )
    .into_diagnostic()?;

    for input in &config.inputs {
        debouncer
            .watcher()
            .watch(input, RecursiveMode::Recursive)
            .into_diagnostic()?;
        ui::info(&format!("Watching {}", input.display()));
    }
    println!();

    let generator = Generator::new(config);
    regenerate(&generator);

    while rx.recv().is_ok() {
        // Coalesce changes that arrived while regenerating.
        while rx.try_recv().is_ok() {}
        println!();
        regenerate(&generator);
    }

    Ok(())
}

fn regenerate(generator: &Generator) {
    let spinner = ui::spinner("Regenerating...");
    let start = Instant::now();

    match generator.generate() {
        Ok(result) => {
            spinner.finish_and_clear();
            ui::success(&format!(
                "Generated {} and {} in {}ms",
                ui::plural(result.contracts.len(), "contract"),
                ui::plural(result.structs, "struct"),
                start.elapsed().as_millis()
            ));
        }
        Err(e) => {
            spinner.finish_and_clear();
            ui::error(&format!("{:?}", miette::Report::new(e)));
        }
    }
    ui::dim("Waiting for changes...");
}

/// Whether a changed path is an ABI artifact or bytecode file.
fn is_input_change(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext == "bin" || ARTIFACT_EXTENSIONS.contains(&ext))
        && path.file_name().and_then(|n| n.to_str()) != Some(cache::CACHE_FILE_NAME)
}

/// List the cached structs.
fn cache_show(output: &Path) -> miette::Result<()> {
    let cache_path = output.join(cache::CACHE_FILE_NAME);
    let registry = cache::load(&cache_path)?;

    println!();
    ui::box_header("STRUCT CACHE");
    ui::box_line("");
    if registry.is_empty() {
        ui::box_line("No cached structs.");
    } else {
        for def in registry.iter() {
            ui::struct_line(&def.name, def.fields.len(), def.is_event);
        }
    }
    ui::box_line("");
    ui::box_line(&format!("File: {}", cache_path.display()));
    ui::box_footer();
    println!();

    Ok(())
}

/// Delete the struct cache.
fn cache_reset(output: &Path, confirmed: bool) -> miette::Result<()> {
    let cache_path = output.join(cache::CACHE_FILE_NAME);

    if !confirmed {
        ui::nope_header();
        println!("  This deletes the struct cache.");
        println!("  The next run may give an existing struct name a different shape,");
        println!("  breaking code that was built against the old bindings.");
        println!();
        println!("  If you're sure, run:");
        println!("    abigen cache reset --i-know-what-im-doing");
        return Ok(());
    }

    if cache_path.exists() {
        std::fs::remove_file(&cache_path)
            .map_err(|e| miette::miette!("Failed to delete struct cache: {}", e))?;
        println!();
        ui::success(&format!("Struct cache deleted: {}", cache_path.display()));
    } else {
        println!();
        ui::dim(&format!("No struct cache found at {}", cache_path.display()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_change_filter() {
        assert!(is_input_change(Path::new("abi/Token.abi")));
        assert!(is_input_change(Path::new("abi/Token.bin")));
        assert!(is_input_change(Path::new("out/Token.json")));
        assert!(!is_input_change(Path::new("src/bindings/structs.lock.json")));
        assert!(!is_input_change(Path::new("src/bindings/token.rs")));
    }

    #[test]
    fn test_args_map_onto_config() {
        let cli = Cli::parse_from([
            "abigen",
            "generate",
            "-i",
            "abi/core",
            "-i",
            "abi/periphery",
            "-o",
            "gen",
            "--allow-unsupported",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        let config = args.into_config();
        assert_eq!(config.inputs, vec![PathBuf::from("abi/core"), PathBuf::from("abi/periphery")]);
        assert_eq!(config.out_dir, PathBuf::from("gen"));
        assert_eq!(config.runtime_crate, "abigen_runtime");
        assert!(!config.strict_types);
    }
}
