use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use contrascan::detect::bridge::{DetrBridge, DEFAULT_MODEL};
use contrascan::pipeline::{analyze_document, export_analysis, PipelineConfig};
use contrascan::render::{pdf_reader, PdfRasterizer};

#[derive(Parser, Debug)]
#[command(name = "contrascan")]
#[command(version, about = "PDF contract review: signature and annotation detection with case classification", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a PDF contract
    Analyze {
        /// Input PDF file path
        input: PathBuf,

        /// Output directory (default: ./<input_name>_analysis)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Rendering DPI for the detection pass
        #[arg(long, default_value_t = 150)]
        dpi: u32,

        /// Object-detection model handed to the bridge
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Analyze multiple PDF contracts
    Batch {
        /// Input PDF files
        inputs: Vec<PathBuf>,

        /// Output directory for all results
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Rendering DPI for the detection pass
        #[arg(long, default_value_t = 150)]
        dpi: u32,

        /// Object-detection model handed to the bridge
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,
    },

    /// Show information about a PDF file
    Info {
        /// Input PDF file path
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            output,
            dpi,
            model,
            quiet,
        } => analyze_single(input, output, dpi, model, quiet),
        Commands::Batch {
            inputs,
            output,
            dpi,
            model,
        } => analyze_batch(inputs, output, dpi, model),
        Commands::Info { input } => show_info(input),
    }
}

fn analyze_single(
    input: PathBuf,
    output: Option<PathBuf>,
    dpi: u32,
    model: String,
    quiet: bool,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }
    if !input.is_file() {
        anyhow::bail!("Input is not a file: {}", input.display());
    }

    let output_dir = output.unwrap_or_else(|| {
        let stem = input.file_stem().unwrap().to_string_lossy();
        PathBuf::from(format!("{}_analysis", stem))
    });

    if !quiet {
        println!("[*] Analyzing: {}", input.display());
        println!("[*] Output: {}", output_dir.display());
        println!("[*] DPI: {dpi}, model: {model}");
    }

    let config = PipelineConfig::new(input.clone(), output_dir.clone());
    let rasterizer = PdfRasterizer::new(config.pages_dir(), dpi);
    let detector = DetrBridge::new(output_dir.join("detect")).with_model(model);

    let result = analyze_document(&config, &rasterizer, &detector)
        .with_context(|| format!("Failed to analyze PDF: {}", input.display()))?;

    export_analysis(&result, &config)
        .with_context(|| format!("Failed to export to: {}", output_dir.display()))?;

    if !quiet {
        println!(
            "\n[✓] Case {}: {}",
            result.classification.case.id(),
            result.classification.description
        );
        println!("    {}", result.classification.justification);
        println!(
            "    Overall confidence: {:.0}%",
            f64::from(result.confidence) * 100.0
        );
        println!(
            "    {} detection(s); results saved to: {}",
            result.detections.len(),
            output_dir.display()
        );
    }

    Ok(())
}

fn analyze_batch(
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
    dpi: u32,
    model: String,
) -> Result<()> {
    if inputs.is_empty() {
        anyhow::bail!("No input files specified");
    }

    let base_output = output.unwrap_or_else(|| PathBuf::from("batch_analysis"));

    println!("[*] Batch analyzing {} file(s)", inputs.len());
    println!("[*] Base output: {}\n", base_output.display());

    let mut success = 0;
    let mut failed = 0;

    for (i, input) in inputs.iter().enumerate() {
        println!("[{}/{}] Analyzing: {}", i + 1, inputs.len(), input.display());

        if !input.exists() {
            eprintln!("  [!] Skipped: file does not exist");
            failed += 1;
            continue;
        }

        let stem = input.file_stem().unwrap().to_string_lossy();
        let output_dir = base_output.join(&*stem);

        match analyze_single(input.clone(), Some(output_dir), dpi, model.clone(), true) {
            Ok(_) => {
                println!("  [✓] Success");
                success += 1;
            }
            Err(e) => {
                eprintln!("  [✗] Failed: {e:#}");
                failed += 1;
            }
        }
        println!();
    }

    println!("\n[*] Summary: {success} succeeded, {failed} failed");

    if failed > 0 {
        anyhow::bail!("{failed} file(s) failed to analyze");
    }

    Ok(())
}

fn show_info(input: PathBuf) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let pages = pdf_reader::page_count(&input)
        .with_context(|| format!("Failed to open PDF: {}", input.display()))?;

    println!("PDF Information");
    println!("===============");
    println!("File: {}", input.display());
    println!("Pages: {pages}");

    Ok(())
}
