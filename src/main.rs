//! contract-pdf – command-line contract HTML → PDF converter and HTTP server.
//!
//! Usage:
//!   contract-pdf <input.html> [output.pdf] [--layout-json <path>] [--metrics <model>]
//!   contract-pdf serve [--addr HOST:PORT] [--max-body-bytes N]
//!
//! If `output.pdf` is omitted the PDF is written next to the input file with
//! the same stem (e.g. `contrato.html` → `contrato.pdf`).

use std::{
    env, fs, io,
    path::{Path, PathBuf},
    process,
};

use contract_pdf::fonts::TextMeasure;
use contract_pdf::pipeline::{generate_pdf, PipelineConfig};
use contract_pdf::server::{self, ServerConfig};

/// Options for a one-shot conversion.
#[derive(Debug, Default)]
struct ConvertArgs {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    layout_json: Option<PathBuf>,
    measure: TextMeasure,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let prog = args.first().map(String::as_str).unwrap_or("contract-pdf");

    if args.get(1).map(String::as_str) == Some("serve") {
        run_server(prog, &args[2..]);
        return;
    }

    let opts = parse_convert_args(prog, &args[1..]);
    let Some(input) = opts.input else {
        fail(prog, "Error: no input file specified.");
    };
    let output = opts
        .output
        .unwrap_or_else(|| input.with_extension("pdf"));

    let html = fs::read_to_string(&input).unwrap_or_else(|e| {
        eprintln!("Error reading '{}': {e}", input.display());
        process::exit(1);
    });

    let config = PipelineConfig {
        measure: opts.measure,
        ..PipelineConfig::default()
    };
    let (bytes, layout) = generate_pdf(&html, &config).unwrap_or_else(|e| {
        eprintln!("Error generating PDF: {e}");
        process::exit(1);
    });

    if let Err(e) = write_file(&output, &bytes) {
        eprintln!("Error writing '{}': {e}", output.display());
        process::exit(1);
    }
    if let Some(path) = opts.layout_json {
        if let Err(e) = write_file(&path, layout.to_json().as_bytes()) {
            eprintln!("Error writing '{}': {e}", path.display());
            process::exit(1);
        }
    }

    let pages = layout.pages.len();
    eprintln!(
        "{} -> '{}': {} page{}, {} bytes",
        layout.title,
        output.display(),
        pages,
        if pages == 1 { "" } else { "s" },
        bytes.len()
    );
}

fn parse_convert_args(prog: &str, args: &[String]) -> ConvertArgs {
    let mut opts = ConvertArgs::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--layout-json" => match iter.next() {
                Some(v) => opts.layout_json = Some(PathBuf::from(v)),
                None => fail(prog, "--layout-json needs a path"),
            },
            "--metrics" | "-m" => opts.measure = parse_measure(prog, iter.next()),
            "--help" | "-h" => {
                print_usage(prog);
                process::exit(0);
            }
            other if other.starts_with('-') => fail(prog, &format!("Unknown flag: {other}")),
            path if opts.input.is_none() => opts.input = Some(PathBuf::from(path)),
            path if opts.output.is_none() => opts.output = Some(PathBuf::from(path)),
            path => fail(prog, &format!("Unexpected argument: {path}")),
        }
    }
    opts
}

fn parse_measure(prog: &str, value: Option<&String>) -> TextMeasure {
    match value.map(|v| v.parse::<TextMeasure>()) {
        Some(Ok(m)) => m,
        Some(Err(e)) => fail(prog, &e),
        None => fail(prog, "--metrics needs a value"),
    }
}

/// Write `bytes` to `path`, creating missing parent directories.
fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)
}

fn run_server(prog: &str, args: &[String]) {
    let mut config = ServerConfig::from_env();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--addr" | "-a" => match iter.next() {
                Some(v) => config.addr = v.clone(),
                None => fail(prog, "--addr needs HOST:PORT"),
            },
            "--max-body-bytes" => match iter.next().map(|v| v.parse::<usize>()) {
                Some(Ok(n)) => config.max_body_bytes = n,
                _ => fail(prog, "--max-body-bytes needs a number"),
            },
            "--metrics" | "-m" => config.pipeline.measure = parse_measure(prog, iter.next()),
            "--help" | "-h" => {
                print_usage(prog);
                process::exit(0);
            }
            other => fail(prog, &format!("Unexpected argument: {other}")),
        }
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Error starting runtime: {e}");
        process::exit(1);
    });
    if let Err(e) = runtime.block_on(server::serve(config)) {
        eprintln!("Server error: {e}");
        process::exit(1);
    }
}

fn fail(prog: &str, msg: &str) -> ! {
    eprintln!("{msg}");
    print_usage(prog);
    process::exit(1);
}

fn print_usage(prog: &str) {
    eprintln!("contract-pdf – contract HTML to PDF converter");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} <input.html> [output.pdf] [--layout-json <path>] [--metrics <model>]");
    eprintln!("  {prog} serve [--addr HOST:PORT] [--max-body-bytes N] [--metrics <model>]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <input.html>     HTML file to convert");
    eprintln!("  [output.pdf]     Output path  (default: same stem as input with .pdf)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --layout-json    Also write the composed page layout as JSON");
    eprintln!("  --metrics, -m    Width model for wrapping: heuristic (default) or helvetica");
    eprintln!("  --addr, -a       Listen address (default: $CONTRACT_PDF_ADDR or 0.0.0.0:8000)");
    eprintln!("  --max-body-bytes Largest accepted request body (default: 5 MiB)");
    eprintln!("  --help           Print this message");
}
