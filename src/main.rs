use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use docx_header_check::{DEFAULT_TEMPLATE_FILE, HeaderValidator, TEMPLATE_ENV};

#[derive(Parser)]
#[command(
    name = "docx-header-check",
    about = "Check that DOCX headers are exact copies of a template header"
)]
struct Args {
    /// Reference template DOCX
    #[arg(long, env = TEMPLATE_ENV, default_value = DEFAULT_TEMPLATE_FILE)]
    template: PathBuf,
    /// Print the template header structure
    #[arg(long)]
    preview: bool,
    /// Documents to validate
    candidates: Vec<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let validator = HeaderValidator::new(&args.template);
    let reference = match validator.initialize() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    if args.preview {
        println!("{}", docx_header_check::preview(reference.structure()));
    }

    let mut failed = false;
    for candidate in &args.candidates {
        match validator.validate(candidate) {
            Ok(verdict) if verdict.is_valid() => println!("PASS {}", candidate.display()),
            Ok(verdict) => {
                failed = true;
                println!("FAIL {}\n{}\n", candidate.display(), verdict.report());
            }
            Err(e) if e.is_template_error() => {
                eprintln!("Error: {e}");
                return ExitCode::from(2);
            }
            Err(e) => {
                failed = true;
                println!("FAIL {}: could not read the file ({e})", candidate.display());
            }
        }
    }

    if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}
