use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use payqr::{
    codec, generate, ConstraintSet, ExpiryWindow, PaymentFields, RenderOptions, ScanResult,
    Scanner,
};

#[derive(Parser)]
#[command(name = "payqr", version, about = "Generate and scan payment QR codes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a payment QR image
    Generate(GenerateArgs),
    /// Parse a raw payload string
    Decode {
        payload: String,
        #[command(flatten)]
        check: CheckArgs,
    },
    /// Read a payment QR from an image file
    Scan {
        image: PathBuf,
        #[command(flatten)]
        check: CheckArgs,
    },
}

#[derive(Args)]
struct GenerateArgs {
    #[arg(long)]
    identifier: String,
    #[arg(long)]
    amount: String,
    /// Expiry date as M/d/yyyy
    #[arg(long, conflicts_with_all = ["expires_in_days", "expires_in_months"])]
    expiry: Option<String>,
    #[arg(long)]
    expires_in_days: Option<u32>,
    #[arg(long)]
    expires_in_months: Option<u32>,
    /// Reject expiry dates in the past
    #[arg(long)]
    strict: bool,
    #[arg(long, default_value_t = 500)]
    size: u32,
    #[arg(long, default_value_t = 0.2)]
    cutout_scale: f32,
    #[arg(long, default_value_t = 0.2)]
    padding_scale: f32,
    /// Image drawn in the centre of the code
    #[arg(long)]
    logo: Option<PathBuf>,
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct CheckArgs {
    /// Validate fields with the default constraints
    #[arg(long)]
    validate: bool,
    /// Validate fields and reject expired dates
    #[arg(long, conflicts_with = "validate")]
    strict: bool,
}

impl CheckArgs {
    fn scanner(&self) -> Scanner {
        match (self.validate, self.strict) {
            (_, true) => Scanner::with_constraints(ConstraintSet::strict()),
            (true, false) => Scanner::with_constraints(ConstraintSet::default()),
            _ => Scanner::new(),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Generate(args) => run_generate(args),
        Command::Decode { payload, check } => {
            let res = check.scanner().scan_text(&payload)?;
            print_result(&res)
        }
        Command::Scan { image, check } => match check.scanner().scan_file(&image)? {
            Some(res) => print_result(&res),
            None => bail!("No QR code found in {}", image.display()),
        },
    }
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let fields = match args.expiry {
        Some(expiry) => PaymentFields::new(args.identifier, args.amount, expiry),
        None => {
            let mut window = ExpiryWindow::default();
            if args.expires_in_days.is_some() || args.expires_in_months.is_some() {
                window = ExpiryWindow::new(
                    args.expires_in_days.unwrap_or(0),
                    args.expires_in_months.unwrap_or(0),
                );
            }
            let expiry = window.format_from_today().context("Expiry date out of range")?;
            PaymentFields::new(args.identifier, args.amount, expiry)
        }
    };

    let constraints = if args.strict { ConstraintSet::strict() } else { ConstraintSet::default() };

    let mut opts = RenderOptions::default()
        .with_size(args.size)
        .with_cutout_scale(args.cutout_scale)
        .with_padding_scale(args.padding_scale);
    if let Some(path) = &args.logo {
        opts = opts.with_logo(load_logo(path)?);
    }

    let img = generate(&fields, &constraints, &opts).context("Failed to generate QR")?;
    img.save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!(output = %args.output.display(), payload = %codec::build_uri(&fields), "Saved QR");
    Ok(())
}

fn load_logo(path: &Path) -> Result<image::RgbaImage> {
    let img =
        image::open(path).with_context(|| format!("Failed to load logo {}", path.display()))?;
    Ok(img.to_rgba8())
}

fn print_result(res: &ScanResult) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(res)?);
    Ok(())
}
