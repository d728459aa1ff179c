use anyhow::{Context, Result};
use book_order::{
    Completion, HttpPublisher, OrderConfig, OrderError, OrderRequest, OrderResult, Workflow,
    WorkflowOptions,
};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "bookord",
    about = "Order a printed copy of a PDF book from the print-on-demand publisher",
    version
)]
struct Cli {
    /// Interior PDF
    pdf: PathBuf,

    /// Book title
    title: String,

    /// Subtitle (pass "" for none)
    subtitle: String,

    /// Author name as printed on the cover
    author: String,

    /// Read settings from this file instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Price the order but do not pay for it
    #[arg(long)]
    dry_run: bool,

    /// Also save the generated cover PDF
    #[arg(long)]
    cover_out: Option<PathBuf>,

    /// Binding (overrides LULU_BINDING)
    #[arg(long, value_enum)]
    binding: Option<BindingArg>,

    /// Interior colour (overrides LULU_INTERIOR_COLOR)
    #[arg(long, value_enum)]
    color: Option<ColorArg>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum BindingArg {
    Perfect,
    Coil,
    Saddle,
    Case,
    Linen,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorArg {
    Bw,
    Full,
}

impl From<BindingArg> for book_format::Binding {
    fn from(arg: BindingArg) -> Self {
        match arg {
            BindingArg::Perfect => Self::PerfectBound,
            BindingArg::Coil => Self::CoilBound,
            BindingArg::Saddle => Self::SaddleStitch,
            BindingArg::Case => Self::CaseWrap,
            BindingArg::Linen => Self::LinenWrap,
        }
    }
}

impl From<ColorArg> for book_format::InteriorColor {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Bw => Self::BlackAndWhite,
            ColorArg::Full => Self::FullColor,
        }
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = ["bookord", "book_order", "book_format", "book_cover"]
        .iter()
        .map(|krate| format!("{}={}", krate, level))
        .collect::<Vec<_>>()
        .join(",");

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .try_init()
        .context("Failed to initialise logging")
}

fn load_config(cli: &Cli) -> std::result::Result<OrderConfig, OrderError> {
    let mut config = OrderConfig::load(cli.env_file.as_deref())?;
    apply_overrides(cli, &mut config);
    Ok(config)
}

/// Command-line print options win over the environment
fn apply_overrides(cli: &Cli, config: &mut OrderConfig) {
    if let Some(binding) = cli.binding {
        config.print.binding = binding.into();
    }
    if let Some(color) = cli.color {
        config.print.color = color.into();
    }
}

/// Message for the operator and the process exit code
fn report(result: &OrderResult) -> (ExitCode, String) {
    match &result.outcome {
        Ok(Completion::Ordered(receipt)) => {
            let message = format!(
                "Order submitted: {}\n  Project: {}\n  Product: {}\n  Charged: {}\n",
                receipt.order_id, receipt.project_id, receipt.pod_package_id, receipt.price
            );
            (ExitCode::SUCCESS, message)
        }
        Ok(Completion::Quoted { project_id, price }) => {
            let message = format!(
                "Dry run: nothing was paid or ordered\n  Project: {}\n  Price:   {}\n",
                project_id, price
            );
            (ExitCode::SUCCESS, message)
        }
        Err(err) => {
            let step = result.failed_step().unwrap_or("unknown step");
            let mut message = format!(
                "Error: {} failed: {}\n  Last completed state: {}\n",
                step, err, result.reached
            );
            if err.after_payment() {
                message.push_str("  Payment went through but the order was not submitted\n");
            }
            (ExitCode::from(err.exit_code()), message)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            return Ok(ExitCode::from(err.exit_code()));
        }
    };
    log::debug!("{:?}", config);

    let request = OrderRequest::new(cli.pdf, cli.title, cli.subtitle, cli.author);
    let options = WorkflowOptions {
        dry_run: cli.dry_run,
        cover_out: cli.cover_out,
    };

    let publisher = HttpPublisher::from_config(&config);
    let mut workflow = Workflow::new(publisher, &config, options);
    let result = workflow.run(&request).await;

    let (code, message) = report(&result);
    if result.success() {
        print!("{}", message);
    } else {
        eprint!("{}", message);
    }
    Ok(code)
}
