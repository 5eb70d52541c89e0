mod reports;
mod source;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;

use freight_core::{
    ContractTerms, FeeError, FeeResult, RouteCatalog, RouteKey, StaticRoutes, open_catalog,
};
use source::FileRoutes;

/// Exit code for quotes the catalog refuses (unknown route, oversized cargo).
const EXIT_REJECTED: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Labelled quote sheet for humans
    Console,
    /// Fee result as JSON
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "freight-quote", version)]
#[command(about = "Courier contract quotes for Northern Freight Unlimited")]
struct Args {
    /// List all available routes and exit
    #[arg(long)]
    list_routes: bool,

    /// Route to price, e.g. "C-J6MT ➠ Jita/Perimeter" (defaults to the catalog default)
    #[arg(long, conflicts_with_all = ["from", "to"])]
    route: Option<String>,

    /// Origin of the route, used with --to instead of --route
    #[arg(long, requires = "to")]
    from: Option<String>,

    /// Destination of the route, used with --from instead of --route
    #[arg(long, requires = "from")]
    to: Option<String>,

    /// Price the round-trip variant of --from/--to
    #[arg(long, requires = "from")]
    round_trip: bool,

    /// Cargo volume in m3
    #[arg(long, required_unless_present = "list_routes")]
    volume: Option<f64>,

    /// Collateral in the catalog's collateral unit (millions of ISK for the built-in table)
    #[arg(long, default_value_t = 0.0)]
    collateral: f64,

    /// JSON route table to load instead of the built-in one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let catalog = load_catalog(&args)?;

    if args.list_routes {
        let mut output_target = OutputTarget::new(args.output.clone())?;
        reports::write_route_list(output_target.writer(), &catalog)?;
        output_target.flush_inner()?;
        return Ok(());
    }

    let route = resolve_route(&args, &catalog)?;
    let volume = args.volume.unwrap_or_default();
    info!(
        "quote requested: route={route}, volume={volume}, collateral={}",
        args.collateral
    );

    let fee = match catalog.compute_fee(&route, volume, args.collateral) {
        Ok(fee) => fee,
        Err(err @ FeeError::VolumeExceeded { .. }) => {
            eprintln!("⚠️  {}", err.to_string().yellow());
            std::process::exit(EXIT_REJECTED);
        }
        Err(err @ FeeError::UnknownRoute { .. }) => {
            eprintln!("❌ {}", err.to_string().red());
            eprintln!("   Run with --list-routes to see available routes");
            std::process::exit(EXIT_REJECTED);
        }
        Err(err) => return Err(err).context("pricing contract"),
    };

    log_quote(&fee, args.collateral * catalog.collateral_unit());
    write_quote(&args, &fee)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load_catalog(args: &Args) -> Result<RouteCatalog> {
    let catalog = match &args.catalog {
        Some(path) => open_catalog(&FileRoutes::new(path))?,
        None => open_catalog(&StaticRoutes)?,
    };
    debug!("route catalog loaded with {} routes", catalog.len());
    Ok(catalog)
}

fn resolve_route(args: &Args, catalog: &RouteCatalog) -> Result<String> {
    if let Some(route) = &args.route {
        return Ok(route.clone());
    }
    if let (Some(from), Some(to)) = (&args.from, &args.to) {
        return Ok(RouteKey::new(from, to, args.round_trip).into_string());
    }
    catalog
        .default_route()
        .map(ToString::to_string)
        .context("route catalog is empty")
}

fn log_quote(fee: &FeeResult, collateral_isk: f64) {
    info!(
        "quoted: route={}, reward={}, rate={}, collateral_rate={}",
        fee.route, fee.reward, fee.rate_structure.per_volume_rate, fee.rate_structure.collateral_rate
    );
    if fee.exceeds_collateral_advisory(collateral_isk) {
        warn!(
            "collateral {collateral_isk} exceeds the advisory maximum {} for {}",
            fee.max_collateral, fee.route
        );
    }
}

fn write_quote(args: &Args, fee: &FeeResult) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Json => reports::generate_json_report(output_target.writer(), fee)?,
        ReportFormat::Console => reports::generate_console_report(
            output_target.writer(),
            fee,
            &ContractTerms::default(),
            chrono::Utc::now(),
        )?,
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn base_args() -> Args {
        Args {
            list_routes: false,
            route: None,
            from: None,
            to: None,
            round_trip: false,
            volume: Some(1_000.0),
            collateral: 0.0,
            catalog: None,
            report: ReportFormat::Console,
            output: None,
            verbose: false,
        }
    }

    #[test]
    fn args_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn route_defaults_to_catalog_default() {
        let catalog = RouteCatalog::builtin().unwrap();
        let route = resolve_route(&base_args(), catalog).unwrap();
        assert_eq!(route, "C-J6MT ➠ Jita/Perimeter");
    }

    #[test]
    fn route_can_be_given_by_parts() {
        let catalog = RouteCatalog::builtin().unwrap();
        let mut args = base_args();
        args.from = Some("C-J6MT".to_string());
        args.to = Some("UALX-3".to_string());
        args.round_trip = true;
        let route = resolve_route(&args, catalog).unwrap();
        assert_eq!(route, "C-J6MT ⮂ UALX-3");
        assert!(catalog.contains(&route));
    }

    #[test]
    fn volume_is_required_unless_listing() {
        assert!(Args::try_parse_from(["freight-quote"]).is_err());
        assert!(Args::try_parse_from(["freight-quote", "--list-routes"]).is_ok());
        let args = Args::try_parse_from(["freight-quote", "--volume", "5000"]).unwrap();
        assert_eq!(args.volume, Some(5_000.0));
        assert_eq!(args.report, ReportFormat::Console);
    }

    #[test]
    fn route_conflicts_with_parts() {
        let parsed = Args::try_parse_from([
            "freight-quote",
            "--volume",
            "1",
            "--route",
            "A ➠ B",
            "--from",
            "A",
            "--to",
            "B",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn output_target_writes_file() {
        let path = std::env::temp_dir().join(format!("freight-output-{}.txt", std::process::id()));
        let mut target = OutputTarget::new(Some(path.clone())).unwrap();
        writeln!(target.writer(), "hello").unwrap();
        target.flush_inner().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
        let _ = std::fs::remove_file(path);
    }
}
