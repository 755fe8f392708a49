use casewatch::{
    CaseSource, CaseWatchResult, ClusterFilter, ClusterList, JsonDirSource, JsonFileSource,
    Severity, DEFAULT_CLUSTER_RADIUS_METERS,
};
use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::{
    fmt::{self, Display},
    path::PathBuf,
};

/*-------------------------------------------------------------------------------------------------
 *                                     Command Line Options
 *-----------------------------------------------------------------------------------------------*/

///
/// Cluster the case reports in a JSON file or directory and print the result.
///
/// This program runs one clustering pass over the supplied case records, optionally narrows the
/// result, and prints the cluster list as JSON on standard output for the map and statistics
/// consumers.
///
#[derive(Debug, Parser)]
#[clap(bin_name = "clustercases")]
#[clap(author, version, about)]
struct ClusterCasesOptions {
    /// The path to a JSON file of case reports, or a directory of such files.
    ///
    /// If this is not specified, then the program will check for it in the "CASE_REPORTS"
    /// environment variable.
    #[clap(short, long)]
    #[clap(env = "CASE_REPORTS")]
    reports: PathBuf,

    /// The spatial grouping radius in meters.
    #[clap(short = 'm', long)]
    #[clap(default_value_t = DEFAULT_CLUSTER_RADIUS_METERS)]
    radius_meters: f64,

    /// Only keep clusters with at least this many cases.
    #[clap(long)]
    min_cases: Option<usize>,

    /// Only keep clusters with one of these severities. Allowed values are mild, moderate, and
    /// severe. May be given more than once.
    #[clap(short, long)]
    #[clap(parse(try_from_str=parse_severity))]
    severity: Vec<Severity>,

    /// Log summary statistics for the run.
    #[clap(long)]
    stats: bool,

    /// Pretty print the JSON output.
    #[clap(short, long)]
    pretty: bool,

    /// Verbose output
    #[clap(short, long)]
    verbose: bool,
}

fn parse_severity(severity: &str) -> CaseWatchResult<Severity> {
    severity
        .parse()
        .map_err(|_| format!("Argument is not a valid severity level: {}", severity).into())
}

impl Display for ClusterCasesOptions {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        writeln!(f, "\n")?; // yes, two blank lines.
        writeln!(f, "      Reports: {}", self.reports.display())?;
        writeln!(f, "       Radius: {} meters", self.radius_meters)?;
        writeln!(f, "\n")?; // yes, two blank lines.

        Ok(())
    }
}

/*-------------------------------------------------------------------------------------------------
 *                                             MAIN
 *-----------------------------------------------------------------------------------------------*/
fn main() -> CaseWatchResult<()> {
    let opts = ClusterCasesOptions::parse();

    let level = if opts.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new().with_level(level).init()?;

    if opts.verbose {
        println!("{}", opts);
    }

    //
    // Fetch the case reports.
    //
    let reports = if opts.reports.is_dir() {
        JsonDirSource::new(&opts.reports).fetch_cases()?
    } else {
        JsonFileSource::new(&opts.reports).fetch_cases()?
    };

    //
    // Cluster and narrow.
    //
    let filter = ClusterFilter {
        severity: opts.severity,
        min_case_count: opts.min_cases,
        ..ClusterFilter::default()
    };

    let list = ClusterList::from_case_reports(&reports, opts.radius_meters).filtered(&filter);

    if opts.stats {
        let stats = list.statistics();

        log::info!("");
        log::info!("    total reports - {:>8}", list.total_reports);
        log::info!("   total clusters - {:>8}", stats.total_clusters);
        log::info!("  clustered cases - {:>8}", stats.total_cases);
        log::info!("    mild clusters - {:>8}", stats.severity_breakdown.mild);
        log::info!("moderate clusters - {:>8}", stats.severity_breakdown.moderate);
        log::info!("  severe clusters - {:>8}", stats.severity_breakdown.severe);
        log::info!("  avg per cluster - {:>8.2}", stats.average_cases_per_cluster);
        log::info!("");
    }

    //
    // Output the JSON.
    //
    let json = if opts.pretty {
        serde_json::to_string_pretty(&list)?
    } else {
        serde_json::to_string(&list)?
    };
    println!("{}", json);

    Ok(())
}
