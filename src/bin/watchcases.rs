use casewatch::{
    subscribe, CaseWatchResult, JsonDirSource, SubscriptionOptions, DEFAULT_CLUSTER_RADIUS_METERS,
};
use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::{path::PathBuf, time::Duration};

/*-------------------------------------------------------------------------------------------------
 *                                     Command Line Options
 *-----------------------------------------------------------------------------------------------*/

///
/// Watch a directory of case report JSON and recompute clusters on an interval.
///
/// Each pass logs a summary of the freshly computed cluster set. The watch keeps running across
/// failed passes (the last good cluster set is retained) and stops when you press Enter.
///
#[derive(Debug, Parser)]
#[clap(bin_name = "watchcases")]
#[clap(author, version, about)]
struct WatchCasesOptions {
    /// The directory of case report JSON files to poll.
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

    /// Seconds between recomputations.
    #[clap(short, long)]
    #[clap(default_value_t = 30)]
    interval: u64,

    /// Verbose output
    #[clap(short, long)]
    verbose: bool,
}

/*-------------------------------------------------------------------------------------------------
 *                                             MAIN
 *-----------------------------------------------------------------------------------------------*/
fn main() -> CaseWatchResult<()> {
    let opts = WatchCasesOptions::parse();

    let level = if opts.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new().with_level(level).init()?;

    let options = SubscriptionOptions {
        cluster_radius_meters: opts.radius_meters,
        interval: Duration::from_secs(opts.interval),
        ..SubscriptionOptions::default()
    };

    let source = JsonDirSource::new(&opts.reports);

    let handle = subscribe(
        source,
        options,
        |list| {
            let stats = list.statistics();
            log::info!(
                "{} clusters covering {} cases ({} mild / {} moderate / {} severe)",
                stats.total_clusters,
                stats.total_cases,
                stats.severity_breakdown.mild,
                stats.severity_breakdown.moderate,
                stats.severity_breakdown.severe,
            );
        },
        |err| log::error!("update failed, keeping last cluster set: {}", err),
    )?;

    println!(
        "Watching {} every {} seconds. Press Enter to stop.",
        opts.reports.display(),
        opts.interval
    );

    let mut line = String::new();
    let _ = std::io::stdin().read_line(&mut line);

    handle.stop();

    if let Some(last) = handle.latest() {
        log::info!(
            "final cluster set: {} clusters from {} reports",
            last.total_clusters,
            last.total_reports
        );
    }

    Ok(())
}
