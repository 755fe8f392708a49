/*!
 * Sources of case reports.
 *
 * Fetching the live case list is the only I/O bound, fallible step in the pipeline. Everything
 * downstream of a fetch is a pure computation, so isolating failures here keeps the rest of
 * the crate infallible on well typed input.
 */

use crate::{report::CaseReport, CaseWatchResult};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

/**
 * Anything that can produce the current, complete case list for a clustering run.
 *
 * A fetch failure is surfaced to the caller; it never corrupts previously computed state.
 * Individual malformed records inside a successful fetch are NOT failures, they flow through
 * to clustering which excludes them.
 */
pub trait CaseSource {
    fn fetch_cases(&self) -> CaseWatchResult<Vec<CaseReport>>;
}

/** A single JSON file holding an array of case records. */
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        JsonFileSource {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CaseSource for JsonFileSource {
    fn fetch_cases(&self) -> CaseWatchResult<Vec<CaseReport>> {
        read_reports_file(&self.path)
    }
}

/**
 * A directory tree of JSON files, each holding an array of case records.
 *
 * Files are visited in path order so repeated fetches of an unchanged tree yield the reports
 * in the same order, which matters because clustering is order dependent.
 */
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        JsonDirSource {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl CaseSource for JsonDirSource {
    fn fetch_cases(&self) -> CaseWatchResult<Vec<CaseReport>> {
        let mut reports = vec![];

        for entry in walkdir::WalkDir::new(&self.dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|res| res.ok())
            .filter(|entry| entry.path().is_file())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .ends_with(".json")
            })
        {
            log::debug!("reading case reports from {}", entry.path().display());
            reports.extend(read_reports_file(entry.path())?);
        }

        Ok(reports)
    }
}

fn read_reports_file(path: &Path) -> CaseWatchResult<Vec<CaseReport>> {
    let file = File::open(path)?;
    let reports = serde_json::from_reader(BufReader::new(file))?;
    Ok(reports)
}
