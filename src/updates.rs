/*!
 * Periodic recomputation of the cluster set with subscriber notification.
 *
 * A subscription runs the whole fetch, cluster, filter pipeline on a fixed interval from a
 * single worker thread. Every pass publishes a brand new immutable snapshot; consumers only
 * ever hold a finished list, so no locking is needed around the cluster data itself.
 */

use crate::{
    cluster::ClusterList, error::CaseWatchError, filter::ClusterFilter, source::CaseSource,
    CaseWatchResult,
};
use crossbeam_channel::{bounded, select, tick, Sender};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

/// How often the pipeline reruns when the caller doesn't say otherwise.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(30);
/// The default spatial grouping radius in meters.
pub const DEFAULT_CLUSTER_RADIUS_METERS: f64 = 1000.0;

/** Configuration for a cluster subscription. */
#[derive(Debug, Clone)]
pub struct SubscriptionOptions {
    /// The spatial grouping radius in meters.
    pub cluster_radius_meters: f64,
    /// Time between pipeline passes. Must be non-zero.
    pub interval: Duration,
    /// Criteria applied to every recomputed cluster set before it is published.
    pub filter: ClusterFilter,
}

impl Default for SubscriptionOptions {
    fn default() -> Self {
        SubscriptionOptions {
            cluster_radius_meters: DEFAULT_CLUSTER_RADIUS_METERS,
            interval: DEFAULT_UPDATE_INTERVAL,
            filter: ClusterFilter::default(),
        }
    }
}

/**
 * The cancellation handle for a running subscription.
 *
 * The subscription is either running or stopped, and stopping is one way: once `stop` is
 * called (or the handle is dropped) no further callbacks are invoked. A pass already executing
 * when `stop` arrives is allowed to complete but is not rescheduled.
 */
pub struct SubscriptionHandle {
    stop_tx: Sender<()>,
    running: Arc<AtomicBool>,
    latest: Arc<Mutex<Option<Arc<ClusterList>>>>,
    worker: Option<JoinHandle<()>>,
}

impl SubscriptionHandle {
    /// Stop the subscription. Idempotent: calling this twice is a no-op, not an error.
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            // The worker may have already exited and dropped its receiver.
            let _ = self.stop_tx.send(());
        }
    }

    /// Whether the subscription is still scheduling passes.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// The most recent successfully published snapshot, if any pass has succeeded yet.
    ///
    /// A failed pass never clears this; the last good cluster set stays available until the
    /// next successful one replaces it.
    pub fn latest(&self) -> Option<Arc<ClusterList>> {
        self.latest.lock().unwrap().clone()
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.stop();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/**
 * Start a periodic clustering subscription.
 *
 * One pipeline pass runs immediately, then again every `options.interval` until the returned
 * handle is stopped or dropped. Each successful pass invokes `on_update` with the new
 * snapshot; a failed pass invokes `on_error` with the fetch error and leaves the previous
 * snapshot in place. A single worker thread runs all passes, so two passes never execute
 * concurrently for the same handle.
 */
pub fn subscribe<S, U, E>(
    source: S,
    options: SubscriptionOptions,
    mut on_update: U,
    mut on_error: E,
) -> CaseWatchResult<SubscriptionHandle>
where
    S: CaseSource + Send + 'static,
    U: FnMut(Arc<ClusterList>) + Send + 'static,
    E: FnMut(Box<dyn std::error::Error + Send + Sync>) + Send + 'static,
{
    if options.interval.is_zero() {
        return Err(Box::new(CaseWatchError {
            msg: "subscription interval must be non-zero",
        }));
    }

    let (stop_tx, stop_rx) = bounded::<()>(1);
    let running = Arc::new(AtomicBool::new(true));
    let latest: Arc<Mutex<Option<Arc<ClusterList>>>> = Arc::new(Mutex::new(None));

    let worker = {
        let running = Arc::clone(&running);
        let latest = Arc::clone(&latest);

        thread::Builder::new()
            .name("casewatch-updates".to_owned())
            .spawn(move || {
                let ticker = tick(options.interval);

                run_pass(&source, &options, &latest, &mut on_update, &mut on_error);

                loop {
                    select! {
                        recv(ticker) -> _ => {
                            if !running.load(Ordering::SeqCst) {
                                break;
                            }
                            run_pass(&source, &options, &latest, &mut on_update, &mut on_error);
                        }
                        recv(stop_rx) -> _ => break,
                    }
                }

                running.store(false, Ordering::SeqCst);
            })?
    };

    Ok(SubscriptionHandle {
        stop_tx,
        running,
        latest,
        worker: Some(worker),
    })
}

/// One tick: fetch, cluster, filter, publish.
fn run_pass<S, U, E>(
    source: &S,
    options: &SubscriptionOptions,
    latest: &Mutex<Option<Arc<ClusterList>>>,
    on_update: &mut U,
    on_error: &mut E,
) where
    S: CaseSource,
    U: FnMut(Arc<ClusterList>),
    E: FnMut(Box<dyn std::error::Error + Send + Sync>),
{
    match source.fetch_cases() {
        Ok(reports) => {
            let list = Arc::new(
                ClusterList::from_case_reports(&reports, options.cluster_radius_meters)
                    .filtered(&options.filter),
            );

            *latest.lock().unwrap() = Some(Arc::clone(&list));
            on_update(list);
        }
        Err(err) => {
            log::warn!("cluster update pass failed: {}", err);
            on_error(err);
        }
    }
}
