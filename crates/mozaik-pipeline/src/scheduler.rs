//! Bounded worker pool dispatching stripe tasks.
//!
//! One pixelate call owns a fixed-size pool of worker threads sized
//! `min(concurrency_limit, stripe_count)`. Tasks are queued up front on a
//! channel whose receiver the workers share behind a mutex; each worker
//! runs one task to completion, reports the outcome, and immediately pulls
//! the next. The scheduling thread is the sole writer of the destination
//! raster (via the [`Compositor`]) and completes only after a counted join
//! over every task.
//!
//! On any task failure an abort flag stops workers from pulling further
//! tasks, the remaining queue is abandoned, and every spawned worker is
//! joined (scope exit) before the error surfaces. No exit path leaks a
//! thread.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, mpsc};
use std::thread;

use crate::compositor::Compositor;
use crate::partition::Partition;
use crate::stripe::{StripeTask, process_stripe};
use crate::types::{Axis, PixelateError, RgbaImage};

/// Pool size used when the hardware parallelism hint is unavailable.
const FALLBACK_CONCURRENCY: usize = 4;

/// The default worker limit: the hardware parallelism hint, or
/// [`FALLBACK_CONCURRENCY`] when the platform cannot report one.
#[must_use]
pub fn default_concurrency() -> usize {
    thread::available_parallelism().map_or(FALLBACK_CONCURRENCY, NonZeroUsize::get)
}

/// Build one [`StripeTask`] per outer-partition entry, offsets
/// accumulating in partition order.
#[must_use]
pub fn build_tasks(outer: &Partition) -> Vec<StripeTask> {
    let mut offset = 0u32;
    outer
        .iter()
        .map(|&size| {
            let task = StripeTask {
                outer_size: size,
                outer_offset: offset,
            };
            offset += size;
            task
        })
        .collect()
}

/// Outcome of one stripe, reported back to the scheduling thread.
type StripeOutcome = (StripeTask, Result<RgbaImage, PixelateError>);

/// Process every stripe task across a bounded pool of reusable workers
/// and composite the results into a destination raster.
///
/// Blocks until every task has completed or the call has failed and all
/// workers have been torn down.
///
/// # Errors
///
/// Returns the first [`PixelateError::CropFailure`] or
/// [`PixelateError::ProcessingFailure`] reported by a worker; remaining
/// queued tasks are abandoned and no partial raster is returned.
pub fn run_stripes(
    source: &RgbaImage,
    axis: Axis,
    tasks: Vec<StripeTask>,
    inner: &Partition,
    grayscale: bool,
    concurrency_limit: Option<NonZeroUsize>,
) -> Result<RgbaImage, PixelateError> {
    let task_count = tasks.len();
    let limit = concurrency_limit.map_or_else(default_concurrency, NonZeroUsize::get);
    // Clamp so small grids never spawn workers with nothing to pull.
    let executors = limit.min(task_count);
    log::debug!("dispatching {task_count} stripes (outer axis: {axis}) across {executors} workers");

    let mut compositor = Compositor::new(source.width(), source.height(), axis, task_count);

    // Queue every task up front, then drop the sender so an idle worker's
    // recv returns Disconnected once the queue drains.
    let (task_tx, task_rx) = mpsc::channel::<StripeTask>();
    for task in tasks {
        if task_tx.send(task).is_err() {
            break;
        }
    }
    drop(task_tx);

    let queue = Mutex::new(task_rx);
    let abort = AtomicBool::new(false);
    let (result_tx, result_rx) = mpsc::channel::<StripeOutcome>();

    let failure = thread::scope(|scope| {
        for _ in 0..executors {
            let results = result_tx.clone();
            let queue = &queue;
            let abort = &abort;
            scope.spawn(move || worker_loop(source, axis, inner, grayscale, queue, abort, &results));
        }
        // The workers hold the remaining senders.
        drop(result_tx);

        let mut failure = None;
        for _ in 0..task_count {
            match result_rx.recv() {
                Ok((task, Ok(stripe))) => {
                    log::trace!("stripe at offset {} completed", task.outer_offset);
                    compositor.place(task, &stripe);
                }
                Ok((task, Err(error))) => {
                    log::debug!("stripe at offset {} failed: {error}", task.outer_offset);
                    abort.store(true, Ordering::Relaxed);
                    failure = Some(error);
                    break;
                }
                Err(_) => {
                    // Every worker hung up before reporting all outcomes.
                    abort.store(true, Ordering::Relaxed);
                    failure = Some(PixelateError::ProcessingFailure(String::from(
                        "a worker terminated without reporting a result",
                    )));
                    break;
                }
            }
        }
        // Scope exit joins every worker exactly once, on success and
        // failure alike.
        failure
    });

    if let Some(error) = failure {
        return Err(error);
    }
    if !compositor.is_complete() {
        return Err(PixelateError::ProcessingFailure(String::from(
            "not every stripe was composited",
        )));
    }
    Ok(compositor.into_image())
}

/// One worker: pull a task, process it, report, repeat until the queue
/// drains, the call aborts, or the scheduler hangs up.
fn worker_loop(
    source: &RgbaImage,
    axis: Axis,
    inner: &Partition,
    grayscale: bool,
    queue: &Mutex<mpsc::Receiver<StripeTask>>,
    abort: &AtomicBool,
    results: &mpsc::Sender<StripeOutcome>,
) {
    loop {
        if abort.load(Ordering::Relaxed) {
            break;
        }
        let task = {
            // A poisoned queue means another worker panicked; stop.
            let Ok(receiver) = queue.lock() else { break };
            match receiver.recv() {
                Ok(task) => task,
                // Queue drained and sender dropped.
                Err(mpsc::RecvError) => break,
            }
        };

        let outcome = process_stripe(source, axis, task, inner, grayscale);
        let failed = outcome.is_err();
        if results.send((task, outcome)).is_err() {
            // Scheduler stopped listening; nothing useful left to do.
            break;
        }
        if failed {
            break;
        }
    }
}
