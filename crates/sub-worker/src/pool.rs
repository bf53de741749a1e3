// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

use std::{
	sync::{
		Arc,
		atomic::{AtomicBool, AtomicUsize, Ordering},
	},
	thread::{self, JoinHandle},
	time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use parking_lot::Mutex;
use tablelog_core::interface::{JobExecutor, RebuildJob, RebuildTrigger};
use tablelog_type::{Result, internal_err, return_internal_error};
use tracing::{debug, error, trace, warn};

use crate::{
	PoolStats, WorkerConfig,
	stats::Counters,
};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy)]
struct Attempt {
	job: RebuildJob,
	retries: u32,
}

enum Message {
	Run(Attempt),
	Shutdown,
}

struct Shared {
	config: WorkerConfig,
	running: AtomicBool,
	stopped: AtomicBool,
	counters: Counters,
	/// Jobs queued, running or waiting for a retry.
	outstanding: AtomicUsize,
	delayed: Mutex<Vec<(Instant, Attempt)>>,
}

impl Shared {
	fn take_due(&self) -> Option<Attempt> {
		let mut delayed = self.delayed.lock();
		let now = Instant::now();
		let position = delayed.iter().position(|(due, _)| *due <= now)?;
		Some(delayed.swap_remove(position).1)
	}
}

/// Runs rebuild jobs on a fixed set of threads.
///
/// Jobs submitted before [`WorkerPool::start`] wait in the channel. Dropping
/// the pool stops and joins its threads; queued jobs are discarded.
pub struct WorkerPool {
	shared: Arc<Shared>,
	sender: Sender<Message>,
	receiver: Receiver<Message>,
	workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
	pub fn new(config: WorkerConfig) -> Self {
		let (sender, receiver) = unbounded();
		Self {
			shared: Arc::new(Shared {
				config,
				running: AtomicBool::new(false),
				stopped: AtomicBool::new(false),
				counters: Counters::default(),
				outstanding: AtomicUsize::new(0),
				delayed: Mutex::new(Vec::new()),
			}),
			sender,
			receiver,
			workers: Mutex::new(Vec::new()),
		}
	}

	/// Spawns the worker threads. Starting a running pool does nothing.
	pub fn start(&self, executor: Arc<dyn JobExecutor>) -> Result<()> {
		if self.shared.stopped.load(Ordering::Acquire) {
			return_internal_error!("worker pool was stopped");
		}
		if self.shared.running.swap(true, Ordering::AcqRel) {
			return Ok(());
		}

		let mut workers = self.workers.lock();
		for index in 0..self.shared.config.threads.max(1) {
			let receiver = self.receiver.clone();
			let shared = Arc::clone(&self.shared);
			let executor = Arc::clone(&executor);
			let handle = thread::Builder::new()
				.name(format!("{}-{}", self.shared.config.thread_name, index))
				.spawn(move || worker_loop(receiver, executor, shared));
			match handle {
				Ok(handle) => workers.push(handle),
				Err(err) => return internal_err!("failed to spawn worker thread: {}", err),
			}
		}
		debug!(threads = workers.len(), "worker pool started");
		Ok(())
	}

	pub fn submit(&self, job: RebuildJob) -> Result<()> {
		if self.shared.stopped.load(Ordering::Acquire) {
			return_internal_error!("worker pool was stopped");
		}
		self.shared.outstanding.fetch_add(1, Ordering::AcqRel);
		Counters::incr(&self.shared.counters.submitted);
		if self
			.sender
			.send(Message::Run(Attempt {
				job,
				retries: 0,
			}))
			.is_err()
		{
			self.shared.outstanding.fetch_sub(1, Ordering::AcqRel);
			return_internal_error!("worker pool channel closed");
		}
		trace!(job = %job, "submitted");
		Ok(())
	}

	pub fn stats(&self) -> PoolStats {
		self.shared.counters.snapshot()
	}

	/// True when no job is queued, running or waiting for a retry.
	pub fn is_idle(&self) -> bool {
		self.shared.outstanding.load(Ordering::Acquire) == 0
	}

	pub fn stop(&self) {
		if self.shared.stopped.swap(true, Ordering::AcqRel) {
			return;
		}
		self.shared.running.store(false, Ordering::Release);

		let mut workers = self.workers.lock();
		for _ in 0..workers.len() {
			let _ = self.sender.send(Message::Shutdown);
		}
		for worker in workers.drain(..) {
			if worker.join().is_err() {
				error!("worker thread panicked");
			}
		}
		debug!("worker pool stopped");
	}
}

impl Drop for WorkerPool {
	fn drop(&mut self) {
		self.stop();
	}
}

impl RebuildTrigger for WorkerPool {
	fn trigger(&self, job: RebuildJob) -> Result<()> {
		self.submit(job)
	}
}

fn worker_loop(receiver: Receiver<Message>, executor: Arc<dyn JobExecutor>, shared: Arc<Shared>) {
	while shared.running.load(Ordering::Acquire) {
		if let Some(attempt) = shared.take_due() {
			run(&*executor, &shared, attempt);
			continue;
		}
		match receiver.recv_timeout(POLL_INTERVAL) {
			Ok(Message::Run(attempt)) => run(&*executor, &shared, attempt),
			Ok(Message::Shutdown) => break,
			Err(RecvTimeoutError::Timeout) => {}
			Err(RecvTimeoutError::Disconnected) => break,
		}
	}
}

fn run(executor: &dyn JobExecutor, shared: &Shared, attempt: Attempt) {
	match executor.execute(&attempt.job) {
		Ok(()) => {
			Counters::incr(&shared.counters.completed);
			shared.outstanding.fetch_sub(1, Ordering::AcqRel);
			trace!(job = %attempt.job, "completed");
		}
		Err(err) if err.is_retryable() && attempt.retries < shared.config.max_retries => {
			let delay = shared.config.backoff_for(attempt.retries);
			Counters::incr(&shared.counters.retried);
			debug!(job = %attempt.job, retries = attempt.retries, ?delay, error = %err, "retrying job");
			shared.delayed.lock().push((
				Instant::now() + delay,
				Attempt {
					job: attempt.job,
					retries: attempt.retries + 1,
				},
			));
		}
		Err(err) => {
			Counters::incr(&shared.counters.failed);
			shared.outstanding.fetch_sub(1, Ordering::AcqRel);
			warn!(job = %attempt.job, retries = attempt.retries, error = %err, "job failed");
		}
	}
}

#[cfg(test)]
mod tests {
	use std::{
		collections::HashMap,
		sync::{
			Arc,
			atomic::{AtomicUsize, Ordering},
		},
		time::Duration,
	};

	use parking_lot::Mutex;
	use tablelog_core::interface::{JobExecutor, RebuildJob, RebuildTrigger};
	use tablelog_testing::util::wait::wait_for;
	use tablelog_type::{
		Result, TableId,
		diagnostic::{internal::internal, lock::lock_timeout},
		err,
	};

	use super::WorkerPool;
	use crate::WorkerConfig;

	/// Fails each job `failures` times before succeeding.
	struct Flaky {
		failures: usize,
		retryable: bool,
		calls: Mutex<HashMap<RebuildJob, usize>>,
		succeeded: AtomicUsize,
	}

	impl Flaky {
		fn new(failures: usize, retryable: bool) -> Arc<Self> {
			Arc::new(Self {
				failures,
				retryable,
				calls: Mutex::new(HashMap::new()),
				succeeded: AtomicUsize::new(0),
			})
		}
	}

	impl JobExecutor for Flaky {
		fn execute(&self, job: &RebuildJob) -> Result<()> {
			let mut calls = self.calls.lock();
			let count = calls.entry(*job).or_default();
			*count += 1;
			if *count <= self.failures {
				return if self.retryable {
					err!(lock_timeout("index:1", Duration::from_millis(1)))
				} else {
					err!(internal("broken"))
				};
			}
			self.succeeded.fetch_add(1, Ordering::SeqCst);
			Ok(())
		}
	}

	fn config() -> WorkerConfig {
		WorkerConfig::default().threads(2).max_retries(3).retry_backoff(Duration::from_millis(5))
	}

	#[test]
	fn test_jobs_submitted_before_start_run() {
		let pool = WorkerPool::new(config());
		let executor = Flaky::new(0, true);
		for table in 0..10 {
			pool.trigger(RebuildJob::TableIndex(TableId(table))).unwrap();
		}
		assert!(!pool.is_idle());

		pool.start(executor.clone()).unwrap();
		wait_for(|| pool.is_idle(), "pool did not drain");

		assert_eq!(executor.succeeded.load(Ordering::SeqCst), 10);
		let stats = pool.stats();
		assert_eq!(stats.submitted, 10);
		assert_eq!(stats.completed, 10);
		assert_eq!(stats.failed, 0);
	}

	#[test]
	fn test_retryable_failure_is_resubmitted() {
		let pool = WorkerPool::new(config());
		let executor = Flaky::new(2, true);
		pool.start(executor.clone()).unwrap();

		pool.submit(RebuildJob::ViewIndex(TableId(10))).unwrap();
		wait_for(|| pool.is_idle(), "retried job did not finish");

		let stats = pool.stats();
		assert_eq!(stats.retried, 2);
		assert_eq!(stats.completed, 1);
		assert_eq!(executor.calls.lock()[&RebuildJob::ViewIndex(TableId(10))], 3);
	}

	#[test]
	fn test_gives_up_after_max_retries() {
		let pool = WorkerPool::new(config());
		let executor = Flaky::new(usize::MAX, true);
		pool.start(executor.clone()).unwrap();

		pool.submit(RebuildJob::ViewIndex(TableId(10))).unwrap();
		wait_for(|| pool.is_idle(), "job was never abandoned");

		let stats = pool.stats();
		assert_eq!(stats.retried, 3);
		assert_eq!(stats.failed, 1);
		assert_eq!(stats.completed, 0);
	}

	#[test]
	fn test_non_retryable_failure_is_not_retried() {
		let pool = WorkerPool::new(config());
		let executor = Flaky::new(1, false);
		pool.start(executor.clone()).unwrap();

		pool.submit(RebuildJob::TableIndex(TableId(1))).unwrap();
		wait_for(|| pool.is_idle(), "job did not fail");

		assert_eq!(pool.stats().failed, 1);
		assert_eq!(pool.stats().retried, 0);
	}

	#[test]
	fn test_stopped_pool_rejects_work() {
		let pool = WorkerPool::new(config());
		pool.start(Flaky::new(0, true)).unwrap();
		pool.stop();
		pool.stop();

		assert!(pool.submit(RebuildJob::TableIndex(TableId(1))).is_err());
		assert!(pool.start(Flaky::new(0, true)).is_err());
	}
}
