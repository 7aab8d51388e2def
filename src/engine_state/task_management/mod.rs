//! # Task Management System
//!
//! This module runs work on background threads and hands the results back to the thread
//! that owns the `TaskManager`. The editor uses it as its edit actor: voxel edits are
//! published as tasks, processed on a worker, and their outcomes recorded once per frame.
//!
//! ## Architecture Overview
//! - `TaskManager`: Central coordinator for task distribution and worker management
//! - `Task`: A unit of work that can be executed asynchronously
//! - `TaskResult`: The result of a completed task, which can spawn additional tasks
//! - `TaskChannel`: Communication channel between the owning thread and one worker
//!
//! ## Task Lifecycle
//! 1. Tasks are created and published via `TaskManager::publish_task()`
//! 2. The manager distributes tasks to available worker channels using round-robin
//! 3. Workers process tasks and send results back
//! 4. Results are handled on the owning thread in `process_completed_tasks()`
//! 5. Results can spawn new tasks
//!
//! ## Ordering
//! With a single worker and `MAX_TASKS_IN_FLIGHT == 1`, tasks run one at a time in
//! publication order. The editor relies on this: it makes the worker the only writer to
//! the voxel store.
//!
//! ## Example Usage
//! ```rust,ignore
//! let mut task_manager = TaskManager::new(1);
//!
//! // Publish a task for background processing
//! task_manager.publish_task(Box::new(EditTask::new(store.clone(), command, settings)));
//!
//! // In the frame loop:
//! task_manager.process_completed_tasks(&mut journal);
//! task_manager.process_queued_tasks();
//! ```

pub mod task;

use log::{debug, error, info};
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use task::{Task, TaskResult};

use super::editing::EditJournal;

/// A communication channel between the owning thread and a worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks to the worker
/// - `result_receiver`: Receives task results from the worker
/// - `num_tasks_in_flight`: Tracks number of tasks currently being processed
/// - `worker`: Handle to the worker thread, joined on shutdown
/// - `disconnected`: Set once the worker is gone; no more tasks are sent to it
#[derive(Debug)]
pub struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    worker: Option<JoinHandle<()>>,
    disconnected: bool,
}

impl TaskChannel {
    /// Marks the worker as gone and writes off whatever it was still processing.
    fn write_off(&mut self, idx: usize) {
        error!(
            "Worker {} disconnected with {} task(s) in flight",
            idx, self.num_tasks_in_flight
        );
        self.num_tasks_in_flight = 0;
        self.disconnected = true;
    }
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// The `TaskManager` is responsible for:
/// - Creating and managing worker threads
/// - Distributing tasks across available workers
/// - Collecting and handling task results
/// - Queuing tasks when all workers are busy
///
/// Dropping the manager closes every task channel and joins the workers. Tasks still
/// queued at that point are discarded.
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// This is set to 1 to ensure tasks are processed in order within each channel.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// # Arguments
    /// * `num_workers` - Number of worker threads to create. The edit actor uses one.
    pub fn new(num_workers: usize) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        for index in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let task_closure = move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            };

            let worker = thread::Builder::new()
                .name(format!("edit-worker-{}", index))
                .spawn(task_closure);

            match worker {
                Ok(worker) => channels.push(TaskChannel {
                    task_sender: task_tx,
                    result_receiver: result_rx,
                    num_tasks_in_flight: 0,
                    worker: Some(worker),
                    disconnected: false,
                }),
                Err(e) => error!("Failed to spawn worker {}: {}", index, e),
            }
        }

        info!("Task manager started with {} worker(s)", channels.len());

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Number of live worker channels.
    pub fn worker_count(&self) -> usize {
        self.channels.iter().filter(|c| !c.disconnected).count()
    }

    /// Number of tasks waiting for a free worker.
    pub fn queued_count(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Number of tasks sent to workers whose results have not been handled yet.
    pub fn in_flight_count(&self) -> usize {
        self.channels.iter().map(|c| c.num_tasks_in_flight).sum()
    }

    /// Whether every published task has been processed and handled.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty() && self.in_flight_count() == 0
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was successfully sent to the worker
    /// - `Err(task)` if the worker disconnected, handing the task back for requeueing
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        let channel = &mut self.channels[channel_idx];
        match channel.task_sender.send(task) {
            Ok(_) => {
                channel.num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => {
                channel.write_off(channel_idx);
                Err(task.0)
            }
        }
    }

    /// Finds an available worker channel using round-robin from the last used channel.
    ///
    /// # Returns
    /// - `Some(usize)` index of a live channel below `MAX_TASKS_IN_FLIGHT`
    /// - `None` if all channels are busy or disconnected, or there are no channels
    fn find_available_channel(&self) -> Option<usize> {
        let count = self.channels.len();
        (0..count)
            .map(|offset| (self.current_channel + offset) % count)
            .find(|&idx| {
                let channel = &self.channels[idx];
                !channel.disconnected && channel.num_tasks_in_flight < MAX_TASKS_IN_FLIGHT
            })
    }

    /// Publishes a new task for execution.
    ///
    /// The task runs as soon as a worker is free, or is queued otherwise.
    ///
    /// # Returns
    /// - `true` if the task was immediately scheduled on an available worker
    /// - `false` if the task was queued because all workers are busy
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        // Keep FIFO order behind anything already waiting
        if !self.queued_tasks.is_empty() {
            self.queued_tasks.push_back(task);
            self.process_queued_tasks();
            return false;
        }

        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                if self.worker_count() == 0 {
                    error!("No live worker, task queued until shutdown");
                }
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Sends queued tasks to workers while any are available.
    ///
    /// Call this once per frame. Tasks leave the queue in FIFO order, and processing
    /// stops at the first task that cannot be scheduled.
    pub fn process_queued_tasks(&mut self) {
        while let Some(channel_idx) = self.find_available_channel() {
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    // Channel is disconnected, put task back and stop processing
                    self.queued_tasks.push_front(task);
                    break;
                }
            }
        }
    }

    /// Handles all completed task results without blocking.
    ///
    /// A worker found disconnected has its in-flight tasks written off and logged, and
    /// receives no further tasks.
    ///
    /// # Arguments
    /// * `journal` - Edit journal results are recorded in
    ///
    /// # Returns
    /// Number of results handled
    pub fn process_completed_tasks(&mut self, journal: &mut EditJournal) -> usize {
        let mut results = Vec::new();
        for (idx, channel) in self.channels.iter_mut().enumerate() {
            if channel.disconnected {
                continue;
            }
            loop {
                match channel.result_receiver.try_recv() {
                    Ok(result) => {
                        channel.num_tasks_in_flight -= 1;
                        results.push(result);
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        channel.write_off(idx);
                        break;
                    }
                }
            }
        }

        let handled = results.len();
        self.handle_results(results, journal);
        handled
    }

    /// Blocks until every published task, including follow-ups, has been handled.
    ///
    /// A worker that disconnects mid-task (for example after a panic) has its in-flight
    /// tasks written off and logged.
    pub fn flush(&mut self, journal: &mut EditJournal) {
        loop {
            self.process_queued_tasks();

            if self.in_flight_count() == 0 {
                if !self.queued_tasks.is_empty() {
                    error!(
                        "{} task(s) left queued with no live worker",
                        self.queued_tasks.len()
                    );
                }
                break;
            }

            let mut results = Vec::new();
            for (idx, channel) in self.channels.iter_mut().enumerate() {
                while channel.num_tasks_in_flight > 0 {
                    match channel.result_receiver.recv() {
                        Ok(result) => {
                            channel.num_tasks_in_flight -= 1;
                            results.push(result);
                        }
                        Err(_) => channel.write_off(idx),
                    }
                }
            }
            self.handle_results(results, journal);
        }
    }

    fn handle_results(
        &mut self,
        results: Vec<Box<dyn TaskResult + Send>>,
        journal: &mut EditJournal,
    ) {
        let mut tasks_to_queue = Vec::new();
        for result in results {
            tasks_to_queue.extend(result.handle_result(journal));
        }
        for task in tasks_to_queue {
            self.publish_task(task);
        }
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        if !self.queued_tasks.is_empty() {
            debug!(
                "Dropping {} queued task(s) on shutdown",
                self.queued_tasks.len()
            );
        }
        for channel in self.channels.drain(..) {
            let TaskChannel {
                task_sender,
                result_receiver,
                worker,
                ..
            } = channel;
            // Closing the task channel ends the worker loop
            drop(task_sender);
            drop(result_receiver);
            if let Some(worker) = worker {
                if worker.join().is_err() {
                    error!("Worker thread panicked");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Record {
        id: usize,
        log: Arc<Mutex<Vec<usize>>>,
        follow_up: bool,
    }

    struct Recorded {
        id: usize,
        log: Arc<Mutex<Vec<usize>>>,
        follow_up: bool,
    }

    impl Task for Record {
        fn process(&self) -> Box<dyn TaskResult + Send> {
            self.log.lock().unwrap().push(self.id);
            Box::new(Recorded {
                id: self.id,
                log: self.log.clone(),
                follow_up: self.follow_up,
            })
        }
    }

    impl TaskResult for Recorded {
        fn handle_result(self: Box<Self>, _journal: &mut EditJournal) -> Vec<Box<dyn Task + Send>> {
            if self.follow_up {
                vec![Box::new(Record {
                    id: self.id + 1000,
                    log: self.log,
                    follow_up: false,
                })]
            } else {
                Vec::new()
            }
        }
    }

    fn record(id: usize, log: &Arc<Mutex<Vec<usize>>>) -> Box<dyn Task + Send> {
        Box::new(Record {
            id,
            log: log.clone(),
            follow_up: false,
        })
    }

    #[test]
    fn single_worker_runs_tasks_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut manager = TaskManager::new(1);
        let mut journal = EditJournal::default();

        assert!(manager.publish_task(record(0, &log)));
        for id in 1..20 {
            assert!(!manager.publish_task(record(id, &log)));
        }
        manager.flush(&mut journal);

        assert!(manager.is_idle());
        assert_eq!(*log.lock().unwrap(), (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn follow_up_tasks_are_scheduled() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut manager = TaskManager::new(1);
        let mut journal = EditJournal::default();

        manager.publish_task(Box::new(Record {
            id: 1,
            log: log.clone(),
            follow_up: true,
        }));
        manager.flush(&mut journal);

        assert_eq!(*log.lock().unwrap(), vec![1, 1001]);
    }

    #[test]
    fn no_workers_keeps_tasks_queued() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut manager = TaskManager::new(0);
        let mut journal = EditJournal::default();

        assert!(!manager.publish_task(record(0, &log)));
        manager.flush(&mut journal);
        assert_eq!(manager.queued_count(), 1);
        assert!(log.lock().unwrap().is_empty());
    }

    struct Explode;

    impl Task for Explode {
        fn process(&self) -> Box<dyn TaskResult + Send> {
            panic!("task failed on the worker");
        }
    }

    #[test]
    fn dead_worker_is_noticed_while_polling() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut manager = TaskManager::new(1);
        let mut journal = EditJournal::default();

        assert!(manager.publish_task(Box::new(Explode)));
        while manager.in_flight_count() > 0 {
            assert_eq!(manager.process_completed_tasks(&mut journal), 0);
            thread::yield_now();
        }
        assert_eq!(manager.worker_count(), 0);

        // later tasks are never sent to the dead worker
        assert!(!manager.publish_task(record(1, &log)));
        manager.process_queued_tasks();
        assert_eq!(manager.in_flight_count(), 0);
        assert_eq!(manager.queued_count(), 1);
        manager.flush(&mut journal);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn polling_eventually_drains_results() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut manager = TaskManager::new(2);
        let mut journal = EditJournal::default();
        for id in 0..6 {
            manager.publish_task(record(id, &log));
        }

        let mut handled = 0;
        while handled < 6 {
            handled += manager.process_completed_tasks(&mut journal);
            manager.process_queued_tasks();
            thread::yield_now();
        }
        assert!(manager.is_idle());
        assert_eq!(log.lock().unwrap().len(), 6);
    }
}
