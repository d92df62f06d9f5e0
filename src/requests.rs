//! Serialized path requests.
//!
//! A grid's transient cell state supports one search at a time, so requests
//! are queued first-in first-out and run one after another. Each request's
//! callback fires exactly once with `(waypoints, success)`, and the next
//! request starts only after it returned. Queued requests cannot be
//! withdrawn and there is no timeout.
//!
//! [`RequestQueue`] is driven by its host (for example once per frame) and
//! spreads a search over several calls. [`PathWorker`] owns the grid on a
//! dedicated thread and accepts requests from any thread.

use crate::grid::Grid;
use crate::pathfinding::{find_path, PathResult, PathSearch, SearchStatus};
use crate::point::WorldPoint;
use std::collections::VecDeque;
use std::io;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use tracing::{debug, trace, warn};

/// Callback for a [`RequestQueue`] request
pub type PathCallback = Box<dyn FnOnce(Vec<WorldPoint>, bool)>;

/// Callback for a [`PathWorker`] request; runs on the worker thread
pub type SendPathCallback = Box<dyn FnOnce(Vec<WorldPoint>, bool) + Send>;

struct PathRequest<C> {
    id: u64,
    start: WorldPoint,
    end: WorldPoint,
    callback: C,
}

enum WorkerMessage {
    Request(PathRequest<SendPathCallback>),
    /// Sent by the owning [`PathWorker`]; requests queued before it still run
    Stop,
}

struct ActiveRequest {
    request: PathRequest<PathCallback>,
    search: PathSearch,
}

/// Cooperative request serializer that owns the grid it searches
pub struct RequestQueue {
    grid: Grid,
    pending: VecDeque<PathRequest<PathCallback>>,
    current: Option<ActiveRequest>,
    next_id: u64,
    last_result: Option<PathResult>,
}

impl RequestQueue {
    pub fn new(grid: Grid) -> Self {
        RequestQueue {
            grid,
            pending: VecDeque::new(),
            current: None,
            next_id: 0,
            last_result: None,
        }
    }

    /// Queue a request; the result is delivered only through `callback`
    pub fn submit<F>(&mut self, start: WorldPoint, end: WorldPoint, callback: F)
    where
        F: FnOnce(Vec<WorldPoint>, bool) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push_back(PathRequest {
            id,
            start,
            end,
            callback: Box::new(callback),
        });
        trace!(id, queued = self.pending.len(), "path request queued");
        self.try_process_next();
    }

    /// Advance the in-flight search by at most `step_budget` cell
    /// expansions, completing requests and starting the next ones as they
    /// finish. Returns the number of callbacks fired.
    pub fn process(&mut self, step_budget: usize) -> usize {
        let mut steps = 0;
        let mut completed = 0;

        while let Some(active) = self.current.as_mut() {
            if active.search.status() == SearchStatus::Searching {
                if steps == step_budget {
                    break;
                }
                active.search.step(&mut self.grid);
                steps += 1;
                continue;
            }

            if let Some(active) = self.current.take() {
                self.finish(active);
                completed += 1;
            }
            self.try_process_next();
        }

        completed
    }

    /// Process until every queued request has completed
    pub fn process_all(&mut self) -> usize {
        let mut completed = 0;
        while self.is_processing() {
            completed += self.process(usize::MAX);
        }
        completed
    }

    pub fn is_processing(&self) -> bool {
        self.current.is_some()
    }

    /// Requests waiting behind the one in flight
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access, refused while a search is in flight
    pub fn grid_mut(&mut self) -> Option<&mut Grid> {
        if self.is_processing() {
            None
        } else {
            Some(&mut self.grid)
        }
    }

    /// Result of the most recently completed request
    pub fn last_result(&self) -> Option<&PathResult> {
        self.last_result.as_ref()
    }

    fn try_process_next(&mut self) {
        if self.current.is_some() {
            return;
        }
        if let Some(request) = self.pending.pop_front() {
            trace!(id = request.id, "path request started");
            let search = PathSearch::new(&mut self.grid, request.start, request.end);
            self.current = Some(ActiveRequest { request, search });
        }
    }

    fn finish(&mut self, active: ActiveRequest) {
        let ActiveRequest { request, search } = active;
        let result = search.into_result(&mut self.grid);
        debug!(
            id = request.id,
            success = result.success,
            waypoints = result.waypoints.len(),
            "path request finished"
        );
        (request.callback)(result.waypoints.clone(), result.success);
        self.last_result = Some(result);
    }
}

/// Cloneable handle for submitting requests to a [`PathWorker`]
#[derive(Clone)]
pub struct PathRequester {
    sender: mpsc::Sender<WorkerMessage>,
}

impl PathRequester {
    /// Queue a request. If the worker has already shut down the callback
    /// fires immediately on this thread with a failure.
    pub fn submit<F>(&self, start: WorldPoint, end: WorldPoint, callback: F)
    where
        F: FnOnce(Vec<WorldPoint>, bool) + Send + 'static,
    {
        let request = PathRequest {
            id: 0,
            start,
            end,
            callback: Box::new(callback) as SendPathCallback,
        };
        if let Err(mpsc::SendError(WorkerMessage::Request(request))) =
            self.sender.send(WorkerMessage::Request(request))
        {
            warn!("path worker is gone, failing request");
            (request.callback)(Vec::new(), false);
        }
    }
}

/// Request serializer running searches on a dedicated thread
pub struct PathWorker {
    requester: Option<PathRequester>,
    handle: Option<JoinHandle<Grid>>,
}

impl PathWorker {
    /// Start the worker thread; it owns `grid` until [`PathWorker::shutdown`]
    pub fn spawn(grid: Grid) -> io::Result<Self> {
        let (sender, receiver) = mpsc::channel::<WorkerMessage>();
        let handle = thread::Builder::new()
            .name("path-worker".to_string())
            .spawn(move || run_worker(grid, receiver))?;

        Ok(PathWorker {
            requester: Some(PathRequester { sender }),
            handle: Some(handle),
        })
    }

    pub fn requester(&self) -> Option<PathRequester> {
        self.requester.clone()
    }

    pub fn submit<F>(&self, start: WorldPoint, end: WorldPoint, callback: F)
    where
        F: FnOnce(Vec<WorldPoint>, bool) + Send + 'static,
    {
        match &self.requester {
            Some(requester) => requester.submit(start, end, callback),
            None => callback(Vec::new(), false),
        }
    }

    /// Finish the requests queued so far and return the grid.
    ///
    /// Cloned requesters do not keep the worker alive: anything they submit
    /// after this point fails with `(empty, false)`.
    pub fn shutdown(mut self) -> Option<Grid> {
        self.stop()
    }

    fn stop(&mut self) -> Option<Grid> {
        let handle = self.handle.take()?;
        if let Some(requester) = self.requester.take() {
            // The worker holds the receiver until it exits, so this only fails
            // if the thread already died
            let _ = requester.sender.send(WorkerMessage::Stop);
        }
        match handle.join() {
            Ok(grid) => Some(grid),
            Err(_) => {
                warn!("path worker thread panicked");
                None
            }
        }
    }
}

impl Drop for PathWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_worker(mut grid: Grid, receiver: mpsc::Receiver<WorkerMessage>) -> Grid {
    debug!(cells = grid.max_size(), "path worker started");
    let mut handled: u64 = 0;
    for message in receiver.iter() {
        let mut request = match message {
            WorkerMessage::Request(request) => request,
            WorkerMessage::Stop => break,
        };
        request.id = handled;
        handled += 1;
        trace!(id = request.id, "path request started");
        let result = find_path(&mut grid, request.start, request.end);
        debug!(
            id = request.id,
            success = result.success,
            waypoints = result.waypoints.len(),
            "path request finished"
        );
        (request.callback)(result.waypoints, result.success);
    }

    // Requests that raced the stop message still get their callback
    let mut rejected: u64 = 0;
    while let Ok(message) = receiver.try_recv() {
        if let WorkerMessage::Request(request) = message {
            (request.callback)(Vec::new(), false);
            rejected += 1;
        }
    }
    debug!(handled, rejected, "path worker stopped");
    grid
}
