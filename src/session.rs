//! The dashboard session: one task that owns all client state.
//!
//! DESIGN
//! ======
//! A `Session` owns the event store, the interaction controller, the frame
//! clock and the synchronizer task. It runs a single `select!` loop over
//!
//! - the frame interval: advance the clock, rebuild the scene, publish a `View`
//! - caller commands from the `SessionHandle`
//! - the synchronizer feed: connection status and push messages
//! - results of backend calls running on spawned tasks
//!
//! Only this loop mutates the store, so a frame always sees a consistent
//! list. Backend calls never block it; their results come back as messages
//! and are applied in arrival order.
//!
//! LIFECYCLE
//! =========
//! 1. `Session::spawn` validates config, starts the synchronizer and the loop
//! 2. The loop fetches the snapshot once, then runs until `Shutdown` or until
//!    every handle is gone. A snapshot that completes after any push message
//!    was applied is stale and is discarded
//! 3. Dropping the session aborts the synchronizer

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use field::animate::FrameClock;
use field::point::{Point, Viewport};
use field::scene::{self, Scene};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};
use wire::{Event, Inbound};

use crate::api::Backend;
use crate::config::Config;
use crate::error::ShepherdError;
use crate::interaction::{Controller, Selection};
use crate::store::EventStore;
use crate::sync::{self, ConnectionStatus, SyncEvent};

const COMMAND_QUEUE: usize = 64;
const FEED_QUEUE: usize = 256;
const NOTICE_QUEUE: usize = 64;

/// What a presentation layer draws for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct View {
    pub tick: u64,
    pub connection: ConnectionStatus,
    pub event_count: usize,
    pub scene: Scene,
    pub selection: Option<Selection>,
}

/// Things worth telling the user about outside the frame itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Connection(ConnectionStatus),
    SnapshotLoaded { count: usize },
    Acknowledged { id: String },
    AckFailed { id: String, error: String },
}

enum Command {
    PointerDown { point: Point, reply: oneshot::Sender<Option<Selection>> },
    ClearSelection,
    Acknowledge { reply: oneshot::Sender<Result<String, ShepherdError>> },
    Resize(Viewport),
    Shutdown,
}

enum TaskDone {
    Snapshot(Result<Vec<Event>, ShepherdError>),
    Acknowledge { id: String, result: Result<(), ShepherdError> },
}

pub struct Session {
    backend: Arc<dyn Backend>,
    store: EventStore,
    controller: Controller,
    clock: FrameClock,
    scene: Scene,
    viewport: Viewport,
    connection: ConnectionStatus,
    /// Set once any push message has touched the store.
    streamed: bool,
    views: watch::Sender<Arc<View>>,
    notices: broadcast::Sender<Notice>,
    tasks: mpsc::UnboundedSender<TaskDone>,
    sync: Option<JoinHandle<()>>,
}

impl Session {
    /// Start a session connected to the backend's push channel.
    ///
    /// Must be called inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns the configuration error if `config` does not validate.
    pub fn spawn(config: Config, backend: Arc<dyn Backend>) -> Result<SessionHandle, ShepherdError> {
        config.validate()?;
        let url = config.resolved_ws_url()?;
        let (feed_tx, feed_rx) = mpsc::channel(FEED_QUEUE);
        let sync = sync::spawn(url, config.reconnect, feed_tx);
        Ok(Self::start(&config, backend, feed_rx, Some(sync)))
    }

    /// Start a session fed by `feed` instead of a websocket.
    ///
    /// # Errors
    ///
    /// Returns the configuration error if `config` does not validate.
    pub fn with_feed(
        config: Config,
        backend: Arc<dyn Backend>,
        feed: mpsc::Receiver<SyncEvent>,
    ) -> Result<SessionHandle, ShepherdError> {
        config.validate()?;
        Ok(Self::start(&config, backend, feed, None))
    }

    fn start(
        config: &Config,
        backend: Arc<dyn Backend>,
        feed: mpsc::Receiver<SyncEvent>,
        sync: Option<JoinHandle<()>>,
    ) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE);
        let (tasks_tx, tasks_rx) = mpsc::unbounded_channel();
        let (views_tx, views_rx) = watch::channel(Arc::new(View::default()));
        let (notices_tx, _) = broadcast::channel(NOTICE_QUEUE);

        let session = Session {
            backend,
            store: EventStore::new(config.capacity),
            controller: Controller::new(),
            clock: FrameClock::new(),
            scene: Scene::default(),
            viewport: config.viewport,
            connection: ConnectionStatus::Disconnected,
            streamed: false,
            views: views_tx,
            notices: notices_tx.clone(),
            tasks: tasks_tx,
            sync,
        };
        let task = tokio::spawn(session.run(config.frame_interval(), command_rx, feed, tasks_rx));

        SessionHandle { commands: command_tx, views: views_rx, notices: notices_tx, task }
    }

    async fn run(
        mut self,
        frame_interval: std::time::Duration,
        mut commands: mpsc::Receiver<Command>,
        mut feed: mpsc::Receiver<SyncEvent>,
        mut tasks: mpsc::UnboundedReceiver<TaskDone>,
    ) {
        info!(capacity = self.store.capacity(), "session: started");
        self.spawn_snapshot();

        let mut frames = tokio::time::interval(frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut feed_open = true;

        loop {
            tokio::select! {
                _ = frames.tick() => self.frame(),
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    if !self.handle_command(command) {
                        break;
                    }
                }
                event = feed.recv(), if feed_open => match event {
                    Some(event) => self.on_sync(event),
                    None => {
                        debug!("session: synchronizer feed closed");
                        feed_open = false;
                    }
                },
                Some(done) = tasks.recv() => self.on_task(done),
            }
        }

        info!("session: stopped");
    }

    fn frame(&mut self) {
        let tick = self.clock.advance();
        self.scene = scene::build(&self.store, self.viewport, tick);
        self.publish();
    }

    fn publish(&self) {
        let view = View {
            tick: self.clock.tick(),
            connection: self.connection,
            event_count: self.store.len(),
            scene: self.scene.clone(),
            selection: self.controller.selection().cloned(),
        };
        self.views.send_replace(Arc::new(view));
    }

    fn notify(&self, notice: Notice) {
        if self.notices.send(notice).is_err() {
            trace!("session: no notice subscribers");
        }
    }

    /// Returns `false` when the loop should stop.
    fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::PointerDown { point, reply } => {
                let selection = self.controller.on_pointer_down(point, &self.scene, &self.store).cloned();
                self.publish();
                respond(reply, selection);
            }
            Command::ClearSelection => {
                self.controller.clear_selection();
                self.publish();
            }
            Command::Acknowledge { reply } => {
                let outcome = self.controller.begin_acknowledge();
                if let Ok(id) = &outcome {
                    self.spawn_acknowledge(id.clone());
                }
                respond(reply, outcome);
            }
            Command::Resize(viewport) => {
                if viewport.width > 0.0 && viewport.height > 0.0 {
                    self.viewport = viewport;
                } else {
                    warn!(width = viewport.width, height = viewport.height, "session: ignoring degenerate resize");
                }
            }
            Command::Shutdown => return false,
        }
        true
    }

    fn on_sync(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::Status(status) => {
                self.connection = status;
                self.notify(Notice::Connection(status));
            }
            SyncEvent::Inbound(inbound) => {
                if !matches!(inbound, Inbound::Malformed(_)) {
                    self.streamed = true;
                }
                sync::apply(&mut self.store, inbound);
                self.controller.refresh(&self.store);
            }
        }
    }

    fn on_task(&mut self, done: TaskDone) {
        match done {
            TaskDone::Snapshot(Ok(events)) if self.streamed => {
                debug!(count = events.len(), "session: snapshot superseded by push channel, discarded");
            }
            TaskDone::Snapshot(Ok(events)) => {
                self.store.replace_all(events);
                self.controller.refresh(&self.store);
                let count = self.store.len();
                info!(count, "session: snapshot loaded");
                self.notify(Notice::SnapshotLoaded { count });
            }
            TaskDone::Snapshot(Err(error)) => {
                warn!(%error, "session: snapshot fetch failed");
            }
            TaskDone::Acknowledge { id, result } => {
                match self.controller.finish_acknowledge(&mut self.store, &id, result) {
                    Ok(()) => self.notify(Notice::Acknowledged { id }),
                    Err(error) => {
                        warn!(%id, %error, "session: acknowledge failed");
                        self.notify(Notice::AckFailed { id, error: error.to_string() });
                    }
                }
                self.publish();
            }
        }
    }

    fn spawn_snapshot(&self) {
        let backend = Arc::clone(&self.backend);
        let tasks = self.tasks.clone();
        tokio::spawn(async move {
            let result = backend.fetch_events().await;
            deliver(&tasks, TaskDone::Snapshot(result));
        });
    }

    fn spawn_acknowledge(&self, id: String) {
        let backend = Arc::clone(&self.backend);
        let tasks = self.tasks.clone();
        debug!(%id, "session: acknowledge requested");
        tokio::spawn(async move {
            let result = backend.acknowledge(&id).await;
            deliver(&tasks, TaskDone::Acknowledge { id, result });
        });
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(sync) = self.sync.take() {
            sync.abort();
        }
    }
}

fn respond<T>(reply: oneshot::Sender<T>, value: T) {
    if reply.send(value).is_err() {
        debug!("session: caller left before the reply");
    }
}

fn deliver(tasks: &mpsc::UnboundedSender<TaskDone>, done: TaskDone) {
    if tasks.send(done).is_err() {
        debug!("session: finished after shutdown, result discarded");
    }
}

/// Caller side of a running session. Dropping it stops the session.
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    views: watch::Receiver<Arc<View>>,
    notices: broadcast::Sender<Notice>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Resolve a click at `point` against the current frame.
    ///
    /// # Errors
    ///
    /// Returns `SessionClosed` if the session has stopped.
    pub async fn pointer_down(&self, point: Point) -> Result<Option<Selection>, ShepherdError> {
        let (reply, answer) = oneshot::channel();
        self.send(Command::PointerDown { point, reply }).await?;
        answer.await.map_err(|_| ShepherdError::SessionClosed)
    }

    /// # Errors
    ///
    /// Returns `SessionClosed` if the session has stopped.
    pub async fn clear_selection(&self) -> Result<(), ShepherdError> {
        self.send(Command::ClearSelection).await
    }

    /// Request acknowledgment of the selected event.
    ///
    /// Returns the id once the request is issued; the backend's answer
    /// arrives later as `Notice::Acknowledged` or `Notice::AckFailed`.
    ///
    /// # Errors
    ///
    /// `NoSelection`, `AlreadyAcknowledged` or `AckInFlight` when the
    /// request cannot be issued, `SessionClosed` if the session has stopped.
    pub async fn acknowledge(&self) -> Result<String, ShepherdError> {
        let (reply, answer) = oneshot::channel();
        self.send(Command::Acknowledge { reply }).await?;
        answer.await.map_err(|_| ShepherdError::SessionClosed)?
    }

    /// # Errors
    ///
    /// Returns `SessionClosed` if the session has stopped.
    pub async fn resize(&self, viewport: Viewport) -> Result<(), ShepherdError> {
        self.send(Command::Resize(viewport)).await
    }

    /// The most recently published frame.
    #[must_use]
    pub fn view(&self) -> Arc<View> {
        Arc::clone(&self.views.borrow())
    }

    /// A receiver that wakes on every published frame.
    #[must_use]
    pub fn views(&self) -> watch::Receiver<Arc<View>> {
        self.views.clone()
    }

    #[must_use]
    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    /// Stop the session and wait for its task to finish.
    pub async fn shutdown(mut self) {
        if self.commands.send(Command::Shutdown).await.is_err() {
            debug!("session: already stopped");
        }
        if let Err(error) = (&mut self.task).await {
            warn!(%error, "session: task ended abnormally");
        }
    }

    async fn send(&self, command: Command) -> Result<(), ShepherdError> {
        self.commands.send(command).await.map_err(|_| ShepherdError::SessionClosed)
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
