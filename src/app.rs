//! Engine handle: configuration, shared state, task scheduling, run loop.
//!
//! [`Ui`] is the single context object every screen, widget callback and
//! background task receives. It is a cheap `Rc` handle; all engine state
//! (screen arena, widget arena, current screen, Aperture result slot) lives
//! behind it. [`Gui`] owns a `Ui` and drives it on a single-threaded tokio
//! runtime until shutdown is requested.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use slotmap::SlotMap;
use tokio::sync::Notify;
use tokio::task::{JoinError, JoinHandle, LocalSet};
use tracing::{debug, info, warn};

use crate::error::{GuiError, Result};
use crate::event::input::TouchSource;
use crate::event::message::CommandQueue;
use crate::geometry::Size;
use crate::render::{Color, DisplayProxy, DisplaySurface, GreyStyle};
use crate::screen::{ScreenEntry, ScreenId, View};
use crate::task::{ScreenTask, TaskHandle};
use crate::widget::{Value, Widget, WidgetId};

// ---------------------------------------------------------------------------
// GuiConfig
// ---------------------------------------------------------------------------

/// Engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GuiConfig {
    /// Delay between touch dispatch passes. Zero yields once per pass.
    pub poll_interval: Duration,
    /// How long a press must be held before the long-press callback fires.
    pub long_press: Duration,
    /// Period of the low-priority task that drops unreachable screens.
    pub reclaim_interval: Duration,
    /// Initial disabled-rendering style.
    pub grey_style: GreyStyle,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::ZERO,
            long_press: Duration::from_millis(1000),
            reclaim_interval: Duration::from_millis(100),
            grey_style: GreyStyle::default(),
        }
    }
}

impl GuiConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dispatch poll interval (builder).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the long-press threshold (builder).
    pub fn with_long_press(mut self, threshold: Duration) -> Self {
        self.long_press = threshold;
        self
    }

    /// Set the reclamation period (builder).
    pub fn with_reclaim_interval(mut self, interval: Duration) -> Self {
        self.reclaim_interval = interval;
        self
    }

    /// Set the initial grey style (builder). Validated when the engine is built.
    pub fn with_grey_style(mut self, style: GreyStyle) -> Self {
        self.grey_style = style;
        self
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Mutable engine state. Never borrowed across user code.
pub(crate) struct State {
    pub screens: SlotMap<ScreenId, ScreenEntry>,
    /// `None` while the widget is checked out to run a handler.
    pub widgets: SlotMap<WidgetId, Option<Box<dyn Widget>>>,
    pub current: Option<ScreenId>,
    /// The Aperture result slot, shared by every dialog.
    pub aperture_value: Value,
    pub commands: CommandQueue,
    /// Widgets pressed since the last release pass, on any screen.
    pub touched: Vec<WidgetId>,
    pub defer_depth: usize,
    pub pumping: bool,
    /// Unreachable screens whose tasks are cancelled, awaiting reclamation.
    pub retired: Vec<ScreenId>,
    pub running: bool,
    pub shutting_down: bool,
}

impl State {
    fn new() -> Self {
        Self {
            screens: SlotMap::with_key(),
            widgets: SlotMap::with_key(),
            current: None,
            aperture_value: Value::None,
            commands: CommandQueue::new(),
            touched: Vec::new(),
            defer_depth: 0,
            pumping: false,
            retired: Vec::new(),
            running: false,
            shutting_down: false,
        }
    }
}

pub(crate) struct UiInner {
    pub state: RefCell<State>,
    pub display: RefCell<DisplayProxy>,
    pub touch: RefCell<Box<dyn TouchSource>>,
    config: GuiConfig,
    tasks: LocalSet,
    shutdown: Notify,
    fault: RefCell<Option<GuiError>>,
    passes: Cell<u64>,
}

// ---------------------------------------------------------------------------
// Ui
// ---------------------------------------------------------------------------

/// Handle to the screen/touch engine.
///
/// Cloning is cheap and every clone addresses the same engine. All methods
/// take `&self`; the engine is single-threaded and re-entrancy is resolved
/// internally (navigation requested from a handler is queued until the
/// handler returns).
#[derive(Clone)]
pub struct Ui {
    pub(crate) inner: Rc<UiInner>,
}

impl Ui {
    /// Build an engine over a display and a touch source.
    pub fn new(
        display: impl DisplaySurface + 'static,
        touch: impl TouchSource + 'static,
        config: GuiConfig,
    ) -> Result<Self> {
        config.grey_style.validate()?;
        Ok(Self::build(Box::new(display), Box::new(touch), config))
    }

    pub(crate) fn build(
        display: Box<dyn DisplaySurface>,
        touch: Box<dyn TouchSource>,
        config: GuiConfig,
    ) -> Self {
        let display = DisplayProxy::new(display, config.grey_style);
        Self {
            inner: Rc::new(UiInner {
                state: RefCell::new(State::new()),
                display: RefCell::new(display),
                touch: RefCell::new(touch),
                config,
                tasks: LocalSet::new(),
                shutdown: Notify::new(),
                fault: RefCell::new(None),
                passes: Cell::new(0),
            }),
        }
    }

    pub fn config(&self) -> &GuiConfig {
        &self.inner.config
    }

    // ── Display queries ──────────────────────────────────────────────

    pub fn display_size(&self) -> Size {
        self.inner.display.borrow().size()
    }

    pub fn text_size(&self, text: &str) -> Size {
        self.inner.display.borrow().text_size(text)
    }

    pub fn foreground(&self) -> Color {
        self.inner.display.borrow().foreground()
    }

    pub fn background(&self) -> Color {
        self.inner.display.borrow().background()
    }

    pub fn grey_style(&self) -> GreyStyle {
        self.inner.display.borrow().style()
    }

    // ── Aperture result slot ─────────────────────────────────────────

    /// The value last stored by a dialog.
    ///
    /// There is one slot for every Aperture, not one per dialog. Two dialogs
    /// open at the same time would overwrite each other's result; only one
    /// dialog may be in flight at once.
    pub fn aperture_value(&self) -> Value {
        self.inner.state.borrow().aperture_value.clone()
    }

    /// Store a dialog outcome. Set it before navigating back.
    pub fn set_aperture_value(&self, value: impl Into<Value>) {
        self.inner.state.borrow_mut().aperture_value = value.into();
    }

    // ── Deferral ─────────────────────────────────────────────────────

    /// Run `f` with navigation deferred; queued navigation executes once the
    /// outermost deferred section ends.
    pub(crate) fn deferred<R>(&self, f: impl FnOnce() -> Result<R>) -> Result<R> {
        self.inner.state.borrow_mut().defer_depth += 1;
        let result = f();
        self.inner.state.borrow_mut().defer_depth -= 1;
        let pumped = self.pump();
        let value = result?;
        pumped?;
        Ok(value)
    }

    pub(crate) fn count_pass(&self) {
        self.inner.passes.set(self.inner.passes.get() + 1);
    }

    /// Number of dispatch passes run so far.
    pub fn passes(&self) -> u64 {
        self.inner.passes.get()
    }

    // ── Tasks ────────────────────────────────────────────────────────

    /// Register a cooperative task with the current screen.
    ///
    /// With `cancel_on_change` the task is cancelled as soon as the screen is
    /// replaced; otherwise it keeps running while the screen stays reachable
    /// (for instance beneath a dialog). Every task is cancelled at shutdown.
    /// An `Err` from the task is a fault: it stops the engine and is returned
    /// from [`Ui::serve`].
    pub fn register_task<F>(&self, task: F, cancel_on_change: bool) -> Result<TaskHandle>
    where
        F: Future<Output = Result<()>> + 'static,
    {
        let screen = self.current_screen().ok_or(GuiError::NoActiveScreen)?;
        self.register_task_on(screen, task, cancel_on_change)
    }

    /// Register a cooperative task with a specific screen.
    pub fn register_task_on<F>(
        &self,
        screen: ScreenId,
        task: F,
        cancel_on_change: bool,
    ) -> Result<TaskHandle>
    where
        F: Future<Output = Result<()>> + 'static,
    {
        if !self.inner.state.borrow().screens.contains_key(screen) {
            return Err(GuiError::UnknownScreen(screen));
        }
        let ui = self.clone();
        let join = self.inner.tasks.spawn_local(async move {
            if let Err(e) = task.await {
                ui.fault(e);
            }
        });
        let handle = TaskHandle::new(join.abort_handle());
        let mut st = self.inner.state.borrow_mut();
        if let Some(entry) = st.screens.get_mut(screen) {
            entry.tasks.retain(|t| !t.handle.is_finished());
            entry.tasks.push(ScreenTask { handle: handle.clone(), cancel_on_change });
        }
        debug!(?screen, cancel_on_change, "task registered");
        Ok(handle)
    }

    fn spawn_system<F>(&self, task: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + 'static,
    {
        self.inner.tasks.spawn_local(task)
    }

    /// Drive the engine's task set until `future` completes.
    ///
    /// Registered tasks only make progress while the engine is driven, either
    /// by [`Ui::serve`] or through this method.
    pub async fn run_until<F: Future>(&self, future: F) -> F::Output {
        self.inner.tasks.run_until(future).await
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Record a fault and stop the engine. Only the first fault is kept.
    pub fn fault(&self, error: GuiError) {
        {
            let mut slot = self.inner.fault.borrow_mut();
            if slot.is_none() {
                warn!(%error, "engine fault");
                *slot = Some(error);
            }
        }
        self.request_shutdown();
    }

    /// Ask the engine to stop. Every task is cancelled and the dispatch loop
    /// exits at its next scheduling point. Does nothing if not running.
    pub fn request_shutdown(&self) {
        let mut st = self.inner.state.borrow_mut();
        if st.running && !st.shutting_down {
            st.shutting_down = true;
            info!("shutdown requested");
            self.inner.shutdown.notify_one();
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.state.borrow().running
    }

    pub fn is_shutting_down(&self) -> bool {
        self.inner.state.borrow().shutting_down
    }

    /// Open `root`, run the dispatch loop and block until shutdown.
    ///
    /// Returns the first fault raised by a handler or task, if any. On return
    /// every task is cancelled, the panel is cleared and no screen is current,
    /// so another run may start.
    pub async fn serve<F, V>(&self, root: F) -> Result<()>
    where
        F: FnOnce(&Ui) -> Result<V> + 'static,
        V: View,
    {
        {
            let mut st = self.inner.state.borrow_mut();
            if st.running {
                return Err(GuiError::AlreadyRunning);
            }
            st.running = true;
            st.shutting_down = false;
        }
        info!("engine started");
        let session = self.run_until(self.session(root)).await;
        let teardown = self.run_until(self.teardown()).await;
        let fault = self.inner.fault.borrow_mut().take();
        match fault {
            Some(e) => Err(e),
            None => session.and(teardown),
        }
    }

    async fn session<F, V>(&self, root: F) -> Result<()>
    where
        F: FnOnce(&Ui) -> Result<V> + 'static,
        V: View,
    {
        self.change_to(root)?;

        let mut dispatch = self.spawn_system(dispatch_loop(self.clone()));
        let reclaim = self.spawn_system(reclaim_loop(self.clone()));

        tokio::select! {
            _ = self.inner.shutdown.notified() => {}
            joined = &mut dispatch => self.record_join("dispatch loop", joined),
        }
        dispatch.abort();
        reclaim.abort();
        Ok(())
    }

    fn record_join(&self, name: &str, joined: std::result::Result<(), JoinError>) {
        if let Err(e) = joined {
            if e.is_panic() {
                self.fault(GuiError::TaskPanicked(format!("{name}: {e}")));
            }
        }
        self.request_shutdown();
    }

    async fn teardown(&self) -> Result<()> {
        let handles: Vec<TaskHandle> = self
            .inner
            .state
            .borrow()
            .screens
            .values()
            .flat_map(|entry| entry.tasks.iter().map(|t| t.handle.clone()))
            .collect();
        debug!(tasks = handles.len(), "cancelling tasks");
        for handle in &handles {
            handle.cancel();
        }
        tokio::task::yield_now().await;

        let cleared = self.inner.display.borrow_mut().clear();
        let (screens, widgets) = {
            let mut st = self.inner.state.borrow_mut();
            st.current = None;
            st.aperture_value = Value::None;
            st.commands.clear();
            st.touched.clear();
            st.retired.clear();
            st.defer_depth = 0;
            st.pumping = false;
            st.running = false;
            st.shutting_down = false;
            (std::mem::take(&mut st.screens), std::mem::take(&mut st.widgets))
        };
        // Dropped outside the borrow: views and callbacks may hold `Ui` clones.
        drop(widgets);
        drop(screens);
        info!("engine stopped");
        Ok(cleared?)
    }
}

impl std::fmt::Debug for Ui {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let st = self.inner.state.borrow();
        f.debug_struct("Ui")
            .field("current", &st.current)
            .field("screens", &st.screens.len())
            .field("widgets", &st.widgets.len())
            .field("running", &st.running)
            .finish()
    }
}

async fn dispatch_loop(ui: Ui) {
    let interval = ui.config().poll_interval;
    while !ui.is_shutting_down() {
        if let Err(e) = ui.poll_touch() {
            ui.fault(e);
            break;
        }
        if interval.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(interval).await;
        }
    }
}

async fn reclaim_loop(ui: Ui) {
    let interval = ui.config().reclaim_interval;
    loop {
        tokio::time::sleep(interval).await;
        ui.reclaim();
    }
}

// ---------------------------------------------------------------------------
// Gui
// ---------------------------------------------------------------------------

/// Blocking front end: owns the engine and the runtime it runs on.
pub struct Gui {
    ui: Ui,
}

impl Gui {
    /// Create an engine over a display and a touch source.
    pub fn new(
        display: impl DisplaySurface + 'static,
        touch: impl TouchSource + 'static,
        config: GuiConfig,
    ) -> Result<Self> {
        Ok(Self { ui: Ui::new(display, touch, config)? })
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    /// Open `root` and run until shutdown on a fresh single-threaded runtime.
    pub fn run<F, V>(&self, root: F) -> Result<()>
    where
        F: FnOnce(&Ui) -> Result<V> + 'static,
        V: View,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(GuiError::Runtime)?;
        runtime.block_on(self.ui.serve(root))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
