//! Async driver for a [`RecipeOrchestrator`].
//!
//! The session executes the orchestrator's commands as spawned tasks and
//! funnels every completion back through one channel. All state changes
//! happen in `Session` methods, on whichever task owns the session, so the
//! orchestrator itself never needs a lock.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{info_span, Instrument};

use crate::config::AppConfig;
use crate::error::{GenerationError, OrchestratorError};
use crate::orchestrator::{
    Command, CycleId, NotificationTicket, RecipeOrchestrator, ViewState,
};
use crate::service::GenerationService;
use crate::types::{GeneratedImage, Recipe};

/// Something that happened outside the session and must be applied to it.
#[derive(Debug)]
pub enum Event {
    RecipeCompleted {
        cycle: CycleId,
        result: Result<Recipe, GenerationError>,
    },
    ImageCompleted {
        cycle: CycleId,
        result: Result<GeneratedImage, GenerationError>,
    },
    NotificationExpired(NotificationTicket),
}

/// Session settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// `None` keeps notifications up until dismissed.
    pub notification_auto_hide: Option<Duration>,
    pub image_generation_enabled: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            notification_auto_hide: Some(Duration::from_millis(
                crate::config::DEFAULT_NOTIFICATION_MS,
            )),
            image_generation_enabled: true,
        }
    }
}

impl From<&AppConfig> for SessionConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            notification_auto_hide: Some(config.notification_auto_hide),
            image_generation_enabled: config.image_generation_enabled,
        }
    }
}

pub struct Session {
    orchestrator: RecipeOrchestrator,
    service: Arc<dyn GenerationService>,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    /// Generation requests spawned but not yet received back.
    in_flight: usize,
    auto_hide: Option<Duration>,
    /// Last notification an expiry timer was started for.
    timed_notification: Option<NotificationTicket>,
    /// Expiry timers started but not yet received back.
    pending_timers: usize,
}

impl Session {
    pub fn new(service: Arc<dyn GenerationService>, config: SessionConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            orchestrator: RecipeOrchestrator::with_image_generation(
                config.image_generation_enabled,
            ),
            service,
            events_tx,
            events_rx,
            in_flight: 0,
            auto_hide: config.notification_auto_hide,
            timed_notification: None,
            pending_timers: 0,
        }
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.orchestrator.on_input_change(text);
    }

    /// Submit a dish name. Blank names are rejected with a notification and
    /// issue no request.
    pub fn submit_name(&mut self, text: &str) -> Result<CycleId, OrchestratorError> {
        let result = self.orchestrator.on_submit_name(text);
        self.after_submit(result)
    }

    /// Submit the current contents of the name field.
    pub fn submit(&mut self) -> Result<CycleId, OrchestratorError> {
        let result = self.orchestrator.on_submit();
        self.after_submit(result)
    }

    fn after_submit(
        &mut self,
        result: Result<Command, OrchestratorError>,
    ) -> Result<CycleId, OrchestratorError> {
        let outcome = result.map(|command| {
            let cycle = command.cycle();
            self.dispatch(command);
            cycle
        });
        self.schedule_notification_expiry();
        outcome
    }

    pub fn toggle_image_generation(&mut self, enabled: bool) {
        self.orchestrator.on_toggle_image_generation(enabled);
    }

    pub fn dismiss_notification(&mut self) {
        self.orchestrator.on_dismiss_notification();
    }

    pub fn view(&self) -> ViewState<'_> {
        self.orchestrator.view()
    }

    pub fn orchestrator(&self) -> &RecipeOrchestrator {
        &self.orchestrator
    }

    /// Number of generation requests still outstanding, including ones whose
    /// cycle has been superseded.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Whether any spawned request or expiry timer has yet to report back.
    pub fn has_pending_events(&self) -> bool {
        self.in_flight > 0 || self.pending_timers > 0
    }

    /// Wait for the next event. Cancel-safe; pair with [`Session::apply`].
    ///
    /// The session holds its own sender, so this waits indefinitely when
    /// nothing is pending. Check [`Session::has_pending_events`] first if
    /// that matters.
    pub async fn next_event(&mut self) -> Option<Event> {
        self.events_rx.recv().await
    }

    /// Apply one event to the orchestrator, issuing any follow-up request.
    pub fn apply(&mut self, event: Event) {
        match event {
            Event::RecipeCompleted { cycle, result } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                match self.orchestrator.on_recipe_completed(cycle, result) {
                    Ok(Some(command)) => self.dispatch(command),
                    Ok(None) => {}
                    Err(stale) => tracing::debug!(%stale, "recipe response dropped"),
                }
            }
            Event::ImageCompleted { cycle, result } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                if let Err(stale) = self.orchestrator.on_image_completed(cycle, result) {
                    tracing::debug!(%stale, "image response dropped");
                }
            }
            Event::NotificationExpired(ticket) => {
                self.pending_timers = self.pending_timers.saturating_sub(1);
                if self.orchestrator.on_notification_expired(ticket) {
                    tracing::debug!("notification expired");
                }
            }
        }
        self.schedule_notification_expiry();
    }

    /// Receive and apply one event. Returns false without waiting when
    /// nothing is pending.
    pub async fn step(&mut self) -> bool {
        if !self.has_pending_events() {
            return false;
        }
        match self.next_event().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    /// Apply events until every outstanding generation request has come
    /// back, stale ones included.
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            if !self.step().await {
                break;
            }
        }
    }

    fn dispatch(&mut self, command: Command) {
        let service = Arc::clone(&self.service);
        let tx = self.events_tx.clone();
        self.in_flight += 1;

        match command {
            Command::GenerateRecipe { cycle, prompt } => {
                let span = info_span!("generate_recipe", %cycle, service = service.service_name());
                tokio::spawn(
                    async move {
                        let result = service.generate_recipe(&prompt).await;
                        // Receiver gone means the session ended; nothing to apply to.
                        let _ = tx.send(Event::RecipeCompleted { cycle, result });
                    }
                    .instrument(span),
                );
            }
            Command::GenerateImage { cycle, prompt } => {
                let span = info_span!("generate_image", %cycle, service = service.service_name());
                tokio::spawn(
                    async move {
                        let result = service.generate_image(&prompt).await;
                        let _ = tx.send(Event::ImageCompleted { cycle, result });
                    }
                    .instrument(span),
                );
            }
        }
    }

    /// Start an expiry timer for a newly shown notification.
    fn schedule_notification_expiry(&mut self) {
        let Some(auto_hide) = self.auto_hide else {
            return;
        };
        let Some(ticket) = self.orchestrator.notifications().visible_ticket() else {
            return;
        };
        if self.timed_notification == Some(ticket) {
            return;
        }

        self.timed_notification = Some(ticket);
        self.pending_timers += 1;
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(auto_hide).await;
            let _ = tx.send(Event::NotificationExpired(ticket));
        });
    }
}
