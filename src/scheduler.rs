//! Periodic card scheduler
//!
//! Owns a single repeating timer that, on firing, surfaces a due card from
//! a configured deck through the popup callback, and always restores the
//! deck the user had selected beforehand. Reconfiguration goes through
//! [`CardScheduler::update_state`], which stops any running timer before
//! applying the new settings so two timers can never coexist.
//!
//! The state machine itself is synchronous; [`spawn_scheduler`] drives it
//! from a tokio task that serializes timer ticks and control messages.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::{ConfigStore, ScheduleConfig};
use crate::host::{DeckHandle, HostError, ReviewHost};

/// Callback that makes the popup visible and refreshes its displayed card.
pub type ShowCardFn = Arc<dyn Fn() + Send + Sync>;

/// Everything that can go wrong during a single tick.
#[derive(Error, Debug)]
pub enum TickError {
    #[error("review collection is not loaded")]
    DataStoreUnavailable,

    #[error("could not find deck: {0}")]
    DeckNotFound(String),

    #[error("no cards available in deck: {0}")]
    NoCardsAvailable(String),

    #[error("could not enter a reviewable state")]
    ReviewState,

    #[error(transparent)]
    Host(#[from] HostError),
}

/// What a single tick did. The scheduling policy (stop vs keep running)
/// has already been applied by the time the caller sees this.
#[derive(Debug)]
pub enum TickOutcome {
    /// A due card was found and the popup callback was invoked.
    CardShown,
    /// This tick failed but the schedule keeps running.
    Skipped(TickError),
    /// This tick failed in a way that halted the schedule.
    Stopped(TickError),
}

/// The periodic scheduler state machine.
///
/// Two states: STOPPED (`enabled == false`, no timer armed) and RUNNING
/// (`enabled == true`, timer armed with the configured period). Owns the
/// host adapter and the popup callback; everything runs on the caller's
/// thread.
pub struct CardScheduler<H: ReviewHost> {
    host: H,
    show_card: ShowCardFn,
    interval_minutes: u32,
    deck_name: String,
    enabled: bool,
    /// Armed timer period; `None` while stopped.
    timer: Option<Duration>,
}

impl<H: ReviewHost> CardScheduler<H> {
    pub fn new(host: H, show_card: ShowCardFn) -> Self {
        Self {
            host,
            show_card,
            interval_minutes: 30,
            deck_name: "Default".to_string(),
            enabled: false,
            timer: None,
        }
    }

    /// Whether the recurring timer is currently armed.
    pub fn is_running(&self) -> bool {
        self.enabled
    }

    /// The armed timer period, if any.
    pub fn tick_period(&self) -> Option<Duration> {
        self.timer
    }

    /// Reconcile the scheduler against a configuration snapshot.
    ///
    /// Always stops a running timer first, then applies interval and deck
    /// changes, then starts the schedule only if the snapshot enables it.
    /// Never fails; tick problems are reported through the host's
    /// transient notifications instead.
    pub fn update_state(&mut self, config: &ScheduleConfig) {
        log::info!(
            "updating scheduler state: enabled={} interval={}m deck={:?}",
            config.enabled,
            config.frequency,
            config.deck
        );

        // Clean slate: never try to reconfigure a live timer.
        if self.enabled {
            self.stop_schedule();
        }

        if self.interval_minutes != config.frequency {
            log::info!(
                "updating frequency from {} to {} minutes",
                self.interval_minutes,
                config.frequency
            );
            self.interval_minutes = config.frequency;
        }

        if self.deck_name != config.deck {
            log::info!(
                "updating deck from {:?} to {:?}",
                self.deck_name,
                config.deck
            );
            self.deck_name = config.deck.clone();
        }

        if config.enabled {
            self.start_schedule();
        }
    }

    /// Arm the repeating timer and show the first card right away.
    pub fn start_schedule(&mut self) {
        let period = Duration::from_millis(u64::from(self.interval_minutes) * 60_000);
        log::info!(
            "starting schedule at {}: one card every {} minute(s)",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            self.interval_minutes
        );
        self.timer = Some(period);
        self.enabled = true;

        // First card immediately instead of waiting a full interval.
        self.exec_schedule();
    }

    /// Disarm the timer and tell the user the schedule stopped.
    pub fn stop_schedule(&mut self) {
        log::info!(
            "stopping schedule at {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        self.timer = None;
        self.enabled = false;
        self.host.notify_user("Scheduled review stopped");
    }

    /// Run one tick: resolve the deck, surface a due card, restore the
    /// user's deck.
    ///
    /// A missing deck or an empty deck halts the schedule; everything
    /// else only aborts this tick. The previously active deck is restored
    /// no matter which branch was taken.
    pub fn exec_schedule(&mut self) -> TickOutcome {
        log::info!(
            "executing scheduled review for deck {:?} at {}",
            self.deck_name,
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );

        if !self.host.is_data_loaded() {
            let err = TickError::DataStoreUnavailable;
            log::error!("{}", err);
            return TickOutcome::Skipped(err);
        }

        let deck = match self.host.find_deck(&self.deck_name) {
            Ok(Some(deck)) => deck,
            Ok(None) => {
                let err = TickError::DeckNotFound(self.deck_name.clone());
                log::error!("{}", err);
                self.host
                    .notify_user(&format!("Could not find deck: {}", self.deck_name));
                self.stop_schedule();
                return TickOutcome::Stopped(err);
            }
            Err(e) => {
                log::error!("error accessing the collection: {}", e);
                self.stop_schedule();
                return TickOutcome::Stopped(e.into());
            }
        };

        let old_deck = match self.host.active_deck() {
            Ok(deck) => deck,
            Err(e) => {
                log::error!("error accessing the collection: {}", e);
                self.stop_schedule();
                return TickOutcome::Stopped(e.into());
            }
        };

        let result = self.surface_card(deck);

        // Always put the user's deck back, whatever happened above.
        if let Err(e) = self.host.select_deck(old_deck) {
            log::error!("failed to restore previous deck: {}", e);
        }

        match result {
            Ok(()) => TickOutcome::CardShown,
            Err(err @ TickError::NoCardsAvailable(_)) => {
                log::warn!("{}", err);
                self.stop_schedule();
                TickOutcome::Stopped(err)
            }
            Err(err @ TickError::ReviewState) => {
                log::error!("failed to ensure review state");
                TickOutcome::Skipped(err)
            }
            Err(err) => {
                log::error!("scheduled tick failed: {}", err);
                TickOutcome::Skipped(err)
            }
        }
    }

    fn surface_card(&mut self, deck: DeckHandle) -> Result<(), TickError> {
        self.host.select_deck(deck)?;

        if !self.ensure_review_state(deck) {
            return Err(TickError::ReviewState);
        }

        match self.host.next_due_card(deck)? {
            Some(card) => {
                log::info!("got card {:?} from deck {:?}", card, self.deck_name);
                (self.show_card)();
                self.host.notify_user(&format!(
                    "Showing scheduled card from deck: {}",
                    self.deck_name
                ));
                Ok(())
            }
            None => {
                self.host
                    .notify_user(&format!("No cards available in deck: {}", self.deck_name));
                Err(TickError::NoCardsAvailable(self.deck_name.clone()))
            }
        }
    }

    /// Make sure the host is in a state where a card can be reviewed.
    ///
    /// No-op when a review session with a current card is already active.
    fn ensure_review_state(&mut self, deck: DeckHandle) -> bool {
        if self.host.has_active_review_card() {
            return true;
        }

        log::info!("no active review card, attempting to start a review");
        match self.host.next_due_card(deck) {
            Ok(Some(_)) => match self.host.enter_review_state() {
                Ok(()) => true,
                Err(e) => {
                    log::error!("error entering review state: {}", e);
                    false
                }
            },
            Ok(None) => {
                log::warn!("no cards available for review");
                self.host.notify_user("No cards available for review");
                false
            }
            Err(e) => {
                log::error!("error checking for due cards: {}", e);
                false
            }
        }
    }
}

/// Control messages for the scheduler task.
#[derive(Debug)]
pub enum SchedulerMessage {
    /// Configuration changed; `None` means re-read the persisted config.
    UpdateState(Option<ScheduleConfig>),
    /// Stop the recurring timer (manual toggle).
    Stop,
    /// App closing.
    Shutdown,
}

/// Handle for the scheduler task.
///
/// Owned by the application's composition root; UI components that need to
/// poke the scheduler hold a clone and send non-blocking messages.
#[derive(Clone)]
pub struct SchedulerHandle {
    sender: mpsc::Sender<SchedulerMessage>,
}

impl SchedulerHandle {
    /// Ask the scheduler to reconcile against a configuration snapshot,
    /// or against the persisted configuration when `config` is `None`.
    pub fn update_state(&self, config: Option<ScheduleConfig>) {
        let _ = self
            .sender
            .try_send(SchedulerMessage::UpdateState(config));
    }

    /// Stop the recurring timer.
    pub fn stop(&self) {
        let _ = self.sender.try_send(SchedulerMessage::Stop);
    }

    /// Shut down the scheduler task.
    pub fn shutdown(&self) {
        let _ = self.sender.try_send(SchedulerMessage::Shutdown);
    }
}

/// Spawn the scheduler loop on the async runtime.
///
/// The loop takes ownership of the scheduler (and with it the host
/// adapter); an initial `UpdateState(None)` is queued so the scheduler
/// reconciles against the persisted configuration right away.
pub fn spawn_scheduler<H>(scheduler: CardScheduler<H>, config_store: ConfigStore) -> SchedulerHandle
where
    H: ReviewHost + Send + 'static,
{
    let (tx, rx) = mpsc::channel(32);

    tokio::spawn(async move {
        scheduler_loop(scheduler, config_store, rx).await;
    });

    let _ = tx.try_send(SchedulerMessage::UpdateState(None));

    SchedulerHandle { sender: tx }
}

/// Main scheduler loop.
///
/// Ticks and control messages are serialized on this one task, so a tick
/// can never run after a `Stop` has been processed — the select arm that
/// would fire it re-reads the armed period on every iteration. The tick
/// handler itself does not re-check `enabled`; this serialization is what
/// makes that safe.
async fn scheduler_loop<H: ReviewHost>(
    mut scheduler: CardScheduler<H>,
    config_store: ConfigStore,
    mut receiver: mpsc::Receiver<SchedulerMessage>,
) {
    log::info!("card scheduler started");

    loop {
        let period = scheduler.tick_period();

        tokio::select! {
            _ = tick_elapsed(period) => {
                scheduler.exec_schedule();
            }

            msg = receiver.recv() => match msg {
                Some(SchedulerMessage::UpdateState(config)) => {
                    let config = match config {
                        Some(config) => config,
                        None => match config_store.load() {
                            Ok(addon) => addon.scheduling,
                            Err(e) => {
                                log::error!("failed to load configuration: {}", e);
                                continue;
                            }
                        },
                    };
                    scheduler.update_state(&config);
                }
                Some(SchedulerMessage::Stop) => {
                    if scheduler.is_running() {
                        scheduler.stop_schedule();
                    }
                }
                Some(SchedulerMessage::Shutdown) | None => {
                    log::info!("card scheduler shutting down");
                    break;
                }
            }
        }
    }
}

/// Resolves when the armed period has elapsed; pending forever while the
/// timer is disarmed.
async fn tick_elapsed(period: Option<Duration>) {
    match period {
        Some(period) => tokio::time::sleep(period).await,
        None => std::future::pending().await,
    }
}
