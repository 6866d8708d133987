//! Float Cards — core of a floating card popup add-on for a flashcard
//! review application.
//!
//! The hosting application owns the decks, the cards and the actual
//! spaced-repetition scheduling; it is modelled by the [`ReviewHost`]
//! trait. This crate provides:
//! - The periodic scheduler that surfaces a due card on a timer and
//!   restores the user's previously selected deck afterwards
//! - The persisted add-on configuration with a backup-on-write store
//!
//! The composition root constructs a [`CardScheduler`] with the host
//! adapter and the popup's show-card callback, then hands it to
//! [`spawn_scheduler`]; UI components keep a [`SchedulerHandle`] and call
//! `update_state` whenever the persisted configuration changes (startup,
//! settings dialog closed, hotkey toggles).

pub mod config;
pub mod host;
pub mod scheduler;

pub use config::{AddonConfig, ConfigError, ConfigStore, ScheduleConfig};
pub use host::{CardHandle, DeckHandle, HostError, ReviewHost};
pub use scheduler::{
    spawn_scheduler, CardScheduler, SchedulerHandle, SchedulerMessage, ShowCardFn, TickError,
    TickOutcome,
};
