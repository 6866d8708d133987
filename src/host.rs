//! Contract with the hosting review application.
//!
//! The host owns the decks, the cards and the actual spaced-repetition
//! scheduling. This crate never implements that logic; it only asks the
//! host for the next due card and drives the host's UI state around it.

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("the review collection is closed")]
    CollectionClosed,

    #[error("host backend error: {0}")]
    Backend(String),
}

/// Opaque identifier for a deck owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeckHandle(pub Uuid);

/// Opaque identifier for a card owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardHandle(pub Uuid);

/// Operations the scheduler needs from the hosting application.
///
/// All methods are expected to be cheap: they run on the scheduler task
/// between timer ticks and must not block it.
pub trait ReviewHost {
    /// Whether the host has a collection open at all.
    fn is_data_loaded(&self) -> bool;

    /// Resolve a deck by its user-visible name.
    fn find_deck(&self, name: &str) -> Result<Option<DeckHandle>, HostError>;

    /// The deck the user currently has selected.
    fn active_deck(&self) -> Result<DeckHandle, HostError>;

    /// Make `deck` the host's active deck.
    fn select_deck(&mut self, deck: DeckHandle) -> Result<(), HostError>;

    /// Whether a review session with a current card is already running.
    fn has_active_review_card(&self) -> bool;

    /// Ask the host's scheduler for the next due card in `deck`.
    fn next_due_card(&self, deck: DeckHandle) -> Result<Option<CardHandle>, HostError>;

    /// Move the host UI into its review state.
    fn enter_review_state(&mut self) -> Result<(), HostError>;

    /// Show a transient, non-blocking message to the user.
    fn notify_user(&self, message: &str);
}
