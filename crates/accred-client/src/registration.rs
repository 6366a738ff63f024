//! # Registration Submission
//!
//! Validate, issue a ticket, attach a welcome message, persist. The
//! welcome message never blocks a submission. Ticket uniqueness is enforced
//! by the store; on a collision a fresh ticket is issued, up to
//! [`MAX_TICKET_ATTEMPTS`] times.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use accred_core::{Participant, RegistrationForm, TicketIssuer, WelcomeRequest};

use crate::error::{RegistrationError, StoreError};
use crate::store::TicketStore;
use crate::welcome::WelcomeWriter;

/// Attempts at issuing a unique ticket.
pub const MAX_TICKET_ATTEMPTS: u32 = 5;

/// Registration pipeline.
#[derive(Clone)]
pub struct Registrar {
    store: Arc<dyn TicketStore>,
    welcome: WelcomeWriter,
    issuer: TicketIssuer,
}

impl std::fmt::Debug for Registrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registrar")
            .field("welcome", &self.welcome)
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

impl Registrar {
    /// Assemble the pipeline.
    pub fn new(store: Arc<dyn TicketStore>, welcome: WelcomeWriter, issuer: TicketIssuer) -> Self {
        Self {
            store,
            welcome,
            issuer,
        }
    }

    /// Submit a registration and return the stored participant.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::Validation`] for an invalid form; nothing is
    ///   generated or stored.
    /// - [`RegistrationError::TicketCollision`] when every issued ticket
    ///   was already taken.
    /// - [`RegistrationError::Store`] for any other store failure.
    pub async fn submit(
        &self,
        form: RegistrationForm,
        now: DateTime<Utc>,
    ) -> Result<Participant, RegistrationError> {
        let registration = form.validate()?;
        let welcome = self
            .welcome
            .write(&WelcomeRequest::from_registration(&registration))
            .await;
        let mut participant =
            Participant::from_registration(registration, self.issuer.issue(), welcome, now);

        for attempt in 1..=MAX_TICKET_ATTEMPTS {
            match self.store.insert(&participant).await {
                Ok(stored) => {
                    tracing::info!(
                        ticket_id = %stored.ticket_id,
                        participant_id = %stored.id,
                        attempt,
                        "participant registered"
                    );
                    return Ok(stored);
                }
                Err(StoreError::Conflict { .. }) => {
                    tracing::warn!(
                        ticket_id = %participant.ticket_id,
                        attempt,
                        "ticket collision, issuing a new ticket"
                    );
                    participant.ticket_id = self.issuer.issue();
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(RegistrationError::TicketCollision {
            attempts: MAX_TICKET_ATTEMPTS,
        })
    }
}
