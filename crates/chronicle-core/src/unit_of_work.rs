//! Message handling scoped to one unit of work.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::bus::Bus;
use crate::error::DomainError;
use crate::message::Message;
use crate::repository::{FlushReport, Repository};
use crate::store::EventStore;

/// Application code that handles one kind of message against a repository
/// session.
#[async_trait]
pub trait MessageHandler<S: EventStore>: Send + Sync {
    /// The inbound message type.
    type Message: Message;
    /// What the handler hands back to the caller.
    type Output: Send;

    /// Handles `message`, reading and creating aggregates through
    /// `repository`. Must not flush; the caller does that on success.
    ///
    /// # Errors
    ///
    /// Any `DomainError`; the unit of work is then discarded.
    async fn handle(
        &self,
        message: Self::Message,
        repository: &mut Repository<S>,
    ) -> Result<Self::Output, DomainError>;
}

/// Result of a successfully handled and flushed message.
#[derive(Debug)]
pub struct Handled<T> {
    /// The handler's output.
    pub output: T,
    /// What the flush stored, published and replied.
    pub report: FlushReport,
}

/// Runs `handler` for `message` inside a fresh unit of work.
///
/// The session is flushed only when the handler succeeds; a failed handler
/// leaves the store and bus untouched.
///
/// # Errors
///
/// Returns the handler's error, or the first store/bus error from the flush.
#[instrument(
    skip_all,
    fields(
        message_type = message.message_type(),
        correlation_id = %message.correlation_id()
    )
)]
pub async fn handle_message<S, H>(
    store: Arc<S>,
    bus: Arc<dyn Bus>,
    handler: &H,
    message: H::Message,
) -> Result<Handled<H::Output>, DomainError>
where
    S: EventStore,
    H: MessageHandler<S> + ?Sized,
{
    let mut repository = Repository::new(store, bus);
    match handler.handle(message, &mut repository).await {
        Ok(output) => {
            let report = repository.flush().await?;
            Ok(Handled { output, report })
        }
        Err(err) => {
            debug!(error = %err, "handler failed");
            repository.discard();
            Err(err)
        }
    }
}
