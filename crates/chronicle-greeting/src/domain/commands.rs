//! Commands for the greeting context.

use chronicle_core::identity::VersionedId;
use chronicle_core::message::Message;
use uuid::Uuid;

/// Command to create a new greeter.
#[derive(Debug, Clone)]
pub struct CreateGreeter {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Identifier the new greeter is created under.
    pub greeter_id: Uuid,
    /// The greeter's name.
    pub name: String,
}

impl Message for CreateGreeter {
    fn message_type(&self) -> &'static str {
        "greeting.create_greeter"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command asking a greeter to greet someone.
///
/// `greeter` carries the version the caller last saw; the command is
/// rejected if the greeter has moved on since.
#[derive(Debug, Clone)]
pub struct GreetPerson {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The greeter, at the version the caller expects.
    pub greeter: VersionedId,
    /// Who to greet.
    pub person: String,
}

impl Message for GreetPerson {
    fn message_type(&self) -> &'static str {
        "greeting.greet_person"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
