//! Asynchronous write path for the product composite system.
//!
//! Writes in event mode are not sent to the leaf services directly. They are
//! wrapped in an [`Event`] and handed to the outbound channel of the entity
//! kind they concern (products, recommendations, reviews). Publishing is
//! fire-and-forget: a send returns once the channel accepted the payload.
//! The consuming side decodes the JSON payloads with an [`EventProcessor`].

pub mod channel;
pub mod error;
pub mod event;
pub mod processor;

pub use channel::{MessageChannel, MessageSinks, MessageSources, MpscChannel, publish};
pub use error::{ChannelError, ProcessingError, Result};
pub use event::{Event, EventType, is_same_event};
pub use processor::{EventHandler, EventProcessor, ProcessorStats};
