//! Events module - domain events and the sink observers implement.

mod domain_event;
mod sink;

pub use domain_event::DomainEvent;
pub use sink::{DomainEventSink, MockDomainEventSink, NoOpDomainEventSink};
