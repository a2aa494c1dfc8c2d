pub mod error;
pub mod events;

pub use error::{Error, Result, Subject};
pub use events::{
    EventEmitter, Listener, NodeEvent, Property, PropertyValue, SubscriptionId,
};
