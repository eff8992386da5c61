//! Domain layer: the event record and the newest-first display list.
//!
//! Nothing in here touches the network. Frames arrive as text, are turned
//! into [`Event`]s by [`decode_event`], and accumulate in an [`EventList`].

pub mod event;
pub mod event_list;

pub use event::{Event, EventDate, decode_event};
pub use event_list::EventList;
