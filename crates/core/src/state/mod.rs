pub mod selection;
pub mod store;

pub use selection::{GameType, RadiusExtent, SelectionChange, SelectionState};
pub use store::{ListenerId, SelectionListener, SelectionStore};
