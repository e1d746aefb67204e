//! Interactive time-series graphs: rendering, pan/zoom/hover interaction and
//! the refresh protocol that keeps every graph on a page in sync.

pub mod action;
pub mod hover;
pub mod interaction;
pub mod lazy;
pub mod logger;
pub mod page;
pub mod render;
pub mod session;
pub mod style;
pub mod update;
pub mod widget;

pub use action::{ClickHandlers, ClickOutcome};
pub use interaction::{Event, Pointer, Target};
pub use page::{Action, Message, Page};
pub use render::Scene;
pub use session::{GraphSession, GraphStatus, PointerState};
pub use style::GraphStyle;
pub use update::{Change, Effect, SyncJob};
pub use widget::GraphCanvas;
