//! Interview session state machine
//!
//! Elm-style: a pure `transition` returns the next session and a list of
//! effects; the runtime executes the effects and feeds results back in.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::Event;
pub use state::{Session, SessionSnapshot, SessionState};
pub use transition::{transition, ErrorContext, TransitionError};
