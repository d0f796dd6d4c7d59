mod session;

pub use session::{
    BurnoutPolicy, FocusSession, SessionOutcome, SessionState, MICRO_BREAK_MESSAGE,
};
