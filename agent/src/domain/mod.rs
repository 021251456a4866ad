mod session_state;
mod traits;

pub use session_state::SessionState;
pub use traits::{OrderSink, SendError};
