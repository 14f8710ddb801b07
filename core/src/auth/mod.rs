pub mod gate;

pub use gate::{AuthSession, Credentials, GateState, SessionGate, DEFAULT_SESSION_TTL_HOURS};
