//! Test doubles for the transport seams.
//!
//! Compiled only with the `testkit` feature, which the crate's own
//! dev-dependency enables; production builds never see these.

mod stream;
mod transport;

pub use stream::ScriptedFrames;
pub use transport::MockTransport;
