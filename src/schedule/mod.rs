//! Deferred work on a virtual clock.
//!
//! Every user-perceptible delay in a round (pair reveal, level-up pause,
//! opponent thinking) is a payload on a `Scheduler`. Hosts drive time
//! forward explicitly, which makes whole rounds reproducible in tests.

mod scheduler;

pub use scheduler::{Scheduler, TimerId};
