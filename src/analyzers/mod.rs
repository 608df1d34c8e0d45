pub mod semaphore;

pub use semaphore::{classify, MigrabilityTotals, Semaphore};
