pub mod catalog;
pub mod definition;
pub mod ledger;
pub mod runner;
pub mod submission;

pub use catalog::*;
pub use definition::*;
pub use ledger::*;
pub use runner::*;
pub use submission::*;
