pub mod dilution;
pub mod sentinel;
pub mod statistics;
pub mod summary;
pub mod system;

pub use dilution::{compute_dilution, DilutionError, DilutionResult};
pub use summary::{summarize, DilutionSummary};
pub use system::process_record;
