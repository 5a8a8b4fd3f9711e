pub mod logging;
pub mod orders;
pub mod reporting;
