pub mod types;
pub mod parser;
pub mod processor;

// Re-export the main API for easier access
pub use types::{Scan, WifiRecord};
pub use parser::ScanParser;
pub use processor::ScanProcessor;
