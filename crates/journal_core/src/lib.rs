pub mod domain;
pub mod extract;
pub mod insights;
pub mod memory;
pub mod pipeline;
pub mod ports;
pub mod service;

pub use domain::{AnalysisResult, JournalEntry, NewJournalEntry};
pub use insights::{DateGroup, Insights, MoodShare};
pub use memory::InMemoryEntryStore;
pub use pipeline::AnalysisPipeline;
pub use ports::{CompletionService, EntryStore, PortError, PortResult};
pub use service::{EntryMetadata, EntryService};
