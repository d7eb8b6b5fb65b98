pub mod descriptors;
pub mod event;
pub mod loader;
pub mod record;

pub use event::{WatchEvent, WatchEventKind};
pub use record::{MedicalImageRecord, RecordKey};
