pub mod classifier;
pub mod defaults;
pub mod engine;
pub mod host;
pub mod linter;
pub mod parser;
pub mod types;

pub use classifier::DomainClassifier;
pub use engine::{Handled, NavigationPolicy};
pub use host::{BrowserView, ExternalOpener, OpenError, RecordingHost};
pub use types::*;
