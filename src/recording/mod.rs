pub mod session;

pub use session::{Recording, RecordingSession};
