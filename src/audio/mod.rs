pub mod buffer;
pub mod capture;
pub mod file;
pub mod playback;

pub use buffer::{write_wav_i16, AudioBuffer};
pub use capture::Microphone;
pub use file::AudioFile;
pub use playback::play;
