//! Convert a UTAU voicebank's oto.ini timing into singing-synthesis
//! training data: quantized UST scores, paired phoneme labels, copied
//! audio, per-model placement folders, and train/eval/dev split lists.

pub mod config;
pub mod error;
pub mod label;
pub mod lists;
pub mod oto;
pub mod pipeline;
pub mod pitch;
pub mod place;
pub mod score;
pub mod table;

pub use config::{ConvertConfig, ResolvedConfig};
pub use error::ConvertError;
pub use label::{Label, PhonemeSegment};
pub use pipeline::{ConvertSummary, RecordingFailure};
pub use score::{Note, Score};
pub use table::PhonemeTable;
