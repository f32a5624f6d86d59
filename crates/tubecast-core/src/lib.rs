pub mod config;
pub mod context;
pub mod decoder;
pub mod encoder;
pub mod fir;
pub mod iir;
pub mod math;
pub mod pipeline;
pub mod separate;

pub use config::{
    ArtifactSettings, DemodFilter, KnobSettings, PipelineConfig, SeparatorKind, SignalLevels,
    SignalType, SourceSettings,
};
pub use context::SignalContext;
pub use decoder::SignalDecoder;
pub use encoder::Encoder;
pub use fir::FirFilter;
pub use iir::IirFilter;
pub use pipeline::{Frame, Pipeline};
pub use separate::YcSeparator;
