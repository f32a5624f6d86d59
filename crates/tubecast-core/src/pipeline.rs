use crate::config::{PipelineConfig, SignalType};
use crate::context::SignalContext;
use crate::decoder::SignalDecoder;
use crate::encoder::Encoder;
use crate::separate::YcSeparator;

// A frame of packed 0xAABBGGRR pixels, row-major.
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u32>,
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn from_data(width: usize, height: usize, data: Vec<u32>) -> Self {
        assert!(data.len() == width * height, "pixel buffer size mismatch");
        Self {
            width,
            height,
            data,
        }
    }
}

// Whole-chain state: phase bookkeeping, encoder noise state, and the filters,
// all sized for one frame width. Feed frames of the same width repeatedly to
// get frame-to-frame phase and noise continuity.
pub struct Pipeline {
    config: PipelineConfig,
    context: SignalContext,
    encoder: Encoder,
    separator: YcSeparator,
    decoder: SignalDecoder,
    luma: Vec<f32>,
    chroma: Vec<f32>,
    scratch: Vec<f32>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, frame_width: usize) -> Pipeline {
        let context = SignalContext::new(config.source, frame_width);
        let separator = YcSeparator::new(config.separator, &config.source);
        let decoder = SignalDecoder::new(&config.source, frame_width, config.demod_filter);
        let texel_count = context.output_texel_count();

        Pipeline {
            config,
            context,
            encoder: Encoder::new(),
            separator,
            decoder,
            luma: vec![0.0; texel_count],
            chroma: vec![0.0; texel_count],
            scratch: vec![0.0; texel_count],
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    // Output width for a given input width under the configured oversampling.
    pub fn output_width(&self) -> usize {
        self.context.output_texel_count()
    }

    pub fn process_frame(&mut self, frame: &Frame) -> Frame {
        self.process_frame_with_progress(frame, |_| {})
    }

    pub fn process_frame_with_progress<F>(&mut self, frame: &Frame, mut on_progress: F) -> Frame
    where
        F: FnMut(f32),
    {
        let out_width = self.context.output_texel_count();
        assert!(
            frame.width * self.config.source.output_oversample as usize == out_width,
            "frame width does not match the width this pipeline was built for"
        );

        let mut out = Frame::new(out_width, frame.height);
        let levels = self.encoder.signal_levels(&self.config.artifacts);

        self.context.start_frame(None);
        for y in 0..frame.height {
            let pixels = &frame.data[y * frame.width..(y + 1) * frame.width];
            let rgb_out = &mut out.data[y * out_width..(y + 1) * out_width];

            match self.config.signal_type {
                SignalType::Rgb => {
                    self.decoder.decode_rgb_passthrough(pixels, rgb_out);
                }
                SignalType::SVideo => {
                    self.encoder.process_scanline(
                        &self.context,
                        pixels,
                        &self.config.artifacts,
                        &mut self.luma,
                        &mut self.chroma,
                    );
                    self.decoder.decode_scanline(
                        &self.context,
                        &self.luma,
                        &self.chroma,
                        &levels,
                        &self.config.knobs,
                        rgb_out,
                    );
                }
                SignalType::Composite => {
                    self.encoder.process_scanline_composite(
                        &self.context,
                        pixels,
                        &self.config.artifacts,
                        &mut self.scratch,
                        &mut self.luma,
                    );
                    self.separator.separate(
                        &self.context,
                        &self.scratch,
                        &mut self.luma,
                        &mut self.chroma,
                    );
                    self.decoder.decode_scanline(
                        &self.context,
                        &self.luma,
                        &self.chroma,
                        &levels,
                        &self.config.knobs,
                        rgb_out,
                    );
                }
            }

            self.context.end_scanline();
            on_progress((y + 1) as f32 / frame.height as f32);
        }

        out
    }
}
