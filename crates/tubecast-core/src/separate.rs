use crate::config::{SeparatorKind, SourceSettings};
use crate::context::SignalContext;
use crate::fir::FirFilter;

// NTSC colorburst frequency in MHz; used to scale the band-pass skirts.
const COLOR_BURST_FREQUENCY: f32 = 3.579545;

enum SeparatorImpl {
    // Old-TV style: a luma low-pass and a chroma band-pass. Blurrier than a
    // comb filter, with the ringing cheap sets showed.
    LowBandPass {
        luma_filter: FirFilter,
        chroma_filter: FirFilter,
    },
    RollingAverage {
        window: Vec<f32>,
    },
}

// Splits a composite signal back into luma and chroma.
pub struct YcSeparator {
    implementation: SeparatorImpl,
}

impl YcSeparator {
    pub fn new(kind: SeparatorKind, settings: &SourceSettings) -> YcSeparator {
        let cycles_per_texel = settings.color_cycles_per_output_texel();

        let implementation = match kind {
            SeparatorKind::LowBandPass => {
                let luma_filter = FirFilter::low_pass(cycles_per_texel);
                let chroma_filter = FirFilter::convolve(
                    &FirFilter::high_pass_from_band(
                        cycles_per_texel,
                        2.5 * cycles_per_texel / COLOR_BURST_FREQUENCY,
                    ),
                    &FirFilter::low_pass_from_band(
                        cycles_per_texel,
                        6.0 * cycles_per_texel / COLOR_BURST_FREQUENCY,
                    ),
                );
                SeparatorImpl::LowBandPass {
                    luma_filter,
                    chroma_filter,
                }
            }
            SeparatorKind::RollingAverage => {
                let window_size = (1.0 / cycles_per_texel).round().max(1.0) as usize;
                SeparatorImpl::RollingAverage {
                    window: vec![0.0; window_size],
                }
            }
        };

        YcSeparator { implementation }
    }

    pub fn separate(
        &mut self,
        context: &SignalContext,
        composite_in: &[f32],
        luma_out: &mut [f32],
        chroma_out: &mut [f32],
    ) {
        let count = context.output_texel_count();
        assert!(composite_in.len() >= count);
        assert!(luma_out.len() >= count);
        assert!(chroma_out.len() >= count);

        match &mut self.implementation {
            SeparatorImpl::LowBandPass {
                luma_filter,
                chroma_filter,
            } => {
                luma_filter.process(&composite_in[..count], luma_out);
                chroma_filter.process(&composite_in[..count], chroma_out);
            }
            SeparatorImpl::RollingAverage { window } => {
                // Prime with the first sample; a zero-filled window would
                // understate luma at the left edge and leak the difference
                // into chroma.
                let size = window.len();
                window.fill(composite_in[0]);
                let mut sum = composite_in[0] * size as f32;
                let mut next_index = 0usize;

                // Centered window: the write cursor leads the read position by
                // half the window so the mean stays sample-aligned.
                for x in 0..count {
                    sum -= window[next_index];
                    window[next_index] = composite_in[(x + size / 2).min(count - 1)];
                    sum += window[next_index];

                    let luma = sum / size as f32;
                    luma_out[x] = luma;
                    chroma_out[x] = composite_in[x] - luma;
                    next_index = (next_index + 1) % size;
                }
            }
        }
    }
}
