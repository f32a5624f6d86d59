use crate::config::{DemodFilter, KnobSettings, SignalLevels, SourceSettings};
use crate::context::SignalContext;
use crate::fir::FirFilter;
use crate::iir::IirFilter;
use crate::math::{cos_pi, sin_pi};

enum DemodImpl {
    Iir(IirFilter),
    Fir(FirFilter),
    RollingAverage { window: Vec<f32> },
}

// QAM demodulation of a separated luma/chroma pair back to packed 32-bit RGB.
pub struct SignalDecoder {
    demodulate_filter: DemodImpl,
    output_texel_count: usize,
    oversample: usize,
    q_data: Vec<f32>,
    i_data: Vec<f32>,
    scratch: Vec<f32>,
    rgb: Vec<f32>,
    rgb_scratch: Vec<f32>,
    last_hue: f32,
    cos_hue: f32,
    sin_hue: f32,
}

impl SignalDecoder {
    pub fn new(
        settings: &SourceSettings,
        input_pixel_count: usize,
        filter: DemodFilter,
    ) -> SignalDecoder {
        let cycles_per_texel = settings.color_cycles_per_output_texel();
        let output_texel_count = input_pixel_count * settings.output_oversample as usize;

        let demodulate_filter = match filter {
            // Latency is measured at design time; process() compensates so the
            // three paths address the same samples.
            DemodFilter::Iir => DemodImpl::Iir(IirFilter::low_pass(3, 1.2 * cycles_per_texel)),
            DemodFilter::Fir => DemodImpl::Fir(FirFilter::low_pass_from_band(
                1.5 * cycles_per_texel,
                2.0 * cycles_per_texel,
            )),
            DemodFilter::RollingAverage => {
                let window_size = (1.0 / cycles_per_texel).round().max(1.0) as usize;
                DemodImpl::RollingAverage {
                    window: vec![0.0; window_size],
                }
            }
        };

        SignalDecoder {
            demodulate_filter,
            output_texel_count,
            oversample: settings.output_oversample as usize,
            q_data: vec![0.0; output_texel_count],
            i_data: vec![0.0; output_texel_count],
            scratch: vec![0.0; output_texel_count],
            rgb: vec![0.0; output_texel_count * 3],
            rgb_scratch: vec![0.0; output_texel_count * 3],
            last_hue: 0.0,
            cos_hue: 1.0,
            sin_hue: 0.0,
        }
    }

    pub fn decode_scanline(
        &mut self,
        context: &SignalContext,
        luma_signal: &[f32],
        chroma_signal: &[f32],
        levels: &SignalLevels,
        knobs: &KnobSettings,
        rgb_out: &mut [u32],
    ) {
        let count = self.output_texel_count;
        assert!(count == context.output_texel_count());
        assert!(luma_signal.len() >= count);
        assert!(chroma_signal.len() >= count);
        assert!(rgb_out.len() >= count, "decoded scanline buffer too short");
        assert!(
            levels.white_level > levels.black_level,
            "signal levels inverted: white {} <= black {}",
            levels.white_level,
            levels.black_level
        );

        if knobs.hue != self.last_hue {
            self.last_hue = knobs.hue;
            self.cos_hue = cos_pi(knobs.hue);
            self.sin_hue = sin_pi(knobs.hue);
        }

        let sin_table = context.sin_table();
        let cos_table = context.cos_table();

        // The chroma wave is QAM: two carriers 90 degrees apart. Multiply by
        // the in-phase carrier (hue folded in through the angle-sum identity)
        // and low-pass to recover each component.
        for x in 0..count {
            let cos = cos_table[x] * self.cos_hue - sin_table[x] * self.sin_hue;
            self.scratch[x] = chroma_signal[x] * cos;
        }
        Self::run_demod_filter(&mut self.demodulate_filter, &self.scratch[..count], &mut self.q_data);

        for x in 0..count {
            let sin = sin_table[x] * self.cos_hue + cos_table[x] * self.sin_hue;
            self.scratch[x] = chroma_signal[x] * -sin;
        }
        Self::run_demod_filter(&mut self.demodulate_filter, &self.scratch[..count], &mut self.i_data);

        let saturation =
            2.0 * knobs.saturation.max(0.0) * levels.saturation_scale;
        let brightness = knobs.brightness.max(0.0);
        let level_scale = 1.0 / (levels.white_level - levels.black_level);

        for x in 0..count {
            let y = (luma_signal[x] - levels.black_level) * level_scale * brightness;
            let i = self.i_data[x] * saturation;
            let q = self.q_data[x] * saturation;

            self.rgb[x * 3] = y + i * 0.946882 + q * 0.623557;
            self.rgb[x * 3 + 1] = y - i * 0.274788 - q * 0.635691;
            self.rgb[x * 3 + 2] = y - i * 1.108545 + q * 1.7090047;
        }

        if knobs.sharpness != 0.0 {
            self.apply_sharpness(knobs.sharpness.clamp(-1.0, 1.0));
        }

        for x in 0..count {
            let r = (self.rgb[x * 3] * 255.0).clamp(0.0, 255.0).floor() as u32;
            let g = (self.rgb[x * 3 + 1] * 255.0).clamp(0.0, 255.0).floor() as u32;
            let b = (self.rgb[x * 3 + 2] * 255.0).clamp(0.0, 255.0).floor() as u32;
            rgb_out[x] = 0xff00_0000 | r | (g << 8) | (b << 16);
        }
    }

    // Modulation-free path: each input pixel replicated across its oversampled
    // texels, untouched.
    pub fn decode_rgb_passthrough(&self, pixels: &[u32], rgb_out: &mut [u32]) {
        assert!(
            pixels.len() * self.oversample == self.output_texel_count,
            "input scanline length does not match the timing profile"
        );
        assert!(rgb_out.len() >= self.output_texel_count);

        for (x, &pixel) in pixels.iter().enumerate() {
            for s in 0..self.oversample {
                rgb_out[x * self.oversample + s] = pixel | 0xff00_0000;
            }
        }
    }

    fn run_demod_filter(filter: &mut DemodImpl, signal: &[f32], out: &mut Vec<f32>) {
        match filter {
            DemodImpl::Iir(iir) => {
                // Scanlines are independent from a history standpoint, as are
                // the two demodulations.
                iir.reset_history();
                iir.process(signal, out);
            }
            DemodImpl::Fir(fir) => {
                fir.process(signal, out);
            }
            DemodImpl::RollingAverage { window } => {
                window.fill(0.0);
                let size = window.len();
                let count = signal.len();
                let mut sum = 0.0f32;
                let mut next_index = 0usize;
                for x in 0..count {
                    sum -= window[next_index];
                    window[next_index] = signal[(x + size / 2).min(count - 1)];
                    sum += window[next_index];
                    out[x] = sum / size as f32;
                    next_index = (next_index + 1) % size;
                }
            }
        }
    }

    // 3-tap sharpen/blur straddling the oversample stride: center * c plus
    // both neighbors * s, with c = 1 - 2s.
    fn apply_sharpness(&mut self, sharpness: f32) {
        let count = self.output_texel_count;
        let blur_side = -sharpness / 3.0;
        let center = 1.0 - 2.0 * blur_side;
        let step = self.oversample;

        std::mem::swap(&mut self.rgb, &mut self.rgb_scratch);
        let source = &self.rgb_scratch;
        let dest = &mut self.rgb;

        for x in 0..step.min(count) {
            for channel in 0..3 {
                let mut value = source[x * 3 + channel] * center;
                if x + step < count {
                    value += source[(x + step) * 3 + channel] * blur_side;
                }
                dest[x * 3 + channel] = value;
            }
        }

        for x in step..count.saturating_sub(step) {
            for channel in 0..3 {
                dest[x * 3 + channel] = source[x * 3 + channel] * center
                    + source[(x - step) * 3 + channel] * blur_side
                    + source[(x + step) * 3 + channel] * blur_side;
            }
        }

        for x in count.saturating_sub(step).max(step)..count {
            for channel in 0..3 {
                dest[x * 3 + channel] = source[x * 3 + channel] * center
                    + source[(x - step) * 3 + channel] * blur_side;
            }
        }
    }
}
