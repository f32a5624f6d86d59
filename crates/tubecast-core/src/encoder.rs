use crate::config::{ArtifactSettings, SignalLevels};
use crate::context::SignalContext;

// Wang hash followed by an xorshift, mapped to [0, 1).
fn wang_hash_and_xor_shift(seed: u32) -> f32 {
    let mut seed = (seed ^ 61) ^ (seed >> 16);
    seed = seed.wrapping_mul(9);
    seed ^= seed >> 4;
    seed = seed.wrapping_mul(0x27d4_eb2d);
    seed ^= seed >> 15;

    seed ^= seed << 13;
    seed ^= seed >> 17;
    seed ^= seed << 5;
    (f64::from(seed) * (1.0 / 4294967296.0)) as f32
}

// RGB scanline to luma + QAM-modulated chroma. Noise seeding is an instance
// field so concurrent pipelines stay independent.
#[derive(Debug, Clone)]
pub struct Encoder {
    noise_seed: u32,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Encoder {
        Encoder { noise_seed: 0 }
    }

    pub fn signal_levels(&self, artifacts: &ArtifactSettings) -> SignalLevels {
        SignalLevels {
            black_level: 0.0,
            white_level: 1.0,
            saturation_scale: 1.0,
            temporal_blend: artifacts.temporal_artifact_reduction.clamp(0.0, 1.0),
        }
    }

    // One scanline of packed 0x--BBGGRR pixels into separate luma and chroma
    // signals (the S-Video form).
    pub fn process_scanline(
        &mut self,
        context: &SignalContext,
        pixels: &[u32],
        artifacts: &ArtifactSettings,
        luma_out: &mut [f32],
        chroma_out: &mut [f32],
    ) {
        let oversample = context.settings().output_oversample as usize;
        assert!(
            pixels.len() * oversample == context.output_texel_count(),
            "input scanline length does not match the timing profile"
        );
        assert!(luma_out.len() >= context.output_texel_count());
        assert!(chroma_out.len() >= context.output_texel_count());

        let sin_table = context.sin_table();
        let cos_table = context.cos_table();
        let scanline_seed = self.noise_seed;

        let mut phase_index = 0usize;
        for (x, &abgr) in pixels.iter().enumerate() {
            let r = (abgr & 0x0000_00ff) as f32 / 255.0;
            let g = ((abgr & 0x0000_ff00) >> 8) as f32 / 255.0;
            let b = ((abgr & 0x00ff_0000) >> 16) as f32 / 255.0;

            let mut y = 0.3000 * r + 0.5900 * g + 0.1100 * b;
            let i = 0.5990 * r - 0.2773 * g - 0.3217 * b;
            let q = 0.2130 * r - 0.5251 * g + 0.3121 * b;

            if artifacts.luma_dither != 0.0 {
                y += (wang_hash_and_xor_shift(scanline_seed.wrapping_add(x as u32)) - 0.5)
                    * artifacts.luma_dither
                    * (1.0 / 255.0);
            }

            for _ in 0..oversample {
                luma_out[phase_index] = y;
                chroma_out[phase_index] =
                    -sin_table[phase_index] * i + cos_table[phase_index] * q;
                phase_index += 1;
            }
        }

        if artifacts.noise_strength != 0.0 {
            for x in 0..context.output_texel_count() {
                let pixel_seed = scanline_seed.wrapping_add((x / oversample) as u32);
                luma_out[x] +=
                    (wang_hash_and_xor_shift(pixel_seed) - 0.5) * artifacts.noise_strength;
            }
        }

        self.noise_seed = self.noise_seed.wrapping_add(pixels.len() as u32);
    }

    // Composite form: luma + chroma summed into one signal, with optional
    // ghosting applied to the summed wave.
    pub fn process_scanline_composite(
        &mut self,
        context: &SignalContext,
        pixels: &[u32],
        artifacts: &ArtifactSettings,
        composite_out: &mut [f32],
        scratch: &mut [f32],
    ) {
        self.process_scanline(context, pixels, artifacts, composite_out, scratch);

        let count = context.output_texel_count();
        for x in 0..count {
            composite_out[x] += scratch[x];
        }

        if artifacts.ghost_visibility != 0.0 {
            self.apply_ghost(context, artifacts, composite_out, scratch);
        }
    }

    // A smeared pre-echo of the signal, offset by ghost_distance texels and
    // spread across a short tap run.
    fn apply_ghost(
        &self,
        context: &SignalContext,
        artifacts: &ArtifactSettings,
        composite: &mut [f32],
        scratch: &mut [f32],
    ) {
        let count = context.output_texel_count();
        scratch[..count].copy_from_slice(&composite[..count]);

        let oversample = context.settings().output_oversample as f32;
        let distance = (artifacts.ghost_distance * oversample).round() as isize;
        let spread = (artifacts.ghost_spread_scale.clamp(0.0, 1.0) * oversample)
            .round()
            .max(1.0) as isize;
        let visibility = artifacts.ghost_visibility;

        for x in 0..count as isize {
            let mut echo = 0.0f32;
            for tap in 0..4 {
                let source = x - distance - tap * spread;
                if source >= 0 && (source as usize) < count {
                    echo += scratch[source as usize];
                }
            }
            composite[x as usize] += visibility * echo * 0.25;
        }
    }
}
