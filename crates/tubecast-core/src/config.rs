use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalType {
    // Perfect RGB end to end.
    Rgb,
    // Luma and chroma stay separate: chroma modulation artifacts without
    // channel mixing artifacts.
    SVideo,
    // Luma and chroma are summed into one signal and need a separation pass,
    // which introduces channel mixing artifacts.
    Composite,
}

impl Default for SignalType {
    fn default() -> Self {
        Self::Composite
    }
}

// Rational timing descriptor of the machine generating the signal. All phase
// values are integer fractions over `denominator`, so phase bookkeeping never
// accumulates floating-point error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSettings {
    // Common denominator of all phase values; also the phase-state count.
    pub denominator: u32,
    // Cycles of the color carrier per input pixel, usually <= 1.
    pub color_cycles_per_input_pixel: u32,
    // Output texels per input pixel.
    pub output_oversample: u32,
    // Fraction of the color cycle the first line of the first frame starts at.
    pub initial_frame_phase: u32,
    // Fraction of the color cycle the phase increments every scanline.
    pub phase_increment_per_line: u32,
    // Frame-to-frame phase deltas, split into even and odd frames.
    pub phase_increment_per_even_frame: u32,
    pub phase_increment_per_odd_frame: u32,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self::nes()
    }
}

impl SourceSettings {
    pub fn nes() -> SourceSettings {
        SourceSettings {
            denominator: 3,
            // 2/3rds of a color cycle per pixel: 33% more horizontal
            // resolution than the color signal can represent.
            color_cycles_per_input_pixel: 2,
            output_oversample: 4,
            initial_frame_phase: 0,
            phase_increment_per_line: 1,
            phase_increment_per_even_frame: 2,
            phase_increment_per_odd_frame: 1,
        }
    }

    pub fn snes_512() -> SourceSettings {
        SourceSettings {
            denominator: 3,
            color_cycles_per_input_pixel: 1,
            output_oversample: 4,
            initial_frame_phase: 0,
            phase_increment_per_line: 1,
            phase_increment_per_even_frame: 2,
            phase_increment_per_odd_frame: 1,
        }
    }

    pub fn pc_composite_320() -> SourceSettings {
        SourceSettings {
            denominator: 2,
            color_cycles_per_input_pixel: 1,
            output_oversample: 4,
            initial_frame_phase: 0,
            phase_increment_per_line: 0,
            phase_increment_per_even_frame: 0,
            phase_increment_per_odd_frame: 0,
        }
    }

    pub fn pc_composite_640() -> SourceSettings {
        SourceSettings {
            denominator: 4,
            color_cycles_per_input_pixel: 1,
            output_oversample: 2,
            // Starts halfway into the color cycle.
            initial_frame_phase: 2,
            phase_increment_per_line: 0,
            phase_increment_per_even_frame: 0,
            phase_increment_per_odd_frame: 0,
        }
    }

    pub fn genesis_320() -> SourceSettings {
        SourceSettings {
            denominator: 15,
            // A little more than half a wavelength per pixel: 1.6/3 == 8/15.
            color_cycles_per_input_pixel: 8,
            output_oversample: 2,
            initial_frame_phase: 0,
            phase_increment_per_line: 0,
            phase_increment_per_even_frame: 0,
            phase_increment_per_odd_frame: 0,
        }
    }

    // Color cycles per output texel; filter cutoff math is the one place the
    // rational timing collapses to floating point.
    pub fn color_cycles_per_output_texel(&self) -> f32 {
        self.color_cycles_per_input_pixel as f32
            / (self.denominator as f32 * self.output_oversample as f32)
    }
}

// TV-front-panel knobs. Values are clamped at point of use, never rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KnobSettings {
    // Additional tint applied during demodulation, in half-turns.
    pub hue: f32,
    pub saturation: f32,
    pub brightness: f32,
    // 0 is unfiltered, 1 fully sharpened, -1 fully blurred.
    pub sharpness: f32,
}

impl Default for KnobSettings {
    fn default() -> Self {
        Self {
            hue: 0.0,
            saturation: 1.0,
            brightness: 1.0,
            sharpness: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ArtifactSettings {
    pub noise_strength: f32,
    pub ghost_visibility: f32,
    pub ghost_spread_scale: f32,
    pub ghost_distance: f32,
    pub luma_dither: f32,
    pub temporal_artifact_reduction: f32,
}

impl Default for ArtifactSettings {
    fn default() -> Self {
        Self {
            noise_strength: 0.0,
            ghost_visibility: 0.0,
            ghost_spread_scale: 0.71,
            ghost_distance: 3.1,
            luma_dither: 0.0,
            temporal_artifact_reduction: 0.0,
        }
    }
}

// Per-frame levels handed from the encoder to the decoder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SignalLevels {
    pub black_level: f32,
    pub white_level: f32,
    pub saturation_scale: f32,
    pub temporal_blend: f32,
}

impl Default for SignalLevels {
    fn default() -> Self {
        Self {
            black_level: 0.0,
            white_level: 1.0,
            saturation_scale: 1.0,
            temporal_blend: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeparatorKind {
    // Luma low-pass + chroma band-pass FIR pair; reproduces cheap-TV ringing.
    LowBandPass,
    // One-color-cycle rolling mean; chroma is the remainder.
    RollingAverage,
}

impl Default for SeparatorKind {
    fn default() -> Self {
        Self::LowBandPass
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemodFilter {
    Iir,
    Fir,
    RollingAverage,
}

impl Default for DemodFilter {
    fn default() -> Self {
        Self::Iir
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub source: SourceSettings,
    pub signal_type: SignalType,
    pub separator: SeparatorKind,
    pub demod_filter: DemodFilter,
    pub knobs: KnobSettings,
    pub artifacts: ArtifactSettings,
}
