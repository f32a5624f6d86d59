use crate::config::SourceSettings;
use crate::math::{cos_pi, sin_pi};

// Per-scanline phase state for one timing profile. Carrier tables are built
// once per phase state at construction; the running phase only ever advances
// by integer arithmetic modulo the phase-state count.
#[derive(Debug, Clone)]
pub struct SignalContext {
    settings: SourceSettings,
    output_texel_count: usize,
    sin_tables: Vec<Vec<f32>>,
    cos_tables: Vec<Vec<f32>>,
    frame_start_phase: u32,
    line_phase: u32,
    scanline_index: u32,
    is_even_frame: bool,
}

impl SignalContext {
    pub fn new(settings: SourceSettings, input_pixel_count: usize) -> SignalContext {
        assert!(settings.denominator > 0, "phase-state count must be nonzero");
        assert!(settings.output_oversample > 0, "oversample factor must be nonzero");

        let output_texel_count = input_pixel_count * settings.output_oversample as usize;
        let phase_state_count = settings.denominator as usize;
        let texel_phase_increment = settings.color_cycles_per_output_texel();

        let mut sin_tables = Vec::with_capacity(phase_state_count);
        let mut cos_tables = Vec::with_capacity(phase_state_count);
        for state in 0..phase_state_count {
            let mut sin_table = vec![0.0f32; output_texel_count];
            let mut cos_table = vec![0.0f32; output_texel_count];
            let base = state as f32 / settings.denominator as f32;
            for x in 0..output_texel_count {
                let phase = base + x as f32 * texel_phase_increment;
                sin_table[x] = sin_pi(2.0 * phase);
                cos_table[x] = cos_pi(2.0 * phase);
            }
            sin_tables.push(sin_table);
            cos_tables.push(cos_table);
        }

        let initial = settings.initial_frame_phase % settings.denominator;
        SignalContext {
            settings,
            output_texel_count,
            sin_tables,
            cos_tables,
            frame_start_phase: initial,
            line_phase: initial,
            scanline_index: 0,
            is_even_frame: false,
        }
    }

    // Pin an explicit phase state, or advance by the configured per-frame
    // increment (alternating even/odd deltas).
    pub fn start_frame(&mut self, phase_index: Option<u32>) {
        let denominator = self.settings.denominator;
        match phase_index {
            Some(index) => {
                self.frame_start_phase = index % denominator;
            }
            None => {
                self.is_even_frame = !self.is_even_frame;
                let increment = if self.is_even_frame {
                    self.settings.phase_increment_per_even_frame
                } else {
                    self.settings.phase_increment_per_odd_frame
                };
                self.frame_start_phase = (self.frame_start_phase + increment) % denominator;
            }
        }

        self.line_phase = self.frame_start_phase;
        self.scanline_index = 0;
    }

    pub fn end_scanline(&mut self) {
        let denominator = self.settings.denominator;
        self.line_phase = (self.line_phase + self.settings.phase_increment_per_line) % denominator;
        self.scanline_index = (self.scanline_index + 1) % denominator;
    }

    pub fn output_texel_count(&self) -> usize {
        self.output_texel_count
    }

    pub fn phase_index(&self) -> u32 {
        self.line_phase
    }

    pub fn scanline_index(&self) -> u32 {
        self.scanline_index
    }

    pub fn settings(&self) -> &SourceSettings {
        &self.settings
    }

    pub fn sin_table(&self) -> &[f32] {
        &self.sin_tables[self.line_phase as usize]
    }

    pub fn cos_table(&self) -> &[f32] {
        &self.cos_tables[self.line_phase as usize]
    }
}
