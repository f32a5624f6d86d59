use wide::f32x8;

use crate::math::{cos_pi, sinc_pi};

pub const LANES: usize = 8;

// Approximate transition bandwidth of a Blackman-windowed sinc: 4.6 / length.
const BLACKMAN_BANDWIDTH: f32 = 4.6;

#[derive(Debug, Clone)]
pub struct FirFilter {
    // Zero-padded with one lane group on each side so the vectorized path can
    // read whole lane groups without bounds checks.
    coefficients: Vec<f32>,
    len: usize,
}

enum LobeVerdict {
    TooShort,
    TooLong,
    JustRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchDirection {
    Growing,
    Shrinking,
}

impl FirFilter {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn taps(&self) -> &[f32] {
        &self.coefficients[LANES..LANES + self.len]
    }

    fn with_taps(len: usize) -> FirFilter {
        FirFilter {
            coefficients: vec![0.0; len + 2 * LANES],
            len,
        }
    }

    pub fn from_rolloff_center_and_length(rolloff_center: f32, length: usize) -> FirFilter {
        Self::from_rolloff_center_and_length_windowed(rolloff_center, length, true)
    }

    fn from_rolloff_center_and_length_windowed(
        rolloff_center: f32,
        length: usize,
        use_window: bool,
    ) -> FirFilter {
        assert!(length & 1 != 0, "windowed-sinc filter length must be odd");
        let mut f = Self::with_taps(length);

        // Windowed sinc: h[n] = sinc_pi(center * (2n - (length - 1))) * blackman(n).
        // The usual 2*cutoff scale is dropped since we renormalize to unit DC gain.
        let mut sum = 0.0f32;
        for i in 0..length {
            let mut result = sinc_pi(rolloff_center * (2.0 * i as f32 - (length - 1) as f32));
            if use_window {
                result *= 0.42 - 0.5 * cos_pi(2.0 * i as f32 / (length - 1) as f32)
                    + 0.08 * cos_pi(4.0 * i as f32 / (length - 1) as f32);
            }
            sum += result;
            f.coefficients[i + LANES] = result;
        }

        for i in 0..length {
            f.coefficients[i + LANES] /= sum;
        }

        f
    }

    pub fn low_pass_from_end_and_length(rolloff_end: f32, length: usize) -> FirFilter {
        let bandwidth = BLACKMAN_BANDWIDTH / length as f32;
        Self::from_rolloff_center_and_length_windowed(rolloff_end - bandwidth * 0.5, length, true)
    }

    pub fn low_pass_from_band(rolloff_start: f32, rolloff_end: f32) -> FirFilter {
        assert!(
            rolloff_start < rolloff_end,
            "low-pass band edges inverted: {rolloff_start} >= {rolloff_end}"
        );
        let center = (rolloff_start + rolloff_end) * 0.5;
        let bandwidth = rolloff_end - rolloff_start;
        let length = (BLACKMAN_BANDWIDTH / bandwidth).ceil() as usize | 1;
        Self::from_rolloff_center_and_length(center, length)
    }

    // Adaptive single-argument design: search for the length whose impulse
    // response cuts off just past the second negative lobe. Greedy grow/shrink
    // with no proven iteration bound for rolloffs near 0 or 1.
    pub fn low_pass(rolloff_end: f32) -> FirFilter {
        let mut length: i32 = 11;
        let mut prev_guess: Option<i32> = None;
        let mut direction = SearchDirection::Growing;
        let mut ever_shrunk = false;

        loop {
            let f = Self::low_pass_from_end_and_length(rolloff_end, length as usize);

            match f.second_lobe_verdict() {
                LobeVerdict::JustRight => return f,
                LobeVerdict::TooShort => {
                    if direction == SearchDirection::Shrinking {
                        if let Some(prev) = prev_guess {
                            // Reversed direction; the larger of the two wins.
                            return Self::low_pass_from_end_and_length(rolloff_end, prev as usize);
                        }
                    }
                    direction = SearchDirection::Growing;
                    prev_guess = Some(length);
                    length = length * 2 + 1;
                }
                LobeVerdict::TooLong => {
                    if ever_shrunk && direction == SearchDirection::Growing {
                        return f;
                    }
                    ever_shrunk = true;
                    direction = SearchDirection::Shrinking;
                    prev_guess = Some(length);
                    length -= 2;
                }
            }
        }
    }

    fn second_lobe_verdict(&self) -> LobeVerdict {
        let taps = self.taps();
        let center = self.len / 2;

        let mut negative_crossings = 0;
        let mut was_negative = false;
        for i in (0..center).rev() {
            let is_negative = taps[i] < 0.0;
            if is_negative && !was_negative {
                negative_crossings += 1;
            }

            if negative_crossings == 2 && taps[i] > taps[i + 1] {
                // Upswing inside the second negative block.
                if taps[i + 1] > -0.00005 {
                    return LobeVerdict::JustRight;
                }
                return LobeVerdict::TooLong;
            }

            was_negative = is_negative;
        }

        LobeVerdict::TooShort
    }

    pub fn high_pass(rolloff_start: f32) -> FirFilter {
        Self::low_pass(rolloff_start).spectral_invert()
    }

    pub fn high_pass_from_band(rolloff_start: f32, rolloff_end: f32) -> FirFilter {
        assert!(
            rolloff_start > rolloff_end,
            "high-pass band edges inverted: {rolloff_start} <= {rolloff_end}"
        );
        Self::low_pass_from_band(rolloff_end, rolloff_start).spectral_invert()
    }

    // High pass = low pass with the spectrum inverted: negate every tap and add
    // 1.0 at the center.
    fn spectral_invert(mut self) -> FirFilter {
        for i in 0..self.len {
            self.coefficients[i + LANES] = -self.coefficients[i + LANES];
        }
        self.coefficients[(self.len - 1) / 2 + LANES] += 1.0;
        self
    }

    pub fn band_pass(
        lower_stop: f32,
        lower_start: f32,
        upper_start: f32,
        upper_stop: f32,
    ) -> FirFilter {
        Self::convolve(
            &Self::low_pass_from_band(upper_start, upper_stop),
            &Self::high_pass_from_band(lower_start, lower_stop),
        )
    }

    pub fn convolve(a: &FirFilter, b: &FirFilter) -> FirFilter {
        let len = a.len + b.len - 1;
        let mut f = Self::with_taps(len);

        for (ai, &ac) in a.taps().iter().enumerate() {
            for (bi, &bc) in b.taps().iter().enumerate() {
                f.coefficients[ai + bi + LANES] += ac * bc;
            }
        }

        f
    }

    pub fn process(&self, values_in: &[f32], values_out: &mut [f32]) {
        assert!(
            values_out.len() >= values_in.len(),
            "FIR output buffer shorter than input"
        );
        self.process_wide(values_in, values_out);
    }

    pub fn process_scalar(&self, values_in: &[f32], values_out: &mut [f32]) {
        assert!(
            values_out.len() >= values_in.len(),
            "FIR output buffer shorter than input"
        );
        for i in 0..values_in.len() {
            values_out[i] = self.process_one_element(values_in, i);
        }
    }

    // Single output sample; input is implicitly zero before index 0 and past
    // the end.
    pub fn process_one_element(&self, values: &[f32], center_input_index: usize) -> f32 {
        let taps = self.taps();
        let half_length = (self.len - 1) / 2;

        let (start_array_index, start_filter_index) = if center_input_index < half_length {
            (0, half_length - center_input_index)
        } else {
            (center_input_index - half_length, 0)
        };

        let end_array_index = values.len().min(center_input_index + half_length + 1);
        let count = end_array_index - start_array_index;
        assert!(count <= self.len);

        let mut result = 0.0f32;
        for i in 0..count {
            result += values[i + start_array_index] * taps[i + start_filter_index];
        }
        result
    }

    // Vectorized shift-and-accumulate: eight outputs per step, each coefficient
    // broadcast once and multiply-added against the correspondingly shifted
    // input window. Matches the scalar path up to FMA rounding.
    fn process_wide(&self, values_in: &[f32], values_out: &mut [f32]) {
        let taps = self.taps();
        let half_length = (self.len - 1) / 2;

        let mut padded = vec![0.0f32; values_in.len() + self.len + LANES];
        padded[half_length..half_length + values_in.len()].copy_from_slice(values_in);

        let full_blocks = values_in.len() / LANES;
        for block in 0..full_blocks {
            let base = block * LANES;
            let mut accumulator = f32x8::ZERO;
            for (j, &coefficient) in taps.iter().enumerate() {
                let window: [f32; LANES] = padded[base + j..base + j + LANES]
                    .try_into()
                    .unwrap();
                accumulator = f32x8::splat(coefficient).mul_add(f32x8::from(window), accumulator);
            }
            values_out[base..base + LANES].copy_from_slice(&accumulator.to_array());
        }

        for i in full_blocks * LANES..values_in.len() {
            values_out[i] = self.process_one_element(values_in, i);
        }
    }
}
