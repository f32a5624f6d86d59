use std::f64::consts::PI;

use num_complex::Complex64;

// One biquad stage; a0 is implicitly 1.0.
#[derive(Debug, Clone, Copy)]
pub struct Sos {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

#[derive(Debug, Clone)]
struct SosStage {
    coefficients: Sos,
    z1: f64,
    z2: f64,
}

impl SosStage {
    fn new(coefficients: Sos) -> SosStage {
        SosStage {
            coefficients,
            z1: 0.0,
            z2: 0.0,
        }
    }

    fn process(&mut self, input: f64) -> f64 {
        let c = &self.coefficients;
        let out = input * c.b0 + self.z1;
        self.z1 = input * c.b1 - c.a1 * out + self.z2;
        self.z2 = input * c.b2 - c.a2 * out;
        out
    }

    fn reset_history(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterKind {
    LowPass,
    HighPass,
    BandPass,
    BandStop,
}

#[derive(Debug, Clone)]
pub struct IirFilter {
    stages: Vec<SosStage>,
    latency: usize,
}

impl IirFilter {
    pub fn low_pass(order: u32, normalized_freq: f32) -> IirFilter {
        Self::design(order, normalized_freq, normalized_freq, FilterKind::LowPass)
    }

    pub fn high_pass(order: u32, normalized_freq: f32) -> IirFilter {
        Self::design(order, normalized_freq, normalized_freq, FilterKind::HighPass)
    }

    pub fn band_pass(order: u32, normalized_freq1: f32, normalized_freq2: f32) -> IirFilter {
        Self::design(order, normalized_freq1, normalized_freq2, FilterKind::BandPass)
    }

    pub fn band_stop(order: u32, normalized_freq1: f32, normalized_freq2: f32) -> IirFilter {
        Self::design(order, normalized_freq1, normalized_freq2, FilterKind::BandStop)
    }

    pub fn latency(&self) -> usize {
        self.latency
    }

    pub fn sections(&self) -> impl Iterator<Item = &Sos> {
        self.stages.iter().map(|stage| &stage.coefficients)
    }

    pub fn reset_history(&mut self) {
        for stage in &mut self.stages {
            stage.reset_history();
        }
    }

    pub fn append(&mut self, other: &IirFilter) -> &mut IirFilter {
        self.stages.extend(other.stages.iter().cloned());
        self
    }

    pub fn process_sample(&mut self, input: f64) -> f64 {
        let mut result = input;
        for stage in &mut self.stages {
            result = stage.process(result);
        }
        result
    }

    // Slice processing with latency compensation: the measured startup delay is
    // consumed up front so the output stays sample-aligned with zero-latency
    // (FIR and rolling-average) paths.
    pub fn process(&mut self, samples_in: &[f32], samples_out: &mut [f32]) {
        assert!(
            samples_out.len() >= samples_in.len(),
            "IIR output buffer shorter than input"
        );
        let latency = self.latency.min(samples_in.len());

        for &sample in &samples_in[..latency] {
            self.process_sample(f64::from(sample));
        }
        for i in 0..samples_in.len() - latency {
            samples_out[i] = self.process_sample(f64::from(samples_in[i + latency])) as f32;
        }
        for i in 0..latency {
            samples_out[samples_in.len() - latency + i] = self.process_sample(0.0) as f32;
        }
    }

    // Impulse-test the cascade and record where the peak lands over the next
    // 100 samples.
    pub fn measure_latency(&mut self) -> usize {
        let mut max_output = self.process_sample(1.0);
        self.latency = 0;

        for i in 0..100 {
            let output = self.process_sample(0.0);
            if output > max_output {
                max_output = output;
                self.latency = i + 1;
            }
        }

        self.latency
    }

    // Magnitude of the frequency response at a normalized frequency (0 = DC,
    // 1 = Nyquist).
    pub fn magnitude_at(&self, normalized_freq: f64) -> f64 {
        let z_inv = Complex64::from_polar(1.0, -PI * normalized_freq);
        let mut response = Complex64::new(1.0, 0.0);
        for c in self.sections() {
            let numerator = Complex64::new(c.b0, 0.0) + (c.b1 + c.b2 * z_inv) * z_inv;
            let denominator = Complex64::new(1.0, 0.0) + (c.a1 + c.a2 * z_inv) * z_inv;
            response = response * numerator / denominator;
        }
        response.norm()
    }

    fn design(order: u32, normalized_freq1: f32, normalized_freq2: f32, kind: FilterKind) -> IirFilter {
        assert!(order >= 1, "Butterworth order must be at least 1");

        // Pre-warp for the analog -> digital conversion.
        let mut freq1 = 2.0 * (PI * f64::from(normalized_freq1) / 2.0).tan();
        let mut freq2 = 2.0 * (PI * f64::from(normalized_freq2) / 2.0).tan();
        if freq2 < freq1 {
            std::mem::swap(&mut freq1, &mut freq2);
        }

        let mut center_freq = freq1;

        // Butterworth: N poles on the left half of the s-plane unit circle, no
        // zeros. Each entry in pole_pairs implies its conjugate.
        let mut zeros: Vec<Complex64> = Vec::new();
        let mut pole_pairs: Vec<Complex64> = Vec::new();

        let mut has_odd_pole = order & 1 != 0;
        let mut odd_pole = Complex64::new(-1.0, 0.0);

        for i in (1..order).step_by(2) {
            let angle = PI * (f64::from(i) / f64::from(2 * order) + 0.5);
            pole_pairs.push(Complex64::from_polar(1.0, angle));
        }

        let mut gain = 1.0f64;

        match kind {
            FilterKind::LowPass => {
                for pole in &mut pole_pairs {
                    *pole *= center_freq;
                }
                if has_odd_pole {
                    odd_pole *= center_freq;
                }
                gain = center_freq.powi(order as i32);
            }

            FilterKind::HighPass => {
                // Flip each pole through the cutoff; one zero at the origin per
                // pole.
                for pole in &mut pole_pairs {
                    *pole = Complex64::new(center_freq, 0.0) / *pole;
                    zeros.push(Complex64::new(0.0, 0.0));
                    zeros.push(Complex64::new(0.0, 0.0));
                }
                if has_odd_pole {
                    odd_pole = Complex64::new(center_freq, 0.0) / odd_pole;
                    zeros.push(Complex64::new(0.0, 0.0));
                }
            }

            FilterKind::BandPass => {
                center_freq = (freq1 * freq2).sqrt();
                let bandwidth = freq2 - freq1;

                // Each pole splits into a new conjugate pair, doubling order.
                let orig_pole_pairs = std::mem::take(&mut pole_pairs);
                for pole in orig_pole_pairs {
                    let a = 0.5 * pole * bandwidth;
                    let b = 0.5
                        * (bandwidth * bandwidth * (pole * pole)
                            - Complex64::new(4.0 * center_freq * center_freq, 0.0))
                        .sqrt();
                    pole_pairs.push(a + b);
                    pole_pairs.push(a - b);
                }

                if has_odd_pole {
                    let a = 0.5 * bandwidth * odd_pole;
                    let b = 0.5
                        * (bandwidth * bandwidth * (odd_pole * odd_pole)
                            - Complex64::new(4.0 * center_freq * center_freq, 0.0))
                        .sqrt();
                    pole_pairs.push(a + b);
                    has_odd_pole = false;
                }

                for _ in 0..order {
                    zeros.push(Complex64::new(0.0, 0.0));
                }

                gain = (freq2 - freq1).powi(order as i32);
            }

            FilterKind::BandStop => {
                // Same splitting as band pass with the pole multiply swapped
                // for a divide.
                center_freq = (freq1 * freq2).sqrt();
                let bandwidth = freq2 - freq1;

                let orig_pole_pairs = std::mem::take(&mut pole_pairs);
                for pole in orig_pole_pairs {
                    let a = 0.5 * bandwidth / pole;
                    let b = 0.5
                        * (bandwidth * bandwidth / (pole * pole)
                            - Complex64::new(4.0 * center_freq * center_freq, 0.0))
                        .sqrt();
                    pole_pairs.push(a + b);
                    pole_pairs.push(a - b);
                }

                if has_odd_pole {
                    let a = 0.5 * bandwidth / odd_pole;
                    let b = 0.5
                        * (bandwidth * bandwidth / (odd_pole * odd_pole)
                            - Complex64::new(4.0 * center_freq * center_freq, 0.0))
                        .sqrt();
                    pole_pairs.push(a + b);
                    has_odd_pole = false;
                }

                for _ in 0..order {
                    zeros.push(Complex64::new(0.0, center_freq));
                    zeros.push(Complex64::new(0.0, -center_freq));
                }
            }
        }

        // Bilinear transform, s-plane to z-plane, accumulating the real gain
        // correction per transform.
        let two = Complex64::new(2.0, 0.0);
        for zero in &mut zeros {
            gain *= (two - *zero).norm();
            *zero = (two + *zero) / (two - *zero);
        }

        for pole in &mut pole_pairs {
            // Conjugate pair, so the length factors in twice.
            let gain_mod = (two - *pole).norm();
            gain /= gain_mod * gain_mod;
            *pole = (two + *pole) / (two - *pole);
        }

        if has_odd_pole {
            gain /= (two - odd_pole).norm();
            odd_pole = (two + odd_pole) / (two - odd_pole);
        }

        // Remaining zero slots sit at Nyquist.
        let zero_count = pole_pairs.len() * 2 + usize::from(has_odd_pole);
        assert!(
            zeros.len() <= zero_count,
            "Butterworth synthesis produced more zeros than poles"
        );
        zeros.resize(zero_count, Complex64::new(-1.0, 0.0));

        let mut filter = IirFilter {
            stages: Vec::with_capacity(pole_pairs.len() + 1),
            latency: 0,
        };

        // The accumulated gain is folded into the first emitted stage only;
        // every later stage has unity input gain.
        let mut gain = gain;
        if has_odd_pole {
            filter.stages.push(SosStage::new(Sos {
                b0: gain,
                b1: -zeros[zero_count - 1].re * gain,
                b2: 0.0,
                a1: -odd_pole.re,
                a2: 0.0,
            }));
            gain = 1.0;
        }

        for (i, pole) in pole_pairs.iter().enumerate() {
            let zero_a = zeros[i * 2];
            let zero_b = zeros[i * 2 + 1];
            filter.stages.push(SosStage::new(Sos {
                b0: gain,
                b1: -(zero_a + zero_b).re * gain,
                b2: (zero_a * zero_b).re * gain,
                // -(pole + conj(pole)) and pole * conj(pole).
                a1: -2.0 * pole.re,
                a2: pole.re * pole.re + pole.im * pole.im,
            }));
            gain = 1.0;
        }

        filter.measure_latency();
        filter.reset_history();
        filter
    }
}
