use approx::{assert_abs_diff_eq, assert_relative_eq};
use tubecast_core::fir::FirFilter;
use tubecast_core::iir::IirFilter;
use tubecast_core::math::{cos_pi, sin_pi, sinc_pi};

fn test_signal(len: usize) -> Vec<f32> {
    // Deterministic broadband-ish signal, no RNG dependency.
    (0..len)
        .map(|i| sin_pi(0.13 * i as f32) + 0.4 * cos_pi(0.57 * i as f32))
        .collect()
}

#[test]
fn sin_pi_matches_reference_points() {
    assert_relative_eq!(sin_pi(0.5), 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(sin_pi(1.0), 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(sin_pi(-1.0), 0.0, epsilon = 1e-6);
    assert_relative_eq!(sin_pi(0.25), std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-5);
    assert_relative_eq!(sin_pi(-0.5), -1.0, epsilon = 1e-6);
    // Large arguments stay accurate thanks to the integer reduction.
    assert_relative_eq!(sin_pi(1000.5), 1.0, epsilon = 1e-5);
}

#[test]
fn cos_pi_matches_reference_points() {
    assert_relative_eq!(cos_pi(0.0), 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(cos_pi(0.5), 0.0, epsilon = 1e-6);
    assert_relative_eq!(cos_pi(1.0), -1.0, epsilon = 1e-6);
    assert_relative_eq!(cos_pi(-1.0), -1.0, epsilon = 1e-6);
}

#[test]
fn sinc_pi_is_continuous_across_the_series_cutover() {
    // The small-argument series hands over to the direct ratio at |x| = 0.01.
    let below = sinc_pi(0.00999);
    let above = sinc_pi(0.01001);
    assert_abs_diff_eq!(below, above, epsilon = 1e-5);
    assert_relative_eq!(sinc_pi(0.0), 1.0);
    assert_abs_diff_eq!(sinc_pi(1.0), 0.0, epsilon = 1e-6);
}

#[test]
fn windowed_sinc_has_unit_dc_gain() {
    for &length in &[11usize, 21, 63] {
        let filter = FirFilter::from_rolloff_center_and_length(0.25, length);
        let sum: f32 = filter.taps().iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-5);
        assert_eq!(filter.len(), length);
    }
}

#[test]
#[should_panic(expected = "odd")]
fn windowed_sinc_rejects_even_length() {
    let _ = FirFilter::from_rolloff_center_and_length(0.25, 20);
}

#[test]
fn adaptive_low_pass_is_odd_and_normalized() {
    for &rolloff in &[0.1f32, 0.2, 0.3, 0.5] {
        let filter = FirFilter::low_pass(rolloff);
        assert_eq!(filter.len() & 1, 1, "length {} not odd", filter.len());
        let sum: f32 = filter.taps().iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-5);
    }
}

#[test]
fn adaptive_low_pass_grows_for_narrower_rolloffs() {
    let wide = FirFilter::low_pass(0.4);
    let narrow = FirFilter::low_pass(0.05);
    assert!(narrow.len() > wide.len());
}

#[test]
fn spectral_inversion_negates_all_but_the_center_tap() {
    let low = FirFilter::low_pass(0.25);
    let high = FirFilter::high_pass(0.25);
    assert_eq!(low.len(), high.len());

    let center = (low.len() - 1) / 2;
    for (i, (&l, &h)) in low.taps().iter().zip(high.taps()).enumerate() {
        if i == center {
            assert_abs_diff_eq!(h, 1.0 - l, epsilon = 1e-6);
        } else {
            assert_abs_diff_eq!(h, -l, epsilon = 1e-6);
        }
    }
}

#[test]
fn high_pass_taps_sum_to_zero() {
    // Spectral inversion turns unit DC gain into zero DC gain.
    let filter = FirFilter::high_pass_from_band(0.3, 0.1);
    let sum: f32 = filter.taps().iter().sum();
    assert_abs_diff_eq!(sum, 0.0, epsilon = 1e-5);
}

#[test]
fn convolution_is_commutative_and_sums_lengths() {
    let a = FirFilter::low_pass_from_band(0.1, 0.3);
    let b = FirFilter::low_pass_from_band(0.2, 0.5);
    let ab = FirFilter::convolve(&a, &b);
    let ba = FirFilter::convolve(&b, &a);

    assert_eq!(ab.len(), a.len() + b.len() - 1);
    assert_eq!(ab.len(), ba.len());
    for (&x, &y) in ab.taps().iter().zip(ba.taps()) {
        assert_abs_diff_eq!(x, y, epsilon = 1e-6);
    }
}

#[test]
fn band_pass_rejects_dc() {
    let filter = FirFilter::band_pass(0.1, 0.2, 0.4, 0.5);
    let sum: f32 = filter.taps().iter().sum();
    assert_abs_diff_eq!(sum, 0.0, epsilon = 1e-4);
}

#[test]
fn vectorized_fir_matches_scalar() {
    let filter = FirFilter::low_pass_from_band(0.15, 0.35);
    // Lengths straddling the lane-group boundary, including a short tail.
    for &len in &[7usize, 8, 63, 64, 65, 200] {
        let input = test_signal(len);
        let mut wide_out = vec![0.0f32; len];
        let mut scalar_out = vec![0.0f32; len];
        filter.process(&input, &mut wide_out);
        filter.process_scalar(&input, &mut scalar_out);
        for (&w, &s) in wide_out.iter().zip(&scalar_out) {
            assert_abs_diff_eq!(w, s, epsilon = 1e-4);
        }
    }
}

#[test]
fn fir_treats_out_of_range_input_as_zero() {
    let filter = FirFilter::low_pass_from_band(0.2, 0.4);
    let impulse_at_zero = {
        let mut input = vec![0.0f32; 32];
        input[0] = 1.0;
        input
    };
    let mut output = vec![0.0f32; 32];
    filter.process(&impulse_at_zero, &mut output);

    // Output at 0 picks up only the center tap.
    let center = (filter.len() - 1) / 2;
    assert_abs_diff_eq!(output[0], filter.taps()[center], epsilon = 1e-6);
}

#[test]
fn fir_preserves_constant_signal() {
    let filter = FirFilter::low_pass(0.2);
    let input = vec![0.75f32; 256];
    let mut output = vec![0.0f32; 256];
    filter.process(&input, &mut output);

    // Away from the zero-padded edges a unit-gain low pass is an identity on DC.
    let margin = filter.len();
    for &value in &output[margin..256 - margin] {
        assert_relative_eq!(value, 0.75, epsilon = 1e-4);
    }
}

#[test]
fn butterworth_low_pass_has_unit_dc_gain() {
    for order in 1..=8 {
        let filter = IirFilter::low_pass(order, 0.25);
        assert_relative_eq!(filter.magnitude_at(0.0), 1.0, epsilon = 1e-3);
        // Half-power point at the design frequency.
        assert_relative_eq!(
            filter.magnitude_at(0.25),
            std::f64::consts::FRAC_1_SQRT_2,
            epsilon = 1e-2
        );
    }
}

#[test]
fn butterworth_high_pass_has_unit_nyquist_gain() {
    for order in 1..=6 {
        let filter = IirFilter::high_pass(order, 0.3);
        assert_relative_eq!(filter.magnitude_at(1.0), 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(filter.magnitude_at(0.0), 0.0, epsilon = 1e-6);
    }
}

#[test]
fn butterworth_band_pass_rejects_both_extremes() {
    let filter = IirFilter::band_pass(3, 0.2, 0.4);
    assert_abs_diff_eq!(filter.magnitude_at(0.0), 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(filter.magnitude_at(1.0), 0.0, epsilon = 1e-6);
    assert!(filter.magnitude_at(0.3) > 0.9);
}

#[test]
fn butterworth_band_stop_passes_both_extremes() {
    let filter = IirFilter::band_stop(3, 0.2, 0.4);
    assert_relative_eq!(filter.magnitude_at(0.0), 1.0, epsilon = 1e-3);
    assert_relative_eq!(filter.magnitude_at(1.0), 1.0, epsilon = 1e-3);
}

#[test]
fn higher_order_steepens_the_low_pass_skirt() {
    let soft = IirFilter::low_pass(1, 0.25);
    let steep = IirFilter::low_pass(6, 0.25);
    assert!(steep.magnitude_at(0.5) < soft.magnitude_at(0.5));
}

#[test]
fn measured_latency_is_deterministic() {
    let a = IirFilter::low_pass(3, 0.2);
    let b = IirFilter::low_pass(3, 0.2);
    assert_eq!(a.latency(), b.latency());
}

#[test]
fn slice_processing_aligns_the_impulse_peak() {
    let mut filter = IirFilter::low_pass(3, 0.2);

    let mut input = vec![0.0f32; 128];
    input[40] = 1.0;
    let mut output = vec![0.0f32; 128];
    filter.process(&input, &mut output);

    let peak = output
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .map(|(i, _)| i)
        .unwrap();
    assert_eq!(peak, 40);
}

#[test]
fn iir_preserves_constant_signal() {
    let mut filter = IirFilter::low_pass(3, 0.3);
    let input = vec![0.5f32; 512];
    let mut output = vec![0.0f32; 512];
    filter.process(&input, &mut output);

    // Settled region only; the startup transient and zero-flushed tail differ.
    for &value in &output[64..384] {
        assert_relative_eq!(value, 0.5, epsilon = 1e-3);
    }
}

#[test]
fn appended_cascades_multiply_responses() {
    let mut combined = IirFilter::low_pass(2, 0.25);
    let other = IirFilter::low_pass(2, 0.25);
    let expected = combined.magnitude_at(0.5) * other.magnitude_at(0.5);
    combined.append(&other);
    assert_relative_eq!(combined.magnitude_at(0.5), expected, epsilon = 1e-9);
}
