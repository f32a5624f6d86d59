use std::f32::consts::PI;

// sin(pi*x), accurate across thousands of accumulated phase steps.
pub fn sin_pi(x: f32) -> f32 {
    // Reduce to [-0.5, 0.5]; every other half-wave flips sign.
    let rounded = x.round();
    let x = x - rounded;
    let flip = (rounded as i32) & 1 != 0;

    // Odd Taylor series for sin(pi*x) with pi folded into each coefficient:
    //   x*pi - x^3*(pi^3/3!) + x^5*(pi^5/5!) - ...
    const K1: f32 = PI;
    const K3: f32 = -5.167_712_8;
    const K5: f32 = 2.550_164_0;
    const K7: f32 = -5.992_645_3e-1;
    const K9: f32 = 8.214_588_7e-2;
    const K11: f32 = -7.370_430_9e-3;

    let x_sqr = x * x;
    let mut result = K9 + x_sqr * K11;
    result = K7 + x_sqr * result;
    result = K5 + x_sqr * result;
    result = K3 + x_sqr * result;
    result = K1 + x_sqr * result;
    result *= x;

    if flip {
        -result
    } else {
        result
    }
}

// cos(pi*x) in terms of sin_pi; loses accuracy only once 0.5 falls off the mantissa.
pub fn cos_pi(x: f32) -> f32 {
    sin_pi(0.5 - x.abs())
}

// sinc of a multiple of pi: sin(pi*x) / (pi*x), with sinc_pi(0) == 1.
pub fn sinc_pi(x: f32) -> f32 {
    if x.abs() < 0.01 {
        // Near zero the direct ratio cancels badly; use the even series
        // (the sin series with one x*pi factored out).
        const K3: f32 = -1.644_934_1;
        const K5: f32 = 8.117_424_3e-1;
        const K7: f32 = -1.907_518_2e-1;
        const K9: f32 = 2.614_784_8e-2;

        let x_sqr = x * x;
        let mut result = K7 + x_sqr * K9;
        result = K5 + x_sqr * result;
        result = K3 + x_sqr * result;
        1.0 + x_sqr * result
    } else {
        sin_pi(x) / (x * PI)
    }
}
