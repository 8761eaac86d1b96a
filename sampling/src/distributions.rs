use rand_distr::{Distribution, Normal};

use crate::source::Source;

/// Noise distributions used by the engine.
#[derive(Clone, Copy, Debug)]
pub enum Distributions {
    /// Uniform over {-1, 0, 1}.
    Ternary,
    /// Rounded Gaussian with standard deviation `sigma`, rejected outside
    /// `[-bound, bound]`.
    Normal { sigma: f64, bound: f64 },
}

impl Distributions {
    pub fn fill(&self, source: &mut Source, a: &mut [i64]) {
        match *self {
            Distributions::Ternary => fill_ternary(source, a),
            Distributions::Normal { sigma, bound } => fill_normal(source, sigma, bound, a),
        }
    }
}

pub fn fill_ternary(source: &mut Source, a: &mut [i64]) {
    a.iter_mut().for_each(|x| *x = source.next_u64n(3, 0x3) as i64 - 1);
}

pub fn fill_normal(source: &mut Source, sigma: f64, bound: f64, a: &mut [i64]) {
    if sigma == 0.0 {
        a.iter_mut().for_each(|x| *x = 0);
        return;
    }
    let normal: Normal<f64> = match Normal::new(0.0, sigma) {
        Ok(normal) => normal,
        Err(_) => panic!("invalid argument: sigma={} is not a valid standard deviation", sigma),
    };
    a.iter_mut().for_each(|x| {
        let mut v: f64 = normal.sample(source);
        while v.abs() > bound {
            v = normal.sample(source);
        }
        *x = v.round() as i64
    });
}
