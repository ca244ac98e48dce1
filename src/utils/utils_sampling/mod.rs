use rand::Rng;
use rand_distr::{Distribution, Normal};

pub struct SimpleSamplers;
impl SimpleSamplers {
    pub fn uniform_samples(bounds: &Vec<(f64, f64)>) -> Vec<f64> {
        let mut rng = rand::thread_rng();
        return Self::uniform_samples_with_rng(bounds, &mut rng);
    }
    /// Same as `uniform_samples`, but with a caller-provided generator so that sampling can be
    /// made reproducible with a seeded rng.
    pub fn uniform_samples_with_rng<R: Rng>(bounds: &Vec<(f64, f64)>, rng: &mut R) -> Vec<f64> {
        let mut out_vec = vec![];
        for b in bounds {
            if b.0 == b.1 {
                out_vec.push(b.0);
            } else {
                out_vec.push(rng.gen_range(b.0..b.1));
            }
        }
        out_vec
    }
    pub fn normal_samples<R: Rng>(means_and_standard_deviations: &Vec<(f64, f64)>, rng: &mut R) -> Vec<f64> {
        let mut out_vec = vec![];
        for (mean, standard_deviation) in means_and_standard_deviations {
            let distribution = Normal::new(*mean, *standard_deviation).expect("error");
            out_vec.push(distribution.sample(rng));
        }
        out_vec
    }
}
