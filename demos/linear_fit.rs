//! End-to-end walkthrough: simulate noisy measurements of a straight line,
//! fit them, and print the resulting fit report.
//!
//! Run with: cargo run --example linear_fit

use curvefit_rs::{curve_fit, data, models, Result};
use ndarray::Array1;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn main() -> Result<()> {
    // Simulate an experiment: y = x measured at 101 evenly spaced points,
    // with Gaussian noise of standard deviation 5. The RNG is seeded so the
    // run is reproducible.
    let x = Array1::linspace(0.0, 100.0, 101);
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let y = data::noisy_line(1.0, 0.0, &x, 5.0, &mut rng)?;

    // Starting values from the closed-form least-squares solution
    let guess = models::guess_line(&x, &y)?;
    println!("Initial guess:");
    for param in guess.iter() {
        println!("  {} = {:.4}", param.name(), param.value());
    }
    println!();

    let result = curve_fit(models::line, &x, &y, &guess)?;
    println!("{}", result);

    // Overlaying the fitted curve on the data is the caller's business;
    // evaluate the model at the best-fit parameters to get the curve.
    let fitted = models::line(&result.params, &x)?;
    let rms = (result.chisqr / x.len() as f64).sqrt();
    println!("Fitted curve spans {:.3} .. {:.3}", fitted[0], fitted[fitted.len() - 1]);
    println!("RMS residual: {:.3}", rms);

    Ok(())
}
