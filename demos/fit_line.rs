// Fits y = 2x + 1 and prints what a plotting front end would consume.
//
// RUST_LOG=debug cargo run --example fit_line
use linefit_rs::{GradientDescentConfig, LinearRegressor};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let x = vec![0.0, 1.0, 2.0, 3.0, 4.0];
    let y = vec![1.1, 2.9, 5.2, 6.8, 9.1];

    let config = GradientDescentConfig::builder()
        .learning_rate(0.05)
        .iterations(2000)
        .log_every(250)
        .build()?;
    let mut model = LinearRegressor::new(config)?;

    let initial_cost = model.compute_cost(&x, &y)?;
    let grads = model.compute_gradient(&x, &y, 0.0, 0.0)?;
    println!(
        "initial cost = {initial_cost:.4}, gradient at (0, 0) = ({:.4}, {:.4})",
        grads.dw, grads.db
    );

    let params = model.gradient_descent(&x, &y)?;
    println!("fitted: f(x) = {:.4}·x + {:.4}", params.weight, params.bias);
    println!("final cost = {:.6}", model.cost());

    for (xi, (yi, pi)) in x.iter().zip(y.iter().zip(model.predict_batch(&x))) {
        println!("x = {xi:>4.1}  y = {yi:>5.2}  f(x) = {pi:>7.4}");
    }

    let trace = model.cost_history();
    for (i, cost) in trace.iter().enumerate().step_by((trace.len() / 10).max(1)) {
        println!("iteration {:>5}: cost = {cost:.6}", i + 1);
    }

    println!("f(5) = {:.4}", model.predict(5.0));
    Ok(())
}
