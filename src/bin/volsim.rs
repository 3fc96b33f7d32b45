//! volsim demo
//!
//! Usage: `volsim [CONFIG_JSON] [CHAIN_JSON]`
//!
//! Without a chain file a synthetic chain is generated. Reports are written
//! to `./volsim_output`. Set `RUST_LOG=volsim=debug` for solver and
//! simulation detail.

use std::fs;
use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

use volsim::data::write_smiles_json;
use volsim::models::black_scholes;
use volsim::prelude::*;

const OUTPUT_DIR: &str = "volsim_output";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("volsim=info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let chain_path = args.next().map(PathBuf::from);

    if let Err(e) = run(config_path.as_deref(), chain_path.as_deref()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(config_path: Option<&Path>, chain_path: Option<&Path>) -> VolSimResult<()> {
    let config = match config_path {
        Some(path) => VolSimConfig::from_json_file(path)?,
        None => VolSimConfig::default(),
    };
    let output = PathBuf::from(OUTPUT_DIR);
    fs::create_dir_all(&output)?;

    println!("volsim");
    println!("======\n");

    black_scholes_section()?;
    surface_section(&config, chain_path, &output)?;
    monte_carlo_section(&config, &output)?;

    println!("\nReports written to {}", output.display());
    Ok(())
}

fn black_scholes_section() -> VolSimResult<()> {
    let spec = OptionSpec::call(100.0, 100.0, 0.05, 0.20, 1.0);

    println!("Black-Scholes Pricing Example:");
    println!("  Spot: {:.2}  Strike: {:.2}", spec.spot, spec.strike);
    println!("  Rate: {:.1}%  Vol: {:.1}%  T: {:.2}y\n", spec.rate * 100.0, spec.vol * 100.0, spec.maturity);

    let call = black_scholes::price_spec(&spec)?;
    let put = black_scholes::price_spec(&spec.with_type(OptionType::Put))?;
    println!("  Call: {call:.4}");
    println!("  Put:  {put:.4}");

    let g = black_scholes::greeks(spec.spot, spec.strike, spec.rate, spec.vol, spec.maturity, OptionType::Call)?;
    println!("\nCall Greeks:");
    println!("  Delta: {:.4}", g.delta);
    println!("  Gamma: {:.6}", g.gamma);
    println!("  Theta: {:.4}/day", g.theta_per_day());
    println!("  Vega:  {:.4}/vol pt", g.vega_per_point());
    println!("  Rho:   {:.4}/rate pt", g.rho_per_point());

    println!("\nImplied Volatility Solver:");
    match implied_volatility(call, spec.spot, spec.strike, spec.rate, spec.maturity, OptionType::Call) {
        Some(iv) => println!("  Recovered IV: {:.2}% (expected {:.2}%)", iv * 100.0, spec.vol * 100.0),
        None => println!("  IV not recovered"),
    }
    Ok(())
}

fn surface_section(config: &VolSimConfig, chain_path: Option<&Path>, output: &Path) -> VolSimResult<()> {
    println!("\n--- Volatility Smiles ---\n");

    let chain = match chain_path {
        Some(path) => load_option_chain(path)?,
        None => generate_mock_chain(&MockChainConfig::default(), config.simulation.seed)?,
    };
    let smiles = compute_all_smiles(&chain, &config.solver)?;

    for smile in &smiles {
        let calls = smile.points_for(OptionType::Call);
        let atm = calls
            .iter()
            .min_by(|a, b| (a.0 - 100.0).abs().total_cmp(&(b.0 - 100.0).abs()))
            .map(|&(_, iv)| format!("{:.2}%", iv * 100.0))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "  T={:.2}y: {} quotes, {} missing, ATM call IV {}",
            smile.maturity,
            smile.len(),
            smile.missing_count(),
            atm
        );
    }

    let surface = build_vol_surface_from_smiles(&smiles, config.surface.grid_size)?;
    let (rows, cols) = surface.dim();
    println!("\nSurface grid: {rows} maturities × {cols} strikes");
    if let (Some((k_lo, k_hi)), Some((t_lo, t_hi))) = (surface.strike_bounds(), surface.maturity_bounds()) {
        println!("  Strikes {k_lo:.1}..{k_hi:.1}, maturities {t_lo:.2}..{t_hi:.2}");
        let mid_k = 0.5 * (k_lo + k_hi);
        let mid_t = 0.5 * (t_lo + t_hi);
        if let Some(vol) = surface.interpolate(mid_k, mid_t) {
            println!("  σ({mid_k:.1}, {mid_t:.2}) = {:.2}%", vol * 100.0);
        }
        if let Some(w) = surface.total_variance(mid_k, mid_t) {
            println!("  Total variance σ²T = {w:.5}");
        }

        if let Some(smile) = surface.smile_at(mid_t) {
            println!("\n  Surface smile at T={mid_t:.2}y:");
            let stride = (smile.len() / 5).max(1);
            for (k, vol) in smile.iter().step_by(stride) {
                println!("    K={k:>7.2}  σ={:.2}%", vol * 100.0);
            }
        }
    }

    write_smiles_json(&smiles, output.join("smiles.json"))?;
    write_surface_json(&surface, output.join("surface.json"))?;
    Ok(())
}

fn monte_carlo_section(config: &VolSimConfig, output: &Path) -> VolSimResult<()> {
    let sim = &config.simulation;
    let spec = OptionSpec::call(100.0, 100.0, 0.05, 0.20, 1.0);
    let params = GbmParams::from_spec(&spec);

    println!("\n--- Monte Carlo ({} paths, {} steps) ---\n", sim.n_paths, sim.n_steps);

    let paths = simulate_parallel(&params, sim.n_steps, sim.n_paths, sim.chunk_size, sim.seed)?;
    let european = volsim::simulation::price_european(&paths, spec.strike, OptionType::Call)?;
    println!("  European call:      {:.4} ± {:.4}", european.price, european.standard_error());

    let arithmetic = mc_asian_arithmetic(&spec, sim.n_steps, sim.n_paths, sim.seed, sim.antithetic)?;
    println!("  Arithmetic Asian:   {:.4} ± {:.4}", arithmetic.price, arithmetic.standard_error());

    let geometric = mc_asian_geometric(&spec, sim.n_steps, sim.n_paths, sim.seed)?;
    let geometric_exact = geometric_asian_price(&spec, sim.n_steps)?;
    println!(
        "  Geometric Asian:    {:.4} ± {:.4} (closed form {:.4})",
        geometric.price,
        geometric.standard_error(),
        geometric_exact
    );

    for barrier in [120.0, 140.0] {
        let knock = mc_barrier_up_and_out_call(&spec, barrier, sim.n_steps, sim.n_paths, sim.seed)?;
        println!("  Up-and-out H={barrier:.0}:  {:.4} ± {:.4}", knock.price, knock.standard_error());
    }

    println!("\nConvergence (European call, closed form {:.4}):", black_scholes::price_spec(&spec)?);
    let records = estimate_convergence(&[1_000, 5_000, 20_000, 50_000, 100_000], |n| {
        mc_european(&spec, 1, n, sim.seed).map(|e| e.price)
    })?;
    for r in &records {
        println!("  {:>7} paths: {:.4}", r.path_count, r.estimated_price);
    }

    let benchmark = compare_with_black_scholes(&spec, 1, 200_000, sim.seed)?;
    match benchmark.relative_error {
        Some(rel) => println!("  200000 paths: abs err {:.4}, rel err {:.3}%", benchmark.absolute_error, rel * 100.0),
        None => println!("  200000 paths: abs err {:.4}", benchmark.absolute_error),
    }

    write_convergence_json(&records, Some(benchmark), output.join("convergence.json"))?;
    Ok(())
}
