use anyhow::{ Context, bail };
use tracing::warn;
use tracing_subscriber::EnvFilter;
use xsparse::{
    dispatch::{ Dispatcher, default_pool_size },
    potential::{ DoubleWell, Harmonic, InfiniteWell, Potential },
    report,
    solve::SolverConfig,
};

// solve for the lowest states of three sample potentials in parallel

const NSTATES: usize = 5; // number of states to report per potential

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_target(false)
        .init();

    let ncpus = default_pool_size();
    println!("{} cpus available for use", ncpus);

    let potentials: Vec<(&str, Box<dyn Potential>)> = vec![
        ("harmonic oscillator", Box::new(Harmonic::default())),
        ("infinite well", Box::new(InfiniteWell::default())),
        ("double well", Box::new(DoubleWell::default())),
    ];

    println!("Running batch ...");
    let dispatcher = Dispatcher::new(Some(ncpus), SolverConfig::default())
        .context("failed to set up worker pool")?;
    let batch = dispatcher.run(potentials.iter().map(|(_, p)| p.as_ref()));
    dispatcher.shutdown();
    println!("Done in {:.4} s", batch.elapsed.as_secs_f64());

    for ((name, _), res) in potentials.iter().zip(&batch.results) {
        println!("\n{}", name);
        match res {
            Ok(res) => { print!("{}", report::summary(res, NSTATES)); },
            Err(err) => {
                warn!(%err, potential = name, "solve failed");
                println!("failed: {}", err);
            },
        }
    }

    let nfailed = batch.num_failed();
    if nfailed > 0 {
        bail!("{} of {} solves failed", nfailed, batch.len());
    }
    Ok(())
}
