use anyhow::{Context, Result};
use clap::Parser;
use pocket_dimension::{CLIArgs, CubeGrid, CubeSpaceSimulator, SimConfig};

fn main() -> Result<()> {
    let args = CLIArgs::parse();
    let init_state = pocket_dimension::read_state(&args.input_path).with_context(|| {
        format!(
            "Failed to read initial states from given input file({})",
            args.input_path.display()
        )
    })?;

    let mut simulator =
        CubeSpaceSimulator::<4>::new(CubeGrid::from(&init_state), SimConfig::new(args.steps));
    let space = simulator.run_with(|generation, grid| {
        if args.verbose {
            eprintln!(
                "Generation {} finished, {} active cube(s).",
                generation,
                grid.active_n()
            );
        }
    });
    if args.verbose {
        eprint!("{}", space);
    }

    println!(
        "After {} step(s), the 4D pocket dimension has {} active cubes.",
        args.steps,
        space.active_n()
    );

    Ok(())
}
