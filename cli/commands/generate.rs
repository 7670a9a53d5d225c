use crate::cli_args::GenerateArgs;
use crate::output;
use crate::prepare_run;
use anyhow::{Context, Result};
use log;

pub fn handle_generate_command(args: GenerateArgs, quiet: bool) -> Result<()> {
    let run = prepare_run(
        &args.project_config,
        &args.ignore_overrides,
        args.output.as_ref(),
    )?;
    let lister = &run.lister;

    if args.stdout {
        log::debug!("Printing report to stdout");
        let report = lister.generate();
        return output::write_to_stdout(&report.render());
    }

    lister.run().with_context(|| {
        format!(
            "Failed to write report to {}",
            lister.destination().display()
        )
    })?;
    output::print_saved(lister.destination(), quiet);
    Ok(())
}
