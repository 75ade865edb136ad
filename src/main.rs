use colored::Colorize as _;

use config_typegen::{cli, logging};

fn main() {
    let command_line_interface = cli::CommandLineInterface::load();
    if let Err(error) = logging::init(command_line_interface.verbose) {
        eprintln!("{} {error:#}", "warning:".yellow().bold());
    }
    if let Err(error) = command_line_interface.run() {
        eprintln!("{} {error:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
