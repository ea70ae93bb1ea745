use clap::Parser;
use skillcheck_cli::Cli;

fn main() {
    let cli = Cli::parse();

    match cli.run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    }
}
