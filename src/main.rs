use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    finchat::cli::main()
}
