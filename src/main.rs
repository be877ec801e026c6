fn main() {
    if let Err(err) = gem_assist::cli::main() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
