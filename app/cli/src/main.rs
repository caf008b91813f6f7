//! Aperture binary entry point.

fn main() {
    if let Err(err) = aperture_lib::cli::run() {
        eprintln!("aperture: {err}");
        std::process::exit(1);
    }
}
