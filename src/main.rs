fn main() {
    if let Err(err) = sketchpoint_lib::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
