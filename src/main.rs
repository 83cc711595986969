fn main() {
    if let Err(err) = shopify_migrate::run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
