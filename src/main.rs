#[tokio::main]
async fn main() {
    if let Err(e) = croppulse_lib::run().await {
        eprintln!("croppulse: {e}");
        std::process::exit(1);
    }
}
