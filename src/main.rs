#[tokio::main]
async fn main() {
    if let Err(e) = taskdeck_lib::run().await {
        eprintln!("taskdeck: {}", e);
        std::process::exit(1);
    }
}
