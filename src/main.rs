#[tokio::main]
async fn main() {
    if let Err(e) = fratrank_be::start_server().await {
        tracing::error!("Server failed to start: {}", e);
        eprintln!("fratrank_be: {e}");
        std::process::exit(1);
    }
}
