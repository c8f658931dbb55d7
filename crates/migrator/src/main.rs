#[tokio::main]
async fn main() {
    migrator::start(std::env::args()).await;
}
