#[tokio::main]
async fn main() {
    calendario_backend::run().await;
}
