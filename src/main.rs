#[tokio::main]
async fn main() {
    salon_booking::run().await;
}
