#[tokio::main]
async fn main() {
    if guest_list::run_with_config().await.is_err() {
        std::process::exit(1);
    }
}
