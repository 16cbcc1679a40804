use tiktok_dl::Config;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::load().expect("Failed to load configuration");
    tiktok_dl::run(config).await;
}
