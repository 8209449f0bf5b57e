#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = emailer_lib::run().await {
        eprintln!("Error running application: {:#}", e);
        std::process::exit(1);
    }
}
