use configuration::{init_tracing, load_config, DEFAULT_CONFIG_PATH};
use std::path::Path;

// This main function is the entry point when running `cargo run -p web-server`.
// It loads settings from `config.toml` and the environment, then serves.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let settings = load_config(Path::new(DEFAULT_CONFIG_PATH))?;
    let _guard = init_tracing(&settings.logging)?;
    web_server::run_server(settings).await
}
