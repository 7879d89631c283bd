use clap::Parser;
use dotenv::dotenv;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Base URL of the token registry API
    #[arg(
        short,
        long,
        env = "REGISTRY_API_URL",
        default_value = "http://localhost:3001"
    )]
    pub api_url: String,
}

pub fn load_config() -> Args {
    dotenv().ok();
    Args::parse()
}
