use super::Parser;

/// Refresh/access token authentication service.
#[derive(Parser, Debug)]
#[command(name = "tollgate", version)]
pub struct Cli {
    /// Path to a settings file, without or with its `.toml` extension.
    #[arg(long)]
    pub settings: Option<String>,
}
