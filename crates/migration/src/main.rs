use config::Config;
use sea_orm_migration::prelude::*;
use std::env;

/// `database_url` from an optional config file, if it has one.
fn database_url_from_config(path: &str) -> Option<String> {
    let settings = Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .build();
    match settings {
        Ok(settings) => settings.get_string("database_url").ok(),
        Err(e) => {
            eprintln!("Ignoring unreadable {path}: {e}");
            None
        }
    }
}

#[tokio::main]
async fn main() {
    if env::var("DATABASE_URL").is_err() {
        if let Some(url) = database_url_from_config("config.yaml") {
            // SAFETY: nothing else reads or writes the environment before the CLI starts.
            unsafe { env::set_var("DATABASE_URL", url) };
        }
    }
    cli::run_cli(migration::Migrator).await;
}
