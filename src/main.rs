use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use nyimbo::cli::{Cli, Commands, ConfigAction};
use nyimbo::commands::{
    AppContext, cmd_browse, cmd_categories, cmd_config_get, cmd_config_set, cmd_config_show,
    cmd_delete, cmd_edit, cmd_mine, cmd_profile, cmd_search, cmd_show, cmd_upload,
};
use nyimbo::error::Result;
use nyimbo::sheet::{EditRequest, UploadRequest};

const LOG_ENV: &str = "NYIMBO_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let root = std::env::current_dir()?;
    let ctx = || AppContext::load(&root);

    match cli.command {
        Commands::Search {
            query,
            letter,
            json,
        } => cmd_search(&ctx()?, query.as_deref(), letter, json).await,
        Commands::Browse => cmd_browse(&ctx()?).await,
        Commands::Show { id, json } => cmd_show(&ctx()?, &id, json).await,
        Commands::Upload {
            file,
            title,
            composer,
            category,
            description,
            json,
        } => {
            let request = UploadRequest {
                title,
                composer,
                description,
                category: Some(category),
                file: Some(file),
            };
            cmd_upload(&ctx()?, request, json).await
        }
        Commands::Edit {
            id,
            title,
            composer,
            description,
            category,
            file,
            json,
        } => {
            let request = EditRequest {
                title,
                composer,
                description,
                category,
                file,
            };
            cmd_edit(&ctx()?, &id, request, json).await
        }
        Commands::Delete { id, json } => cmd_delete(&ctx()?, &id, json).await,
        Commands::Mine { json } => cmd_mine(&ctx()?, json).await,
        Commands::Profile { picture, json } => {
            cmd_profile(&ctx()?, picture.as_deref(), json).await
        }
        Commands::Categories { json } => cmd_categories(json),
        Commands::Config { action } => match action {
            ConfigAction::Show { json } => cmd_config_show(&root, json),
            ConfigAction::Set { key, value, json } => cmd_config_set(&root, &key, &value, json),
            ConfigAction::Get { key, json } => cmd_config_get(&root, &key, json),
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
