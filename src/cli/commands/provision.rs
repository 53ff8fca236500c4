//! Provision command - create or validate the target collection

use crate::cli::commands::StoreArgs;
use crate::cli::output::{colors, print_json};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;

/// Arguments for the provision command
#[derive(Args, Debug)]
pub struct ProvisionArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Debug, Serialize)]
pub struct ProvisionResponse {
    pub collection: String,
    pub dimensions: usize,
    pub distance: String,
    pub created: bool,
}

/// Execute the provision command
pub async fn execute(
    args: ProvisionArgs,
    mut config: Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    args.store.apply(&mut config);

    let services = Services::from_config(config)?;
    let handle = services.provision().await?;

    let response = ProvisionResponse {
        collection: handle.name,
        dimensions: handle.dimensions,
        distance: handle.distance.to_string(),
        created: handle.created,
    };

    match format {
        OutputFormat::Human => {
            let verb = if response.created {
                "Created"
            } else {
                "Verified"
            };
            println!(
                "{} collection {} ({} dims, {})",
                colors::success(verb),
                colors::collection(&response.collection),
                colors::number(&response.dimensions.to_string()),
                response.distance
            );
        }
        OutputFormat::Json => print_json(&response)?,
    }

    Ok(())
}
