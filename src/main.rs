use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{modifiers, presets, ContentArrangement, Table};
use serde::Serialize;
use terminal_size::{terminal_size, Width};

use cip_aws::config;
use cip_aws::models::{Record, RecordSet};
use cip_aws::utils::cell_text;
use cip_aws::{AwsArgs, CloudProvider, ProviderError, PROVIDER_NAME};

#[derive(Parser)]
#[command(
    name = "cip-aws",
    author,
    version,
    about = "Amazon EC2 provider for the cloud info aggregator",
    long_about = r#"cip-aws: publish Amazon EC2 images, flavors and the compute endpoint as normalized records.

Credentials and region come from flags or the usual AWS environment variables. Records are written to stdout; request echo and logs go to stderr.

Examples:
  1) Images of the configured distros as YAML:
      cip-aws --aws-region eu-west-3 images --format yaml
  2) Flavors with static defaults:
      cip-aws --static-file static.yaml templates
  3) Everything, using credentials from a .env file:
      cip-aws --env-file .env all
"#,
    after_help = "Use `cip-aws <subcommand> --help` to get subcommand specific options and usage examples."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    #[command(flatten)]
    aws: AwsArgs,
    /// Path to .env file
    #[arg(long, global = true)]
    env_file: Option<String>,
    /// Output format for records
    #[arg(long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    format: OutputFormat,
    /// Enable debug logging, including the AWS SDK
    #[arg(long, global = true)]
    debug: bool,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
    /// Disable request/response echo
    #[arg(long, global = true)]
    silent: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Images of every configured distro, keyed by image id
    #[command(about = "List images", long_about = "Describe public, available, EBS-backed images for every distro in the filter table and print them as image records.")]
    Images,
    /// Instance types with vCPU, memory and storage info, keyed by type
    #[command(about = "List flavors", long_about = "Describe instance types and print a template record for each one exposing vCPU, memory and storage info.")]
    Templates,
    /// Compute endpoint of the configured region
    #[command(about = "Show the compute endpoint", long_about = "Describe regions and print the endpoint of the configured region under `compute_service_name`.")]
    Endpoints,
    /// Images, templates and endpoints in one document (default)
    All,
    /// Validate configuration (env vars / AWS credentials)
    #[command(about = "Validate configuration and ensure API connectivity.", long_about = "Validate the region and key pair, then call DescribeRegions to check the credentials and that the region exists.")]
    CheckConfig,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
    Table,
}

#[derive(Serialize)]
struct Inventory {
    images: RecordSet,
    templates: RecordSet,
    endpoints: Record,
}

fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", yansi::Paint::new("Error").red().bold(), err);
    process::exit(1);
}

fn print_serialized<T: Serialize>(value: &T, format: OutputFormat) {
    let rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        _ => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
    };
    match rendered {
        Ok(text) => println!("{}", text),
        Err(e) => fail(e),
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w.saturating_sub(4));
    }
    table
}

fn print_record_table(title: &str, record: &Record) {
    let mut table = new_table();
    table.set_header(vec!["Field", "Value"]);
    for (k, v) in record {
        table.add_row(vec![k.clone(), cell_text(v)]);
    }
    println!("{}\n{table}\n", yansi::Paint::new(title).bold().underline());
}

fn print_record_set(records: &RecordSet, format: OutputFormat) {
    if format != OutputFormat::Table {
        print_serialized(records, format);
        return;
    }
    if records.is_empty() {
        println!("(empty list)");
        return;
    }
    for (id, record) in records {
        print_record_table(id, record);
    }
}

fn print_endpoints(endpoints: &Record, format: OutputFormat) {
    if format == OutputFormat::Table {
        print_record_table("endpoints", endpoints);
    } else {
        print_serialized(endpoints, format);
    }
}

async fn build_provider(cli: &Cli) -> Box<dyn CloudProvider> {
    let options = cli.aws.to_options().fill_from_env();
    match cip_aws::plugin::by_name(PROVIDER_NAME, &options).await {
        Some(Ok(provider)) => provider,
        Some(Err(e)) => fail(e),
        None => fail(format!("Unknown provider '{}'", PROVIDER_NAME)),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    config::load_env_file(cli.env_file.as_deref());
    cip_aws::logging::setup_logging(cli.debug);

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }

    if cli.silent {
        cip_aws::api::set_silent(true);
    }

    let provider = build_provider(&cli).await;
    let format = cli.format;

    match cli.command.as_ref().unwrap_or(&Commands::All) {
        Commands::Images => match provider.get_images().await {
            Ok(images) => print_record_set(&images, format),
            Err(e) => fail(e),
        },
        Commands::Templates => match provider.get_templates().await {
            Ok(templates) => print_record_set(&templates, format),
            Err(e) => fail(e),
        },
        Commands::Endpoints => match provider.get_compute_endpoints().await {
            Ok(endpoints) => print_endpoints(&endpoints, format),
            Err(e) => fail(e),
        },
        Commands::All => {
            let images = provider.get_images().await.unwrap_or_else(|e| fail(e));
            let templates = provider.get_templates().await.unwrap_or_else(|e| fail(e));
            let endpoints = provider
                .get_compute_endpoints()
                .await
                .unwrap_or_else(|e| fail(e));

            if format == OutputFormat::Table {
                print_record_set(&images, format);
                print_record_set(&templates, format);
                print_endpoints(&endpoints, format);
            } else {
                print_serialized(
                    &Inventory {
                        images,
                        templates,
                        endpoints,
                    },
                    format,
                );
            }
        }
        Commands::CheckConfig => match provider.get_compute_endpoints().await {
            Ok(_) => {
                println!(
                    "{}",
                    yansi::Paint::new("Configuration looks valid (region found)").green()
                );
            }
            Err(e @ ProviderError::RegionNotFound { .. }) => {
                eprintln!("{}: {}", yansi::Paint::new("Configuration appears invalid").red(), e);
                process::exit(1);
            }
            Err(e) => fail(e),
        },
    }
}
