//! covibot CLI: constraint violation reports for Wikidata properties.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::Result;

use covibot::batch;
use covibot::config::CheckerConfig;
use covibot::constraint::ConstraintKind;
use covibot::constraint::single_best_value::{ViolationQuery, metadata};
use covibot::property::PropertyId;
use covibot::query::WdqsClient;
use covibot::sink::{DirectorySink, ReportSink, StdoutSink};

#[derive(Parser)]
#[command(name = "covibot", version, about = "Constraint violation reports for Wikidata")]
struct Cli {
    /// TOML file with endpoint, user agent and namespace settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SPARQL endpoint, overriding the config file.
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check properties and publish one report per property.
    Check {
        /// Property identifiers, e.g. P227.
        #[arg(required = true)]
        properties: Vec<String>,

        /// Constraint type to check.
        #[arg(long, value_enum, default_value_t = ConstraintKind::SingleBestValue)]
        constraint: ConstraintKind,

        /// Write reports as files into this directory instead of printing them.
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Show the formatter URL and separators declared for a property.
    Metadata {
        /// Property identifier.
        property: String,
    },

    /// Print the violation query for a property without running it.
    Query {
        /// Property identifier.
        property: String,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CheckerConfig::load(path)?,
        None => CheckerConfig::default(),
    };
    if let Some(endpoint) = cli.endpoint {
        config = config.with_endpoint(endpoint);
    }
    let client = WdqsClient::new(&config);

    match cli.command {
        Commands::Check {
            properties,
            constraint,
            out_dir,
        } => {
            let properties = properties
                .iter()
                .map(|p| p.parse::<PropertyId>())
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let mut sink: Box<dyn ReportSink> = match out_dir {
                Some(dir) => Box::new(DirectorySink::new(dir)),
                None => Box::new(StdoutSink::new()),
            };

            let summary = batch::run(constraint, &config, &client, sink.as_mut(), &properties);
            if !summary.all_succeeded() {
                let failed: Vec<String> = summary
                    .failed
                    .iter()
                    .map(|(p, _)| p.to_string())
                    .collect();
                miette::bail!(
                    "{} of {} checks failed: {}",
                    failed.len(),
                    properties.len(),
                    failed.join(", ")
                );
            }
        }

        Commands::Metadata { property } => {
            let property: PropertyId = property.parse()?;
            let meta = metadata::resolve(&config, &client, &property)?;
            println!("Property:   {property}");
            println!("Formatter:  {}", meta.formatter.template());
            if meta.separators.is_empty() {
                println!("Separators: (none)");
            } else {
                let list: Vec<&str> = meta.separators.iter().map(PropertyId::as_str).collect();
                println!("Separators: {}", list.join(", "));
            }
        }

        Commands::Query { property } => {
            let property: PropertyId = property.parse()?;
            let meta = metadata::resolve(&config, &client, &property)?;
            println!("{}", ViolationQuery::build(&property, &meta.separators).as_str());
        }
    }

    Ok(())
}
