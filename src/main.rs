use clap::{Parser, Subcommand};
use dotenv::dotenv;
use powerflow::condition;
use powerflow::flow::FlowBuilder;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a condition expression and print its JSON form
    Condition {
        /// The expression to compile, e.g. "count > 3 and done == false"
        #[arg(short, long)]
        expression: String,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Build a flow document from a YAML definition
    Build {
        /// Path to the flow definition file
        #[arg(short, long)]
        file: String,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Condition { expression, pretty } => {
            let compiled = condition::compile(&expression)?;
            let output = if pretty {
                serde_json::to_string_pretty(&compiled)?
            } else {
                serde_json::to_string(&compiled)?
            };
            println!("{}", output);
        }
        Commands::Build { file, pretty } => {
            log::info!("Building flow from {}", file);
            let flow = FlowBuilder::new().build_file(&file)?;
            println!("{}", flow.export_json(pretty)?);
        }
    }

    Ok(())
}
