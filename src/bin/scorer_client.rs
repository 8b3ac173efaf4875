use clap::{Parser, Subcommand};
use scorer_etl::api::dto::ScorerDto;
use scorer_etl::client::ScorerClient;
use scorer_etl::utils::logger;

#[derive(Parser)]
#[command(name = "scorer-client")]
#[command(about = "Upload scorer CSV data to a running server and query top scorers")]
struct Args {
    /// Server base URL
    #[arg(long, env = "SCORER_URL", default_value = "http://127.0.0.1:8080")]
    base_url: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send CSV text as the request body
    UploadContent {
        /// CSV text, header line first
        content: String,
    },
    /// Upload a .csv file as multipart form data
    UploadFile { path: String },
    /// Print the current top scorers
    Top,
    /// Look up a scorer by first or second name
    Find { name: String },
    /// Print the top scorers as CSV
    Export,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(if args.verbose { "debug" } else { "info" });

    let client = ScorerClient::new(&args.base_url)?;

    match args.command {
        Command::UploadContent { content } => {
            let scorers = client.upload_content(&content).await?;
            println!("✅ Uploaded {} scorers", scorers.len());
            print_scorers(&scorers);
        }
        Command::UploadFile { path } => {
            let scorers = client.upload_file(&path).await?;
            println!("✅ Uploaded {} scorers from {}", scorers.len(), path);
            print_scorers(&scorers);
        }
        Command::Top => {
            let scorers = client.top_scorers().await?;
            if scorers.is_empty() {
                println!("No scorers recorded");
            } else {
                println!("🏆 Top score: {}", scorers[0].score);
                print_scorers(&scorers);
            }
        }
        Command::Find { name } => match client.find_by_name(&name).await? {
            Some(scorer) => print_scorers(std::slice::from_ref(&scorer)),
            None => {
                eprintln!("❌ Top Scorer with the name {} cannot be found.", name);
                std::process::exit(1);
            }
        },
        Command::Export => {
            print!("{}", client.export_csv().await?);
        }
    }

    Ok(())
}

fn print_scorers(scorers: &[ScorerDto]) {
    for scorer in scorers {
        println!("  {} {} ({})", scorer.first_name, scorer.second_name, scorer.score);
    }
}
