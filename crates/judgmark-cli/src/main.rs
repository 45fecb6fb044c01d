mod display;
mod shell;

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use judgmark_ai::client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use judgmark_ai::{ClientConfig, Extractor, HttpChatClient};
use judgmark_store::Session;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "judgmark", version, about = "Extract structured fields from traffic-accident judgments")]
struct Cli {
    #[command(flatten)]
    model: ModelArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ModelArgs {
    /// API key for the chat-completion endpoint.
    #[arg(long, env = "DEEPSEEK_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint.
    #[arg(long, env = "DEEPSEEK_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Model identifier.
    #[arg(long, env = "DEEPSEEK_MODEL", default_value = DEFAULT_MODEL, global = true)]
    model: String,
}

impl ModelArgs {
    fn extractor(&self) -> anyhow::Result<Extractor<HttpChatClient>> {
        let api_key = self
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .context("DEEPSEEK_API_KEY is not set (use --api-key or the environment)")?;
        let config = ClientConfig::new(api_key)
            .with_base_url(&self.base_url)
            .with_model(&self.model);
        Ok(Extractor::new(HttpChatClient::new(config), &self.model))
    }
}

#[derive(Subcommand)]
enum Command {
    /// Extract fields from one judgment and print them as a table.
    Extract {
        /// Judgment text. Reads stdin when neither --text nor --file is given.
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,

        /// A .txt, .doc or .docx judgment file.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Also write the result to a CSV file.
        #[arg(long)]
        export: bool,

        /// Directory for the CSV file (default: system temp directory).
        #[arg(long, requires = "export")]
        out_dir: Option<PathBuf>,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Print the plain text read from a judgment file.
    Intake {
        file: PathBuf,
    },

    /// Interactive form: load, submit, edit, and export judgments.
    Shell {
        /// Directory for CSV exports (default: system temp directory).
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!("judgmark v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Extract {
            text,
            file,
            export,
            out_dir,
            json,
        } => {
            let judgment = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => judgmark_intake::read_document(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                (None, None) => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("reading judgment text from stdin")?;
                    buf
                }
            };

            let extractor = cli.model.extractor()?;
            let outcome = extractor.extract(&judgment).await;
            eprintln!("{}", display::describe(&outcome));

            let mut session = Session::new();
            session.set_input(judgment);
            session.replace(outcome.into_result());

            if json {
                println!("{}", session.current().to_json_pretty()?);
            } else {
                print!("{}", display::render_table(session.current()));
            }

            if export {
                let path = match out_dir {
                    Some(dir) => session.export_to(&dir),
                    None => session.export(),
                }
                .context("exporting CSV")?;
                println!("exported {}", path.display());
            }
        }
        Command::Intake { file } => {
            let text = judgmark_intake::read_document(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            println!("{text}");
        }
        Command::Shell { out_dir } => {
            let extractor = cli.model.extractor()?;
            let mut shell = shell::Shell::new(extractor, out_dir);
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            shell.run(&mut stdin.lock(), &mut stdout.lock()).await?;
        }
    }

    Ok(())
}
