use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tagsub::{tag_names, ModelFile, TemplateEngine};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to a YAML or JSON model file; later files override earlier ones
    #[arg(short, long, global = true)]
    model: Vec<PathBuf>,

    /// Set a single value (NAME=VALUE), applied after all model files
    #[arg(short, long = "set", global = true)]
    set: Vec<String>,

    /// Template file (reads stdin when omitted)
    #[arg(short, long, global = true)]
    template: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the template (default command)
    Render {
        /// Output file (writes stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the tag names used by the template
    Tags {
        /// Fail if the model does not provide every tag
        #[arg(long)]
        check: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Render { output }) => {
            render(&cli, output.as_deref())?;
        }
        Some(Commands::Tags { check }) => {
            tags(&cli, *check)?;
        }
        None => {
            render(&cli, None)?;
        }
    }

    Ok(())
}

fn load_engine(cli: &Cli) -> Result<TemplateEngine> {
    let mut model = ModelFile::default();
    for path in &cli.model {
        let file = ModelFile::load(path)
            .with_context(|| format!("Failed to load model {:?}", path))?;
        model.merge(file);
    }
    for assignment in &cli.set {
        model.set(assignment)?;
    }
    TemplateEngine::with_model(model.values).context("Invalid model")
}

fn read_template(cli: &Cli) -> Result<String> {
    match &cli.template {
        Some(path) => {
            info!("Reading template from {:?}", path);
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read template {:?}", path))
        }
        None => {
            let mut template = String::new();
            std::io::stdin()
                .read_to_string(&mut template)
                .context("Failed to read template from stdin")?;
            Ok(template)
        }
    }
}

fn template_name(cli: &Cli) -> String {
    cli.template
        .as_deref()
        .map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string())
}

fn render(cli: &Cli, output: Option<&Path>) -> Result<()> {
    let engine = load_engine(cli)?;
    let template = read_template(cli)?;

    let rendered = engine
        .render_string(&template)
        .with_context(|| format!("Failed to render {}", template_name(cli)))?;

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write output {:?}", path))?;
            info!("Wrote {:?}", path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn tags(cli: &Cli, check: bool) -> Result<()> {
    let template = read_template(cli)?;
    let names = tag_names(&template)
        .with_context(|| format!("Failed to scan {}", template_name(cli)))?;
    for name in &names {
        println!("{}", name);
    }

    if check {
        let engine = load_engine(cli)?;
        let missing = engine.missing_tags(&template)?;
        if !missing.is_empty() {
            for name in &missing {
                warn!("No value for tag `{}`", name);
            }
            bail!("Model is missing {} tag(s): {}", missing.len(), missing.join(", "));
        }
    }
    Ok(())
}
