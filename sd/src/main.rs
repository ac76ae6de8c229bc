use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use tracing::info;

use styledb::cli::{Cli, Command};
use styledb::config::Config;
use styledb::{PromptStyle, StyleDatabase};

fn setup_logging(level: Option<&str>) {
    let level = match level.map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") | None => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", other);
            tracing::Level::WARN
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(cli.log_level.as_deref().or(config.log_level.as_deref()));

    let styles_path = cli.styles.unwrap_or(config.styles_path);
    let user_styles_path = cli.user_styles.unwrap_or(config.user_styles_path);
    info!(styles = %styles_path.display(), user_styles = %user_styles_path.display(), "styledb starting");

    let db = StyleDatabase::new(&styles_path, &user_styles_path).context("Failed to load styles")?;

    match cli.command {
        Command::List => {
            if db.is_empty() {
                println!("No styles found");
            }
            for style in db.iter() {
                if style.long_description.is_empty() {
                    println!("{}", style.name.cyan());
                } else {
                    println!("{}  {}", style.name.cyan(), style.long_description.dimmed());
                }
            }
        }
        Command::Show { name } => {
            let style = db.get(&name).ok_or_else(|| eyre!("Style not found: {}", name))?;
            print_style(style);
        }
        Command::Apply {
            prompt,
            negative,
            styles,
        } => {
            println!("{} {}", "prompt:".green(), db.apply_styles_to_prompt(&prompt, &styles));
            println!(
                "{} {}",
                "negative:".red(),
                db.apply_negative_styles_to_prompt(&negative, &styles)
            );
        }
        Command::Add {
            name,
            prompt,
            negative,
            description,
        } => {
            // only the user layer is rewritten so base styles stay live
            let mut user_db = StyleDatabase::open(&user_styles_path).context("Failed to load user styles")?;
            user_db.insert(PromptStyle::new(name.clone(), prompt, negative, description));
            user_db
                .save_styles(&user_styles_path)
                .context(format!("Failed to save styles to {}", user_styles_path.display()))?;
            let verb = if db.get(&name).is_some() { "Updated" } else { "Added" };
            println!("{} {} style: {}", "✓".green(), verb, name.cyan());
        }
        Command::Remove { name } => {
            let mut user_db = StyleDatabase::open(&user_styles_path).context("Failed to load user styles")?;
            if user_db.remove(&name).is_none() {
                if db.get(&name).is_some() {
                    return Err(eyre!(
                        "Style '{}' is defined in the base styles file {} and can't be removed",
                        name,
                        styles_path.display()
                    ));
                }
                return Err(eyre!("Style not found: {}", name));
            }
            user_db
                .save_styles(&user_styles_path)
                .context(format!("Failed to save styles to {}", user_styles_path.display()))?;
            println!("{} Removed style: {}", "✓".green(), name.cyan());
        }
        Command::Save { output } => {
            let target = output.unwrap_or(user_styles_path);
            db.save_styles(&target)
                .context(format!("Failed to save styles to {}", target.display()))?;
            println!("{} Saved {} styles to {}", "✓".green(), db.len(), target.display());
        }
    }

    Ok(())
}

fn print_style(style: &PromptStyle) {
    println!("Style: {}", style.name.cyan());
    println!("  Prompt: {}", style.prompt);
    println!("  Negative prompt: {}", style.negative_prompt);
    println!("  Description: {}", style.long_description);
}
