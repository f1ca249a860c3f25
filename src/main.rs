use anyhow::Context;
use clap::Parser;
use recipe_sync::domain::ports::ConfigProvider;
use recipe_sync::utils::error::ErrorSeverity;
use recipe_sync::utils::{logger, validation::Validate};
use recipe_sync::{
    scale_ingredients, CliConfig, Command, Ingredient, IngredientLine, RecipeBook, StaticIdentity,
    SyncError, TomlConfig,
};
use serde::Serialize;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(user) = &cli.user {
        config.session.user_id = Some(user.clone());
    }

    // 初始化日誌
    if cli.json_logs || config.logging.json {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger(cli.verbose, config.log_level());
    }

    tracing::info!("🚀 Starting recipe-sync");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let result = match cli.command {
        Command::Scale {
            baseline,
            target,
            lines,
        } => run_scale(baseline, target, &lines),
        command => {
            let identity = Arc::new(StaticIdentity(config.user_id().map(str::to_string)));
            let book = RecipeBook::open(&config, identity)
                .await
                .with_context(|| format!("opening cache at {}", config.cache_directory()))?;
            run(&book, command).await
        }
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(book: &RecipeBook, command: Command) -> Result<(), SyncError> {
    match command {
        Command::Recipes {
            refresh,
            query,
            category,
        } => print_json(&book.recipes().get_recipes(refresh, &query, &category).await?),
        Command::Mine => print_json(&book.my_recipes().await?),
        Command::Recipe { id, servings } => match book.recipes().get_recipe(&id).await? {
            Some(mut detail) => {
                if let Some(servings) = servings {
                    detail.set_servings(servings)?;
                }
                for unparsed in detail.unparsed() {
                    tracing::warn!(
                        "⚠️ '{}' shown as stored: {}",
                        unparsed.ingredient.name,
                        unparsed.error
                    );
                }
                print_json(&detail)
            }
            None => {
                println!("Recipe {} not found", id);
                Ok(())
            }
        },
        Command::Lists { refresh } => print_json(&book.my_shopping_lists(refresh).await?),
        Command::List { id } => match book.shopping_lists().get_shopping_list(&id).await? {
            Some(list) => {
                tracing::info!(
                    "🛒 {}: {} of {} items still to buy",
                    list.list.name,
                    list.pending().count(),
                    list.items().len()
                );
                print_json(&list)
            }
            None => {
                println!("Shopping list {} not found", id);
                Ok(())
            }
        },
        Command::Saved { refresh, query } => {
            print_json(&book.my_saved_recipes(&query, refresh).await?)
        }
        Command::Scale {
            baseline,
            target,
            lines,
        } => run_scale(baseline, target, &lines),
    }
}

fn run_scale(baseline: u32, target: u32, raw_lines: &[String]) -> Result<(), SyncError> {
    let lines: Vec<IngredientLine> = raw_lines
        .iter()
        .map(|raw| {
            let (name, quantity) = raw.split_once('=').unwrap_or((raw.as_str(), ""));
            let ingredient = Ingredient {
                id: name.trim().to_string(),
                name: name.trim().to_string(),
                image: String::new(),
                category: String::new(),
            };
            IngredientLine::new(ingredient, quantity.trim())
        })
        .collect();

    let report = scale_ingredients(&lines, baseline, target)?;
    for line in &report.lines {
        println!("{} = {}", line.ingredient.name, line.quantity);
    }
    if !report.is_clean() {
        tracing::warn!("⚠️ {} line(s) could not be scaled", report.unparsed.len());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), SyncError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
