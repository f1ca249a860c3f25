use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "recipe-sync")]
#[command(about = "Offline-first recipe, shopping list and bookmark cache")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "recipe-sync.toml")]
    pub config: String,

    /// Override session.user_id from the config file
    #[arg(long)]
    pub user: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum Command {
    /// List public recipes
    Recipes {
        #[arg(long)]
        refresh: bool,
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(long, default_value = "")]
        category: String,
    },
    /// List recipes created by the current user
    Mine,
    /// Show one recipe, optionally scaled to a serving count
    Recipe {
        id: String,
        #[arg(short, long)]
        servings: Option<u32>,
    },
    /// List the current user's shopping lists
    Lists {
        #[arg(long)]
        refresh: bool,
    },
    /// Show one shopping list
    List { id: String },
    /// List the current user's saved recipes
    Saved {
        #[arg(long)]
        refresh: bool,
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Scale `name=quantity` pairs from one serving count to another
    Scale {
        #[arg(long)]
        baseline: u32,
        #[arg(long)]
        target: u32,
        #[arg(required = true)]
        lines: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recipes_command() {
        let cli = CliConfig::try_parse_from([
            "recipe-sync",
            "--user",
            "u1",
            "recipes",
            "--refresh",
            "--query",
            "pasta",
        ])
        .unwrap();

        assert_eq!(cli.user.as_deref(), Some("u1"));
        assert_eq!(cli.config, "recipe-sync.toml");
        match cli.command {
            Command::Recipes {
                refresh,
                query,
                category,
            } => {
                assert!(refresh);
                assert_eq!(query, "pasta");
                assert!(category.is_empty());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_scale_requires_lines() {
        assert!(CliConfig::try_parse_from([
            "recipe-sync",
            "scale",
            "--baseline",
            "4",
            "--target",
            "2"
        ])
        .is_err());
    }
}
