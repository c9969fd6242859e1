mod cli;
mod commands;
mod config;
mod registry;
mod state;

use anyhow::Result;
use clap::Parser;
use pdfbatch_core::RenameOptions;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, ConfigCommand, GroupsCommand, HorusCommand};
use crate::commands::Ctx;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let data_dir = config::resolve_data_dir(cli.data_dir.clone());
    let ctx = Ctx {
        data_dir: data_dir.clone(),
        yes: cli.yes,
    };

    let tool = cli.command.tool_name();

    let result = match cli.command {
        Command::Tools => {
            list_tools();
            Ok(())
        }
        Command::Split {
            pdf,
            output,
            prefix,
            names,
        } => commands::pdf::split(&ctx, &pdf, output.as_deref(), &prefix, names.as_deref()),
        Command::SplitRanges {
            pdf,
            ranges,
            output,
        } => commands::pdf::split_ranges(&ctx, &pdf, &ranges, output.as_deref()),
        Command::Multiply {
            pdf,
            names,
            prefix,
            output,
        } => commands::pdf::multiply(&ctx, &pdf, &names, &prefix, output.as_deref()),
        Command::DeletePages {
            pdf,
            pages,
            output,
            name,
        } => commands::pdf::delete(&ctx, &pdf, &pages, output.as_deref(), name.as_deref()),
        Command::Merge { inputs, output } => commands::pdf::merge(&ctx, &inputs, &output),
        Command::Groups(command) => match command {
            GroupsCommand::Scan { folder } => commands::pdf::groups_scan(&folder),
            GroupsCommand::Merge { folder, key } => commands::pdf::groups_merge(&ctx, &folder, &key),
            GroupsCommand::MergeAll { folder } => commands::pdf::groups_merge_all(&ctx, &folder),
        },
        Command::Rename {
            folder,
            pattern,
            replacement,
            regex,
            ignore_case,
            apply,
        } => {
            let options = RenameOptions {
                pattern,
                replacement,
                use_regex: regex,
                case_sensitive: !ignore_case,
            };
            commands::pdf::rename(&ctx, &folder, &options, apply)
        }
        Command::Undo => commands::pdf::undo_last(&ctx),
        Command::ValidateEmails { file } => commands::sheets::validate_emails(&file),
        Command::Carnet {
            input,
            output,
            lots,
            expiries,
            detect,
        } => commands::sheets::carnet(&input, output.as_deref(), &lots, &expiries, detect),
        Command::Horus(HorusCommand::Query {
            documents,
            from_excel,
            email,
            password,
            export,
            delay_min_ms,
            delay_max_ms,
        }) => {
            commands::horus::query(
                documents,
                from_excel.as_deref(),
                &email,
                &password,
                export.as_deref(),
                delay_min_ms,
                delay_max_ms,
            )
            .await
        }
        Command::Config(command) => {
            handle_config(&data_dir, command);
            Ok(())
        }
    };

    // Remember the last tool used, like the old shell did for its sidebar.
    let mut app_config = config::load(&data_dir);
    app_config.last_tool = tool.to_string();
    let _ = config::save(&data_dir, &app_config);

    result
}

fn list_tools() {
    let mut categories: Vec<&str> = registry::TOOLS.iter().map(|t| t.category).collect();
    categories.dedup();

    for category in categories {
        println!("{category}:");
        for tool in registry::TOOLS.iter().filter(|t| t.category == category) {
            println!("  {:<16} {}", tool.name, tool.description);
        }
    }
}

fn handle_config(data_dir: &std::path::Path, command: ConfigCommand) {
    match command {
        ConfigCommand::Get => {
            let app_config = config::load(data_dir);
            println!("theme:       {}", app_config.theme);
            println!("color_theme: {}", app_config.color_theme);
            println!("last_tool:   {}", app_config.last_tool);
        }
        ConfigCommand::Set { theme, color_theme } => {
            let mut app_config = config::load(data_dir);
            if let Some(theme) = theme {
                app_config.theme = theme;
            }
            if let Some(color_theme) = color_theme {
                app_config.color_theme = color_theme;
            }
            if let Err(e) = config::save(data_dir, &app_config) {
                eprintln!("Could not save config: {e}");
            }
        }
    }
}
