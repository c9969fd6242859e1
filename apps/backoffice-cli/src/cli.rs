//! Command-line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "backoffice", version, about = "Back-office document suite")]
pub struct Cli {
    /// Data directory for config and undo state.
    #[arg(long, env = "BACKOFFICE_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Answer yes to every confirmation prompt.
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the available tools by category.
    Tools,

    /// Split every page of a PDF into its own file (removes the original).
    Split {
        pdf: PathBuf,
        /// Output folder (default: beside the PDF).
        #[arg(long)]
        output: Option<PathBuf>,
        /// Name prefix, joined as `prefix_name`.
        #[arg(long, default_value = "")]
        prefix: String,
        /// File with one name per page; without it pages become `page_N`.
        #[arg(long)]
        names: Option<PathBuf>,
    },

    /// Extract the pages of a range expression into per-page files.
    SplitRanges {
        pdf: PathBuf,
        /// Pages like "1-3,5" (empty means all).
        #[arg(long, default_value = "")]
        ranges: String,
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Copy a one-page PDF once per name.
    Multiply {
        pdf: PathBuf,
        /// File with one name per copy (at most 10).
        #[arg(long)]
        names: PathBuf,
        #[arg(long, default_value = "")]
        prefix: String,
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Write a copy of a PDF without the selected pages.
    DeletePages {
        pdf: PathBuf,
        /// Pages to remove, like "2,5-7".
        #[arg(long)]
        pages: String,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Output file name (default `{stem}_edited`).
        #[arg(long)]
        name: Option<String>,
    },

    /// Merge PDF files into one, in the given order.
    Merge {
        #[arg(required = true, num_args = 2..)]
        inputs: Vec<PathBuf>,
        #[arg(long)]
        output: PathBuf,
    },

    /// Group a folder's PDFs by name prefix and merge the groups.
    #[command(subcommand)]
    Groups(GroupsCommand),

    /// Bulk-rename a folder's PDFs.
    Rename {
        folder: PathBuf,
        /// Text (or regex with --regex) to search in the file stem.
        #[arg(long)]
        pattern: String,
        #[arg(long, default_value = "")]
        replacement: String,
        #[arg(long)]
        regex: bool,
        #[arg(long)]
        ignore_case: bool,
        /// Apply the renames; without this flag only the preview prints.
        #[arg(long)]
        apply: bool,
    },

    /// Reverse the most recent PDF operation.
    Undo,

    /// Validate the email column of a spreadsheet (format + MX).
    ValidateEmails { file: PathBuf },

    /// Transform a vaccination sheet into the registry upload.
    Carnet {
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Per-vaccine lot, repeatable: --lot INFLUVAC=K17
        #[arg(long = "lot", value_name = "VACCINE=LOT")]
        lots: Vec<String>,
        /// Per-vaccine expiry, repeatable: --expiry INFLUVAC=01/12/2026
        #[arg(long = "expiry", value_name = "VACCINE=DATE")]
        expiries: Vec<String>,
        /// Only report which vaccines the file mentions.
        #[arg(long)]
        detect: bool,
    },

    /// Query the Horus Health affiliate registry.
    #[command(subcommand)]
    Horus(HorusCommand),

    /// Show or change persisted settings.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
pub enum GroupsCommand {
    /// List the prefix groups a merge would act on.
    Scan { folder: PathBuf },
    /// Merge one group by its key.
    Merge { folder: PathBuf, key: String },
    /// Merge every group in the folder.
    MergeAll { folder: PathBuf },
}

#[derive(Subcommand)]
pub enum HorusCommand {
    /// Look up affiliates by document identifier.
    Query {
        /// Documents like CC123456789.
        documents: Vec<String>,
        /// Read documents from an upload sheet (row 3+, columns C and D).
        #[arg(long)]
        from_excel: Option<PathBuf>,
        #[arg(long, env = "HORUS_EMAIL")]
        email: String,
        #[arg(long, env = "HORUS_PASSWORD", hide_env_values = true)]
        password: String,
        /// Write the results to this workbook.
        #[arg(long)]
        export: Option<PathBuf>,
        /// Minimum pause between requests, in milliseconds.
        #[arg(long, default_value_t = 2000)]
        delay_min_ms: u64,
        /// Maximum pause between requests, in milliseconds.
        #[arg(long, default_value_t = 3000)]
        delay_max_ms: u64,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the current configuration.
    Get,
    /// Update configuration values.
    Set {
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        color_theme: Option<String>,
    },
}

impl Command {
    /// Registry name of the tool a command invokes, recorded in the
    /// config's `last_tool`.
    pub fn tool_name(&self) -> &'static str {
        match self {
            Command::Tools => "tools",
            Command::Split { .. } => "split",
            Command::SplitRanges { .. } => "split-ranges",
            Command::Multiply { .. } => "multiply",
            Command::DeletePages { .. } => "delete-pages",
            Command::Merge { .. } => "merge",
            Command::Groups(_) => "groups",
            Command::Rename { .. } => "rename",
            Command::Undo => "undo",
            Command::ValidateEmails { .. } => "validate-emails",
            Command::Carnet { .. } => "carnet",
            Command::Horus(_) => "horus",
            Command::Config(_) => "config",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_split_with_names() {
        let cli = Cli::try_parse_from([
            "backoffice",
            "split",
            "in.pdf",
            "--prefix",
            "OPF",
            "--names",
            "names.txt",
        ])
        .unwrap();
        match cli.command {
            Command::Split { prefix, names, .. } => {
                assert_eq!(prefix, "OPF");
                assert!(names.is_some());
            }
            _ => panic!("expected split"),
        }
    }

    #[test]
    fn test_parse_groups_merge_all() {
        let cli = Cli::try_parse_from(["backoffice", "-y", "groups", "merge-all", "/tmp/in"]).unwrap();
        assert!(cli.yes);
        assert!(matches!(
            cli.command,
            Command::Groups(GroupsCommand::MergeAll { .. })
        ));
    }

    #[test]
    fn test_merge_requires_two_inputs() {
        assert!(Cli::try_parse_from(["backoffice", "merge", "a.pdf", "--output", "out.pdf"]).is_err());
    }

    #[test]
    fn test_parse_carnet_repeatable_lots() {
        let cli = Cli::try_parse_from([
            "backoffice",
            "carnet",
            "in.xlsx",
            "--lot",
            "INFLUVAC=K17",
            "--lot",
            "VPH=Y000435",
            "--expiry",
            "INFLUVAC=01/12/2026",
            "--expiry",
            "VPH=01/06/2027",
        ])
        .unwrap();
        match cli.command {
            Command::Carnet { lots, expiries, .. } => {
                assert_eq!(lots.len(), 2);
                assert_eq!(expiries.len(), 2);
            }
            _ => panic!("expected carnet"),
        }
    }
}
