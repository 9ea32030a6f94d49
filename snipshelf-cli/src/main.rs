//! `SnipShelf` CLI - Command-line interface for the `SnipShelf` snippet organizer
//!
//! Provides commands for managing the category tree, tags, snippets and the
//! persisted view state.

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use snipshelf_core::category::CategoryManager;
use snipshelf_core::config::{ConfigManager, LoggingSettings, ViewMode};
use snipshelf_core::error::{ConfigError, SnipShelfError, SnippetError};
use snipshelf_core::models::{Category, CategoryNode, Snippet, SnippetDraft, SnippetType, Tag};
use snipshelf_core::snippet::SnippetManager;
use snipshelf_core::tag::TagManager;
use snipshelf_core::text::{format_date_time, snippet_preview, DEFAULT_PREVIEW_LEN};
use snipshelf_core::MutationOutcome;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// `SnipShelf` command-line interface for organizing text snippets
#[derive(Parser)]
#[command(name = "snipshelf")]
#[command(author, version, about = "SnipShelf command-line interface")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the storage files (defaults to the platform data dir)
    #[arg(short, long, global = true)]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Manage the category tree
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Manage tags
    #[command(subcommand)]
    Tag(TagCommands),

    /// Manage snippets
    #[command(subcommand)]
    Snippet(SnippetCommands),

    /// Show or change the persisted view state
    #[command(subcommand)]
    View(ViewCommands),
}

/// Output format for list commands
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Display as formatted table
    Table,
    /// Output as JSON
    Json,
    /// Output as CSV
    Csv,
}

/// Category subcommands
///
/// Categories are addressed by UUID, by a `/`-separated path such as
/// `Work/Reports`, or by a name that is unique across the tree.
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories sorted by name
    List {
        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Print the category tree
    Tree,

    /// Create a category (returns the existing one if the name is taken)
    Create {
        /// Category name
        name: String,

        /// Parent category
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Rename a category
    Rename {
        /// Category to rename
        category: String,

        /// New name
        new_name: String,
    },

    /// Move a category under another parent
    Move {
        /// Category to move
        category: String,

        /// New parent category (omit to move to the top level)
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Delete a category and all of its descendants
    Delete {
        /// Category to delete
        category: String,
    },

    /// Print the path from the top level down to a category
    Path {
        /// Category to resolve
        category: String,
    },
}

/// Tag subcommands
#[derive(Subcommand)]
pub enum TagCommands {
    /// List all tags with their snippet counts
    List {
        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Add a tag (returns the existing one if the name is taken)
    Add {
        /// Tag name
        name: String,

        /// CSS color
        #[arg(short, long, default_value = "#6b7280")]
        color: String,
    },

    /// Rename a tag and/or change its color
    Rename {
        /// Tag name or ID
        tag: String,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New color
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Delete a tag
    Delete {
        /// Tag name or ID
        tag: String,
    },
}

/// Snippet subcommands
#[derive(Subcommand)]
pub enum SnippetCommands {
    /// List snippets
    List {
        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,

        /// Filter by category
        #[arg(short, long, conflicts_with = "tag")]
        category: Option<String>,

        /// Filter by tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Only pinned snippets
        #[arg(long)]
        pinned: bool,

        /// Only snippets whose category no longer exists
        #[arg(long, conflicts_with_all = ["category", "tag"])]
        orphaned: bool,
    },

    /// Add a new snippet
    Add {
        /// Title
        title: String,

        /// Body text
        #[arg(short = 'b', long)]
        content: String,

        /// Kind of content (text, code, markdown, link)
        #[arg(short, long, default_value = "text")]
        kind: String,

        /// Category
        #[arg(short, long)]
        category: Option<String>,

        /// Comma-separated tag names (created when missing)
        #[arg(short, long)]
        tags: Option<String>,

        /// Language for code snippets
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Show snippet details
    Show {
        /// Snippet title or ID
        snippet: String,
    },

    /// Delete a snippet
    Delete {
        /// Snippet title or ID
        snippet: String,
    },

    /// Pin or unpin a snippet
    Pin {
        /// Snippet title or ID
        snippet: String,
    },

    /// Search snippet titles and bodies
    Search {
        /// Case-insensitive query
        query: String,

        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Print a plain-text preview of a snippet
    Preview {
        /// Snippet title or ID
        snippet: String,

        /// Maximum preview length in characters
        #[arg(short, long, default_value_t = DEFAULT_PREVIEW_LEN)]
        length: usize,
    },
}

/// View subcommands
#[derive(Subcommand)]
pub enum ViewCommands {
    /// Print the current view state
    Show,

    /// Set or toggle dark mode
    DarkMode {
        /// on, off or toggle
        #[arg(value_enum, default_value = "toggle")]
        state: Switch,
    },

    /// Set or toggle the sidebar
    Sidebar {
        /// on, off or toggle
        #[arg(value_enum, default_value = "toggle")]
        state: Switch,
    },

    /// Set the snippet list layout
    Mode {
        /// grid or list
        mode: String,
    },
}

/// Boolean switch argument
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    /// Turn on
    On,
    /// Turn off
    Off,
    /// Flip the current value
    Toggle,
}

impl Switch {
    const fn apply(self, current: bool) -> bool {
        match self {
            Self::On => true,
            Self::Off => false,
            Self::Toggle => !current,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let config_manager = match build_config_manager(cli.data_dir.as_deref()) {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    };

    // Settings may be unreadable; logging still comes up with the default level
    let level = config_manager
        .load_settings()
        .map_or_else(|_| LoggingSettings::default().level, |s| s.logging.level);
    init_logging(&level);
    debug!(dir = %config_manager.config_dir().display(), "Using data directory");

    let result = match cli.command {
        Commands::Category(subcmd) => cmd_category(config_manager, subcmd),
        Commands::Tag(subcmd) => cmd_tag(config_manager, subcmd),
        Commands::Snippet(subcmd) => cmd_snippet(config_manager, subcmd),
        Commands::View(subcmd) => cmd_view(&config_manager, subcmd),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

/// Initializes logging; `RUST_LOG` overrides the configured level
fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the storage location from `--data-dir` or the platform default
fn build_config_manager(data_dir: Option<&str>) -> Result<ConfigManager, CliError> {
    match data_dir {
        Some(dir) => Ok(ConfigManager::with_config_dir(PathBuf::from(
            shellexpand::tilde(dir).into_owned(),
        ))),
        None => Ok(ConfigManager::new()?),
    }
}

// ============================================================================
// Category commands
// ============================================================================

/// Category command handler
fn cmd_category(config_manager: ConfigManager, subcmd: CategoryCommands) -> Result<(), CliError> {
    let mut categories = CategoryManager::new(config_manager)?;
    // One write per command, with the error surfaced to the caller
    categories.set_autosave(false);

    match subcmd {
        CategoryCommands::List { format } => {
            let all = categories.get_all_categories();
            match format {
                OutputFormat::Table => println!("{}", format_category_table(&categories, &all)),
                OutputFormat::Json => println!("{}", format_category_json(&categories, &all)?),
                OutputFormat::Csv => println!("{}", format_category_csv(&categories, &all)),
            }
            Ok(())
        }
        CategoryCommands::Tree => {
            let roots = categories.get_root_categories();
            println!("{}", format_tree(&roots));

            let shown: usize = roots.iter().map(CategoryNode::subtree_len).sum();
            let hidden = categories.category_count().saturating_sub(shown);
            if hidden > 0 {
                println!("({hidden} hidden: duplicate names or missing parents)");
            }
            Ok(())
        }
        CategoryCommands::Create { name, parent } => {
            cmd_category_create(&mut categories, &name, parent.as_deref())
        }
        CategoryCommands::Rename { category, new_name } => {
            let outcome = rename_category(&mut categories, &category, &new_name)?;
            report_outcome(outcome, &format!("Renamed category to '{}'", new_name.trim()));
            Ok(())
        }
        CategoryCommands::Move { category, parent } => {
            let id = find_category(&categories, &category)?.id;
            let parent_id = parent
                .as_deref()
                .map(|p| find_category(&categories, p).map(|c| c.id))
                .transpose()?;
            let outcome = categories.move_category(id, parent_id);
            check_category_outcome(outcome, &category)?;
            categories.flush()?;
            let target = parent.as_deref().unwrap_or("the top level");
            report_outcome(outcome, &format!("Moved category '{category}' to {target}"));
            Ok(())
        }
        CategoryCommands::Delete { category } => {
            let found = find_category(&categories, &category)?;
            let id = found.id;
            let name = found.name.clone();
            let removed = categories.descendant_ids(id).len();
            let outcome = categories.delete_category(id);
            check_category_outcome(outcome, &category)?;
            categories.flush()?;
            println!("Deleted category '{name}' and {} descendant(s)", removed - 1);
            Ok(())
        }
        CategoryCommands::Path { category } => {
            let id = find_category(&categories, &category)?.id;
            let path = categories
                .get_category_path_string(id)
                .ok_or_else(|| CliError::CategoryNotFound(category.clone()))?;
            println!("{path}");
            Ok(())
        }
    }
}

/// Create category command
fn cmd_category_create(
    categories: &mut CategoryManager,
    name: &str,
    parent: Option<&str>,
) -> Result<(), CliError> {
    if name.trim().is_empty() {
        return Err(CliError::Category("Category name cannot be empty".to_string()));
    }

    let parent_id = parent
        .map(|p| find_category(categories, p).map(|c| c.id))
        .transpose()?;

    let outcome = categories.create_category(name, parent_id);
    let id = outcome.id();
    if outcome.is_created() {
        categories.flush()?;
        println!("Created category '{}' with ID {id}", name.trim());
    } else {
        println!("Category '{}' already exists with ID {id}", name.trim());
    }

    Ok(())
}

/// Rename category command, refusing blank names
fn rename_category(
    categories: &mut CategoryManager,
    reference: &str,
    new_name: &str,
) -> Result<MutationOutcome, CliError> {
    if new_name.trim().is_empty() {
        return Err(CliError::Category("Category name cannot be empty".to_string()));
    }

    let id = find_category(categories, reference)?.id;
    let outcome = categories.rename_category(id, new_name);
    check_category_outcome(outcome, reference)?;
    categories.flush()?;
    Ok(outcome)
}

/// Maps a rejected or missing-target outcome to an error
fn check_category_outcome(outcome: MutationOutcome, target: &str) -> Result<(), CliError> {
    match outcome {
        MutationOutcome::NotFound => Err(CliError::CategoryNotFound(target.to_string())),
        rejected if rejected.is_rejected() => Err(CliError::Category(format!(
            "Cannot change '{target}': {rejected}"
        ))),
        _ => Ok(()),
    }
}

fn report_outcome(outcome: MutationOutcome, message: &str) {
    if outcome == MutationOutcome::Unchanged {
        println!("Nothing to change");
    } else {
        println!("{message}");
    }
}

/// Find a category by ID, path or unique name
fn find_category<'a>(
    categories: &'a CategoryManager,
    reference: &str,
) -> Result<&'a Category, CliError> {
    // Try UUID first
    if let Ok(uuid) = Uuid::parse_str(reference) {
        if let Some(category) = categories.get_category(uuid) {
            return Ok(category);
        }
    }

    // Walk a path from the top level
    let segments: Vec<&str> = reference
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if segments.is_empty() {
        return Err(CliError::CategoryNotFound(reference.to_string()));
    }

    let mut parent_id = None;
    let mut current = None;
    for segment in &segments {
        let key = segment.to_lowercase();
        current = categories
            .get_child_categories(parent_id)
            .into_iter()
            .find(|c| c.name_key() == key);
        match current {
            Some(category) => parent_id = Some(category.id),
            None => break,
        }
    }
    if let Some(category) = current {
        return Ok(category);
    }

    // A bare name may live anywhere in the tree
    if segments.len() == 1 {
        let key = segments[0].to_lowercase();
        let matches: Vec<&Category> = categories
            .get_all_categories()
            .into_iter()
            .filter(|c| c.name_key() == key)
            .collect();

        return match matches.len() {
            0 => Err(CliError::CategoryNotFound(reference.to_string())),
            1 => Ok(matches[0]),
            _ => Err(CliError::Category(format!(
                "Ambiguous category name: {reference} (use a path or ID)"
            ))),
        };
    }

    Err(CliError::CategoryNotFound(reference.to_string()))
}

/// Format categories as a table string
#[must_use]
pub fn format_category_table(manager: &CategoryManager, categories: &[&Category]) -> String {
    if categories.is_empty() {
        return "No categories found.".to_string();
    }

    let paths: Vec<String> = categories
        .iter()
        .map(|c| manager.get_category_path_string(c.id).unwrap_or_default())
        .collect();

    let name_width = categories
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);
    let path_width = paths
        .iter()
        .map(|p| p.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    let _ = writeln!(output, "{:<name_width$}  {:<path_width$}  ID", "NAME", "PATH");
    let _ = writeln!(output, "{:-<name_width$}  {:-<path_width$}  {:-<36}", "", "", "");

    for (category, path) in categories.iter().zip(&paths) {
        let _ = writeln!(
            output,
            "{:<name_width$}  {:<path_width$}  {}",
            category.name, path, category.id
        );
    }

    output.trim_end().to_string()
}

/// Format categories as JSON string
///
/// # Errors
///
/// Returns `CliError::Config` if JSON serialization fails.
pub fn format_category_json(
    manager: &CategoryManager,
    categories: &[&Category],
) -> Result<String, CliError> {
    let output: Vec<CategoryOutput> = categories
        .iter()
        .map(|c| CategoryOutput {
            id: c.id.to_string(),
            name: c.name.clone(),
            parent_id: c.parent_id.map(|id| id.to_string()),
            path: manager.get_category_path_string(c.id).unwrap_or_default(),
        })
        .collect();
    serde_json::to_string_pretty(&output)
        .map_err(|e| CliError::Config(format!("Failed to serialize to JSON: {e}")))
}

/// Format categories as CSV string
#[must_use]
pub fn format_category_csv(manager: &CategoryManager, categories: &[&Category]) -> String {
    let mut output = String::from("id,name,parent_id,path\n");

    for category in categories {
        let parent = category.parent_id.map(|id| id.to_string()).unwrap_or_default();
        let path = manager
            .get_category_path_string(category.id)
            .unwrap_or_default();
        let _ = writeln!(
            output,
            "{},{},{},{}",
            category.id,
            escape_csv_field(&category.name),
            parent,
            escape_csv_field(&path)
        );
    }

    output.trim_end().to_string()
}

/// Format the derived tree with box-drawing indentation
#[must_use]
pub fn format_tree(roots: &[CategoryNode]) -> String {
    if roots.is_empty() {
        return "No categories found.".to_string();
    }

    let mut output = String::new();
    for node in roots {
        let _ = writeln!(output, "{}", node.name());
        write_children(&mut output, &node.children, "");
    }

    output.trim_end().to_string()
}

fn write_children(output: &mut String, children: &[CategoryNode], prefix: &str) {
    for (i, node) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let branch = if last { "└── " } else { "├── " };
        let _ = writeln!(output, "{prefix}{branch}{}", node.name());

        let next = format!("{prefix}{}", if last { "    " } else { "│   " });
        write_children(output, &node.children, &next);
    }
}

/// Simplified category output for CLI
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CategoryOutput {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub path: String,
}

// ============================================================================
// Tag commands
// ============================================================================

/// Tag command handler
fn cmd_tag(config_manager: ConfigManager, subcmd: TagCommands) -> Result<(), CliError> {
    let mut tags = TagManager::new(config_manager.clone())?;

    match subcmd {
        TagCommands::List { format } => {
            let snippets = SnippetManager::new(config_manager)?;
            let all = tags.get_all_tags();
            match format {
                OutputFormat::Table => print_tag_table(&all, &snippets),
                OutputFormat::Json => print_tag_json(&all)?,
                OutputFormat::Csv => print_tag_csv(&all, &snippets),
            }
            Ok(())
        }
        TagCommands::Add { name, color } => {
            let outcome = tags.add_tag(&name, &color)?;
            if outcome.is_created() {
                println!("Created tag '{}' with ID {}", name.trim(), outcome.id());
            } else {
                println!("Tag '{}' already exists with ID {}", name.trim(), outcome.id());
            }
            Ok(())
        }
        TagCommands::Rename { tag, name, color } => {
            let id = find_tag(&tags, &tag)?.id;
            match tags.update_tag(id, name.as_deref(), color.as_deref())? {
                MutationOutcome::NotFound => Err(CliError::TagNotFound(tag)),
                outcome @ MutationOutcome::RejectedDuplicate => {
                    Err(CliError::Tag(format!("Cannot change '{tag}': {outcome}")))
                }
                outcome => {
                    report_outcome(outcome, &format!("Updated tag '{tag}'"));
                    Ok(())
                }
            }
        }
        TagCommands::Delete { tag } => {
            let found = find_tag(&tags, &tag)?;
            let id = found.id;
            let name = found.name.clone();
            tags.delete_tag(id)?;
            println!("Deleted tag '{name}' (ID: {id})");
            Ok(())
        }
    }
}

/// Print tags as table
fn print_tag_table(tags: &[&Tag], snippets: &SnippetManager) {
    if tags.is_empty() {
        println!("No tags found.");
        return;
    }

    let name_width = tags
        .iter()
        .map(|t| t.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    println!("{:<name_width$}  {:<9}  SNIPPETS", "NAME", "COLOR");
    println!("{:-<name_width$}  {:-<9}  {:-<8}", "", "", "");

    for tag in tags {
        println!(
            "{:<name_width$}  {:<9}  {}",
            tag.name,
            tag.color,
            snippets.tag_count(tag.id)
        );
    }
}

/// Print tags as JSON
fn print_tag_json(tags: &[&Tag]) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(tags)
        .map_err(|e| CliError::Tag(format!("Failed to serialize: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Print tags as CSV
fn print_tag_csv(tags: &[&Tag], snippets: &SnippetManager) {
    println!("id,name,color,snippets");
    for tag in tags {
        println!(
            "{},{},{},{}",
            tag.id,
            escape_csv_field(&tag.name),
            escape_csv_field(&tag.color),
            snippets.tag_count(tag.id)
        );
    }
}

/// Find a tag by name or ID
fn find_tag<'a>(tags: &'a TagManager, name_or_id: &str) -> Result<&'a Tag, CliError> {
    if let Ok(uuid) = Uuid::parse_str(name_or_id) {
        if let Some(tag) = tags.get_tag(uuid) {
            return Ok(tag);
        }
    }

    tags.get_tag_by_name(name_or_id)
        .ok_or_else(|| CliError::TagNotFound(name_or_id.to_string()))
}

// ============================================================================
// Snippet commands
// ============================================================================

/// Snippet command handler
fn cmd_snippet(config_manager: ConfigManager, subcmd: SnippetCommands) -> Result<(), CliError> {
    let (categories, mut snippets, mut tags) = open_collections(config_manager)?;

    match subcmd {
        SnippetCommands::List {
            format,
            category,
            tag,
            pinned,
            orphaned,
        } => {
            let mut list: Vec<&Snippet> = if orphaned {
                snippets.orphaned(&categories)
            } else if let Some(category) = category {
                let id = find_category(&categories, &category)?.id;
                snippets.get_by_category(Some(id))
            } else if let Some(tag) = tag {
                let id = find_tag(&tags, &tag)?.id;
                snippets.get_by_tag(id)
            } else {
                snippets.list_snippets()
            };
            if pinned {
                list.retain(|s| s.is_pinned);
            }
            print_snippets(&list, format, &categories, &tags)
        }
        SnippetCommands::Add {
            title,
            content,
            kind,
            category,
            tags: tag_names,
            language,
        } => {
            let kind: SnippetType = kind.parse().map_err(CliError::Snippet)?;
            let mut draft = SnippetDraft::new(title.trim(), content).with_kind(kind);

            if let Some(category) = category {
                draft = draft.with_category(find_category(&categories, &category)?.id);
            }
            if let Some(tag_names) = tag_names {
                let mut ids = Vec::new();
                for name in tag_names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
                    ids.push(tags.add_tag(name, "#6b7280")?.id());
                }
                draft = draft.with_tags(ids);
            }
            if let Some(language) = language {
                draft = draft.with_language(language);
            }

            let id = snippets.create_snippet(draft)?;
            println!("Created snippet '{}' with ID {id}", title.trim());
            Ok(())
        }
        SnippetCommands::Show { snippet } => {
            let found = find_snippet(&snippets, &snippet)?;
            print_snippet_details(found, &categories, &tags);
            Ok(())
        }
        SnippetCommands::Delete { snippet } => {
            let found = find_snippet(&snippets, &snippet)?;
            let id = found.id;
            let title = found.title.clone();
            snippets.delete_snippet(id)?;
            println!("Deleted snippet '{title}' (ID: {id})");
            Ok(())
        }
        SnippetCommands::Pin { snippet } => {
            let id = find_snippet(&snippets, &snippet)?.id;
            if snippets.toggle_pin(id)? {
                println!("Pinned snippet {id}");
            } else {
                println!("Unpinned snippet {id}");
            }
            Ok(())
        }
        SnippetCommands::Search { query, format } => {
            let results = snippets.search(&query);
            print_snippets(&results, format, &categories, &tags)
        }
        SnippetCommands::Preview { snippet, length } => {
            let found = find_snippet(&snippets, &snippet)?;
            println!("{}", snippet_preview(&found.content, length));
            Ok(())
        }
    }
}

/// Loads the three collections a snippet command may touch
fn open_collections(
    config_manager: ConfigManager,
) -> snipshelf_core::error::Result<(CategoryManager, SnippetManager, TagManager)> {
    let categories = CategoryManager::new(config_manager.clone())?;
    let snippets = SnippetManager::new(config_manager.clone())?;
    let tags = TagManager::new(config_manager)?;
    Ok((categories, snippets, tags))
}

fn print_snippets(
    snippets: &[&Snippet],
    format: OutputFormat,
    categories: &CategoryManager,
    tags: &TagManager,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Table => println!("{}", format_snippet_table(snippets, categories)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(snippets)
                .map_err(|e| CliError::Snippet(format!("Failed to serialize: {e}")))?;
            println!("{json}");
        }
        OutputFormat::Csv => println!("{}", format_snippet_csv(snippets, categories, tags)),
    }
    Ok(())
}

/// Format snippets as a table string
#[must_use]
pub fn format_snippet_table(snippets: &[&Snippet], categories: &CategoryManager) -> String {
    if snippets.is_empty() {
        return "No snippets found.".to_string();
    }

    let category_names: Vec<String> = snippets
        .iter()
        .map(|s| category_label(s, categories))
        .collect();

    let title_width = snippets
        .iter()
        .map(|s| s.title.chars().count())
        .max()
        .unwrap_or(5)
        .max(5);
    let cat_width = category_names
        .iter()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    let _ = writeln!(
        output,
        "   {:<title_width$}  {:<8}  {:<cat_width$}  PREVIEW",
        "TITLE", "TYPE", "CATEGORY"
    );
    let _ = writeln!(
        output,
        "   {:-<title_width$}  {:-<8}  {:-<cat_width$}  {:-<40}",
        "", "", "", ""
    );

    for (snippet, category) in snippets.iter().zip(&category_names) {
        let pin = if snippet.is_pinned { "*" } else { " " };
        let preview = snippet_preview(&snippet.content, 40).replace('\n', " ");
        let _ = writeln!(
            output,
            "{pin}  {:<title_width$}  {:<8}  {:<cat_width$}  {preview}",
            snippet.title, snippet.kind.as_str(), category
        );
    }

    output.trim_end().to_string()
}

/// Format snippets as CSV string
#[must_use]
pub fn format_snippet_csv(
    snippets: &[&Snippet],
    categories: &CategoryManager,
    tags: &TagManager,
) -> String {
    let mut output = String::from("id,title,type,category,tags,pinned,updated\n");

    for snippet in snippets {
        let tag_names: Vec<&str> = tags
            .get_tags_by_ids(&snippet.tags)
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        let category = snippet
            .category_id
            .and_then(|id| categories.get_category_path_string(id))
            .unwrap_or_default();
        let _ = writeln!(
            output,
            "{},{},{},{},{},{},{}",
            snippet.id,
            escape_csv_field(&snippet.title),
            snippet.kind,
            escape_csv_field(&category),
            escape_csv_field(&tag_names.join(";")),
            snippet.is_pinned,
            snippet.updated_at.to_rfc3339()
        );
    }

    output.trim_end().to_string()
}

/// Print snippet details
fn print_snippet_details(snippet: &Snippet, categories: &CategoryManager, tags: &TagManager) {
    println!("Snippet Details:");
    println!("  ID:       {}", snippet.id);
    println!("  Title:    {}", snippet.title);
    println!("  Type:     {}", snippet.kind);
    println!("  Category: {}", category_label(snippet, categories));

    if let Some(ref language) = snippet.language {
        println!("  Language: {language}");
    }
    let tag_names: Vec<&str> = tags
        .get_tags_by_ids(&snippet.tags)
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    if !tag_names.is_empty() {
        println!("  Tags:     {}", tag_names.join(", "));
    }
    if snippet.is_pinned {
        println!("  Pinned:   yes");
    }
    println!("  Created:  {}", format_date_time(snippet.created_at));
    println!("  Updated:  {}", format_date_time(snippet.updated_at));
    println!();
    println!("{}", snippet.content);
}

/// Category path for display, `-` when uncategorized
fn category_label(snippet: &Snippet, categories: &CategoryManager) -> String {
    match snippet.category_id {
        None => "-".to_string(),
        Some(id) => categories
            .get_category_path_string(id)
            .unwrap_or_else(|| format!("(missing {id})")),
    }
}

/// Find a snippet by title or ID
fn find_snippet<'a>(
    manager: &'a SnippetManager,
    title_or_id: &str,
) -> Result<&'a Snippet, CliError> {
    // Try UUID first
    if let Ok(uuid) = Uuid::parse_str(title_or_id) {
        if let Some(snippet) = manager.get_snippet(uuid) {
            return Ok(snippet);
        }
    }

    let key = title_or_id.trim().to_lowercase();
    let matches: Vec<&Snippet> = manager
        .list_snippets()
        .into_iter()
        .filter(|s| s.title.to_lowercase() == key)
        .collect();

    match matches.len() {
        0 => Err(CliError::SnippetNotFound(title_or_id.to_string())),
        1 => Ok(matches[0]),
        _ => Err(CliError::Snippet(format!(
            "Ambiguous snippet title: {title_or_id} (use the ID)"
        ))),
    }
}

// ============================================================================
// View commands
// ============================================================================

/// View command handler
fn cmd_view(config_manager: &ConfigManager, subcmd: ViewCommands) -> Result<(), CliError> {
    let mut settings = config_manager.load_settings()?;

    match subcmd {
        ViewCommands::Show => {
            let categories = CategoryManager::new(config_manager.clone())?;
            let tags = TagManager::new(config_manager.clone())?;
            let view = &settings.view;

            println!("View Settings:");
            println!("  Dark mode: {}", on_off(view.dark_mode));
            println!("  Sidebar:   {}", on_off(view.sidebar_open));
            println!("  Layout:    {}", mode_name(view.view_mode));
            if let Some(id) = view.selected_category_id {
                let label = categories
                    .get_category_path_string(id)
                    .unwrap_or_else(|| id.to_string());
                println!("  Category:  {label}");
            }
            if let Some(id) = view.selected_tag_id {
                let label = tags.get_tag(id).map_or_else(|| id.to_string(), |t| t.name.clone());
                println!("  Tag:       {label}");
            }
            return Ok(());
        }
        ViewCommands::DarkMode { state } => {
            let value = state.apply(settings.view.dark_mode);
            settings.view.set_dark_mode(value);
            println!("Dark mode {}", on_off(value));
        }
        ViewCommands::Sidebar { state } => {
            let value = state.apply(settings.view.sidebar_open);
            settings.view.set_sidebar_open(value);
            println!("Sidebar {}", on_off(value));
        }
        ViewCommands::Mode { mode } => {
            let mode: ViewMode = mode.parse().map_err(CliError::Config)?;
            settings.view.set_view_mode(mode);
            println!("Layout set to {}", mode_name(mode));
        }
    }

    config_manager.save_settings(&settings)?;
    Ok(())
}

const fn mode_name(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::Grid => "grid",
        ViewMode::List => "list",
    }
}

const fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

/// Escape a CSV field if it contains special characters
fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Exit codes for CLI operations
pub mod exit_codes {
    /// Success - operation completed successfully
    pub const SUCCESS: i32 = 0;
    /// General error - storage, validation, or rejected changes
    pub const GENERAL_ERROR: i32 = 1;
    /// Not found - the referenced category, tag or snippet does not exist
    pub const NOT_FOUND: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration or storage error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Category not found
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Rejected category change
    #[error("Category error: {0}")]
    Category(String),

    /// Tag not found
    #[error("Tag not found: {0}")]
    TagNotFound(String),

    /// Tag error
    #[error("Tag error: {0}")]
    Tag(String),

    /// Snippet not found
    #[error("Snippet not found: {0}")]
    SnippetNotFound(String),

    /// Snippet error
    #[error("Snippet error: {0}")]
    Snippet(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (storage, validation, rejected change, IO)
    /// - 2: Not found (category, tag or snippet)
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::CategoryNotFound(_) | Self::TagNotFound(_) | Self::SnippetNotFound(_) => {
                exit_codes::NOT_FOUND
            }
            Self::Config(_)
            | Self::Category(_)
            | Self::Tag(_)
            | Self::Snippet(_)
            | Self::Io(_) => exit_codes::GENERAL_ERROR,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<SnipShelfError> for CliError {
    fn from(e: SnipShelfError) -> Self {
        match e {
            SnipShelfError::Config(e) => e.into(),
            SnipShelfError::Snippet(e) => e.into(),
            SnipShelfError::Io(e) => Self::Io(e),
        }
    }
}

impl From<SnippetError> for CliError {
    fn from(e: SnippetError) -> Self {
        match e {
            SnippetError::NotFound(id) => Self::SnippetNotFound(id.to_string()),
            SnippetError::Invalid(reason) => Self::Snippet(reason),
            SnippetError::Storage(e) => Self::Config(e.to_string()),
        }
    }
}
