//! Controller layout management command.

use anyhow::Context;
use clap::{Args, Subcommand};
use sinefold_config::{
    ControllerLayout, ensure_user_layouts_dir, factory_layouts, is_factory_layout,
    list_user_layouts, paths::layout_name_from_path, resolve_layout, user_layouts_dir,
};
use std::path::PathBuf;

#[derive(Args)]
pub struct LayoutsArgs {
    #[command(subcommand)]
    command: Option<LayoutsCommand>,
}

#[derive(Subcommand)]
enum LayoutsCommand {
    /// List factory and user layouts
    List,

    /// Print a layout's bindings
    Show {
        /// Factory name, user layout name, or file path
        name: String,
    },

    /// Copy a layout into the user layouts directory (or to --output)
    Export {
        /// Factory name, user layout name, or file path
        name: String,

        /// Destination file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a layout file for errors
    Validate {
        /// Layout file
        path: PathBuf,
    },
}

pub fn run(args: LayoutsArgs) -> anyhow::Result<()> {
    match args.command.unwrap_or(LayoutsCommand::List) {
        LayoutsCommand::List => list(),
        LayoutsCommand::Show { name } => show(&name),
        LayoutsCommand::Export { name, output } => export(&name, output),
        LayoutsCommand::Validate { path } => validate(&path),
    }
}

fn list() -> anyhow::Result<()> {
    println!("Factory Layouts");
    println!("===============\n");
    for layout in factory_layouts() {
        print_summary(&layout);
    }

    let user = list_user_layouts();
    println!("\nUser Layouts ({})", user_layouts_dir().display());
    println!("============\n");
    if user.is_empty() {
        println!("  (none)");
    }
    for path in user {
        let name = layout_name_from_path(&path).unwrap_or_default();
        match ControllerLayout::load(&path) {
            Ok(layout) => print_summary(&ControllerLayout { name, ..layout }),
            Err(e) => println!("  {:<14} error: {}", name, e),
        }
    }
    Ok(())
}

fn print_summary(layout: &ControllerLayout) {
    let channel = layout
        .channel
        .map_or_else(|| "all".to_string(), |c| (c + 1).to_string());
    println!(
        "  {:<14} {:>3} bindings, channel {:<3} {}",
        layout.name,
        layout.len(),
        channel,
        layout.description.as_deref().unwrap_or("")
    );
}

fn show(name: &str) -> anyhow::Result<()> {
    let layout = resolve_layout(name)?;
    println!("{}", layout.name);
    if let Some(description) = &layout.description {
        println!("{description}");
    }
    match layout.channel {
        Some(c) => println!("MIDI channel {}", c + 1),
        None => println!("All MIDI channels"),
    }
    println!();
    println!("  {:>3}  Parameter", "CC");
    for binding in &layout.bindings {
        println!("  {:>3}  {}", binding.cc, binding.param);
    }
    Ok(())
}

fn export(name: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    let layout = resolve_layout(name)?;
    let path = match output {
        Some(path) => path,
        None => {
            let file = if is_factory_layout(name) {
                name.to_lowercase()
            } else {
                layout.name.to_lowercase().replace(' ', "_")
            };
            ensure_user_layouts_dir()?.join(format!("{file}.toml"))
        }
    };
    layout
        .save(&path)
        .with_context(|| format!("exporting layout '{name}'"))?;
    println!("Exported '{}' to {}", layout.name, path.display());
    Ok(())
}

fn validate(path: &std::path::Path) -> anyhow::Result<()> {
    let layout = ControllerLayout::load(path)?;
    match sinefold_config::validate_layout(&layout) {
        Ok(()) => {
            println!("{}: OK ({} bindings)", path.display(), layout.len());
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("{}: {}", path.display(), e)),
    }
}
