//! PDF tool commands.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use pdfbatch_core::{
    apply_renames, delete_pages, merge_all_groups, merge_files, merge_group, multiply_document,
    plan_renames, scan_groups, split_by_ranges, split_into_pages, undo, RenameOptions, UndoRecord,
};

use crate::commands::{confirm, print_errors, read_names, Ctx};
use crate::state;

fn remember(ctx: &Ctx, record: &UndoRecord) -> Result<()> {
    state::save_record(&ctx.data_dir, record)?;
    Ok(())
}

pub fn split(
    ctx: &Ctx,
    pdf: &Path,
    output: Option<&Path>,
    prefix: &str,
    names_file: Option<&Path>,
) -> Result<()> {
    let names = names_file.map(read_names).transpose()?;
    let outcome = split_into_pages(pdf, output, prefix, names.as_deref())?;

    println!("Created {} files:", outcome.created.len());
    for path in &outcome.created {
        println!("  {}", path.display());
    }
    if outcome.original_removed {
        println!("Original removed: {}", pdf.display());
    } else {
        println!("Original kept: {}", pdf.display());
    }

    remember(ctx, &outcome.record)
}

pub fn split_ranges(ctx: &Ctx, pdf: &Path, ranges: &str, output: Option<&Path>) -> Result<()> {
    let outcome = split_by_ranges(pdf, output, ranges)?;
    println!("Created {} files:", outcome.created.len());
    for path in &outcome.created {
        println!("  {}", path.display());
    }
    remember(ctx, &outcome.record)
}

pub fn multiply(
    ctx: &Ctx,
    pdf: &Path,
    names_file: &Path,
    prefix: &str,
    output: Option<&Path>,
) -> Result<()> {
    let names = read_names(names_file)?;
    let outcome = multiply_document(pdf, output, prefix, &names)?;
    println!("Created {} copies, original kept.", outcome.created.len());
    for path in &outcome.created {
        println!("  {}", path.display());
    }
    remember(ctx, &outcome.record)
}

pub fn delete(
    ctx: &Ctx,
    pdf: &Path,
    pages: &str,
    output: Option<&Path>,
    name: Option<&str>,
) -> Result<()> {
    let outcome = delete_pages(pdf, pages, output, name)?;
    println!(
        "Wrote {} ({} pages kept).",
        outcome.output.display(),
        outcome.kept_pages
    );
    remember(ctx, &outcome.record)
}

pub fn merge(ctx: &Ctx, inputs: &[PathBuf], output: &Path) -> Result<()> {
    let outcome = merge_files(inputs, output)?;
    println!("Merged {} files into {}", inputs.len(), outcome.output.display());
    remember(ctx, &outcome.record)
}

pub fn groups_scan(folder: &Path) -> Result<()> {
    let groups = scan_groups(folder)?;
    if groups.is_empty() {
        println!("No groups with more than one PDF.");
        return Ok(());
    }
    println!("{} group(s):", groups.len());
    for group in &groups {
        println!("  {}  ({} files)", group.key, group.files.len());
        for file in &group.files {
            println!("    {file}");
        }
    }
    Ok(())
}

pub fn groups_merge(ctx: &Ctx, folder: &Path, key: &str) -> Result<()> {
    let groups = scan_groups(folder)?;
    let Some(group) = groups.into_iter().find(|g| g.key == key) else {
        bail!("No group '{key}' in {}", folder.display());
    };

    if !confirm(
        ctx,
        &format!("Merge {} PDFs of group '{key}'?", group.files.len()),
    ) {
        return Ok(());
    }

    let outcome = merge_group(folder, &group.key, &group.files)?;
    print_errors(&outcome.errors);
    match (&outcome.output, &outcome.record) {
        (Some(output), Some(record)) => {
            println!("Group '{key}' merged into {}", output.display());
            remember(ctx, record)
        }
        _ => bail!("Could not merge group '{key}'"),
    }
}

pub fn groups_merge_all(ctx: &Ctx, folder: &Path) -> Result<()> {
    let groups = scan_groups(folder)?;
    if groups.is_empty() {
        println!("No groups to merge.");
        return Ok(());
    }
    if !confirm(ctx, &format!("Merge all {} group(s)?", groups.len())) {
        return Ok(());
    }

    let outcome = merge_all_groups(folder)?;
    print_errors(&outcome.errors);
    println!(
        "Merged {} of {} group(s).",
        outcome.merged.len(),
        outcome.total_groups
    );
    if let Some(record) = &outcome.record {
        remember(ctx, record)?;
    }
    Ok(())
}

pub fn rename(
    ctx: &Ctx,
    folder: &Path,
    options: &RenameOptions,
    apply: bool,
) -> Result<()> {
    let planned = plan_renames(folder, options)?;
    if planned.is_empty() {
        println!("Nothing to rename.");
        return Ok(());
    }

    println!("{} rename(s):", planned.len());
    for item in &planned {
        println!("  {}  ->  {}", item.from, item.to);
    }
    if !apply {
        println!("Preview only. Re-run with --apply to rename.");
        return Ok(());
    }
    if !confirm(ctx, &format!("Apply {} rename(s)?", planned.len())) {
        return Ok(());
    }

    let outcome = apply_renames(folder, &planned);
    print_errors(&outcome.errors);
    println!("Renamed {} file(s).", outcome.applied.len());
    if let Some(record) = &outcome.record {
        remember(ctx, record)?;
    }
    Ok(())
}

pub fn undo_last(ctx: &Ctx) -> Result<()> {
    let Some(record) = state::load_record(&ctx.data_dir) else {
        println!("No operation to undo.");
        return Ok(());
    };

    if !confirm(ctx, &format!("Undo the last operation ({})?", record.describe())) {
        return Ok(());
    }

    let report = undo(&record)?;
    print_errors(&report.errors);
    if !report.restored.is_empty() {
        println!("Restored {} file(s).", report.restored.len());
    }
    if !report.removed.is_empty() {
        println!("Removed {} file(s).", report.removed.len());
    }
    state::clear_record(&ctx.data_dir);
    Ok(())
}
