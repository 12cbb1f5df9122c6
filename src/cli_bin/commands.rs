//! CLI command handlers that bridge CLI arguments to library operations
//!
//! Handlers print results to stdout and leave diagnostics to the log. A batch
//! that partly failed is reported per note and then surfaces as an error so
//! that the process exits non-zero.

use crate::cli_bin::args::*;
use anyhow::{bail, Result};
use log::{debug, info, warn};
use std::io::{self, BufRead, Write};
use vaultnotes::{
    BatchOutcome, ModifyRequest, NewNote, NoteOperations, SearchOrchestrator, SearchRequest,
    SearchResult, TemplateNote, VaultConfig,
};

/// Execute the search command
pub fn search_command(config: VaultConfig, args: SearchArgs) -> Result<()> {
    debug!("Executing search command with args: {:?}", args);

    let mut request = SearchRequest::new(args.criteria())
        .with_operator(args.operator)
        .modified_between(args.modified_after, args.modified_before);
    if let Some(n) = args.last {
        request = request.with_last(n);
    }

    let orchestrator = SearchOrchestrator::new(config)?;
    let results = orchestrator.search(&request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", render_table(&results));
    }
    Ok(())
}

/// Execute the modify command
pub fn modify_command(config: VaultConfig, args: ModifyArgs) -> Result<()> {
    debug!("Executing modify command with args: {:?}", args);

    let request = ModifyRequest {
        property_values: args.property_value,
        add_tags: args.add_tag,
        set_tag: args.set_tag,
        remove_tags: args.remove_tag,
        content: args.content,
    };

    let ops = NoteOperations::new(config);
    let outcome = ops.modify(&args.ids, &request)?;
    report_outcome(&outcome, args.json, "modified", args.ids.len())
}

/// Execute the delete command
pub fn delete_command(config: VaultConfig, args: DeleteArgs) -> Result<()> {
    debug!("Executing delete command with args: {:?}", args);

    let ops = NoteOperations::new(config);
    let targets = ops.resolve_for_delete(&args.ids)?;

    if !args.yes {
        println!("The following notes will be deleted:");
        for target in &targets {
            println!("  [{}] {}", target.index, target.relative_path);
        }
        if !confirm("Are you sure? [y/N] ")? {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    let outcome = ops.delete(&targets);
    report_outcome(&outcome, args.json, "deleted", targets.len())
}

/// Execute the create command
pub fn create_command(config: VaultConfig, args: CreateArgs) -> Result<()> {
    debug!("Executing create command with args: {:?}", args);

    let ops = NoteOperations::new(config);
    let created = ops.create(&NewNote {
        path: args.path,
        title: args.title,
        tags: args.tag,
        property_values: args.property_value,
        content: args.content,
    })?;

    println!("Note created: {}", created.relative_path);
    Ok(())
}

/// Execute the create-from-template command
pub fn create_from_template_command(config: VaultConfig, args: CreateFromTemplateArgs) -> Result<()> {
    debug!("Executing create-from-template command with args: {:?}", args);

    let ops = NoteOperations::new(config);
    let created = ops.create_from_template(&TemplateNote {
        path: args.path,
        title: args.title,
        template: args.template,
        replacements: args.replace,
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&created)?);
    } else {
        println!("Note created: {}", created.relative_path);
    }
    Ok(())
}

fn report_outcome(outcome: &BatchOutcome, json: bool, verb: &str, total: usize) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    for error in &outcome.errors {
        warn!("{}", error);
        eprintln!("Error: {}", error);
    }
    if !outcome.success {
        bail!("{} of {} notes could not be {}", outcome.errors.len(), total, verb);
    }

    info!("{} notes {}", total, verb);
    println!("Notes {} successfully.", verb);
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Aligned `ID | Path | Title | Last Modified` table
fn render_table(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No results found.\n".to_string();
    }

    let headers = ["ID", "Path", "Title", "Last Modified"];
    let rows: Vec<[String; 4]> = results
        .iter()
        .map(|r| {
            [
                r.id(),
                r.relative_path.clone(),
                r.display_title().to_string(),
                r.display_date(),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: [&str; 4]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        format!("{}\n", padded.join(" | ").trim_end())
    };

    let mut out = format_row(headers);
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("{}\n", separator.join("-+-")));
    for row in &rows {
        out.push_str(&format_row([&row[0], &row[1], &row[2], &row[3]]));
    }
    out
}
