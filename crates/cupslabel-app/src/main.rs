// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// cupslabel — print PDF labels to a CUPS queue over IPP.
//
// Entry point. Initialises logging, loads settings, and runs one command.

mod data_dir;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use cupslabel_core::config::{JsonSettings, SETTING_DEFINITIONS, SettingsStore};
use cupslabel_core::error::Result;
use cupslabel_core::plugin::PLUGIN_INFO;
use cupslabel_document::LabelPayload;
use cupslabel_print::{LabelPrinter, PrintOptions, PrintRequest};

#[derive(Debug, Parser)]
#[command(name = "cupslabel", version, about = "Print PDF labels to a CUPS queue over IPP")]
struct Cli {
    /// Settings file (flat JSON object of setting keys to values).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a label document. Use `-` to read it from stdin.
    Print {
        document: String,

        /// blank = queue default, auto = derive from the PDF, or a media name.
        #[arg(long)]
        media: Option<String>,

        #[arg(long)]
        copies: Option<u32>,

        #[arg(long)]
        title: Option<String>,

        /// Extra feed after the job in millimetres (0 disables).
        #[arg(long)]
        feed_after_mm: Option<f64>,

        /// key=value job options, comma or newline separated.
        #[arg(long)]
        job_options: Option<String>,

        /// Print the assembled request as JSON instead of submitting it.
        #[arg(long)]
        dry_run: bool,
    },
    /// Show every setting with its effective value.
    Settings,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let path = cli.settings.unwrap_or_else(data_dir::settings_path);
    let store = Arc::new(JsonSettings::load(&path)?);
    tracing::debug!(path = %path.display(), "settings loaded");

    match cli.command {
        Command::Settings => {
            println!(
                "{} {} ({}) by {}",
                PLUGIN_INFO.title, PLUGIN_INFO.version, PLUGIN_INFO.slug, PLUGIN_INFO.author
            );
            println!("settings: {}", path.display());
            for def in SETTING_DEFINITIONS {
                let value = store.get_or_default(def.key);
                println!("{} ({}) = {:?}", def.key, def.name, value);
                println!("    {}", def.description);
            }
            Ok(())
        }
        Command::Print {
            document,
            media,
            copies,
            title,
            feed_after_mm,
            job_options,
            dry_run,
        } => {
            let payload = if document == "-" {
                LabelPayload::reader(std::io::stdin())
            } else {
                LabelPayload::Text(document)
            };
            let options = PrintOptions {
                media,
                copies,
                title,
                feed_after_mm,
                job_options,
            };
            let request = PrintRequest::new(payload, options);
            let printer = LabelPrinter::new(store);

            if dry_run {
                let job = printer.prepare(request)?;
                let summary = serde_json::json!({
                    "job": job.id.to_string(),
                    "created-at": job.created_at.to_rfc3339(),
                    "uri": job.destination_uri,
                    "document-format": job.document_format,
                    "document-bytes": job.document.len(),
                    "job-attributes": job.job_attributes,
                });
                println!("{}", serde_json::to_string_pretty(&summary)?);
                return Ok(());
            }

            printer.print_label(request)
        }
    }
}
