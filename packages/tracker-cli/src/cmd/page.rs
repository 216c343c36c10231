//! Page-side commands: run the extractor over a saved page and talk to the
//! background context.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use console::style;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use job_tracker::extractor::CompanySource;
use job_tracker::messaging::spawn_responder;
use job_tracker::{
    page_events, DocumentSource, Extraction, PageContext, PageEvent, PageWatcher, SignalSink,
    TabInfo,
};

use crate::context::AppContext;
use crate::page_file::FilePage;

/// How often `watch` checks the file for changes.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Args, Debug)]
pub struct PageArgs {
    /// Saved HTML of the page
    pub file: PathBuf,

    /// Address the page was loaded from
    #[arg(long)]
    pub url: String,
}

impl PageArgs {
    fn page(&self) -> FilePage {
        FilePage::new(&self.file, &self.url)
    }
}

/// Extract once and hand a positive result to the background relay.
pub async fn capture(ctx: &AppContext, args: PageArgs) -> Result<()> {
    let extractor = ctx.extractor()?;
    let snapshot = args
        .page()
        .snapshot()
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let extraction = extractor.extract(&snapshot);
    print_extraction(ctx, &extraction);

    let Some(signal) = extraction.into_signal(Utc::now()) else {
        ctx.print_warning("Not a job page; nothing captured");
        return Ok(());
    };

    let background = ctx.background().await?;
    background.client.push(signal).await?;
    background.shutdown().await?;

    ctx.print_success(&format!(
        "Captured. Quick-add is available for the next {} seconds.",
        ctx.config.relay_config().ttl().as_secs()
    ));
    Ok(())
}

/// Follow a page file, re-extracting after it changes, until Ctrl-C.
pub async fn watch(ctx: &AppContext, args: PageArgs) -> Result<()> {
    let extractor = ctx.extractor()?;
    let debounce = ctx.config.extractor_config()?.debounce();
    let page = Arc::new(args.page());

    ctx.print_header(&format!("Watching {}", page.path().display()));
    ctx.print_info("Press Ctrl-C to stop");

    let background = ctx.background().await?;
    let (events, rx) = page_events();
    let watcher = PageWatcher::new(extractor, page.clone(), background.client.clone(), debounce);
    let task = tokio::spawn(watcher.run(rx));

    if !page.is_loaded() {
        ctx.print_warning("File does not exist yet; waiting for it");
    }

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    let mut loaded = page.is_loaded();
    let mut last_modified = page.modified();

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                let event = if !loaded && page.is_loaded() {
                    loaded = true;
                    Some(PageEvent::ContentReady)
                } else if page.modified() != last_modified {
                    Some(PageEvent::SubtreeInserted)
                } else {
                    None
                };
                last_modified = page.modified();

                if let Some(event) = event {
                    tracing::debug!(?event, "Page file changed");
                    if events.send(event).is_err() {
                        break;
                    }
                }
            }
        }
    }

    drop(events);
    let summary = task.await.context("Page watcher failed")?;
    background.shutdown().await?;

    println!();
    ctx.print_success(&format!(
        "Stopped after {} extraction runs, {} signals pushed",
        summary.runs, summary.pushes
    ));
    if summary.failures > 0 {
        ctx.print_warning(&format!("{} runs failed; see the log", summary.failures));
    }
    Ok(())
}

/// Ask the page context what it sees.
pub async fn page_info(ctx: &AppContext, args: PageArgs, json: bool) -> Result<()> {
    let (client, _handle) = spawn_responder(PageContext::new(ctx.extractor()?, args.page()));
    let info = client.get_page_info().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    ctx.print_header(&info.title);
    print_field("URL", &info.url);
    print_field("Domain", &info.domain);
    print_field("Job title", &info.job_title);
    print_field("Company", &info.company_name);
    print_field("Location", &info.job_location);
    Ok(())
}

/// Report a completed tab load to the background context.
pub async fn tab(ctx: &AppContext, url: String, id: u32) -> Result<()> {
    let background = ctx.background_context().await?;
    background.tab_updated(TabInfo::new(id, url), true).await?;

    let domain = background.current_domain().await?;
    if domain.is_empty() {
        ctx.print_warning("No domain recorded");
    } else {
        ctx.print_success(&format!("Current domain: {domain}"));
    }
    Ok(())
}

/// Show what quick-add would use right now.
pub async fn signal(ctx: &AppContext, json: bool) -> Result<()> {
    let background = ctx.background().await?;
    let data = background.client.get_auto_fill_data().await?;
    let domain = background.client.get_current_domain().await?;
    background.shutdown().await?;

    if json {
        let body = serde_json::json!({ "data": data, "domain": domain });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    match data {
        Some(signal) => {
            ctx.print_header("Fresh job page signal");
            print_field("Company", &signal.company_name);
            print_field("Job title", &signal.job_title);
            print_field("Location", &signal.job_location);
            print_field("URL", &signal.url);
            print_field("Captured", &signal.captured_at.to_rfc3339());
        }
        None => ctx.print_warning("No recent job page captured"),
    }
    if !domain.is_empty() {
        print_field("Current domain", &domain);
    }
    Ok(())
}

fn print_extraction(ctx: &AppContext, extraction: &Extraction) {
    ctx.print_header(&extraction.url);
    let verdict = if extraction.is_job_page {
        style("yes").green()
    } else {
        style("no").red()
    };
    println!("  {:<10} {}", style("Job page").dim(), verdict);
    print_field("Title", &extraction.job_title);

    let source = match extraction.company_source {
        CompanySource::Selector => "page",
        CompanySource::ReferenceNumber => "reference line",
        CompanySource::Domain => "domain",
        CompanySource::Missing => "none",
    };
    print_field(
        "Company",
        &format!("{} ({source})", extraction.company_name),
    );
    print_field("Location", &extraction.job_location);
}

fn print_field(label: &str, value: &str) {
    let value = if value.is_empty() { "-" } else { value };
    println!("  {:<10} {}", style(label).dim(), value);
}
