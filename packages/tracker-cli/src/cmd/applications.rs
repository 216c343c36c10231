//! Application record commands

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Args;
use console::style;

use job_tracker::{
    ApplicationId, ApplicationRecord, ApplicationStatus, NewApplication, PageSignal,
};

use crate::context::AppContext;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Company name
    #[arg(short, long)]
    pub company: String,

    /// Application date, YYYY-MM-DD (default: today)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Job location
    #[arg(short, long)]
    pub location: Option<String>,

    /// Status label, e.g. pending, applied, interviewing
    #[arg(short, long, default_value = ApplicationStatus::PENDING)]
    pub status: String,
}

pub async fn add(ctx: &AppContext, args: AddArgs) -> Result<()> {
    let mut new = NewApplication::new(args.company, args.date.unwrap_or_else(today))
        .with_status(ApplicationStatus::new(args.status));
    if let Some(location) = args.location {
        new = new.with_location(location);
    }

    let record = ctx.store().create(new).await?;
    warn_unknown_status(ctx, &record.status);
    ctx.print_success(&format!("Added {} ({})", record.company_name, record.id));
    Ok(())
}

/// Record an application straight from the fresh page signal.
pub async fn quick_add(ctx: &AppContext, status: String, date: Option<NaiveDate>) -> Result<()> {
    let background = ctx.background().await?;
    let signal = background.client.get_auto_fill_data().await?;
    background.shutdown().await?;

    let Some(signal) = signal else {
        ctx.print_warning("No recent job page captured; run `tracker capture` first");
        return Ok(());
    };

    let Some(new) = draft_from_signal(&signal, date.unwrap_or_else(today), status) else {
        ctx.print_warning(&format!(
            "No company name found on {}; use `tracker add --company` instead",
            signal.url
        ));
        return Ok(());
    };
    let record = ctx.store().create(new).await?;
    warn_unknown_status(ctx, &record.status);
    ctx.print_success(&format!(
        "Added {} ({}) from {}",
        record.company_name, record.id, signal.url
    ));
    Ok(())
}

/// The record a quick-add would create, or `None` when the page gave no
/// company name.
fn draft_from_signal(
    signal: &PageSignal,
    date: NaiveDate,
    status: String,
) -> Option<NewApplication> {
    if signal.company_name.trim().is_empty() {
        return None;
    }
    Some(NewApplication::from_signal(
        signal,
        date,
        ApplicationStatus::new(status),
    ))
}

pub async fn list(ctx: &AppContext) -> Result<()> {
    let records = ctx.store().list_for_display().await?;

    if records.is_empty() {
        ctx.print_info("No applications yet. Add your first application with `tracker add`.");
        return Ok(());
    }

    ctx.print_header(&format!("{} applications", records.len()));
    for record in &records {
        print_record(ctx, record);
    }
    Ok(())
}

pub async fn delete(ctx: &AppContext, id: u64) -> Result<()> {
    if ctx.store().delete_by_id(ApplicationId(id)).await? {
        ctx.print_success(&format!("Deleted {id}"));
    } else {
        ctx.print_warning(&format!("No application with id {id}"));
    }
    Ok(())
}

fn print_record(ctx: &AppContext, record: &ApplicationRecord) {
    println!();
    println!(
        "  {}  {}",
        style(&record.company_name).bold(),
        ctx.styled_status(&record.status)
    );
    let location = match record.location() {
        "" => String::new(),
        location => format!("  {location}"),
    };
    println!(
        "  {}{}  {}",
        record.application_date.format("%Y-%m-%d"),
        location,
        style(format!("id {}", record.id)).dim()
    );
}

fn warn_unknown_status(ctx: &AppContext, status: &ApplicationStatus) {
    if !status.is_known() {
        ctx.print_warning(&format!(
            "`{status}` is not one of: {}",
            ApplicationStatus::KNOWN.join(", ")
        ));
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
