// src/bin/cli.rs
use std::io;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};

use seat_watch::config::{consts::DEFAULT_LOG_FILTER, WatchOptions};
use seat_watch::csv::write_records;
use seat_watch::fetch::{FilePage, HttpPage, PageSource};
use seat_watch::notify::{LogNotifier, Notifier, WebhookNotifier};
use seat_watch::watcher::{PollReport, Schedule, StatusMemory, WatchSettings, Watcher};
use seat_watch::{logf, logw};

fn main() -> Result<()> {
    color_eyre::install()?;

    let opts = WatchOptions::parse();
    seat_watch::logging::init(DEFAULT_LOG_FILTER, opts.log_file.as_deref())
        .wrap_err("could not open log file")?;
    opts.validate()?;

    let source: Box<dyn PageSource> = match &opts.html_file {
        Some(path) => Box::new(FilePage::new(path)),
        None => Box::new(HttpPage::new(&opts.url, opts.form_pairs())?),
    };

    let notifier: Box<dyn Notifier> = match &opts.webhook_url {
        Some(url) if !url.trim().is_empty() => Box::new(WebhookNotifier::new(url.trim())?),
        _ => {
            logw!("WEBHOOK_URL not set; notifications will only be logged");
            Box::new(LogNotifier)
        }
    };

    let schedule = if opts.once { Schedule::once() } else { Schedule::every(opts.interval()) };
    let watcher = Watcher::new(source, notifier, WatchSettings::from_options(&opts));
    let mut memory = StatusMemory::new();

    let format = opts.format;
    let polls = watcher.run(&mut memory, schedule, |report: &PollReport| {
        if let Err(e) = write_records(io::stdout().lock(), &report.records, format) {
            logw!("Could not write poll output: {e}");
        }
    });

    logf!("Done after {polls} poll(s)");
    Ok(())
}
