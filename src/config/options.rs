// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser, ValueEnum};

use super::consts::*;
use crate::engine::{DuplicatePolicy, ExtractOptions};
use crate::error::ConfigError;

/// Everything the watcher needs, from flags or the environment.
#[derive(Parser, Clone, Debug, PartialEq, Eq)]
#[command(name = "seat_watch", version, about = "Watch course sections for open seats")]
pub struct WatchOptions {
    /// Results page (GET), or form endpoint when --form is given (POST).
    #[arg(long, env = "COURSE_SEARCH_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Section identifiers to watch, comma separated.
    #[arg(long, env = "TARGET_CRNS", value_delimiter = ',', default_value = DEFAULT_TARGETS)]
    pub targets: Vec<String>,

    #[arg(long = "interval-ms", env = "POLL_INTERVAL_MS", default_value_t = DEFAULT_INTERVAL_MS)]
    pub interval_ms: u64,

    /// Webhook for notifications. Discord URLs get a `content` body, others `text`.
    #[arg(long, env = "WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Notify on every poll a section is open, not just on the transition.
    #[arg(
        long,
        env = "NOTIFY_EVERY_POLL",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub notify_every_poll: bool,

    #[arg(long, env = "SUBJECT_LABEL", default_value = DEFAULT_SUBJECT)]
    pub subject_label: String,

    #[arg(long, env = "COURSE_NUMBER", default_value = DEFAULT_COURSE)]
    pub course_number: String,

    /// Form field to submit, KEY=VALUE. Repeatable or comma separated.
    #[arg(long = "form", env = "FORM_FIELDS", value_delimiter = ',', value_parser = parse_form_field)]
    pub form: Vec<FormField>,

    /// Read a saved results page instead of fetching.
    #[arg(long, env = "HTML_FILE")]
    pub html_file: Option<PathBuf>,

    /// Poll once and exit.
    #[arg(long)]
    pub once: bool,

    #[arg(long, env = "OUTPUT_FORMAT", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Which row wins when a CRN appears more than once.
    #[arg(long, value_enum, default_value_t = DuplicatePolicy::FirstWins)]
    pub duplicates: DuplicatePolicy,

    /// Append log lines to this file instead of stderr.
    #[arg(long, env = "LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl WatchOptions {
    /// Targets with whitespace trimmed and blanks dropped.
    pub fn targets(&self) -> Vec<String> {
        self.targets
            .iter()
            .flat_map(|t| t.split(','))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions { duplicates: self.duplicates }
    }

    pub fn course_label(&self) -> String {
        format!("{} {}", self.subject_label.trim(), self.course_number.trim())
    }

    pub fn form_pairs(&self) -> Vec<(String, String)> {
        self.form.iter().map(|f| (f.name.clone(), f.value.clone())).collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.targets().is_empty() {
            return Err(ConfigError::NoTargets);
        }
        if self.interval_ms == 0 && !self.once {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `[CRN ..] Status: ..` line per section.
    #[default]
    Text,
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub fn delim(&self) -> Option<char> {
        match self {
            OutputFormat::Csv => Some(','),
            OutputFormat::Tsv => Some('\t'),
            OutputFormat::Text | OutputFormat::Json => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

fn parse_form_field(s: &str) -> Result<FormField, String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty field name in {s:?}"));
    }
    Ok(FormField { name: s!(name), value: s!(value.trim()) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> WatchOptions {
        let mut argv = vec!["seat_watch"];
        argv.extend_from_slice(args);
        WatchOptions::try_parse_from(argv).unwrap()
    }

    #[test]
    fn target_list_is_cleaned() {
        let o = parse(&["--targets", "13470, 13471,, ,99"]);
        assert_eq!(o.targets(), ["13470", "13471", "99"]);
    }

    #[test]
    fn form_fields_parse() {
        let o = parse(&["--form", "TERMYEAR=202601", "--form", "subj_code = CS,CRSE_NUMBER=3214"]);
        assert_eq!(
            o.form_pairs(),
            [
                (s!("TERMYEAR"), s!("202601")),
                (s!("subj_code"), s!("CS")),
                (s!("CRSE_NUMBER"), s!("3214")),
            ]
        );
        assert!(WatchOptions::try_parse_from(["seat_watch", "--form", "novalue"]).is_err());
        assert!(WatchOptions::try_parse_from(["seat_watch", "--form", "=x"]).is_err());
    }

    #[test]
    fn enums_and_flags() {
        let o = parse(&["--format", "tsv", "--duplicates", "last", "--once", "--notify-every-poll"]);
        assert_eq!(o.format, OutputFormat::Tsv);
        assert_eq!(o.format.delim(), Some('\t'));
        assert_eq!(o.extract_options().duplicates, DuplicatePolicy::LastWins);
        assert!(o.once);
        assert!(o.notify_every_poll);
    }

    #[test]
    fn validation() {
        assert_eq!(parse(&["--targets", " , "]).validate(), Err(ConfigError::NoTargets));
        assert_eq!(parse(&["--targets", "1", "--interval-ms", "0"]).validate(), Err(ConfigError::ZeroInterval));
        assert_eq!(parse(&["--targets", "1", "--interval-ms", "0", "--once"]).validate(), Ok(()));
    }

    #[test]
    fn course_label_joins_subject_and_number() {
        let o = parse(&["--subject-label", "CS - Computer Science ", "--course-number", "3214"]);
        assert_eq!(o.course_label(), "CS - Computer Science 3214");
    }
}
