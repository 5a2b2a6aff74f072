//! Resource-usage blocks of the accounting log.
//!
//! A terminated (or evicted) job reports its CPU time as a run of lines:
//!
//! ```text
//!     Usr 0 00:14:51, Sys 0 00:00:22  -  Run Remote Usage
//!     Usr 0 00:00:00, Sys 0 00:00:00  -  Run Local Usage
//!     Usr 0 00:14:51, Sys 0 00:00:22  -  Total Remote Usage
//!     Usr 0 00:00:00, Sys 0 00:00:00  -  Total Local Usage
//! ```
//!
//! The same numbers repeat for every re-run logged to the file, so each
//! value is located through a chain of windows: a link's window runs from
//! the previous link's marker up to the link's own marker, and the usage
//! figure nearest that marker is the link's value. Event headers carry
//! `<host:port>` addresses, so `<` and `>` bound a window.

use regex::Regex;
use std::sync::LazyLock;

const EVENT_BOUNDARY: [char; 2] = ['<', '>'];

static USR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Usr \d+ (\d{2}:\d{2}:\d{2}),").unwrap());
static SYS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Sys \d+ (\d{2}:\d{2}:\d{2}) ").unwrap());

/// One link of the usage chain, in log order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageLink {
    RunRemote,
    RunLocal,
    TotalRemote,
    TotalLocal,
}

impl UsageLink {
    pub const CHAIN: [UsageLink; 4] = [
        UsageLink::RunRemote,
        UsageLink::RunLocal,
        UsageLink::TotalRemote,
        UsageLink::TotalLocal,
    ];

    /// The literal text that terminates this link's usage line.
    pub fn marker(self) -> &'static str {
        match self {
            UsageLink::RunRemote => "Run Remote Usage",
            UsageLink::RunLocal => "Run Local Usage",
            UsageLink::TotalRemote => "Total Remote Usage",
            UsageLink::TotalLocal => "Total Local Usage",
        }
    }

    /// Field-name stem, e.g. `run_remote_usage`.
    pub fn field_stem(self) -> &'static str {
        match self {
            UsageLink::RunRemote => "run_remote_usage",
            UsageLink::RunLocal => "run_local_usage",
            UsageLink::TotalRemote => "total_remote_usage",
            UsageLink::TotalLocal => "total_local_usage",
        }
    }

    /// The link whose marker must precede this one.
    pub fn previous(self) -> Option<UsageLink> {
        match self {
            UsageLink::RunRemote => None,
            UsageLink::RunLocal => Some(UsageLink::RunRemote),
            UsageLink::TotalRemote => Some(UsageLink::RunLocal),
            UsageLink::TotalLocal => Some(UsageLink::TotalRemote),
        }
    }

    /// All windows of `text` that belong to this link, in text order.
    ///
    /// For the head of the chain the window starts after the last event
    /// boundary (or at the start of the text). For every other link it
    /// starts after the nearest preceding marker of the previous link and
    /// must not cross an event boundary; occurrences without such a marker
    /// contribute no window.
    pub fn windows(self, text: &str) -> Vec<&str> {
        text.match_indices(self.marker())
            .filter_map(|(pos, _)| {
                let head = &text[..pos];
                match self.previous() {
                    Some(prev) => {
                        let start = head.rfind(prev.marker())? + prev.marker().len();
                        let window = &head[start..];
                        (!window.contains(EVENT_BOUNDARY)).then_some(window)
                    }
                    None => {
                        let start = head.rfind(EVENT_BOUNDARY).map_or(0, |i| i + 1);
                        Some(&head[start..])
                    }
                }
            })
            .collect()
    }
}

/// Which half of a usage line to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageComponent {
    Usr,
    Sys,
}

impl UsageComponent {
    pub fn field_suffix(self) -> &'static str {
        match self {
            UsageComponent::Usr => "usr",
            UsageComponent::Sys => "sys",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            UsageComponent::Usr => &USR_PATTERN,
            UsageComponent::Sys => &SYS_PATTERN,
        }
    }

    /// The `HH:MM:SS` figure nearest the end of `window`.
    pub fn nearest<'t>(self, window: &'t str) -> Option<&'t str> {
        self.pattern()
            .captures_iter(window)
            .last()
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Every value of `component` for `link` in `text`, one per window that
/// carries a usage figure, in text order.
pub fn link_values(link: UsageLink, component: UsageComponent, text: &str) -> Vec<String> {
    link.windows(text)
        .into_iter()
        .filter_map(|window| component.nearest(window))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::fixtures::{RERUN_LOG, SINGLE_RUN_LOG};

    #[test]
    fn chain_order_and_previous_links() {
        assert_eq!(UsageLink::CHAIN[0].previous(), None);
        for pair in UsageLink::CHAIN.windows(2) {
            assert_eq!(pair[1].previous(), Some(pair[0]));
        }
    }

    #[test]
    fn run_remote_window_ends_at_marker() {
        let windows = UsageLink::RunRemote.windows(SINGLE_RUN_LOG);
        assert_eq!(windows.len(), 1);
        assert!(windows[0].ends_with("Usr 0 00:14:51, Sys 0 00:00:22  -  "));
    }

    #[test]
    fn run_local_window_is_between_markers() {
        let windows = UsageLink::RunLocal.windows(SINGLE_RUN_LOG);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].trim(), "Usr 0 00:00:03, Sys 0 00:00:01  -");
    }

    #[test]
    fn each_link_reads_its_own_line() {
        let expect = [
            (UsageLink::RunRemote, "00:14:51", "00:00:22"),
            (UsageLink::RunLocal, "00:00:03", "00:00:01"),
            (UsageLink::TotalRemote, "00:20:10", "00:00:40"),
            (UsageLink::TotalLocal, "00:00:05", "00:00:02"),
        ];
        for (link, usr, sys) in expect {
            assert_eq!(
                link_values(link, UsageComponent::Usr, SINGLE_RUN_LOG),
                vec![usr.to_string()],
                "{link:?} usr"
            );
            assert_eq!(
                link_values(link, UsageComponent::Sys, SINGLE_RUN_LOG),
                vec![sys.to_string()],
                "{link:?} sys"
            );
        }
    }

    #[test]
    fn reruns_yield_one_value_per_block() {
        let values = link_values(UsageLink::RunRemote, UsageComponent::Usr, RERUN_LOG);
        assert_eq!(values, vec!["00:05:00".to_string(), "00:14:51".to_string()]);
    }

    #[test]
    fn marker_without_previous_link_is_ignored() {
        let text = "Usr 0 00:00:09, Sys 0 00:00:09  -  Run Local Usage\n";
        assert!(UsageLink::RunLocal.windows(text).is_empty());
    }

    #[test]
    fn chained_window_does_not_cross_event_boundary() {
        let text = "\
Usr 0 00:01:00, Sys 0 00:00:01  -  Run Remote Usage
001 (1.000.000) 2023-10-12 10:15:40 Job executing on host: <10.0.0.1:9618>
Usr 0 00:02:00, Sys 0 00:00:02  -  Run Local Usage
";
        assert!(UsageLink::RunLocal.windows(text).is_empty());
    }

    #[test]
    fn head_window_starts_after_event_boundary() {
        let text = "\
host: <10.0.0.1:9618> Usr 0 00:07:00, Sys 0 00:00:07  -  Run Remote Usage
";
        let windows = UsageLink::RunRemote.windows(text);
        assert_eq!(windows.len(), 1);
        assert!(windows[0].starts_with(" Usr 0 00:07:00"));
    }

    #[test]
    fn nearest_takes_last_figure_in_window() {
        let window = "Usr 0 00:00:01, Sys 0 00:00:01 x\nUsr 0 00:00:02, Sys 0 00:00:03  -  ";
        assert_eq!(UsageComponent::Usr.nearest(window), Some("00:00:02"));
        assert_eq!(UsageComponent::Sys.nearest(window), Some("00:00:03"));
    }

    #[test]
    fn no_markers_no_values() {
        assert!(link_values(UsageLink::TotalLocal, UsageComponent::Usr, "nothing here").is_empty());
    }
}
