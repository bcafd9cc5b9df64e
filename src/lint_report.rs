//! clang-tidy log classification
//!
//! clang-tidy prints one line per diagnostic:
//!
//! ```text
//! src/pain/chunk.h:42:5: warning: use of a moved value [bugprone-use-after-move]
//! ```
//!
//! A diagnostic counts toward a category when one of the check names in its
//! trailing bracket block starts with `<category>-`. Headers are analysed
//! once per translation unit, so identical lines are counted once.

use std::collections::HashSet;

use anyhow::Result;
use console::style;
use regex::Regex;
use serde::Serialize;

/// Diagnostics shown per category when printing a report
const SAMPLES_PER_CATEGORY: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
    /// First few matching diagnostic lines
    pub samples: Vec<String>,
}

/// Per-category counts for one clang-tidy log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintReport {
    /// In category-list order
    pub categories: Vec<CategoryCount>,
    /// Sum of all category counts
    pub total: usize,
    /// Distinct diagnostic lines in the log, counted or not
    pub diagnostics: usize,
}

/// Scans clang-tidy output for a fixed list of check categories
#[derive(Debug)]
pub struct LintClassifier {
    categories: Vec<String>,
    checks: Regex,
}

impl LintClassifier {
    pub fn new<S: AsRef<str>>(categories: &[S]) -> Result<Self> {
        Ok(Self {
            categories: categories.iter().map(|c| c.as_ref().to_string()).collect(),
            // The block clang-tidy appends after the message: [check-a,check-b]
            checks: Regex::new(r"\[([A-Za-z0-9_.\-]+(?:,[A-Za-z0-9_.\-]+)*)\]\s*$")?,
        })
    }

    fn is_diagnostic(line: &str) -> bool {
        line.contains("warning:") || line.contains("error:")
    }

    /// Check names in a diagnostic line's trailing block
    fn check_names<'a>(&self, line: &'a str) -> Vec<&'a str> {
        self.checks
            .captures(line)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().split(',').collect())
            .unwrap_or_default()
    }

    pub fn classify(&self, log: &str) -> LintReport {
        let mut categories: Vec<CategoryCount> = self
            .categories
            .iter()
            .map(|category| CategoryCount {
                category: category.clone(),
                count: 0,
                samples: Vec::new(),
            })
            .collect();

        let mut seen = HashSet::new();
        for line in log.lines().map(str::trim) {
            if !Self::is_diagnostic(line) || !seen.insert(line) {
                continue;
            }

            let checks = self.check_names(line);
            for entry in &mut categories {
                let prefix = format!("{}-", entry.category);
                if checks.iter().any(|check| check.starts_with(&prefix)) {
                    entry.count += 1;
                    if entry.samples.len() < SAMPLES_PER_CATEGORY {
                        entry.samples.push(line.to_string());
                    }
                }
            }
        }

        let total = categories.iter().map(|c| c.count).sum();
        LintReport {
            categories,
            total,
            diagnostics: seen.len(),
        }
    }
}

impl LintReport {
    /// Print the report as a table
    pub fn print(&self) {
        let width = self
            .categories
            .iter()
            .map(|c| c.category.len())
            .max()
            .unwrap_or(0)
            .max("category".len());

        println!("\n{:<width$}  {:>6}", style("category").bold(), style("count").bold());
        println!("{}", "-".repeat(width + 8));
        for entry in &self.categories {
            let count = if entry.count > 0 {
                style(entry.count.to_string()).red().bold()
            } else {
                style(entry.count.to_string()).green()
            };
            println!("{:<width$}  {:>6}", entry.category, count);
            for sample in &entry.samples {
                println!("    {}", style(sample).dim());
            }
            if entry.count > entry.samples.len() {
                println!("    ... and {} more", entry.count - entry.samples.len());
            }
        }
        println!("{}", "-".repeat(width + 8));
        println!("{:<width$}  {:>6}", style("total").bold(), self.total);
        println!(
            "({} distinct diagnostic line(s) in log)",
            self.diagnostics
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
src/pain/chunk.h:42:5: warning: 'buf' used after it was moved [bugprone-use-after-move,hicpp-invalid-access-moved]
src/pain/chunk.h:42:5: warning: 'buf' used after it was moved [bugprone-use-after-move,hicpp-invalid-access-moved]
src/deva/rsm.cc:10:1: error: Called C++ object pointer is null [clang-analyzer-core.CallAndMessage]
src/deva/op.cc:7:3: warning: the parameter 'name' is copied [performance-unnecessary-value-param]
src/sad/main.cc:3:1: warning: use auto [modernize-use-auto]
src/deva/op.cc:9:3: note: copy happens here
src/deva/op.cc:9:3: warning: message with no check block
12 warnings generated.
Suppressed 3 warnings (3 in non-user code).
";

    fn classifier() -> LintClassifier {
        LintClassifier::new(&["clang-analyzer", "bugprone", "performance", "concurrency", "cert"]).unwrap()
    }

    #[test]
    fn test_counts_per_category() {
        let report = classifier().classify(LOG);
        let counts: Vec<_> = report
            .categories
            .iter()
            .map(|c| (c.category.as_str(), c.count))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("clang-analyzer", 1),
                ("bugprone", 1),
                ("performance", 1),
                ("concurrency", 0),
                ("cert", 0),
            ]
        );
        assert_eq!(report.total, 3);
        // 5 distinct warning/error lines, the duplicate collapsed
        assert_eq!(report.diagnostics, 5);
    }

    #[test]
    fn test_prefix_match_not_substring() {
        let log = "a.cc:1:1: warning: x [misc-cert-lookalike]\n";
        let report = LintClassifier::new(&["cert"]).unwrap().classify(log);
        assert_eq!(report.total, 0);
    }

    #[test]
    fn test_multiple_checks_count_once_per_category() {
        let log = "a.cc:1:1: warning: x [cert-err58-cpp,cert-dcl50-cpp,bugprone-foo]\n";
        let report = LintClassifier::new(&["cert", "bugprone"]).unwrap().classify(log);
        assert_eq!(report.categories[0].count, 1);
        assert_eq!(report.categories[1].count, 1);
        assert_eq!(report.total, 2);
    }

    #[test]
    fn test_notes_never_count() {
        let log = "a.cc:1:1: note: see [bugprone-foo]\n";
        let report = LintClassifier::new(&["bugprone"]).unwrap().classify(log);
        assert_eq!(report.total, 0);
        assert_eq!(report.diagnostics, 0);
    }

    #[test]
    fn test_empty_log() {
        let report = classifier().classify("");
        assert_eq!(report.total, 0);
        assert_eq!(report.categories.len(), 5);
    }

    #[test]
    fn test_samples_are_capped() {
        let log: String = (0..5)
            .map(|i| format!("a.cc:{}:1: warning: w [bugprone-x]\n", i))
            .collect();
        let report = LintClassifier::new(&["bugprone"]).unwrap().classify(&log);
        assert_eq!(report.total, 5);
        assert_eq!(report.categories[0].samples.len(), SAMPLES_PER_CATEGORY);
    }
}
