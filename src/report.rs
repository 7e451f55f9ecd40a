// File: src/report.rs
use crate::core::engine::CorpusStats;
use crate::core::types::{display_codepoint, sign_char, Canonical, Sign};
use crate::frequency::{SubstringSummary, VariantSummary};
use crossterm::style::Stylize;
use std::io::{self, Write};

/// Prints the per-substring frequency summary.
pub fn print_summary(out: &mut impl Write, summaries: &[SubstringSummary]) -> io::Result<()> {
    writeln!(out, "\n{}", "Frequency Analysis Summary:".bold())?;
    for summary in summaries {
        writeln!(out, "\n{}", format!("Substring '{}':", summary.substring).bold())?;
        if let Some(regular) = &summary.regular {
            print_variant(out, "Regular forms:", regular)?;
        }
        if let Some(canonical) = &summary.canonical {
            print_variant(out, "Canonical forms:", canonical)?;
        }
    }
    out.flush()
}

fn print_variant(out: &mut impl Write, heading: &str, variant: &VariantSummary) -> io::Result<()> {
    writeln!(out, "{}", heading.cyan())?;
    writeln!(out, "  Total occurrences: {}", variant.total)?;
    writeln!(out, "  Unique glyphs: {}", variant.unique_glyphs)?;
    writeln!(
        out,
        "  Most frequent glyph: {} {}",
        variant.most_frequent,
        format!("({} occurrences)", variant.most_frequent_count).dim()
    )
}

pub fn print_stats(out: &mut impl Write, stats: &CorpusStats) -> io::Result<()> {
    writeln!(out, "\n{}", "Corpus:".bold())?;
    writeln!(out, "  Assessed inscriptions: {}", stats.assessed)?;
    writeln!(out, "  Complete sign count: {}", stats.complete_length)?;
    writeln!(out, "  Translated inscriptions: {}", stats.translated)?;
    writeln!(out, "  Translated complete sign count: {}", stats.translated_length)?;
    if stats.failed > 0 || stats.unresolved > 0 {
        writeln!(
            out,
            "  {}",
            format!(
                "Undecodable: {}, unresolved canonical: {}",
                stats.failed, stats.unresolved
            )
            .yellow()
        )?;
    }
    out.flush()
}

/// Lists signs without a phonetic value with their canonical field and
/// private-use codepoint.
pub fn print_unknown(out: &mut impl Write, signs: &[&Sign]) -> io::Result<()> {
    for sign in signs {
        let canonical = match &sign.canonical {
            Canonical::Itself => sign.id.to_string(),
            Canonical::Substitute(ids) => ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join("-"),
            Canonical::Unresolved => String::new(),
        };
        let pua = sign_char(sign.id).map(display_codepoint).unwrap_or_default();
        writeln!(out, "Sign: {}, Canonical: {}, PUA: {}", sign.id, canonical, pua)?;
    }
    out.flush()
}
