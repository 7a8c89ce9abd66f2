//! Parser for the offline transcript export.
//!
//! The export is a single tab-separated file with a header row and columns
//! `[filename, start_ms, end_ms, text]`, one line per fragment. The
//! filename encodes the episode as `rt_podcast<N>.tsv`. The export carries
//! no quoting and no embedded tabs, so a plain tab split is the whole
//! grammar.

use anyhow::{bail, Context, Result};

use crate::database::models::Fragment;

/// Parse a whole export into fragments, skipping the header row.
/// Malformed lines fail the run with a 1-based line number.
pub fn parse_export(input: &str) -> Result<Vec<Fragment>> {
    let mut fragments = Vec::new();
    for (idx, line) in input.lines().enumerate().skip(1) {
        if line.is_empty() {
            continue;
        }
        let fragment = parse_line(line).with_context(|| format!("line {}", idx + 1))?;
        fragments.push(fragment);
    }
    Ok(fragments)
}

fn parse_line(line: &str) -> Result<Fragment> {
    let fields: Vec<&str> = line.split('\t').collect();
    let [file_name, start, end, text] = fields.as_slice() else {
        bail!("expected 4 tab-separated fields, got {}", fields.len());
    };
    Ok(Fragment {
        // The corpus is indexed lowercase; queries are matched against it
        // case-insensitively by the tokenizer either way.
        text: text.to_lowercase(),
        episode_number: episode_from_filename(file_name)?,
        start_time: start.parse().context("start_ms")?,
        end_time: end.parse().context("end_ms")?,
    })
}

fn episode_from_filename(name: &str) -> Result<u32> {
    let number = name
        .strip_prefix("rt_podcast")
        .and_then(|rest| rest.strip_suffix(".tsv"))
        .with_context(|| format!("filename {name:?} does not match rt_podcast<N>.tsv"))?;
    number
        .parse()
        .with_context(|| format!("episode number in {name:?}"))
}
