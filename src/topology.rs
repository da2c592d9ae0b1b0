/*!
The three deduplicating passes producing AS paths, AS nodes and AS links.

The path pass consumes [AsPath]s straight from the extractor. The node and link passes consume
text lines in the path line format (`100,200,300`), so they can run over the output of an
earlier path pass, or any other source of comma-separated AS paths.
*/
use crate::dedup::{Dedup, DedupExt, Limit, SeenSet};
use crate::models::{AsPath, TOKEN_DELIMITER};
use itertools::Itertools;

/// Deduplicates AS paths by their canonical key, in first-seen order.
pub fn dedup_paths<I>(
    paths: I,
    seen: SeenSet,
    limit: Limit,
) -> Dedup<impl Iterator<Item = String>>
where
    I: IntoIterator<Item = AsPath>,
{
    paths
        .into_iter()
        .map(|path| path.canonical_key())
        .dedup_keys(seen, limit)
}

/// Splits a path line on every delimiter, trimming each token. Empty tokens are kept so callers
/// can tell adjacent ASes from ones separated by a gap.
fn split_tokens(line: &str) -> Vec<String> {
    line.split(TOKEN_DELIMITER)
        .map(|token| token.trim().to_string())
        .collect()
}

/// The AS tokens of a path line. Empty tokens are not ASes, so a blank line has no tokens and
/// `1,,2` has two.
pub fn line_tokens(line: &str) -> Vec<String> {
    split_tokens(line)
        .into_iter()
        .filter(|token| !token.is_empty())
        .collect()
}

/// Directed links between adjacent ASes of a path line, as `from,to` keys. A pair touching an
/// empty token is not a link, so `1,,2` has none.
pub fn line_links(line: &str) -> impl Iterator<Item = String> {
    split_tokens(line)
        .into_iter()
        .tuple_windows::<(String, String)>()
        .filter(|(from, to)| !from.is_empty() && !to.is_empty())
        .map(|(from, to)| format!("{}{}{}", from, TOKEN_DELIMITER, to))
}

/// Every distinct AS token across all lines, in first-seen order.
pub fn extract_nodes<I>(
    lines: I,
    seen: SeenSet,
    limit: Limit,
) -> Dedup<impl Iterator<Item = String>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    lines
        .into_iter()
        .flat_map(|line| line_tokens(line.as_ref()))
        .dedup_keys(seen, limit)
}

/// Every distinct directed adjacency across all lines, in first-seen order.
///
/// `A,B` and `B,A` are different links; lines with fewer than two tokens contribute nothing.
pub fn extract_links<I>(
    lines: I,
    seen: SeenSet,
    limit: Limit,
) -> Dedup<impl Iterator<Item = String>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    lines
        .into_iter()
        .flat_map(|line| line_links(line.as_ref()))
        .dedup_keys(seen, limit)
}
