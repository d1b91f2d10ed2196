use crate::api::ApiClient;
use anyhow::Result;

/// Keep only the metric families whose name starts with `prefix`.
///
/// `# HELP`/`# TYPE` lines are matched on the family name, samples on the
/// metric name before any `{` label block.
pub fn filter_metrics(text: &str, prefix: &str) -> String {
    text.lines()
        .filter(|line| {
            let name = match line.strip_prefix("# ") {
                Some(comment) => comment.split_whitespace().nth(1).unwrap_or(""),
                None => line
                    .split(|c: char| c == '{' || c.is_whitespace())
                    .next()
                    .unwrap_or(""),
            };
            !name.is_empty() && name.starts_with(prefix)
        })
        .map(|line| format!("{}\n", line))
        .collect()
}

pub async fn handle_metrics_command(api: &ApiClient, prefix: Option<String>) -> Result<()> {
    let text = api.get_text("/admins/metrics").await?;

    match prefix {
        Some(prefix) => print!("{}", filter_metrics(&text, &prefix)),
        None => print!("{}", text),
    }
    Ok(())
}
