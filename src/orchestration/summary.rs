use crate::orchestration::outcome::ProjectOutcome;

/// Markdown table of successful deployments, or `None` when the run
/// deployed nothing.
pub fn render_summary(outcomes: &[ProjectOutcome]) -> Option<String> {
    let deploys: Vec<_> = outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            ProjectOutcome::Deploy { app, name, url } => Some((name, app, url)),
            _ => None,
        })
        .collect();

    if deploys.is_empty() {
        return None;
    }

    let mut body = String::from("## Preview deployments\n\n");
    body.push_str("| Project | App | URL |\n| --- | --- | --- |\n");
    for (name, app, url) in deploys {
        body.push_str(&format!("| {name} | {app} | {url} |\n"));
    }
    Some(body)
}
