use {
    anyhow::{Context, Result},
    tempo_config::TempoCliConfig,
    tempo_jira::{Issue, JiraClient},
    tracing::info,
};

fn jira_client(config: &TempoCliConfig) -> JiraClient {
    JiraClient::new(
        config.jira_url.clone(),
        config.jira.email.clone(),
        config.jira.api_token.clone(),
    )
}

pub async fn whoami(config: &TempoCliConfig) -> Result<()> {
    let user = jira_client(config)
        .current_user()
        .await
        .context("could not fetch the current Jira user")?;
    println!("{}", user.account_id);
    Ok(())
}

pub async fn list_issues(config: &TempoCliConfig) -> Result<()> {
    let mut issues = jira_client(config)
        .workable_issues()
        .await
        .context("could not fetch workable issues")?;
    info!(count = issues.len(), "fetched workable issues");

    if issues.is_empty() {
        println!("No workable issues found.");
        return Ok(());
    }
    sort_issues(&mut issues);
    for issue in &issues {
        println!("{}", issue_line(issue));
    }
    Ok(())
}

/// Sort by project key, then numerically by issue number.
fn sort_issues(issues: &mut [Issue]) {
    issues.sort_by(|a, b| issue_sort_key(&a.key).cmp(&issue_sort_key(&b.key)));
}

fn issue_sort_key(key: &str) -> (&str, u64) {
    match key.rsplit_once('-') {
        Some((project, number)) => (project, number.parse().unwrap_or(u64::MAX)),
        None => (key, u64::MAX),
    }
}

fn issue_line(issue: &Issue) -> String {
    format!("{:<12} {}", issue.key, issue.summary)
}
