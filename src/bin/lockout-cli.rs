use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, Url};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "lockout-cli")]
#[command(about = "Client for the booking-code lockout service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Admin API key, needed for `summary` and `evict`.
    #[arg(short, long, default_value = "")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show lockout status for a subject
    Status { subject: String },
    /// Record a failed booking code attempt
    Fail { subject: String },
    /// Clear all failures and locks for a subject
    Clear { subject: String },
    /// Show tracked and locked subject counts (admin)
    Summary,
    /// Evict idle records now (admin)
    Evict,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if !cli.key.is_empty() {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
        );
    }

    let (method, segments) = match &cli.command {
        Commands::Status { subject } => (Method::GET, subject_path(subject, "lockout")),
        Commands::Fail { subject } => (Method::POST, subject_path(subject, "failures")),
        Commands::Clear { subject } => (Method::DELETE, subject_path(subject, "failures")),
        Commands::Summary => (Method::GET, vec!["admin", "summary"]),
        Commands::Evict => (Method::POST, vec!["admin", "evict"]),
    };

    let url = endpoint(&cli.url, &segments)?;
    let res = client.request(method, url).headers(headers).send().await?;
    print_response(res).await?;

    Ok(())
}

fn subject_path<'a>(subject: &'a str, resource: &'a str) -> Vec<&'a str> {
    vec!["v1", "subjects", subject, resource]
}

/// Append `segments` to `base`, percent-encoding each one so a subject
/// containing `/`, `?` or `#` stays a single path segment.
fn endpoint(base: &str, segments: &[&str]) -> Result<Url, Box<dyn std::error::Error>> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| format!("{} cannot be used as a base URL", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if status == reqwest::StatusCode::NO_CONTENT {
        println!("ok");
        return Ok(());
    }
    if !status.is_success() {
        eprintln!("Error: lockout service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_stays_one_segment() {
        let url =
            endpoint("http://localhost:8080", &subject_path("x/../victim", "failures")).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v1/subjects/x%2F..%2Fvictim/failures"
        );

        let url = endpoint("http://localhost:8080/", &subject_path("a?b#c", "lockout")).unwrap();
        assert_eq!(url.path(), "/v1/subjects/a%3Fb%23c/lockout");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_base_path_is_kept() {
        let url = endpoint("http://gateway/lockout/", &["admin", "summary"]).unwrap();
        assert_eq!(url.as_str(), "http://gateway/lockout/admin/summary");
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(endpoint("mailto:ops@example.com", &["admin"]).is_err());
    }
}
