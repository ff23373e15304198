//! End-to-end checks of the CLI commands against a store file

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tint_cli::{add_alias, apply_once, list_aliases, remove_alias, suggest_alias};
use tint_core::TintConfig;

const PROD_COOKIE: &str = "aws-userInfo=%7B%22alias%22%3A%22prod%22%7D";

#[tokio::test]
async fn add_then_apply_colors_the_bar() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("colors.json");
    let config = TintConfig::default();

    add_alias(&config, &store, "prod", "#ff0000").await.unwrap();

    let report = apply_once(&config, &store, PROD_COOKIE, "rgb(35, 47, 62)", None).await;
    assert_eq!(report.action, "apply");
    assert_eq!(report.alias.as_deref(), Some("prod"));
    assert_eq!(report.color, "#ff0000");
    assert!(report.wrote);
}

#[tokio::test]
async fn apply_with_missing_store_resets() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("absent.json");

    let report = apply_once(
        &TintConfig::default(),
        &store,
        PROD_COOKIE,
        "navy",
        Some("#ff0000".to_string()),
    )
    .await;
    assert_eq!(report.action, "reset");
    assert_eq!(report.reason.as_deref(), Some("NoMatch"));
    assert_eq!(report.color, "#ff0000");
}

#[tokio::test]
async fn list_is_sorted_and_remove_reports_presence() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("colors.json");
    let config = TintConfig::default();

    add_alias(&config, &store, "staging", "#00ff00").await.unwrap();
    add_alias(&config, &store, "Dev", "#0000ff").await.unwrap();

    let names: Vec<_> = list_aliases(&config, &store)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.alias)
        .collect();
    assert_eq!(names, vec!["Dev", "staging"]);

    assert!(remove_alias(&config, &store, "Dev").await.unwrap());
    assert!(!remove_alias(&config, &store, "Dev").await.unwrap());
    assert_eq!(list_aliases(&config, &store).await.unwrap().len(), 1);
}

#[tokio::test]
async fn blank_alias_is_rejected() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("colors.json");
    let err = add_alias(&TintConfig::default(), &store, "  ", "#fff")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("saving alias"));
}

#[test]
fn suggestion_requires_console_url() {
    let config = TintConfig::default();
    assert_eq!(
        suggest_alias(&config, "https://eu-west-1.console.aws.amazon.com/ec2", PROD_COOKIE),
        Some("prod".to_string())
    );
    assert_eq!(suggest_alias(&config, "https://example.com/", PROD_COOKIE), None);
}
