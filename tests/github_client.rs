use mockito::{Matcher, Server};
use serde_json::{json, Value};

use gitcard::{Error, GitHubClient};

fn user_json(login: &str) -> Value {
    json!({
        "login": login,
        "id": 583231,
        "name": "The Octocat",
        "avatar_url": "https://avatars.githubusercontent.com/u/583231?v=4",
        "bio": null,
        "company": "@github",
        "location": "San Francisco",
        "public_repos": 8,
        "followers": 4000,
        "following": 9,
        "created_at": "2011-01-25T18:44:36Z"
    })
}

fn repo_json(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "full_name": format!("octocat/{}", name),
        "description": null,
        "language": "Rust",
        "stargazers_count": 1,
        "fork": false,
        "created_at": "2020-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z",
        "pushed_at": "2024-01-01T00:00:00Z",
        "owner": { "login": "octocat" }
    })
}

fn repo_page(start: u64, count: u64) -> String {
    let repos: Vec<Value> = (start..start + count)
        .map(|i| repo_json(i, &format!("repo-{}", i)))
        .collect();
    Value::Array(repos).to_string()
}

#[tokio::test]
async fn test_get_user() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/users/octocat")
        .match_header("cache-control", "max-age=3600")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(user_json("octocat").to_string())
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(None, &server.url()).unwrap();
    let user = client.get_user("octocat").await.unwrap();

    assert_eq!(user.login, "octocat");
    assert_eq!(user.followers, 4000);
    assert_eq!(user.display_name(), "The Octocat");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/users/ghost")
        .with_status(404)
        .with_body(r#"{"message":"Not Found"}"#)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(None, &server.url()).unwrap();
    let err = client.get_user("ghost").await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_rate_limited_user_lookup() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/users/octocat")
        .with_status(403)
        .with_header("x-ratelimit-remaining", "0")
        .with_header("x-ratelimit-reset", "0")
        .with_body(r#"{"message":"API rate limit exceeded"}"#)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(None, &server.url()).unwrap();
    let err = client.get_user("octocat").await.unwrap_err();

    assert!(matches!(err, Error::RateLimited(0)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_repos_stop_on_short_page() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", "/users/octocat/repos")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("per_page".into(), "100".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
        ]))
        .with_status(200)
        .with_body(repo_page(0, 100))
        .create_async()
        .await;
    let second = server
        .mock("GET", "/users/octocat/repos")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_body(repo_page(100, 3))
        .create_async()
        .await;
    let third = server
        .mock("GET", "/users/octocat/repos")
        .match_query(Matcher::UrlEncoded("page".into(), "3".into()))
        .expect(0)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(None, &server.url()).unwrap();
    let repos = client.get_user_repos("octocat", 10).await.unwrap();

    assert_eq!(repos.len(), 103);
    assert_eq!(repos[102].name, "repo-102");
    first.assert_async().await;
    second.assert_async().await;
    third.assert_async().await;
}

#[tokio::test]
async fn test_repos_respect_page_cap() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/users/octocat/repos")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(200)
        .with_body(repo_page(0, 100))
        .create_async()
        .await;
    let second = server
        .mock("GET", "/users/octocat/repos")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .expect(0)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(None, &server.url()).unwrap();
    let repos = client.get_user_repos("octocat", 1).await.unwrap();

    assert_eq!(repos.len(), 100);
    second.assert_async().await;
}

#[tokio::test]
async fn test_later_page_failure_keeps_earlier_pages() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/users/octocat/repos")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(200)
        .with_body(repo_page(0, 100))
        .create_async()
        .await;
    server
        .mock("GET", "/users/octocat/repos")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(502)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(None, &server.url()).unwrap();
    let repos = client.get_user_repos("octocat", 10).await.unwrap();

    assert_eq!(repos.len(), 100);
}

#[tokio::test]
async fn test_languages() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/octocat/hello/languages")
        .with_status(200)
        .with_body(r#"{"Rust": 12000, "Shell": 300}"#)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(None, &server.url()).unwrap();
    let languages = client.get_repo_languages("octocat", "hello").await;

    assert_eq!(languages.len(), 2);
    assert_eq!(languages["Rust"], 12000);
}

#[tokio::test]
async fn test_languages_fail_soft() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/octocat/broken/languages")
        .with_status(500)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(None, &server.url()).unwrap();
    let languages = client.get_repo_languages("octocat", "broken").await;

    assert!(languages.is_empty());
}

#[tokio::test]
async fn test_token_is_sent_as_bearer() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/users/octocat")
        .match_header("authorization", "Bearer secret-token")
        .with_status(200)
        .with_body(user_json("octocat").to_string())
        .create_async()
        .await;

    let client = GitHubClient::with_base_url(Some("secret-token"), &server.url()).unwrap();
    client.get_user("octocat").await.unwrap();

    mock.assert_async().await;
}
