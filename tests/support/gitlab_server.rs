//! Canned GitLab API responses mounted on a `wiremock` server.

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Project id every helper mounts under.
pub const PROJECT_ID: &str = "42";

const PROJECT_PATH: &str = "/api/v4/projects/42";

/// Source file served for inline comment snippets.
pub const APP_JAVA: &str = concat!(
    "package demo;\n",
    "public class App {\n",
    "    public void run() {\n",
    "        connect();\n",
    "    }\n",
    "}\n",
);

/// Merge request payload.
pub fn merge_request_json(iid: u64, title: &str) -> Value {
    json!({
        "iid": iid,
        "title": title,
        "state": "merged",
        "sha": format!("head-{iid}"),
        "web_url": format!("https://gitlab.example/demo/-/merge_requests/{iid}")
    })
}

/// An inline note on `path:line` made against `head_sha`.
pub fn inline_note_json(id: u64, body: &str, path: &str, line: u32, head_sha: &str) -> Value {
    json!({
        "id": id,
        "body": body,
        "author": {"name": "Alice Reviewer", "username": "alice"},
        "created_at": "2024-03-01T10:15:30.000Z",
        "system": false,
        "position": {
            "new_path": path,
            "old_path": path,
            "new_line": line,
            "old_line": null,
            "head_sha": head_sha
        }
    })
}

/// A general note.
pub fn general_note_json(id: u64, body: &str) -> Value {
    json!({
        "id": id,
        "body": body,
        "author": {"name": "Bob Lead", "username": "bob"},
        "created_at": "2024-03-02T08:00:00Z",
        "system": false
    })
}

/// A system note.
pub fn system_note_json(id: u64) -> Value {
    json!({
        "id": id,
        "body": "added 1 commit",
        "author": {"name": "Bob Lead"},
        "created_at": "2024-03-02T08:05:00Z",
        "system": true
    })
}

/// Serves one page of the labelled merge request listing.
pub async fn mount_labelled_page(server: &MockServer, label: &str, page: u32, items: Value) {
    Mock::given(method("GET"))
        .and(path(format!("{PROJECT_PATH}/merge_requests")))
        .and(query_param("labels", label))
        .and(query_param("state", "all"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(items))
        .mount(server)
        .await;
}

/// Serves a single merge request.
pub async fn mount_merge_request(server: &MockServer, iid: u64, title: &str) {
    Mock::given(method("GET"))
        .and(path(format!("{PROJECT_PATH}/merge_requests/{iid}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(merge_request_json(iid, title)))
        .mount(server)
        .await;
}

/// Answers a single merge request lookup with `status`.
pub async fn mount_merge_request_failure(server: &MockServer, iid: u64, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("{PROJECT_PATH}/merge_requests/{iid}")))
        .respond_with(
            ResponseTemplate::new(status).set_body_json(json!({"message": format!("{status}")})),
        )
        .mount(server)
        .await;
}

/// Serves the discussions of a merge request as a single page.
pub async fn mount_discussions(server: &MockServer, iid: u64, discussions: Value) {
    Mock::given(method("GET"))
        .and(path(format!("{PROJECT_PATH}/merge_requests/{iid}/discussions")))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(discussions))
        .mount(server)
        .await;
}

/// Serves raw file content at `revision`, expecting exactly `calls` requests.
pub async fn mount_raw_file(
    server: &MockServer,
    encoded_path: &str,
    revision: &str,
    content: &str,
    calls: u64,
) {
    Mock::given(method("GET"))
        .and(path(format!(
            "{PROJECT_PATH}/repository/files/{encoded_path}/raw"
        )))
        .and(query_param("ref", revision))
        .respond_with(ResponseTemplate::new(200).set_body_string(content))
        .expect(calls)
        .mount(server)
        .await;
}
