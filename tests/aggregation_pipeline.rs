//! End-to-end aggregation against a mock GitLab API.

mod support;

use mrscribe::gitlab::{ReqwestTransport, parse_merge_request_ids};
use mrscribe::review::{RunWarning, overview};
use mrscribe::{
    CodeLocation, CommentAggregator, ExportFormat, GitLabGateway, IntakeError,
    MergeRequestSelection, PersonalAccessToken, ProjectId, ProjectLocator, ReviewSession,
    RunOutcome, write_export,
};
use serde_json::json;
use support::gitlab_server::{
    APP_JAVA, PROJECT_ID, general_note_json, inline_note_json, merge_request_json,
    mount_discussions, mount_labelled_page, mount_merge_request, mount_merge_request_failure,
    mount_raw_file, system_note_json,
};
use wiremock::MockServer;

const LABEL: &str = "NashTech";

fn gateway_for(server: &MockServer, per_page: u8) -> GitLabGateway<ReqwestTransport> {
    let token = PersonalAccessToken::new("glpat-test").expect("token should be valid");
    let project = ProjectId::new(PROJECT_ID).expect("project id should be valid");
    let locator = ProjectLocator::new(&server.uri(), project).expect("locator should build");
    GitLabGateway::for_token(&token, locator)
        .expect("gateway should build")
        .with_per_page(per_page)
        .expect("page size should be valid")
}

async fn mount_labelled_project(server: &MockServer) {
    mount_labelled_page(
        server,
        LABEL,
        1,
        json!([
            merge_request_json(1, "Add login flow"),
            merge_request_json(2, "Tidy build scripts")
        ]),
    )
    .await;
    mount_labelled_page(server, LABEL, 2, json!([merge_request_json(3, "Bump deps")])).await;

    mount_discussions(
        server,
        1,
        json!([
            {
                "id": "thread-1",
                "individual_note": false,
                "notes": [
                    inline_note_json(10, "Handle the failure here", "src/main/App.java", 3, "head-1"),
                    inline_note_json(11, "  Agreed, will fix  ", "src/main/App.java", 3, "head-1"),
                    system_note_json(12)
                ]
            }
        ]),
    )
    .await;
    mount_discussions(
        server,
        2,
        json!([
            {"id": "thread-2", "individual_note": true, "notes": [general_note_json(20, "Looks good overall")]}
        ]),
    )
    .await;
    mount_discussions(server, 3, json!([])).await;
    mount_raw_file(server, "src%2Fmain%2FApp.java", "head-1", APP_JAVA, 1).await;
}

#[tokio::test]
async fn labelled_run_collects_groups_and_exports_comments() {
    let server = MockServer::start().await;
    mount_labelled_project(&server).await;
    let gateway = gateway_for(&server, 2);

    let report = CommentAggregator::new(&gateway)
        .run(&MergeRequestSelection::Labelled(LABEL.to_owned()))
        .await;

    assert!(report.is_complete(), "unexpected warnings: {:?}", report.warnings);
    let iids: Vec<u64> = report.merge_requests.iter().map(|mr| mr.iid).collect();
    assert_eq!(iids, vec![1, 2, 3]);
    assert_eq!(report.comments.len(), 3);

    let mut session = ReviewSession::new();
    let outcome = session.record(Ok(report));
    assert_eq!(
        outcome,
        RunOutcome::Populated {
            comments: 3,
            merge_requests: 3
        }
    );

    let summary = session.summary();
    assert_eq!(summary.total_comments, 3);
    assert_eq!(summary.merge_requests, 2);
    assert_eq!(summary.code_locations, 1);
    assert_eq!(summary.general_comments, 1);

    let grouped = session.grouped();
    let login = grouped.get("Add login flow").expect("login group expected");
    let location = login.locations().first().expect("one location expected");
    assert_eq!(
        location.location(),
        &CodeLocation::Located {
            path: "src/main/App.java".to_owned(),
            line: 3
        }
    );
    assert_eq!(location.comments().len(), 2);
    assert_eq!(
        location.snippet(),
        Some("public class App {\n    public void run() {\n        connect();")
    );
    assert_eq!(
        location
            .comments()
            .get(1)
            .map(|comment| comment.review_text.as_str()),
        Some("Agreed, will fix")
    );

    let rows = overview(&grouped);
    let titles: Vec<&str> = rows.iter().map(|row| row.title.as_str()).collect();
    assert_eq!(titles, vec!["Add login flow", "Tidy build scripts"]);

    let mut markdown = Vec::new();
    write_export(&mut markdown, ExportFormat::Markdown, session.comments())
        .expect("markdown export should succeed");
    let text = String::from_utf8(markdown).expect("markdown should be UTF-8");
    assert!(text.starts_with("# GitLab MR Comments Export\n\n## MR: Add login flow\n"));
    assert!(text.contains("### Code Location: src/main/App.java:3\n\n```java\n"));
    assert!(
        text.contains("**Alice Reviewer** at `2024-03-01T10:15:30`:\n\nHandle the failure here\n")
    );
    assert!(text.contains("## MR: Tidy build scripts\n\n**MR ID:** 2\n\n### General Comments\n"));
    assert!(!text.contains("added 1 commit"));
}

#[tokio::test]
async fn explicit_run_skips_unreadable_merge_requests() {
    let server = MockServer::start().await;
    mount_merge_request_failure(&server, 4, 404).await;
    mount_merge_request(&server, 5, "Refactor cache").await;
    mount_discussions(
        &server,
        5,
        json!([
            {"id": "thread-5", "notes": [general_note_json(50, "Please add tests")]}
        ]),
    )
    .await;
    let gateway = gateway_for(&server, 50);
    let ids = parse_merge_request_ids("4, 5").expect("ids should parse");

    let report = CommentAggregator::new(&gateway)
        .run(&MergeRequestSelection::Explicit(ids))
        .await;

    let iids: Vec<u64> = report.merge_requests.iter().map(|mr| mr.iid).collect();
    assert_eq!(iids, vec![5]);
    assert_eq!(report.comments.len(), 1);
    assert!(
        matches!(
            report.warnings.as_slice(),
            [RunWarning::MergeRequestSkipped { iid, error: IntakeError::NotFound { .. } }]
                if iid.get() == 4
        ),
        "unexpected warnings: {:?}",
        report.warnings
    );
    let comment = report.comments.first().expect("one comment expected");
    assert_eq!(comment.mr_title, "Refactor cache");
    assert!(comment.location.is_general());
    assert_eq!(comment.author, "Bob Lead");
}

#[tokio::test]
async fn failed_run_keeps_previous_session_results() {
    let server = MockServer::start().await;
    mount_labelled_project(&server).await;
    let gateway = gateway_for(&server, 2);
    let mut session = ReviewSession::new();
    let report = CommentAggregator::new(&gateway)
        .run(&MergeRequestSelection::Labelled(LABEL.to_owned()))
        .await;
    session.record(Ok(report));

    let outcome = session.record(Err(IntakeError::MissingToken));

    assert_eq!(outcome, RunOutcome::Failed(IntakeError::MissingToken));
    assert_eq!(session.comments().len(), 3);
}
