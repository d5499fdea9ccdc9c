//! Behavioural coverage for the synchronisation controllers using the real
//! entity bindings.
//!
//! Interleavings are driven by polling controller futures by hand against a
//! gateway whose replies are released one at a time.

mod support;

use std::pin::pin;
use std::sync::Arc;

use client::domain::entities::{Project, ProjectsBinding, UserSkill, UserSkillsBinding};
use client::domain::ports::{FixtureRemoteGateway, GatewayError};
use client::domain::sync::{CollectionController, OrderingPolicy, Rows, SyncOptions};
use client::domain::{EntityId, ErrorCode, RemoteResult, SessionContext};
use futures::poll;
use rstest::rstest;
use serde_json::{Value, json};
use support::{DeferredGateway, identity};

fn skills_payload(skills: &[(&str, &str)]) -> Value {
    let skills: Vec<Value> = skills
        .iter()
        .map(|(id, name)| json!({ "id": id, "name": name }))
        .collect();
    json!({ "getUserById": { "skills": skills } })
}

fn skill_names(state: &RemoteResult<Rows<UserSkill>>) -> Vec<String> {
    state
        .success()
        .map(|rows| rows.iter().map(|row| row.fields().name.clone()).collect())
        .unwrap_or_default()
}

fn deferred_skills(
    options: SyncOptions,
) -> (
    Arc<DeferredGateway>,
    CollectionController<DeferredGateway, UserSkillsBinding>,
) {
    let gateway = Arc::new(DeferredGateway::default());
    let controller = CollectionController::with_options(
        Arc::clone(&gateway),
        SessionContext::authenticated(identity()),
        UserSkillsBinding,
        options,
    );
    (gateway, controller)
}

#[rstest]
#[case::last_issued_wins(OrderingPolicy::LastIssuedWins, "Second")]
#[case::last_resolved_wins(OrderingPolicy::LastResolvedWins, "First")]
#[tokio::test]
async fn overlapping_fetches_follow_the_ordering_policy(
    #[case] ordering: OrderingPolicy,
    #[case] expected: &str,
) {
    let first_is_shown = ordering == OrderingPolicy::LastResolvedWins;
    let (gateway, controller) = deferred_skills(SyncOptions::default().with_ordering(ordering));
    let mut first = pin!(controller.fetch());
    let mut second = pin!(controller.fetch());
    assert!(poll!(first.as_mut()).is_pending());
    assert!(poll!(second.as_mut()).is_pending());
    assert!(controller.state().is_loading());

    gateway.resolve(1, Ok(skills_payload(&[("s-2", "Second")])));
    second.as_mut().await.expect("second fetch");
    assert_eq!(skill_names(&controller.state()), vec!["Second"]);

    gateway.resolve(0, Ok(skills_payload(&[("s-1", "First")])));
    let outcome = first.as_mut().await;
    assert_eq!(skill_names(&controller.state()), vec![expected]);
    if first_is_shown {
        outcome.expect("first fetch");
    } else {
        let err = outcome.expect_err("stale fetch");
        assert_eq!(err.code(), ErrorCode::Superseded);
    }
}

fn projects_payload(projects: &[(&str, &str)]) -> Value {
    let projects: Vec<Value> = projects
        .iter()
        .map(|(id, title)| json!({ "id": id, "title": title }))
        .collect();
    json!({ "getUserById": { "projects": projects } })
}

#[rstest]
#[tokio::test]
async fn stale_fetch_keeps_removals_queued_after_the_newer_one() {
    let gateway = Arc::new(DeferredGateway::default());
    let controller = CollectionController::new(
        Arc::clone(&gateway),
        SessionContext::authenticated(identity()),
        ProjectsBinding,
    );
    let mut older = pin!(controller.fetch());
    let mut newer = pin!(controller.fetch());
    assert!(poll!(older.as_mut()).is_pending());
    assert!(poll!(newer.as_mut()).is_pending());

    gateway.resolve(1, Ok(projects_payload(&[("p-1", "Portfolio"), ("p-2", "Blog")])));
    newer.as_mut().await.expect("newer fetch");
    controller
        .remove(&EntityId::server("p-1"))
        .await
        .expect("local removal");

    gateway.resolve(0, Ok(projects_payload(&[("p-1", "Portfolio"), ("p-2", "Blog")])));
    let err = older.as_mut().await.expect_err("older fetch lost");

    assert_eq!(err.code(), ErrorCode::Superseded);
    assert_eq!(controller.pending_removals(), vec!["p-1".to_owned()]);
    let rows = controller.state().into_success().expect("rows still shown");
    assert_eq!(rows.len(), 1);
}

#[rstest]
#[tokio::test]
async fn failed_submit_resends_unsent_drafts_on_retry() {
    let gateway = Arc::new(
        FixtureRemoteGateway::new()
            .with_response("GetUserProjects", Ok(projects_payload(&[("p-1", "Portfolio")])))
            .with_response("UpdateProject", Ok(json!({ "updateProject": { "id": "p-1" } })))
            .with_response("AddProject", Err(GatewayError::transport("offline"))),
    );
    let controller = CollectionController::new(
        Arc::clone(&gateway),
        SessionContext::authenticated(identity()),
        ProjectsBinding,
    );
    controller.fetch().await.expect("fetch");
    controller
        .update(&EntityId::server("p-1"), Project::titled("Portfolio v2"))
        .await
        .expect("local edit");
    controller
        .add(Project::titled("Blog"))
        .await
        .expect("local draft");

    controller.submit().await.expect_err("add fails");
    assert_eq!(controller.state(), RemoteResult::Error("offline".to_owned()));
    let unsent: Vec<String> = controller
        .unsent_rows()
        .iter()
        .map(|row| row.fields().title.clone())
        .collect();
    assert_eq!(unsent, vec!["Blog"]);

    gateway.respond("AddProject", Ok(json!({ "addProject": { "id": "p-2" } })));
    gateway.respond(
        "GetUserProjects",
        Ok(projects_payload(&[("p-1", "Portfolio v2"), ("p-2", "Blog")])),
    );
    controller.submit().await.expect("retry");

    assert_eq!(gateway.call_count("UpdateProject"), 1);
    assert_eq!(gateway.call_count("AddProject"), 2);
    assert!(controller.unsent_rows().is_empty());
    let rows = controller.state().into_success().expect("loaded");
    assert_eq!(rows.len(), 2);
}

#[rstest]
#[tokio::test]
async fn submit_without_loaded_rows_is_rejected() {
    let gateway = Arc::new(
        FixtureRemoteGateway::new()
            .with_response("GetUserProjects", Err(GatewayError::server("boom"))),
    );
    let controller = CollectionController::new(
        Arc::clone(&gateway),
        SessionContext::authenticated(identity()),
        ProjectsBinding,
    );
    controller.fetch().await.expect_err("fetch fails");

    let err = controller.submit().await.expect_err("nothing loaded");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(gateway.calls().len(), 1);
}

#[rstest]
#[tokio::test]
async fn in_flight_guard_rejects_duplicate_adds() {
    let (gateway, controller) =
        deferred_skills(SyncOptions::default().with_in_flight_guard(true));

    let mut add = pin!(controller.add(UserSkill::named("Rust")));
    assert!(poll!(add.as_mut()).is_pending());

    let err = controller
        .add(UserSkill::named("Rust"))
        .await
        .expect_err("duplicate tap");
    assert_eq!(err.code(), ErrorCode::Busy);
    assert_eq!(gateway.call_names(), vec!["AddUserSkill"]);

    gateway.resolve(0, Ok(json!({ "addUserSkill": { "id": "s-1" } })));
    assert!(poll!(add.as_mut()).is_pending());
    gateway.resolve(1, Ok(skills_payload(&[("s-1", "Rust")])));
    add.as_mut().await.expect("first add");

    let mut again = pin!(controller.add(UserSkill::named("Go")));
    assert!(poll!(again.as_mut()).is_pending());
    assert_eq!(
        gateway.call_names(),
        vec!["AddUserSkill", "GetUserSkills", "AddUserSkill"]
    );
}

#[rstest]
#[case::full_screen_loading(true)]
#[case::optimistic_edit(false)]
#[tokio::test]
async fn mutation_visibility_follows_configuration(#[case] loading_on_mutation: bool) {
    let (gateway, controller) = deferred_skills(
        SyncOptions::default().with_loading_on_mutation(loading_on_mutation),
    );
    let mut fetch = pin!(controller.fetch());
    assert!(poll!(fetch.as_mut()).is_pending());
    gateway.resolve(0, Ok(skills_payload(&[("s-1", "Rust")])));
    fetch.as_mut().await.expect("fetch");

    let id = EntityId::server("s-1");
    let mut update = pin!(controller.update(&id, UserSkill::named("Rust 2024")));
    assert!(poll!(update.as_mut()).is_pending());
    if loading_on_mutation {
        assert!(controller.state().is_loading());
    } else {
        assert_eq!(skill_names(&controller.state()), vec!["Rust 2024"]);
    }

    gateway.resolve(1, Ok(json!({ "updateUserSkill": { "id": "s-1" } })));
    assert!(poll!(update.as_mut()).is_pending());
    gateway.resolve(2, Ok(skills_payload(&[("s-1", "Rust 2024")])));
    update.as_mut().await.expect("update");
    assert_eq!(skill_names(&controller.state()), vec!["Rust 2024"]);
}

#[rstest]
#[tokio::test]
async fn missing_identity_never_reaches_the_gateway() {
    let gateway = Arc::new(FixtureRemoteGateway::new());
    let controller = CollectionController::new(
        Arc::clone(&gateway),
        SessionContext::anonymous(),
        UserSkillsBinding,
    );

    controller.fetch().await.expect_err("not logged in");

    assert_eq!(
        controller.state(),
        RemoteResult::Error("User not logged in.".to_owned())
    );
    assert!(gateway.calls().is_empty());
}

#[rstest]
#[case::server_error(Err(GatewayError::server("boom")), "boom")]
#[case::missing_user(Ok(json!({ "getUserById": null })), "User not found")]
#[tokio::test]
async fn failed_fetches_surface_their_message(
    #[case] reply: Result<Value, GatewayError>,
    #[case] message: &str,
) {
    let gateway = Arc::new(FixtureRemoteGateway::new().with_response("GetUserSkills", reply));
    let controller = CollectionController::new(
        gateway,
        SessionContext::authenticated(identity()),
        UserSkillsBinding,
    );

    controller.fetch().await.expect_err("fetch fails");

    assert_eq!(controller.state(), RemoteResult::Error(message.to_owned()));
}

#[rstest]
#[tokio::test]
async fn added_skill_comes_back_with_its_server_identity() {
    let gateway = Arc::new(
        FixtureRemoteGateway::new()
            .with_response("GetUserSkills", Ok(skills_payload(&[("s-1", "Rust")])))
            .with_response("AddUserSkill", Ok(json!({ "addUserSkill": { "id": "s-2" } }))),
    );
    let controller = CollectionController::new(
        Arc::clone(&gateway),
        SessionContext::authenticated(identity()),
        UserSkillsBinding,
    );
    let first = controller.fetch().await.expect("fetch");
    let again = controller.fetch().await.expect("repeat fetch");
    assert_eq!(first, again);

    gateway.respond(
        "GetUserSkills",
        Ok(skills_payload(&[("s-1", "Rust"), ("s-2", "SQL")])),
    );
    let temporary = controller.add(UserSkill::named("SQL")).await.expect("add");

    let rows = controller.state().into_success().expect("loaded");
    assert_eq!(rows.len(), 2);
    let added = rows.last().expect("added row");
    assert_eq!(added.id(), &EntityId::server("s-2"));
    assert_ne!(added.id(), &temporary);
    assert!(rows.iter().all(|row| !row.id().is_temporary()));
}

#[rstest]
#[tokio::test]
async fn project_drafts_persist_only_on_submit() {
    let gateway = Arc::new(
        FixtureRemoteGateway::new()
            .with_response(
                "GetUserProjects",
                Ok(json!({ "getUserById": { "projects": [] } })),
            )
            .with_response("AddProject", Ok(json!({ "addProject": { "id": "p-1" } }))),
    );
    let controller = CollectionController::new(
        Arc::clone(&gateway),
        SessionContext::authenticated(identity()),
        ProjectsBinding,
    );
    controller.fetch().await.expect("fetch");

    let draft = controller
        .add(Project::titled(""))
        .await
        .expect("blank row");
    controller
        .edit_local(&draft, |project| project.title = "Portfolio".to_owned())
        .expect("type a title");
    assert_eq!(gateway.call_count("AddProject"), 0);

    gateway.respond(
        "GetUserProjects",
        Ok(json!({ "getUserById": { "projects": [{ "id": "p-1", "title": "Portfolio" }] } })),
    );
    controller.submit().await.expect("submit");

    let add = gateway
        .calls()
        .into_iter()
        .find(|op| op.name() == "AddProject")
        .expect("add sent");
    assert_eq!(add.variables()["title"], "Portfolio");
    let rows = controller.state().into_success().expect("loaded");
    assert_eq!(rows.first().map(|row| row.id()), Some(&EntityId::server("p-1")));
}
