/// Integration tests for the application layer
mod test_utilities;

use release_forest::prelude::*;
use std::collections::HashMap;
use test_utilities::mocks::*;

fn use_case(
    roots: Vec<MockNode>,
) -> (
    AnalyzeForestUseCase<MockForestWalker, MockReleaseIdResolver, MockProgressReporter>,
    MockProgressReporter,
) {
    let reporter = MockProgressReporter::new();
    let use_case = AnalyzeForestUseCase::new(
        MockForestWalker::new(roots),
        MockReleaseIdResolver::new(),
        reporter.clone(),
    );
    (use_case, reporter)
}

fn canonical_ids(response: &AnalysisResponse) -> Vec<String> {
    response
        .deduplicated
        .entries()
        .iter()
        .map(|e| e.canonical_id.to_string())
        .collect()
}

fn build_tags(response: &AnalysisResponse) -> Vec<String> {
    response
        .build_order
        .iter()
        .map(|id| response.release_graph.node(*id).revision().value().to_string())
        .collect()
}

#[tokio::test]
async fn test_scenario_a_linear_chain_gets_plain_locators() {
    let (use_case, _) = use_case(vec![component("x", "x-1").depends_on(vec![
        component("y", "y-1").depends_on(vec![component("z", "z-1")]),
    ])]);

    let response = use_case.execute(AnalysisRequest::default()).await.unwrap();

    assert_eq!(
        canonical_ids(&response),
        vec!["org.acme:x:1.0", "org.acme:y:1.0", "org.acme:z:1.0"]
    );
    assert_eq!(build_tags(&response), vec!["z-1", "y-1", "x-1"]);
}

#[tokio::test]
async fn test_scenario_b_shared_subtree_is_deduplicated() {
    let (use_case, _) = use_case(vec![
        component("r1", "r1").depends_on(vec![component("y", "y-2").version("2.0")]),
        component("r2", "r2").depends_on(vec![component("y", "y-2").version("2.0")]),
    ]);

    let response = use_case.execute(AnalysisRequest::default()).await.unwrap();

    assert_eq!(response.deduplicated.visited_occurrences(), 4);
    assert_eq!(response.deduplicated.unique_count(), 3);
    assert!(canonical_ids(&response).contains(&"org.acme:y:2.0".to_string()));
    assert_eq!(response.summary.occurrences, 4);
    assert_eq!(response.summary.unique_entries, 3);
}

#[tokio::test]
async fn test_scenario_c_structural_variations_get_ordinals() {
    let (use_case, _) = use_case(vec![
        component("a", "a-1").depends_on(vec![component("b", "b-1")]),
        component("a", "a-1").depends_on(vec![component("b", "b-2").version("2.0")]),
    ]);

    let response = use_case.execute(AnalysisRequest::default()).await.unwrap();

    let key_a = ComponentKey::new("org.acme".into(), "a".into(), "1.0".into()).unwrap();
    let a1 = response
        .deduplicated
        .entry(&CanonicalId::with_ordinal(&key_a, 1))
        .unwrap();
    let a2 = response
        .deduplicated
        .entry(&CanonicalId::with_ordinal(&key_a, 2))
        .unwrap();
    assert_eq!(a1.dependencies[0].as_str(), "org.acme:b:1.0");
    assert_eq!(a2.dependencies[0].as_str(), "org.acme:b:2.0");

    // Distinct variations are distinct roots
    assert_eq!(
        response
            .deduplicated
            .roots()
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>(),
        vec!["org.acme:a:1.0#1", "org.acme:a:1.0#2"]
    );
}

#[tokio::test]
async fn test_scenario_d_release_cycle_reported_once() {
    let (use_case, reporter) = use_case(vec![component("a", "rel1").depends_on(vec![
        component("b", "rel2").depends_on(vec![component("c", "rel1")]),
    ])]);

    let response = use_case.execute(AnalysisRequest::default()).await.unwrap();

    assert_eq!(response.cycles.len(), 1);
    let members: Vec<String> = response.cycles[0]
        .members()
        .iter()
        .map(|r| r.value().to_string())
        .collect();
    assert_eq!(members, vec!["rel1", "rel2"]);

    // Graph and order are still produced
    assert_eq!(response.release_graph.len(), 2);
    assert_eq!(response.build_order.len(), 2);

    let error = response.cycle_error().unwrap();
    assert!(matches!(error, AnalysisError::CircularDependency { count: 1, .. }));
    assert!(reporter.contains("circular release dependency"));
}

#[tokio::test]
async fn test_identical_roots_are_merged() {
    let tree = || component("app", "app-1").depends_on(vec![component("lib", "lib-1")]);
    let (use_case, _) = use_case(vec![tree(), tree()]);

    let response = use_case.execute(AnalysisRequest::default()).await.unwrap();

    assert_eq!(response.deduplicated.roots().len(), 1);
    assert_eq!(response.deduplicated.unique_count(), 2);
    assert_eq!(response.deduplicated.visited_occurrences(), 4);
}

#[tokio::test]
async fn test_repeated_runs_are_reproducible() {
    let forest = || {
        vec![
            component("r1", "r1").depends_on(vec![
                component("a", "a-1").depends_on(vec![component("b", "b-1")]),
                component("c", "c-1"),
            ]),
            component("r2", "r2").depends_on(vec![
                component("a", "a-1").depends_on(vec![component("b", "b-2").version("2.0")]),
                component("c", "c-1"),
            ]),
        ]
    };

    let (first, _) = use_case(forest());
    let baseline = first.execute(AnalysisRequest::default()).await.unwrap();

    for _ in 0..5 {
        let (again, _) = use_case(forest());
        let response = again.execute(AnalysisRequest::default()).await.unwrap();
        assert_eq!(canonical_ids(&response), canonical_ids(&baseline));
        assert_eq!(build_tags(&response), build_tags(&baseline));
        assert_eq!(response.deduplicated.entries(), baseline.deduplicated.entries());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolution_keeps_deterministic_graph() {
    let forest = || {
        vec![component("app", "app-1").depends_on(
            (0..24)
                .map(|i| {
                    let name = format!("mod{}", i);
                    let tag = format!("lib-{}", i % 5);
                    component(&name, &tag)
                })
                .collect(),
        )]
    };

    let mut baseline: Option<Vec<String>> = None;
    for _ in 0..3 {
        let resolver = MockReleaseIdResolver::with_jitter();
        let use_case = AnalyzeForestUseCase::new(
            MockForestWalker::new(forest()),
            resolver.clone(),
            MockProgressReporter::new(),
        );
        let response = use_case.execute(AnalysisRequest::default()).await.unwrap();

        assert_eq!(resolver.call_count(), 25);
        assert_eq!(response.release_graph.len(), 6);
        let tags = build_tags(&response);
        assert_eq!(tags.last().map(String::as_str), Some("app-1"));
        match &baseline {
            Some(expected) => assert_eq!(&tags, expected),
            None => baseline = Some(tags),
        }
    }
}

#[tokio::test]
async fn test_build_order_respects_every_edge() {
    let (use_case, _) = use_case(vec![
        component("app", "app-1").depends_on(vec![
            component("web", "web-1").depends_on(vec![
                component("http", "net-1"),
                component("core", "core-1"),
            ]),
            component("db", "db-1").depends_on(vec![component("core", "core-1")]),
            component("socket", "net-1").depends_on(vec![component("core", "core-1")]),
        ]),
    ]);

    let response = use_case.execute(AnalysisRequest::default()).await.unwrap();
    assert!(response.cycles.is_empty());

    let position: HashMap<ReleaseNodeId, usize> = response
        .build_order
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, i))
        .collect();
    assert_eq!(position.len(), response.release_graph.len());

    for node in response.release_graph.nodes() {
        for dependency in node.dependencies() {
            assert!(
                position[dependency] < position[&node.id()],
                "{} must be built before {}",
                response.release_graph.node(*dependency).revision(),
                node.revision()
            );
        }
    }
}

#[tokio::test]
async fn test_collect_policy_reports_failures_and_continues() {
    let (use_case, reporter) = use_case(vec![component("app", "app-1").depends_on(vec![
        component("legacy", "x").undeclared(),
        component("lib", "lib-1"),
    ])]);
    let request = AnalysisRequest::new(
        Vec::new(),
        false,
        ResolutionPolicy::CollectAndContinue,
        CyclePolicy::Fail,
    );

    let response = use_case.execute(request).await.unwrap();

    assert_eq!(response.summary.failed.len(), 1);
    assert!(response.summary.failed[0]
        .reason
        .contains("nothing declared for org.acme:legacy:1.0"));
    assert_eq!(response.release_graph.len(), 2);
    assert!(response.summary.is_fatal());
    assert!(reporter.contains("Skipping org.acme:legacy:1.0"));
}

#[tokio::test]
async fn test_abort_policy_fails_the_run() {
    let (use_case, _) = use_case(vec![component("app", "app-1").depends_on(vec![
        component("legacy", "x").undeclared(),
    ])]);

    let error = use_case
        .execute(AnalysisRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(
        error.downcast_ref::<AnalysisError>(),
        Some(AnalysisError::Resolution { .. })
    ));
}

#[tokio::test]
async fn test_filters_shrink_graph_but_not_manifest() {
    let (use_case, _) = use_case(vec![component("app", "app-1").depends_on(vec![
        component("testkit", "testkit-1"),
        component("guava", "guava-31").group("com.google").unmanaged(),
    ])]);
    let request = AnalysisRequest::new(
        vec!["org.acme:test*".to_string()],
        false,
        ResolutionPolicy::default(),
        CyclePolicy::default(),
    );

    let response = use_case.execute(request).await.unwrap();

    assert_eq!(response.release_graph.len(), 1);
    assert_eq!(response.summary.skipped.len(), 2);
    assert_eq!(response.deduplicated.unique_count(), 3);
}

#[tokio::test]
async fn test_formatters_render_analysis() {
    let (use_case, _) = use_case(vec![component("app", "app-1").depends_on(vec![
        component("lib", "lib-1"),
    ])]);
    let response = use_case.execute(AnalysisRequest::default()).await.unwrap();

    let json = JsonFormatter::new().format(&response).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["release_units"][0]["tag"], "lib-1");
    assert_eq!(value["release_units"][1]["tag"], "app-1");
    assert_eq!(value["summary"]["processed"], 2);
    assert!(value["metadata"]["run_id"]
        .as_str()
        .unwrap()
        .starts_with("urn:uuid:"));

    let markdown = MarkdownFormatter::new().format(&response).unwrap();
    assert!(markdown.contains("## Build Order"));
    assert!(markdown.contains("`git@host:acme@lib-1`"));
}

#[tokio::test]
async fn test_real_resolver_chain_with_rules() {
    let resolver = CachingReleaseIdResolver::new(
        ResolverChain::new()
            .with(DeclaredScmResolver::new())
            .with(
                RuleBasedResolver::new(vec![ReleaseRule {
                    group: "org.acme".to_string(),
                    origin: Some("git@host:acme/platform".to_string()),
                    tag: "platform-{version}".to_string(),
                }])
                .unwrap(),
            ),
    );
    let use_case = AnalyzeForestUseCase::new(
        MockForestWalker::new(vec![component("app", "app-1").depends_on(vec![
            component("core", "-").undeclared(),
            component("util", "-").undeclared(),
        ])]),
        resolver,
        MockProgressReporter::new(),
    );

    let response = use_case.execute(AnalysisRequest::default()).await.unwrap();

    // core and util share one rule-derived release
    assert_eq!(response.release_graph.len(), 2);
    let platform = response
        .release_graph
        .nodes()
        .iter()
        .find(|n| n.revision().value() == "platform-1.0")
        .unwrap();
    assert_eq!(platform.members().len(), 2);
}
