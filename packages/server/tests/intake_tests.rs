//! Integration tests for feedback intake: manual submission, CSV upload,
//! the dashboard listing and the analytics totals.

mod common;

use crate::common::{create_analyzed_feedback, create_test_feedback, TestHarness};
use test_context::test_context;
use triage_core::common::{TriageError, UserId};
use triage_core::domains::analysis::activities::{analyze_feedback, analyze_pending};
use triage_core::domains::analysis::{FeedbackAnalysis, Impact, Sentiment, Urgency};
use triage_core::domains::feedback::activities::{
    feedback_analytics, list_feedback, submit_feedback, upload_feedback_csv, FeedbackSort,
};
use triage_core::domains::feedback::Feedback;
use triage_core::kernel::{MockAI, MockEmbeddingService, TestDependencies};

const NEGATIVE_HIGH_CRITICAL: &str =
    r#"{"sentiment": "negative", "urgency": "high", "impact": "critical"}"#;

// =============================================================================
// Manual submission
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn submit_stores_and_analyzes_feedback(ctx: &TestHarness) {
    let mocks = TestDependencies::new()
        .mock_classifier(MockAI::new().with_response(NEGATIVE_HIGH_CRITICAL));
    let deps = ctx.deps(mocks.clone());
    let user_id = UserId::new();

    let submitted = submit_feedback(
        "  Checkout fails with a 500 error  ",
        Some("ana@example.com"),
        user_id,
        &deps,
    )
    .await
    .expect("Submission should succeed");

    assert_eq!(submitted.feedback.content, "Checkout fails with a 500 error");
    assert_eq!(submitted.feedback.source, "manual");
    assert_eq!(submitted.feedback.user_id, Some(user_id));
    assert_eq!(submitted.feedback.user_email.as_deref(), Some("ana@example.com"));

    assert_eq!(submitted.analysis.sentiment, "negative");
    assert_eq!(submitted.analysis.urgency, "high");
    assert_eq!(submitted.analysis.impact, "critical");
    assert!(submitted.analysis.embedding_vector.is_some());

    assert!(mocks
        .classifier
        .was_called_with("Analyze this feedback: \"Checkout fails with a 500 error\""));
    assert_eq!(mocks.embedding_service.calls(), vec!["Checkout fails with a 500 error"]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn submit_rejects_blank_content(ctx: &TestHarness) {
    let mocks = TestDependencies::new();
    let deps = ctx.deps(mocks.clone());

    let err = submit_feedback("   ", None, UserId::new(), &deps)
        .await
        .expect_err("Blank feedback should be rejected");

    assert!(matches!(
        err.downcast_ref::<TriageError>(),
        Some(TriageError::InvalidInput(msg)) if msg == "Please enter some feedback to submit."
    ));
    assert_eq!(mocks.classifier.call_count(), 0);
    assert!(Feedback::find_unanalyzed(&ctx.db_pool).await.unwrap().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn failed_analysis_leaves_entry_for_analyze_pending(ctx: &TestHarness) {
    let failing = TestDependencies::new()
        .mock_classifier(MockAI::new().with_failure("upstream timeout"));
    let deps = ctx.deps(failing);

    let result = submit_feedback("Search ignores filters", None, UserId::new(), &deps).await;
    assert!(result.is_err());

    let pending = Feedback::find_unanalyzed(&ctx.db_pool).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].content, "Search ignores filters");

    let deps = ctx.deps(TestDependencies::new());
    let batch = analyze_pending(&deps).await.unwrap();

    assert_eq!(batch.analyses.len(), 1);
    assert_eq!(batch.failed, 0);
    assert!(Feedback::find_unanalyzed(&ctx.db_pool).await.unwrap().is_empty());
}

// =============================================================================
// CSV upload
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn csv_upload_stores_every_row_and_analyzes_them(ctx: &TestHarness) {
    let mocks = TestDependencies::new()
        .mock_classifier(
            MockAI::new()
                .with_response(NEGATIVE_HIGH_CRITICAL)
                .with_failure("rate limited"),
        );
    let deps = ctx.deps(mocks.clone());
    let csv = "content,email\n\
               \"Exports time out, every time\",ana@example.com\n\
               Love the new dashboard,\n\
               No comma so this row is dropped\n\
               Dark mode please,cy@example.com\n";

    let result = upload_feedback_csv("feedback.csv", csv, UserId::new(), &deps)
        .await
        .expect("Upload should succeed");

    assert_eq!(result.uploaded, 3);
    assert_eq!(result.analyzed, 2);
    assert_eq!(result.failed, 1);
    assert!(result.feedback.iter().all(|f| f.source == "csv"));

    let contents: Vec<&str> = result.feedback.iter().map(|f| f.content.as_str()).collect();
    assert_eq!(
        contents,
        vec!["Exports time out, every time", "Love the new dashboard", "Dark mode please"]
    );
    assert_eq!(result.feedback[0].user_email.as_deref(), Some("ana@example.com"));
    assert_eq!(result.feedback[1].user_email, None);
    assert_eq!(result.feedback[2].user_email.as_deref(), Some("cy@example.com"));

    // The entry whose classification failed is still stored, just unanalysed
    let pending = Feedback::find_unanalyzed(&ctx.db_pool).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].content, "Love the new dashboard");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn csv_upload_rejects_other_files_and_empty_csv(ctx: &TestHarness) {
    let deps = ctx.deps(TestDependencies::new());

    let err = upload_feedback_csv("feedback.txt", "content\nhello\n", UserId::new(), &deps)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Please upload a CSV file");

    let err = upload_feedback_csv("empty.csv", "content\n\n  \n", UserId::new(), &deps)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "No valid feedback found in CSV");

    assert!(Feedback::find_all_with_analysis(&ctx.db_pool)
        .await
        .unwrap()
        .is_empty());
}

// =============================================================================
// Listing and analytics
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn list_feedback_sorts_by_label_and_puts_unanalyzed_last(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    create_analyzed_feedback(
        pool,
        "Nice colors",
        (Sentiment::Positive, Urgency::Low, Impact::NiceToHave),
        None,
    )
    .await
    .unwrap();
    create_test_feedback(pool, "Not analysed yet").await.unwrap();
    create_analyzed_feedback(
        pool,
        "Login is broken",
        (Sentiment::Negative, Urgency::High, Impact::Critical),
        None,
    )
    .await
    .unwrap();
    create_analyzed_feedback(
        pool,
        "Would like CSV export",
        (Sentiment::Neutral, Urgency::Medium, Impact::FeatureRequest),
        None,
    )
    .await
    .unwrap();

    let by_date = list_feedback(FeedbackSort::Date, pool).await.unwrap();
    let contents: Vec<&str> = by_date.iter().map(|e| e.feedback.content.as_str()).collect();
    assert_eq!(
        contents,
        vec!["Would like CSV export", "Login is broken", "Not analysed yet", "Nice colors"]
    );

    let by_urgency = list_feedback(FeedbackSort::Urgency, pool).await.unwrap();
    let contents: Vec<&str> = by_urgency
        .iter()
        .map(|e| e.feedback.content.as_str())
        .collect();
    assert_eq!(
        contents,
        vec!["Login is broken", "Would like CSV export", "Nice colors", "Not analysed yet"]
    );

    let by_sentiment = list_feedback(FeedbackSort::Sentiment, pool).await.unwrap();
    assert_eq!(by_sentiment[0].feedback.content, "Login is broken");
    assert!(by_sentiment[3].analysis.is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn listing_shows_latest_analysis_only(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let (feedback_id, _) = create_analyzed_feedback(
        pool,
        "Billing page is confusing",
        (Sentiment::Neutral, Urgency::Low, Impact::NiceToHave),
        None,
    )
    .await
    .unwrap();

    let deps = ctx.deps(
        TestDependencies::new().mock_classifier(MockAI::new().with_response(NEGATIVE_HIGH_CRITICAL)),
    );
    analyze_feedback(feedback_id, "Billing page is confusing", &deps)
        .await
        .unwrap();

    let entries = list_feedback(FeedbackSort::Date, pool).await.unwrap();
    assert_eq!(entries.len(), 1);
    let analysis = entries[0].analysis.as_ref().expect("Entry should be analysed");
    assert_eq!(analysis.sentiment, "negative");

    let latest = FeedbackAnalysis::find_latest_for_feedback(feedback_id, pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, analysis.id);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn analytics_total_counts_entries_and_labels_count_analyses(ctx: &TestHarness) {
    let pool = &ctx.db_pool;

    let empty = feedback_analytics(pool).await.unwrap();
    assert_eq!(empty.total_feedback, 0);

    let mut analysed = Vec::new();
    for labels in [
        (Sentiment::Negative, Urgency::High, Impact::Critical),
        (Sentiment::Negative, Urgency::Medium, Impact::FeatureRequest),
        (Sentiment::Positive, Urgency::Low, Impact::NiceToHave),
    ] {
        let (feedback_id, _) = create_analyzed_feedback(pool, "Some feedback", labels, None)
            .await
            .unwrap();
        analysed.push(feedback_id);
    }
    create_test_feedback(pool, "Unanalysed").await.unwrap();

    // A second analysis of the positive entry adds labels but not an entry
    let deps = ctx.deps(
        TestDependencies::new()
            .mock_classifier(MockAI::new().with_response(NEGATIVE_HIGH_CRITICAL)),
    );
    analyze_feedback(analysed[2], "Some feedback", &deps)
        .await
        .unwrap();

    let analytics = feedback_analytics(pool).await.unwrap();
    assert_eq!(analytics.total_feedback, 4);
    assert_eq!(analytics.sentiment.negative, 3);
    assert_eq!(analytics.sentiment.positive, 1);
    assert_eq!(analytics.sentiment.neutral, 0);
    assert_eq!(analytics.urgency.high, 2);
    assert_eq!(analytics.urgency.medium, 1);
    assert_eq!(analytics.urgency.low, 1);
    assert_eq!(analytics.impact.critical, 2);
    assert_eq!(analytics.impact.feature_request, 1);
    assert_eq!(analytics.impact.nice_to_have, 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn embedding_outage_still_stores_classification(ctx: &TestHarness) {
    let mocks = TestDependencies::new().mock_embeddings(MockEmbeddingService::failing());
    let deps = ctx.deps(mocks);

    let submitted = submit_feedback("Slow page loads", None, UserId::new(), &deps)
        .await
        .expect("Classification alone should be enough");

    assert!(submitted.analysis.embedding_vector.is_none());
    assert_eq!(submitted.analysis.sentiment, "neutral");
}
