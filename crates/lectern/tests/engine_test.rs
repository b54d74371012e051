//! Integration tests for the Lectern engine.

use lectern::ids::{CourseId, ProfessorId, ReviewId, UserId};
use lectern::{
    InMemoryCatalog, Lectern, LecternError, ProfessorRecord, RatingSchema, Ratings, ReviewFields,
    Role, Viewer, Visibility,
};

const PROF_MATH: ProfessorId = ProfessorId(1);
const PROF_PHYS: ProfessorId = ProfessorId(2);
const COURSE_CALC: CourseId = CourseId(100);
const COURSE_MECH: CourseId = CourseId(200);

const ADMIN: UserId = UserId(1);
const SAM: UserId = UserId(2);
const RILEY: UserId = UserId(3);
const ADA_ACCOUNT: UserId = UserId(10);
const MAX_ACCOUNT: UserId = UserId(20);

/// Helper to build a catalog with two professors and two reviewers.
fn test_catalog() -> InMemoryCatalog {
    let catalog = InMemoryCatalog::new();
    catalog.add_professor(ProfessorRecord {
        id: PROF_MATH,
        name: "Ada Lovelace".to_string(),
        department: "Mathematics".to_string(),
        account: Some(ADA_ACCOUNT),
        courses: vec![COURSE_CALC],
    });
    catalog.add_professor(ProfessorRecord {
        id: PROF_PHYS,
        name: "Max Planck".to_string(),
        department: "Physics".to_string(),
        account: Some(MAX_ACCOUNT),
        courses: vec![COURSE_MECH],
    });
    catalog.add_reviewer(SAM);
    catalog.add_reviewer(RILEY);
    catalog
}

fn test_engine() -> Lectern {
    Lectern::new(test_catalog())
}

fn viewer(engine: &Lectern, id: UserId, name: &str, role: Role) -> Viewer {
    Viewer::resolve(id, name, role, engine.catalog())
}

fn overall(value: u8) -> ReviewFields {
    let ratings: Ratings = [("overall".to_string(), value)].into_iter().collect();
    ReviewFields::new(ratings, format!("Rated {}", value))
}

fn create_review(engine: &Lectern, author: &Viewer, value: u8) -> ReviewId {
    engine
        .create_review(author, PROF_MATH, COURSE_CALC, overall(value))
        .expect("review creation failed")
        .id
}

// =============================================================================
// Review Creation Tests
// =============================================================================

#[test]
fn test_create_review_starts_at_version_one() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);

    let view = engine
        .create_review(&sam, PROF_MATH, COURSE_CALC, overall(5))
        .unwrap();

    assert_eq!(view.version, 1);
    assert_eq!(view.versions.len(), 1);
    assert!(view.pseudonym.starts_with("anon-"));
}

#[test]
fn test_create_review_requires_author_capability() {
    let engine = test_engine();
    let ada = viewer(&engine, ADA_ACCOUNT, "Ada", Role::Professor);

    let err = engine
        .create_review(&ada, PROF_MATH, COURSE_CALC, overall(5))
        .unwrap_err();
    assert!(matches!(err, LecternError::Forbidden(_)));
}

#[test]
fn test_create_review_unknown_professor() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);

    let err = engine
        .create_review(&sam, ProfessorId(99), COURSE_CALC, overall(5))
        .unwrap_err();
    assert!(matches!(err, LecternError::NotFound(_)));
}

#[test]
fn test_create_review_course_not_taught() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);

    let err = engine
        .create_review(&sam, PROF_MATH, COURSE_MECH, overall(5))
        .unwrap_err();
    assert!(matches!(err, LecternError::InvalidAssociation(_)));
}

#[test]
fn test_create_review_validates_ratings() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);

    let err = engine
        .create_review(&sam, PROF_MATH, COURSE_CALC, overall(6))
        .unwrap_err();
    assert!(matches!(err, LecternError::Validation(_)));
}

// =============================================================================
// Versioning Tests
// =============================================================================

#[test]
fn test_edits_build_strictly_increasing_chain() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);
    let id = create_review(&engine, &sam, 3);

    for expected in 1..=4 {
        engine
            .update_review(&sam, id, expected, overall(4))
            .unwrap();
    }

    let versions = engine.review_versions(id).unwrap();
    let numbers: Vec<u32> = versions.iter().map(|v| v.version).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);

    let view = engine.review(&sam, id).unwrap();
    assert_eq!(view.version, 5);
    assert_eq!(view.version as usize, view.versions.len());
}

#[test]
fn test_prior_versions_never_mutate() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);
    let id = create_review(&engine, &sam, 3);

    let before = engine.review_versions(id).unwrap();
    engine.update_review(&sam, id, 1, overall(5)).unwrap();
    let after = engine.review_versions(id).unwrap();

    assert_eq!(before[0].summary, after[0].summary);
    assert_eq!(before[0].ratings, after[0].ratings);
    assert_eq!(before[0].created_at, after[0].created_at);
}

#[test]
fn test_get_reflects_latest_version() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);
    let id = create_review(&engine, &sam, 2);

    engine.update_review(&sam, id, 1, overall(5)).unwrap();

    let view = engine.review(&sam, id).unwrap();
    assert_eq!(view.ratings.get("overall"), Some(&5));
    assert_eq!(view.summary, "Rated 5");
}

#[test]
fn test_update_by_other_reviewer_forbidden() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);
    let riley = viewer(&engine, RILEY, "Riley", Role::Reviewer);
    let id = create_review(&engine, &sam, 3);

    let err = engine.update_review(&riley, id, 1, overall(5)).unwrap_err();
    assert!(matches!(err, LecternError::Forbidden(_)));
}

#[test]
fn test_stale_edit_conflicts() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);
    let id = create_review(&engine, &sam, 3);

    engine.update_review(&sam, id, 1, overall(4)).unwrap();
    let err = engine.update_review(&sam, id, 1, overall(2)).unwrap_err();

    assert!(matches!(
        err,
        LecternError::Conflict {
            expected: 1,
            actual: 2
        }
    ));
}

// =============================================================================
// Deletion Tests
// =============================================================================

#[test]
fn test_author_and_admin_may_delete() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);
    let riley = viewer(&engine, RILEY, "Riley", Role::Reviewer);
    let admin = viewer(&engine, ADMIN, "Root", Role::Admin);

    let first = create_review(&engine, &sam, 3);
    let second = create_review(&engine, &sam, 4);

    let err = engine.delete_review(&riley, first).unwrap_err();
    assert!(matches!(err, LecternError::Forbidden(_)));

    engine.delete_review(&sam, first).unwrap();
    engine.delete_review(&admin, second).unwrap();

    let err = engine.review(&sam, first).unwrap_err();
    assert!(matches!(err, LecternError::NotFound(_)));
}

#[test]
fn test_delete_absent_review_not_found() {
    let engine = test_engine();
    let admin = viewer(&engine, ADMIN, "Root", Role::Admin);

    let err = engine.delete_review(&admin, ReviewId(404)).unwrap_err();
    assert!(matches!(err, LecternError::NotFound(_)));
}

// =============================================================================
// Aggregation Tests
// =============================================================================

#[test]
fn test_summary_of_professor_without_reviews_is_zero() {
    let engine = test_engine();

    let summary = engine.summarize(PROF_MATH).unwrap();
    assert_eq!(summary.average_rating, 0.0);
    assert_eq!(summary.review_count, 0);
}

#[test]
fn test_summary_tracks_creates_and_deletes() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);

    let ids: Vec<ReviewId> = [5, 3, 4]
        .iter()
        .map(|&value| create_review(&engine, &sam, value))
        .collect();

    let summary = engine.summarize(PROF_MATH).unwrap();
    assert_eq!(summary.review_count, 3);
    assert!((summary.average_rating - 4.0).abs() < f64::EPSILON);

    engine.delete_review(&sam, ids[1]).unwrap();
    let summary = engine.summarize(PROF_MATH).unwrap();
    assert_eq!(summary.review_count, 2);
    assert!((summary.average_rating - 4.5).abs() < f64::EPSILON);
}

#[test]
fn test_summary_uses_latest_versions() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);
    let id = create_review(&engine, &sam, 1);

    engine.update_review(&sam, id, 1, overall(5)).unwrap();

    let summary = engine.summarize(PROF_MATH).unwrap();
    assert!((summary.average_rating - 5.0).abs() < f64::EPSILON);
}

#[test]
fn test_summary_unknown_professor_not_found() {
    let engine = test_engine();

    let err = engine.summarize(ProfessorId(99)).unwrap_err();
    assert!(matches!(err, LecternError::NotFound(_)));
}

#[test]
fn test_multi_dimension_schema_averages_primary() {
    let catalog = test_catalog();
    let config = lectern::LecternConfig {
        rating_schema: RatingSchema::course_feedback().with_primary("workload"),
    };
    let engine = Lectern::with_config(catalog, config);
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);

    let ratings: Ratings = [
        ("fairness", 5),
        ("clarity", 4),
        ("engagement", 3),
        ("workload", 2),
        ("confidence", 1),
    ]
    .iter()
    .map(|(name, value)| (name.to_string(), *value))
    .collect();
    engine
        .create_review(
            &sam,
            PROF_MATH,
            COURSE_CALC,
            ReviewFields::new(ratings, "Dense but fair")
                .with_strengths("Fair grading")
                .with_weaknesses("Workload"),
        )
        .unwrap();

    let summary = engine.summarize(PROF_MATH).unwrap();
    assert!((summary.average_rating - 2.0).abs() < f64::EPSILON);
}

// =============================================================================
// Rebuttal Tests
// =============================================================================

#[test]
fn test_rebuttal_only_by_reviewed_professor() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);
    let max = viewer(&engine, MAX_ACCOUNT, "Max", Role::Professor);
    let id = create_review(&engine, &sam, 3);

    let err = engine.submit_rebuttal(&max, id, "Not my course").unwrap_err();
    assert!(matches!(err, LecternError::Forbidden(_)));
}

#[test]
fn test_second_rebuttal_replaces_first() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);
    let ada = viewer(&engine, ADA_ACCOUNT, "Ada", Role::Professor);
    let id = create_review(&engine, &sam, 3);

    let first = engine.submit_rebuttal(&ada, id, "Context matters").unwrap();
    let second = engine.submit_rebuttal(&ada, id, "Updated response").unwrap();
    assert!(second.created_at >= first.created_at);

    let view = engine.review(&sam, id).unwrap();
    let rebuttal = view.rebuttal.unwrap();
    assert_eq!(rebuttal.content, "Updated response");
}

#[test]
fn test_rebuttal_on_absent_review_not_found() {
    let engine = test_engine();
    let ada = viewer(&engine, ADA_ACCOUNT, "Ada", Role::Professor);

    let err = engine
        .submit_rebuttal(&ada, ReviewId(404), "Hello?")
        .unwrap_err();
    assert!(matches!(err, LecternError::NotFound(_)));
}

// =============================================================================
// Comment Visibility Tests
// =============================================================================

#[test]
fn test_professor_only_comment_filtering() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);
    let riley = viewer(&engine, RILEY, "Riley", Role::Reviewer);
    let ada = viewer(&engine, ADA_ACCOUNT, "Ada", Role::Professor);
    let max = viewer(&engine, MAX_ACCOUNT, "Max", Role::Professor);
    let admin = viewer(&engine, ADMIN, "Root", Role::Admin);

    let id = create_review(&engine, &sam, 4);
    let comment = engine
        .add_comment(&sam, id, "For the professor's eyes", Some(Visibility::ProfessorOnly))
        .unwrap();

    let sees = |v: &Viewer| {
        engine
            .visible_comments(v, id)
            .unwrap()
            .iter()
            .any(|c| c.id == comment.id)
    };

    assert!(sees(&sam), "author always sees their own comment");
    assert!(!sees(&riley));
    assert!(sees(&ada), "linked professor account sees it");
    assert!(!sees(&max), "a different professor does not");
    assert!(sees(&admin));
}

#[test]
fn test_comment_visibility_defaults_to_public() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);
    let ada = viewer(&engine, ADA_ACCOUNT, "Ada", Role::Professor);

    let id = create_review(&engine, &sam, 4);
    let comment = engine.add_comment(&sam, id, "Anyone may read", None).unwrap();

    assert_eq!(comment.visibility, Visibility::Public);
    assert_eq!(engine.visible_comments(&ada, id).unwrap().len(), 1);
}

#[test]
fn test_review_view_filters_comments_per_viewer() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);
    let ada = viewer(&engine, ADA_ACCOUNT, "Ada", Role::Professor);

    let id = create_review(&engine, &sam, 4);
    engine
        .add_comment(&sam, id, "public note", Some(Visibility::Public))
        .unwrap();
    engine
        .add_comment(&sam, id, "admin note", Some(Visibility::AdminOnly))
        .unwrap();

    let ada_view = engine.review(&ada, id).unwrap();
    assert_eq!(ada_view.comments.len(), 1);

    let sam_view = engine.review(&sam, id).unwrap();
    assert_eq!(sam_view.comments.len(), 2, "author sees both");
}

#[test]
fn test_comment_edit_and_delete_are_author_only() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);
    let riley = viewer(&engine, RILEY, "Riley", Role::Reviewer);

    let id = create_review(&engine, &sam, 4);
    let comment = engine.add_comment(&riley, id, "First take", None).unwrap();

    let err = engine.edit_comment(&sam, comment.id, "edited").unwrap_err();
    assert!(matches!(err, LecternError::Forbidden(_)));

    let edited = engine
        .edit_comment(&riley, comment.id, "Second take")
        .unwrap();
    assert_eq!(edited.content, "Second take");
    assert!(edited.updated_at >= edited.created_at);

    let err = engine.delete_comment(&sam, comment.id).unwrap_err();
    assert!(matches!(err, LecternError::Forbidden(_)));

    engine.delete_comment(&riley, comment.id).unwrap();
    assert!(engine.visible_comments(&riley, id).unwrap().is_empty());
}

// =============================================================================
// Anonymity Tests
// =============================================================================

#[test]
fn test_pseudonym_is_stable_across_reads() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);
    let ada = viewer(&engine, ADA_ACCOUNT, "Ada", Role::Professor);

    let created = engine
        .create_review(&sam, PROF_MATH, COURSE_CALC, overall(4))
        .unwrap();
    let fetched = engine.review(&ada, created.id).unwrap();

    assert_eq!(created.pseudonym, fetched.pseudonym);
}

#[test]
fn test_distinct_reviewers_have_distinct_pseudonyms() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);
    let riley = viewer(&engine, RILEY, "Riley", Role::Reviewer);

    let a = engine
        .create_review(&sam, PROF_MATH, COURSE_CALC, overall(4))
        .unwrap();
    let b = engine
        .create_review(&riley, PROF_MATH, COURSE_CALC, overall(2))
        .unwrap();

    assert_ne!(a.pseudonym, b.pseudonym);
}

#[test]
fn test_pseudonym_resolution_is_gated() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);
    let riley = viewer(&engine, RILEY, "Riley", Role::Reviewer);
    let admin = viewer(&engine, ADMIN, "Root", Role::Admin);

    let view = engine
        .create_review(&sam, PROF_MATH, COURSE_CALC, overall(4))
        .unwrap();

    assert_eq!(engine.resolve_pseudonym(&admin, &view.pseudonym).unwrap(), SAM);
    assert_eq!(engine.resolve_pseudonym(&sam, &view.pseudonym).unwrap(), SAM);

    let err = engine
        .resolve_pseudonym(&riley, &view.pseudonym)
        .unwrap_err();
    assert!(matches!(err, LecternError::Forbidden(_)));
}

#[test]
fn test_resolution_refusal_hides_pseudonym_existence() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);
    let riley = viewer(&engine, RILEY, "Riley", Role::Reviewer);
    let admin = viewer(&engine, ADMIN, "Root", Role::Admin);

    let issued = engine
        .create_review(&sam, PROF_MATH, COURSE_CALC, overall(4))
        .unwrap()
        .pseudonym;

    // To a viewer without standing, an issued pseudonym that is not
    // theirs and a never-issued one are indistinguishable.
    let err = engine.resolve_pseudonym(&riley, &issued).unwrap_err();
    assert!(matches!(err, LecternError::Forbidden(_)));
    let err = engine
        .resolve_pseudonym(&riley, "anon-ffffffffffffffff")
        .unwrap_err();
    assert!(matches!(err, LecternError::Forbidden(_)));

    // A moderator still learns whether the pseudonym exists.
    let err = engine
        .resolve_pseudonym(&admin, "anon-ffffffffffffffff")
        .unwrap_err();
    assert!(matches!(err, LecternError::NotFound(_)));
}

#[test]
fn test_anonymize_unknown_reviewer_not_found() {
    let engine = test_engine();

    let err = engine.anonymize(UserId(404), PROF_MATH).unwrap_err();
    assert!(matches!(err, LecternError::NotFound(_)));
}

// =============================================================================
// Listing Tests
// =============================================================================

#[test]
fn test_review_listing_is_scoped_by_capability() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);
    let riley = viewer(&engine, RILEY, "Riley", Role::Reviewer);
    let ada = viewer(&engine, ADA_ACCOUNT, "Ada", Role::Professor);
    let admin = viewer(&engine, ADMIN, "Root", Role::Admin);

    let first = create_review(&engine, &sam, 3);
    let second = create_review(&engine, &sam, 5);
    create_review(&engine, &riley, 4);

    // Admins see everything.
    assert_eq!(engine.reviews(&admin).unwrap().len(), 3);

    // A reviewer sees exactly their own reviews, in creation order.
    let own: Vec<ReviewId> = engine.reviews(&sam).unwrap().iter().map(|v| v.id).collect();
    assert_eq!(own, vec![first, second]);
    assert_eq!(engine.reviews(&riley).unwrap().len(), 1);

    // Professor accounts have no dashboard listing.
    let err = engine.reviews(&ada).unwrap_err();
    assert!(matches!(err, LecternError::Forbidden(_)));
}

#[test]
fn test_professor_listing_in_creation_order() {
    let engine = test_engine();
    let sam = viewer(&engine, SAM, "Sam", Role::Reviewer);
    let ada = viewer(&engine, ADA_ACCOUNT, "Ada", Role::Professor);

    let first = create_review(&engine, &sam, 3);
    let second = create_review(&engine, &sam, 5);

    let views = engine.reviews_for_professor(&ada, PROF_MATH).unwrap();
    let ids: Vec<ReviewId> = views.iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![first, second]);

    let err = engine
        .reviews_for_professor(&ada, ProfessorId(99))
        .unwrap_err();
    assert!(matches!(err, LecternError::NotFound(_)));
}
