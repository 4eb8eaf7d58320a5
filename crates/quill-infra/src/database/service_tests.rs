//! Content-service behavior tests over the in-memory repositories.

use std::sync::Arc;

use uuid::Uuid;

use quill_core::domain::Principal;
use quill_core::service::{
    CreateCategoryInput, CreatePostInput, PostQuery, UpdateCategoryInput, UpdatePostInput,
};
use quill_core::{ContentService, DomainError};

use super::memory::InMemoryStore;

fn service() -> ContentService {
    let store = InMemoryStore::new();
    let (posts, categories) = store.repositories();
    ContentService::new(Arc::new(posts), Arc::new(categories))
}

fn principal(name: &str) -> Principal {
    Principal {
        id: Uuid::new_v4(),
        email: format!("{name}@example.com"),
        name: name.to_string(),
    }
}

fn post_input(title: &str) -> CreatePostInput {
    CreatePostInput {
        title: title.to_string(),
        content: "body text".to_string(),
        cover_image: None,
        excerpt: None,
        published: false,
        category_ids: vec![],
    }
}

fn category_input(name: &str) -> CreateCategoryInput {
    CreateCategoryInput {
        name: name.to_string(),
        description: None,
    }
}

#[tokio::test]
async fn test_create_post_derives_slug_and_snapshots_author() {
    let service = service();
    let author = principal("alice");

    let post = service
        .create_post(post_input("Hello World"), &author)
        .await
        .unwrap();

    assert_eq!(post.slug, "hello-world");
    assert_eq!(post.author_id, author.id);
    assert_eq!(post.author_name, "alice");
    assert_eq!(post.author_email, "alice@example.com");
    assert!(!post.archived);
    assert!(post.updated_at >= post.created_at);
}

#[tokio::test]
async fn test_create_post_with_colliding_slug_conflicts() {
    let service = service();
    let author = principal("alice");

    service
        .create_post(post_input("Hello World"), &author)
        .await
        .unwrap();

    // Different title text, same normalized slug.
    let result = service
        .create_post(post_input("Hello, World!"), &author)
        .await;
    assert!(matches!(result, Err(DomainError::Conflict(_))));
}

#[tokio::test]
async fn test_rename_to_other_posts_slug_conflicts_but_own_slug_succeeds() {
    let service = service();
    let author = principal("alice");

    let a = service
        .create_post(post_input("First Post"), &author)
        .await
        .unwrap();
    service
        .create_post(post_input("Second Post"), &author)
        .await
        .unwrap();

    let collide = UpdatePostInput {
        title: Some("Second: Post".to_string()),
        ..Default::default()
    };
    let result = service.update_post(a.id, collide, &author).await;
    assert!(matches!(result, Err(DomainError::Conflict(_))));

    // Renaming to a title that normalizes to the post's own current slug
    // must not be a false self-conflict.
    let own = UpdatePostInput {
        title: Some("First, Post!".to_string()),
        ..Default::default()
    };
    let updated = service.update_post(a.id, own, &author).await.unwrap();
    assert_eq!(updated.slug, "first-post");
}

#[tokio::test]
async fn test_non_owner_gets_forbidden_never_not_found() {
    let service = service();
    let owner = principal("alice");
    let intruder = principal("mallory");

    let post = service
        .create_post(post_input("Private Thoughts"), &owner)
        .await
        .unwrap();

    let update = UpdatePostInput {
        content: Some("rewritten".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        service.update_post(post.id, update, &intruder).await,
        Err(DomainError::Forbidden)
    ));
    assert!(matches!(
        service.delete_post(post.id, &intruder).await,
        Err(DomainError::Forbidden)
    ));
    assert!(matches!(
        service.get_post(post.id, &intruder).await,
        Err(DomainError::Forbidden)
    ));
}

#[tokio::test]
async fn test_archived_posts_never_listed() {
    let service = service();
    let author = principal("alice");

    let mut input = post_input("Going Away");
    input.published = true;
    let post = service.create_post(input, &author).await.unwrap();

    let listed = service
        .list_posts(&PostQuery::default(), 10, 0)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);

    let archive = UpdatePostInput {
        archived: Some(true),
        ..Default::default()
    };
    service.update_post(post.id, archive, &author).await.unwrap();

    // Gone under every filter combination, even published=true.
    let query = PostQuery {
        published: Some(true),
        ..Default::default()
    };
    assert!(service.list_posts(&query, 10, 0).await.unwrap().is_empty());
    assert_eq!(service.count_posts(&query).await.unwrap(), 0);
    assert!(
        service
            .list_posts(&PostQuery::default(), 10, 0)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_get_by_slug_visibility_of_drafts() {
    let service = service();
    let author = principal("alice");
    let other = principal("bob");

    service
        .create_post(post_input("Draft Post"), &author)
        .await
        .unwrap();

    assert!(matches!(
        service.get_post_by_slug("draft-post", None).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        service.get_post_by_slug("draft-post", Some(&other)).await,
        Err(DomainError::NotFound { .. })
    ));

    let visible = service
        .get_post_by_slug("draft-post", Some(&author))
        .await
        .unwrap();
    assert_eq!(visible.post.title, "Draft Post");
}

#[tokio::test]
async fn test_author_reaches_archived_post_by_slug() {
    let service = service();
    let author = principal("alice");

    let post = service
        .create_post(post_input("Old Piece"), &author)
        .await
        .unwrap();
    let archive = UpdatePostInput {
        archived: Some(true),
        ..Default::default()
    };
    service.update_post(post.id, archive, &author).await.unwrap();

    // Archived state does not gate the slug lookup for the author.
    let found = service
        .get_post_by_slug("old-piece", Some(&author))
        .await
        .unwrap();
    assert!(found.post.archived);
}

#[tokio::test]
async fn test_list_with_empty_category_short_circuits() {
    let service = service();
    let author = principal("alice");

    let category = service
        .create_category(category_input("Empty"), &author)
        .await
        .unwrap();
    service
        .create_post(post_input("Unrelated"), &author)
        .await
        .unwrap();

    let query = PostQuery {
        category_id: Some(category.id),
        ..Default::default()
    };
    assert!(service.list_posts(&query, 10, 0).await.unwrap().is_empty());
    assert_eq!(service.count_posts(&query).await.unwrap(), 0);
}

#[tokio::test]
async fn test_category_filter_and_search_are_conjunctive() {
    let service = service();
    let author = principal("alice");

    let tech = service
        .create_category(category_input("Tech"), &author)
        .await
        .unwrap();

    let mut tagged = post_input("Rust Patterns");
    tagged.published = true;
    tagged.category_ids = vec![tech.id];
    service.create_post(tagged, &author).await.unwrap();

    let mut untagged = post_input("Rust Without Tags");
    untagged.published = true;
    service.create_post(untagged, &author).await.unwrap();

    let query = PostQuery {
        category_id: Some(tech.id),
        search: Some("rust".to_string()),
        ..Default::default()
    };
    let listed = service.list_posts(&query, 10, 0).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Rust Patterns");
}

#[tokio::test]
async fn test_search_matches_title_content_and_excerpt() {
    let service = service();
    let author = principal("alice");

    let mut by_content = post_input("Untitled One");
    by_content.content = "all about Borrowing".to_string();
    service.create_post(by_content, &author).await.unwrap();

    let mut by_excerpt = post_input("Untitled Two");
    by_excerpt.excerpt = Some("borrowing for beginners".to_string());
    service.create_post(by_excerpt, &author).await.unwrap();

    service
        .create_post(post_input("Unrelated Topic"), &author)
        .await
        .unwrap();

    let query = PostQuery {
        search: Some("BORROWING".to_string()),
        ..Default::default()
    };
    assert_eq!(service.list_posts(&query, 10, 0).await.unwrap().len(), 2);
    assert_eq!(service.count_posts(&query).await.unwrap(), 2);
}

#[tokio::test]
async fn test_list_pagination_window() {
    let service = service();
    let author = principal("alice");

    for i in 0..5 {
        service
            .create_post(post_input(&format!("Post Number {i}")), &author)
            .await
            .unwrap();
    }

    let all = service
        .list_posts(&PostQuery::default(), 10, 0)
        .await
        .unwrap();
    assert_eq!(all.len(), 5);
    // Newest first.
    for pair in all.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }

    let page = service
        .list_posts(&PostQuery::default(), 2, 2)
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].id, all[2].id);
    assert_eq!(page[1].id, all[3].id);
}

#[tokio::test]
async fn test_category_cascade_on_both_sides() {
    let service = service();
    let author = principal("alice");

    let tech = service
        .create_category(category_input("Tech"), &author)
        .await
        .unwrap();

    let mut input = post_input("Tagged Post");
    input.category_ids = vec![tech.id];
    let post = service.create_post(input, &author).await.unwrap();

    // Deleting the category leaves the post intact but untagged.
    service.delete_category(tech.id, &author).await.unwrap();
    let detail = service.get_post(post.id, &author).await.unwrap();
    assert!(detail.categories.is_empty());

    // Deleting a post removes its associations without touching categories.
    let life = service
        .create_category(category_input("Life"), &author)
        .await
        .unwrap();
    let mut input = post_input("Another Post");
    input.category_ids = vec![life.id];
    let post = service.create_post(input, &author).await.unwrap();
    service.delete_post(post.id, &author).await.unwrap();

    let categories = service.list_categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].category.name, "Life");
    assert_eq!(categories[0].post_count, 0);
}

#[tokio::test]
async fn test_update_association_replacement_semantics() {
    let service = service();
    let author = principal("alice");

    let tech = service
        .create_category(category_input("Tech"), &author)
        .await
        .unwrap();
    let life = service
        .create_category(category_input("Life"), &author)
        .await
        .unwrap();

    let mut input = post_input("Tagged Post");
    input.category_ids = vec![tech.id];
    let post = service.create_post(input, &author).await.unwrap();

    // No category_ids in the input: associations untouched.
    let update = UpdatePostInput {
        content: Some("revised".to_string()),
        ..Default::default()
    };
    service.update_post(post.id, update, &author).await.unwrap();
    let detail = service.get_post(post.id, &author).await.unwrap();
    assert_eq!(detail.categories.len(), 1);

    // A present set replaces everything.
    let update = UpdatePostInput {
        category_ids: Some(vec![life.id]),
        ..Default::default()
    };
    service.update_post(post.id, update, &author).await.unwrap();
    let detail = service.get_post(post.id, &author).await.unwrap();
    assert_eq!(detail.categories.len(), 1);
    assert_eq!(detail.categories[0].name, "Life");

    // An empty set clears all associations.
    let update = UpdatePostInput {
        category_ids: Some(vec![]),
        ..Default::default()
    };
    service.update_post(post.id, update, &author).await.unwrap();
    let detail = service.get_post(post.id, &author).await.unwrap();
    assert!(detail.categories.is_empty());
}

#[tokio::test]
async fn test_failed_replacement_leaves_prior_associations_untouched() {
    let service = service();
    let author = principal("alice");

    let tech = service
        .create_category(category_input("Tech"), &author)
        .await
        .unwrap();

    let mut input = post_input("Tagged Post");
    input.category_ids = vec![tech.id];
    let post = service.create_post(input, &author).await.unwrap();

    // A replacement carrying an unknown id fails as a whole; the existing
    // set must survive.
    let update = UpdatePostInput {
        category_ids: Some(vec![Uuid::new_v4()]),
        ..Default::default()
    };
    let result = service.update_post(post.id, update, &author).await;
    assert!(matches!(result, Err(DomainError::Conflict(_))));

    let detail = service.get_post(post.id, &author).await.unwrap();
    assert_eq!(detail.categories.len(), 1);
    assert_eq!(detail.categories[0].name, "Tech");

    // A failed create must not leave association rows behind either, even
    // when the bad id comes after a valid one.
    let mut input = post_input("Never Created");
    input.category_ids = vec![tech.id, Uuid::new_v4()];
    assert!(service.create_post(input, &author).await.is_err());

    let categories = service.list_categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].post_count, 1);
}

#[tokio::test]
async fn test_create_post_with_unknown_category_fails() {
    let service = service();
    let author = principal("alice");

    let mut input = post_input("Badly Tagged");
    input.category_ids = vec![Uuid::new_v4()];

    let result = service.create_post(input, &author).await;
    assert!(matches!(result, Err(DomainError::Conflict(_))));
}

#[tokio::test]
async fn test_get_user_posts_returns_all_states_latest_updated_first() {
    let service = service();
    let author = principal("alice");
    let other = principal("bob");

    let draft = service
        .create_post(post_input("Draft"), &author)
        .await
        .unwrap();
    let mut published = post_input("Published");
    published.published = true;
    service.create_post(published, &author).await.unwrap();
    service
        .create_post(post_input("Someone Elses"), &other)
        .await
        .unwrap();

    let archive = UpdatePostInput {
        archived: Some(true),
        ..Default::default()
    };
    service.update_post(draft.id, archive, &author).await.unwrap();

    let mine = service.get_user_posts(&author).await.unwrap();
    assert_eq!(mine.len(), 2);
    // The archived draft was touched last, so it comes first.
    assert_eq!(mine[0].id, draft.id);
    assert!(mine[0].archived);
}

#[tokio::test]
async fn test_category_name_conflicts() {
    let service = service();
    let caller = principal("alice");

    let tech = service
        .create_category(category_input("Tech"), &caller)
        .await
        .unwrap();
    assert_eq!(tech.slug, "tech");

    assert!(matches!(
        service.create_category(category_input("Tech"), &caller).await,
        Err(DomainError::Conflict(_))
    ));

    let other = service
        .create_category(category_input("Life"), &caller)
        .await
        .unwrap();
    let rename = UpdateCategoryInput {
        name: Some("Tech".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        service.update_category(other.id, rename, &caller).await,
        Err(DomainError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_any_principal_may_delete_any_category() {
    let service = service();
    let creator = principal("alice");
    let someone_else = principal("bob");

    let category = service
        .create_category(category_input("Shared"), &creator)
        .await
        .unwrap();

    // Shared taxonomy: no ownership gate on categories.
    service
        .delete_category(category.id, &someone_else)
        .await
        .unwrap();
    assert!(service.list_categories().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_validation_failures_surface_before_writes() {
    let service = service();
    let author = principal("alice");

    let mut input = post_input("");
    input.content = "body".to_string();
    assert!(matches!(
        service.create_post(input, &author).await,
        Err(DomainError::Validation(_))
    ));

    // A title with no representable characters cannot produce a slug.
    assert!(matches!(
        service.create_post(post_input("!!!"), &author).await,
        Err(DomainError::Validation(_))
    ));

    assert!(
        service
            .list_posts(&PostQuery::default(), 10, 0)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_end_to_end_publishing_flow() {
    let service = service();
    let author = principal("alice");

    let tech = service
        .create_category(category_input("Tech"), &author)
        .await
        .unwrap();

    let post = service
        .create_post(
            CreatePostInput {
                title: "Hello World".to_string(),
                content: "body text".to_string(),
                cover_image: None,
                excerpt: None,
                published: false,
                category_ids: vec![tech.id],
            },
            &author,
        )
        .await
        .unwrap();
    assert_eq!(post.slug, "hello-world");

    // Unpublished: anonymous lookup misses, the author sees it.
    assert!(matches!(
        service.get_post_by_slug("hello-world", None).await,
        Err(DomainError::NotFound { .. })
    ));
    let detail = service
        .get_post_by_slug("hello-world", Some(&author))
        .await
        .unwrap();
    assert_eq!(detail.categories.len(), 1);
    assert_eq!(detail.categories[0].name, "Tech");

    // Publish, then the anonymous lookup succeeds.
    let publish = UpdatePostInput {
        published: Some(true),
        ..Default::default()
    };
    service.update_post(post.id, publish, &author).await.unwrap();

    let public = service.get_post_by_slug("hello-world", None).await.unwrap();
    assert!(public.post.published);
    assert_eq!(public.post.author_name, "alice");
}
