use std::sync::Arc;

use crate::application::pagination::{Page, paginate};
use crate::data::category_repository::CategoryRepository;
use crate::data::location_repository::LocationRepository;
use crate::data::post_repository::{NewPost, PostFilter, PostPatch, PostRepository};
use crate::domain::category::Category;
use crate::domain::clock::Clock;
use crate::domain::error::DomainError;
use crate::domain::location::Location;
use crate::domain::post::{CreatePostRequest, Post, PostWithRelations, UpdatePostRequest};
use crate::domain::visibility::is_visible_to;

#[derive(Debug, Clone)]
pub(crate) struct PostListing {
    pub(crate) posts: Vec<PostWithRelations>,
    pub(crate) page: Page,
}

pub(crate) struct BlogService<P, C, L>
where
    P: PostRepository,
    C: CategoryRepository,
    L: LocationRepository,
{
    posts: P,
    categories: C,
    locations: L,
    clock: Arc<dyn Clock>,
}

impl<P, C, L> BlogService<P, C, L>
where
    P: PostRepository,
    C: CategoryRepository,
    L: LocationRepository,
{
    pub(crate) fn new(posts: P, categories: C, locations: L, clock: Arc<dyn Clock>) -> Self {
        Self {
            posts,
            categories,
            locations,
            clock,
        }
    }

    pub(crate) async fn home_listing(
        &self,
        page_size: u32,
        requested_page: u32,
    ) -> Result<PostListing, DomainError> {
        let filter = PostFilter::with_relations().visible_before(self.clock.now());
        self.listing(filter, page_size, requested_page).await
    }

    /// Missing and unpublished categories are indistinguishable to the
    /// public: both answer not-found.
    pub(crate) async fn category_listing(
        &self,
        slug: &str,
        page_size: u32,
        requested_page: u32,
    ) -> Result<(Category, PostListing), DomainError> {
        let category = self
            .categories
            .find_by_slug(slug)
            .await?
            .filter(|category| category.is_published)
            .ok_or_else(|| DomainError::NotFound(format!("category slug: {slug}")))?;

        let filter = PostFilter::with_relations()
            .visible_before(self.clock.now())
            .in_category(category.id);
        let listing = self.listing(filter, page_size, requested_page).await?;
        Ok((category, listing))
    }

    pub(crate) async fn post_detail(
        &self,
        viewer_id: Option<i64>,
        post_id: i64,
    ) -> Result<PostWithRelations, DomainError> {
        let post = self
            .posts
            .get_post_with_relations(post_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))?;

        // A restricted post looks exactly like a missing one to anyone
        // but its author.
        if !is_visible_to(&post, viewer_id, self.clock.now()) {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }
        Ok(post)
    }

    /// Category and location choices for the post form.
    pub(crate) async fn form_choices(&self) -> Result<(Vec<Category>, Vec<Location>), DomainError> {
        let categories = self.categories.list_published().await?;
        let locations = self.locations.list_published().await?;
        Ok((categories, locations))
    }

    pub(crate) async fn create_post(
        &self,
        author_id: i64,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let new_post = NewPost {
            title: req.title,
            text: req.text,
            pub_date: req.pub_date,
            author_id,
            category_id: req.category_id,
            location_id: req.location_id,
            image: req.image,
        };
        self.posts.create_post(new_post).await
    }

    /// Loads a post for the edit/delete forms: missing answers
    /// not-found, a foreign post answers `Forbidden` so the handler can
    /// issue its silent redirect.
    pub(crate) async fn post_for_owner(
        &self,
        actor_user_id: i64,
        post_id: i64,
    ) -> Result<Post, DomainError> {
        let post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))?;

        if post.author_id != actor_user_id {
            return Err(DomainError::Forbidden);
        }
        Ok(post)
    }

    pub(crate) async fn update_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
        req: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        // Ownership is resolved before the form is even looked at, so a
        // non-owner gets the redirect no matter what they submitted.
        self.post_for_owner(actor_user_id, post_id).await?;
        let req = req.validate()?;

        let patch = PostPatch {
            title: req.title,
            text: req.text,
            pub_date: req.pub_date,
            category_id: req.category_id,
            location_id: req.location_id,
            image: req.image,
        };
        self.posts
            .update_post_owned(post_id, actor_user_id, patch)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))
    }

    pub(crate) async fn delete_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
    ) -> Result<(), DomainError> {
        self.post_for_owner(actor_user_id, post_id).await?;

        let deleted = self.posts.delete_post(post_id).await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }
        Ok(())
    }

    pub(crate) async fn listing(
        &self,
        filter: PostFilter,
        page_size: u32,
        requested_page: u32,
    ) -> Result<PostListing, DomainError> {
        let total = self.posts.count_posts(filter).await?;
        let (page, slice) = paginate(total, page_size, requested_page);
        let posts = self.posts.list_posts(filter, slice).await?;
        Ok(PostListing { posts, page })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};

    use super::BlogService;
    use crate::data::category_repository::CategoryRepository;
    use crate::data::location_repository::LocationRepository;
    use crate::data::post_repository::{
        NewPost, PageSlice, PostFilter, PostPatch, PostRepository,
    };
    use crate::domain::category::Category;
    use crate::domain::clock::FixedClock;
    use crate::domain::error::DomainError;
    use crate::domain::location::Location;
    use crate::domain::post::{
        CreatePostRequest, Post, PostAuthor, PostCategory, PostWithRelations, UpdatePostRequest,
    };

    #[derive(Clone)]
    struct FakePostRepo {
        created_input: Arc<Mutex<Option<NewPost>>>,
        post_for_get: Arc<Mutex<Option<Post>>>,
        detail_result: Arc<Mutex<Option<PostWithRelations>>>,
        update_owned_result: Arc<Mutex<Option<Post>>>,
        update_owned_call: Arc<Mutex<Option<(i64, i64, PostPatch)>>>,
        delete_result: Arc<Mutex<bool>>,
        list_filter: Arc<Mutex<Option<PostFilter>>>,
        list_result: Arc<Mutex<Vec<PostWithRelations>>>,
        total_result: Arc<Mutex<i64>>,
    }

    impl FakePostRepo {
        fn new() -> Self {
            Self {
                created_input: Arc::new(Mutex::new(None)),
                post_for_get: Arc::new(Mutex::new(None)),
                detail_result: Arc::new(Mutex::new(None)),
                update_owned_result: Arc::new(Mutex::new(None)),
                update_owned_call: Arc::new(Mutex::new(None)),
                delete_result: Arc::new(Mutex::new(true)),
                list_filter: Arc::new(Mutex::new(None)),
                list_result: Arc::new(Mutex::new(Vec::new())),
                total_result: Arc::new(Mutex::new(0)),
            }
        }
    }

    #[async_trait]
    impl PostRepository for FakePostRepo {
        async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
            *self
                .created_input
                .lock()
                .expect("created_input mutex poisoned") = Some(input.clone());
            Ok(sample_post(1, &input.title, input.author_id, input.pub_date))
        }

        async fn get_post(&self, _id: i64) -> Result<Option<Post>, DomainError> {
            Ok(self
                .post_for_get
                .lock()
                .expect("post_for_get mutex poisoned")
                .clone())
        }

        async fn get_post_with_relations(
            &self,
            _id: i64,
        ) -> Result<Option<PostWithRelations>, DomainError> {
            Ok(self
                .detail_result
                .lock()
                .expect("detail_result mutex poisoned")
                .clone())
        }

        async fn update_post_owned(
            &self,
            post_id: i64,
            owner_id: i64,
            patch: PostPatch,
        ) -> Result<Option<Post>, DomainError> {
            *self
                .update_owned_call
                .lock()
                .expect("update_owned_call mutex poisoned") = Some((post_id, owner_id, patch));
            Ok(self
                .update_owned_result
                .lock()
                .expect("update_owned_result mutex poisoned")
                .clone())
        }

        async fn delete_post(&self, _id: i64) -> Result<bool, DomainError> {
            Ok(*self
                .delete_result
                .lock()
                .expect("delete_result mutex poisoned"))
        }

        async fn list_posts(
            &self,
            filter: PostFilter,
            _slice: PageSlice,
        ) -> Result<Vec<PostWithRelations>, DomainError> {
            *self.list_filter.lock().expect("list_filter mutex poisoned") = Some(filter);
            Ok(self
                .list_result
                .lock()
                .expect("list_result mutex poisoned")
                .clone())
        }

        async fn count_posts(&self, _filter: PostFilter) -> Result<i64, DomainError> {
            Ok(*self
                .total_result
                .lock()
                .expect("total_result mutex poisoned"))
        }
    }

    #[derive(Clone)]
    struct FakeCategoryRepo {
        by_slug: Arc<Mutex<Option<Category>>>,
    }

    impl FakeCategoryRepo {
        fn new() -> Self {
            Self {
                by_slug: Arc::new(Mutex::new(None)),
            }
        }
    }

    #[async_trait]
    impl CategoryRepository for FakeCategoryRepo {
        async fn find_by_slug(&self, _slug: &str) -> Result<Option<Category>, DomainError> {
            Ok(self.by_slug.lock().expect("by_slug mutex poisoned").clone())
        }

        async fn list_published(&self) -> Result<Vec<Category>, DomainError> {
            Ok(Vec::new())
        }
    }

    #[derive(Clone)]
    struct FakeLocationRepo;

    #[async_trait]
    impl LocationRepository for FakeLocationRepo {
        async fn list_published(&self) -> Result<Vec<Location>, DomainError> {
            Ok(Vec::new())
        }
    }

    fn service(
        repo: FakePostRepo,
        categories: FakeCategoryRepo,
        now: DateTime<Utc>,
    ) -> BlogService<FakePostRepo, FakeCategoryRepo, FakeLocationRepo> {
        BlogService::new(repo, categories, FakeLocationRepo, Arc::new(FixedClock(now)))
    }

    #[tokio::test]
    async fn home_listing_applies_public_visibility_filter() {
        let repo = FakePostRepo::new();
        let now = Utc::now();
        let service = service(repo.clone(), FakeCategoryRepo::new(), now);

        service
            .home_listing(10, 1)
            .await
            .expect("home_listing must succeed");

        let filter = repo
            .list_filter
            .lock()
            .expect("list_filter mutex poisoned")
            .expect("filter must be captured");
        assert!(filter.published_category_only);
        assert_eq!(filter.visible_before, Some(now));
        assert_eq!(filter.category_id, None);
        assert_eq!(filter.author_id, None);
    }

    #[tokio::test]
    async fn out_of_range_page_clamps_to_last_page() {
        let repo = FakePostRepo::new();
        *repo
            .total_result
            .lock()
            .expect("total_result mutex poisoned") = 5;
        let service = service(repo.clone(), FakeCategoryRepo::new(), Utc::now());

        let listing = service
            .home_listing(10, 10)
            .await
            .expect("home_listing must succeed");
        assert_eq!(listing.page.number, 1);
        assert_eq!(listing.page.total_pages, 1);
        assert!(!listing.page.has_next);
    }

    #[tokio::test]
    async fn category_listing_rejects_unpublished_category() {
        let repo = FakePostRepo::new();
        let categories = FakeCategoryRepo::new();
        *categories.by_slug.lock().expect("by_slug mutex poisoned") =
            Some(sample_category(5, "news", false));
        let service = service(repo, categories, Utc::now());

        let err = service
            .category_listing("news", 10, 1)
            .await
            .expect_err("unpublished category must 404");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn category_listing_narrows_filter_to_category() {
        let repo = FakePostRepo::new();
        let categories = FakeCategoryRepo::new();
        *categories.by_slug.lock().expect("by_slug mutex poisoned") =
            Some(sample_category(5, "news", true));
        let now = Utc::now();
        let service = service(repo.clone(), categories, now);

        let (category, _) = service
            .category_listing("news", 10, 1)
            .await
            .expect("category_listing must succeed");
        assert_eq!(category.id, 5);

        let filter = repo
            .list_filter
            .lock()
            .expect("list_filter mutex poisoned")
            .expect("filter must be captured");
        assert_eq!(filter.category_id, Some(5));
        assert_eq!(filter.visible_before, Some(now));
    }

    #[tokio::test]
    async fn post_detail_hides_scheduled_post_from_non_author() {
        let repo = FakePostRepo::new();
        let now = Utc::now();
        *repo
            .detail_result
            .lock()
            .expect("detail_result mutex poisoned") =
            Some(sample_detail(7, 10, now + Duration::hours(1), true, true));
        let service = service(repo, FakeCategoryRepo::new(), now);

        let err = service
            .post_detail(Some(11), 7)
            .await
            .expect_err("scheduled post must be hidden");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn post_detail_shows_scheduled_post_to_author() {
        let repo = FakePostRepo::new();
        let now = Utc::now();
        *repo
            .detail_result
            .lock()
            .expect("detail_result mutex poisoned") =
            Some(sample_detail(7, 10, now + Duration::hours(1), false, false));
        let service = service(repo, FakeCategoryRepo::new(), now);

        let post = service
            .post_detail(Some(10), 7)
            .await
            .expect("author must see own post");
        assert_eq!(post.post.id, 7);
    }

    #[tokio::test]
    async fn create_post_forces_author_and_normalizes() {
        let repo = FakePostRepo::new();
        let service = service(repo.clone(), FakeCategoryRepo::new(), Utc::now());

        let req = CreatePostRequest {
            title: "  Title  ".to_string(),
            text: "  body  ".to_string(),
            pub_date: Utc::now(),
            category_id: Some(5),
            location_id: None,
            image: None,
        };

        service
            .create_post(10, req)
            .await
            .expect("create_post must succeed");

        let input = repo
            .created_input
            .lock()
            .expect("created_input mutex poisoned")
            .clone()
            .expect("repo input must be captured");
        assert_eq!(input.title, "Title");
        assert_eq!(input.text, "body");
        assert_eq!(input.author_id, 10);
        assert_eq!(input.category_id, Some(5));
    }

    #[tokio::test]
    async fn update_post_by_non_owner_is_forbidden_and_writes_nothing() {
        let repo = FakePostRepo::new();
        *repo
            .post_for_get
            .lock()
            .expect("post_for_get mutex poisoned") =
            Some(sample_post(7, "Title", 99, Utc::now()));
        let service = service(repo.clone(), FakeCategoryRepo::new(), Utc::now());

        let req = UpdatePostRequest {
            title: "New".to_string(),
            text: "body".to_string(),
            pub_date: Utc::now(),
            category_id: None,
            location_id: None,
            image: None,
        };

        let err = service
            .update_post(10, 7, req)
            .await
            .expect_err("must be forbidden");
        assert!(matches!(err, DomainError::Forbidden));
        assert!(
            repo.update_owned_call
                .lock()
                .expect("update_owned_call mutex poisoned")
                .is_none()
        );
    }

    #[tokio::test]
    async fn non_owner_edit_with_invalid_form_is_still_forbidden() {
        let repo = FakePostRepo::new();
        *repo
            .post_for_get
            .lock()
            .expect("post_for_get mutex poisoned") =
            Some(sample_post(7, "Title", 99, Utc::now()));
        let service = service(repo.clone(), FakeCategoryRepo::new(), Utc::now());

        let req = UpdatePostRequest {
            title: "   ".to_string(),
            text: "body".to_string(),
            pub_date: Utc::now(),
            category_id: None,
            location_id: None,
            image: None,
        };

        let err = service
            .update_post(10, 7, req)
            .await
            .expect_err("must be forbidden");
        assert!(matches!(err, DomainError::Forbidden));
        assert!(
            repo.update_owned_call
                .lock()
                .expect("update_owned_call mutex poisoned")
                .is_none()
        );
    }

    #[tokio::test]
    async fn owner_edit_with_invalid_form_reports_validation() {
        let repo = FakePostRepo::new();
        *repo
            .post_for_get
            .lock()
            .expect("post_for_get mutex poisoned") =
            Some(sample_post(7, "Title", 10, Utc::now()));
        let service = service(repo.clone(), FakeCategoryRepo::new(), Utc::now());

        let req = UpdatePostRequest {
            title: "   ".to_string(),
            text: "body".to_string(),
            pub_date: Utc::now(),
            category_id: None,
            location_id: None,
            image: None,
        };

        let err = service
            .update_post(10, 7, req)
            .await
            .expect_err("blank title must fail");
        assert!(matches!(err, DomainError::Validation { field: "title", .. }));
        assert!(
            repo.update_owned_call
                .lock()
                .expect("update_owned_call mutex poisoned")
                .is_none()
        );
    }

    #[tokio::test]
    async fn delete_post_returns_not_found_when_missing() {
        let repo = FakePostRepo::new();
        let service = service(repo, FakeCategoryRepo::new(), Utc::now());

        let err = service
            .delete_post(10, 7)
            .await
            .expect_err("post must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    fn sample_post(id: i64, title: &str, author_id: i64, pub_date: DateTime<Utc>) -> Post {
        Post {
            id,
            title: title.to_string(),
            text: "body".to_string(),
            pub_date,
            is_published: true,
            image: None,
            author_id,
            category_id: None,
            location_id: None,
            created_at: Utc::now(),
        }
    }

    fn sample_detail(
        id: i64,
        author_id: i64,
        pub_date: DateTime<Utc>,
        is_published: bool,
        category_published: bool,
    ) -> PostWithRelations {
        let mut post = sample_post(id, "Title", author_id, pub_date);
        post.is_published = is_published;
        post.category_id = Some(5);
        PostWithRelations {
            post,
            author: PostAuthor {
                id: author_id,
                username: "author".to_string(),
            },
            category: Some(PostCategory {
                id: 5,
                title: "News".to_string(),
                slug: "news".to_string(),
                is_published: category_published,
            }),
            location: None,
            comment_count: 0,
        }
    }

    fn sample_category(id: i64, slug: &str, is_published: bool) -> Category {
        Category {
            id,
            title: "News".to_string(),
            description: "daily news".to_string(),
            slug: slug.to_string(),
            is_published,
            created_at: Utc::now(),
        }
    }
}
