use launchpad_data::posts::{self, NewPost};
use launchpad_data::users::{self, NewUser};
use launchpad_test_support::mysql::start_mysql;

#[tokio::test]
async fn migrations_and_queries_round_trip() -> anyhow::Result<()> {
    let database = match start_mysql() {
        Ok(db) => db,
        Err(err) => {
            eprintln!("skipping migrations_and_queries_round_trip: {err}");
            return Ok(());
        }
    };
    let pool = launchpad_data::connect(database.connection_string()).await?;
    launchpad_data::run_migrations(&pool).await?;
    launchpad_data::ping(&pool).await?;

    let id = users::insert_user(
        &pool,
        &NewUser {
            name: "Ada Lovelace",
            email: "ada@example.com",
        },
    )
    .await?;
    let user = users::fetch_user(&pool, id)
        .await?
        .expect("inserted user should exist");
    assert_eq!(user.name, "Ada Lovelace");
    assert_eq!(user.email, "ada@example.com");
    assert!(users::fetch_user(&pool, id + 1000).await?.is_none());
    assert_eq!(users::count_users(&pool).await?, 1);

    let by_email = users::fetch_user_by_email(&pool, "ada@example.com").await?;
    assert_eq!(by_email.map(|row| row.id), Some(id));

    let duplicate = users::insert_user(
        &pool,
        &NewUser {
            name: "Imposter",
            email: "ada@example.com",
        },
    )
    .await;
    let err = duplicate.expect_err("duplicate email should be rejected");
    assert!(users::is_unique_violation(&err));

    let post_id = posts::insert_post(
        &pool,
        &NewPost {
            author_id: Some(id),
            title: "Hello",
            content: "First post",
            published: true,
        },
    )
    .await?;
    let post = posts::fetch_post(&pool, post_id)
        .await?
        .expect("inserted post should exist");
    assert_eq!(post.author_id, Some(id));
    assert_eq!(post.title, "Hello");
    assert!(post.published);
    assert_eq!(posts::count_posts(&pool).await?, 1);

    Ok(())
}

#[tokio::test]
async fn list_queries_honour_limit_and_offset() -> anyhow::Result<()> {
    let database = match start_mysql() {
        Ok(db) => db,
        Err(err) => {
            eprintln!("skipping list_queries_honour_limit_and_offset: {err}");
            return Ok(());
        }
    };
    let pool = launchpad_data::connect(database.connection_string()).await?;
    launchpad_data::run_migrations(&pool).await?;

    for index in 0..5 {
        users::insert_user(
            &pool,
            &NewUser {
                name: &format!("User {index}"),
                email: &format!("user{index}@example.com"),
            },
        )
        .await?;
        posts::insert_post(
            &pool,
            &NewPost {
                author_id: None,
                title: &format!("Post {index}"),
                content: "body",
                published: false,
            },
        )
        .await?;
    }

    let first_page = users::list_users(&pool, 2, 0).await?;
    let second_page = users::list_users(&pool, 2, 2).await?;
    assert_eq!(first_page.len(), 2);
    assert_eq!(second_page.len(), 2);
    // Users list oldest-first, so pages advance through insertion order.
    assert!(first_page[1].id < second_page[0].id);

    let newest = posts::list_posts(&pool, 1, 0).await?;
    assert_eq!(newest.len(), 1);
    assert_eq!(newest[0].title, "Post 4");

    let tail = posts::list_posts(&pool, 10, 4).await?;
    assert_eq!(tail.len(), 1);
    assert_eq!(tail[0].title, "Post 0");

    Ok(())
}
