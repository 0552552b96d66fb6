use movcat_e2e_tests::{launch_env, prepare_env};
use serde_json::json;
use tracing::info;
use tracing_test::traced_test;

async fn movie_id(conn: &movcat_dal::Pool, title: &str) -> i64 {
    sqlx::query_scalar("SELECT id FROM movie WHERE title = ?")
        .bind(title)
        .fetch_one(conn)
        .await
        .unwrap()
}

#[tokio::test]
#[traced_test]
async fn test_movie_crud() {
    let (args, _config_guard) = prepare_env("test_movie_crud").unwrap();
    let db_url = args.database_url();
    let (client, base_url) = launch_env(args).await.unwrap();
    let conn = movcat_dal::new_pool(&db_url).await.unwrap();

    let api_url = base_url.join("movies").unwrap();
    let payload = json!({
        "title": "Wolfwalkers",
        "director": "Tomm Moore",
        "releaseDate": "2020-09-12",
        "genre": "ANIMATION"
    });

    let response = client.post(api_url.clone()).json(&payload).send().await.unwrap();
    info!("Create response: {:#?}", response);
    assert_eq!(response.status().as_u16(), 201);
    let created: serde_json::Value = response.json().await.unwrap();
    assert_eq!(created, payload);

    // The body never carries the id, so fish it out of the database.
    let id = movie_id(&conn, "Wolfwalkers").await;
    let movie_url = base_url.join(&format!("movies/{id}")).unwrap();

    let response = client.get(movie_url.clone()).send().await.unwrap();
    assert!(response.status().is_success());
    let found: serde_json::Value = response.json().await.unwrap();
    assert_eq!(found, payload);

    let patch = json!({"title": "Wolfwalkers (Director's Cut)"});
    let response = client.patch(movie_url.clone()).json(&patch).send().await.unwrap();
    assert!(response.status().is_success());
    let updated: serde_json::Value = response.json().await.unwrap();
    assert_eq!(updated["title"], "Wolfwalkers (Director's Cut)");
    assert_eq!(updated["director"], "Tomm Moore");
    assert_eq!(updated["releaseDate"], "2020-09-12");
    assert_eq!(updated["genre"], "ANIMATION");

    let response = client.delete(movie_url.clone()).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 204);

    let response = client.delete(movie_url.clone()).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let response = client.get(movie_url).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
#[traced_test]
async fn test_create_rejects_incomplete_payload() {
    let (args, _config_guard) = prepare_env("test_movie_validation").unwrap();
    let (client, base_url) = launch_env(args).await.unwrap();

    let api_url = base_url.join("movies").unwrap();
    let incomplete = json!({
        "title": "No Director",
        "releaseDate": "2020-01-01",
        "genre": "DRAMA"
    });

    let response = client.post(api_url.clone()).json(&incomplete).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("director"));

    let empty_title = json!({
        "title": "",
        "director": "Somebody",
        "releaseDate": "2020-01-01",
        "genre": "DRAMA"
    });
    let response = client.post(api_url).json(&empty_title).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
#[traced_test]
async fn test_paging() {
    let (args, _config_guard) = prepare_env("test_movie_paging").unwrap();
    let db_url = args.database_url();
    let (client, base_url) = launch_env(args).await.unwrap();

    let mut count = 0;
    let conn = movcat_dal::new_pool(&db_url).await.unwrap();
    let mut transaction = conn.begin().await.unwrap();

    for c in 'a'..='z' {
        let title = format!("Movie-{}", c);
        sqlx::query(
            "INSERT INTO movie (title, director, release_date, genre) VALUES (?, 'Various', '2000-01-01', 'DRAMA')",
        )
        .bind(&title)
        .execute(&mut *transaction)
        .await
        .unwrap();
        count += 1;
    }
    transaction.commit().await.unwrap();
    info!("Created {} movies", count);

    let api_url = base_url.join("movies").unwrap();

    let get_page = async |query: &str| {
        let mut page_url = api_url.clone();
        page_url.set_query(Some(query));
        let response = client.get(page_url).send().await.unwrap();
        info!("Response: {:#?}", response);
        assert!(response.status().is_success());
        let page: serde_json::Value = response.json().await.unwrap();
        page
    };

    let page = get_page("page=0&page_size=10&sort=title").await;
    assert_eq!(page["page"], 0);
    assert_eq!(page["pageSize"], 10);
    assert_eq!(page["totalElements"], 26);
    assert_eq!(page["totalPages"], 3);
    assert_eq!(page["numberOfElements"], 10);
    assert_eq!(page["rows"][0]["title"], "Movie-a");

    let page = get_page("page=2&page_size=10&sort=title").await;
    assert_eq!(page["numberOfElements"], 6);
    assert_eq!(page["rows"][0]["title"], "Movie-u");

    let page = get_page("page=0&page_size=10&sort=-title").await;
    assert_eq!(page["rows"][0]["title"], "Movie-z");

    // Default page size from server config.
    let page = get_page("").await;
    assert_eq!(page["pageSize"], 20);
    assert_eq!(page["numberOfElements"], 20);

    // Unknown sort keys are rejected, not interpolated.
    let mut page_url = api_url.clone();
    page_url.set_query(Some("sort=rating"));
    let response = client.get(page_url).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 400);
}
